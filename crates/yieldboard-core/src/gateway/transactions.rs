use std::sync::Arc;

use yieldboard_api::AdminClient;
use yieldboard_api::models::TransactionListQuery;

use super::{ListSource, convert_page};
use crate::model::{TransactionFilter, TransactionLog};
use crate::normalize::{ListResult, normalize};

/// Request-log gateway backed by the admin API.
#[derive(Debug, Clone)]
pub struct TransactionsGateway {
    client: Arc<AdminClient>,
}

impl TransactionsGateway {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

impl ListSource for TransactionsGateway {
    type Item = TransactionLog;
    type Filter = TransactionFilter;

    async fn fetch(
        &self,
        page: u32,
        page_size: u32,
        filter: &TransactionFilter,
    ) -> ListResult<TransactionLog> {
        let query = TransactionListQuery {
            page: page.max(1),
            limit: page_size.max(1),
            user_id: filter.user_id.clone(),
            email: filter.email.clone(),
        };
        let resp = normalize(|| self.client.list_transactions(&query)).await?;
        convert_page(resp.transactions, resp.total)
    }
}
