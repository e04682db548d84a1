// Transaction log endpoint
//
// The backend records every authenticated request; this read-only listing
// is filtered by acting user and email.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{TransactionListQuery, TransactionListResponse};

impl AdminClient {
    /// List one page of request-log entries.
    ///
    /// `GET /admin/transactions?page&limit[&user_id][&email]`
    pub async fn list_transactions(
        &self,
        query: &TransactionListQuery,
    ) -> Result<TransactionListResponse, Error> {
        let url = self.endpoint("admin/transactions")?;
        debug!(page = query.page, limit = query.limit, "listing transactions");
        self.get_with_query(url, query).await
    }
}
