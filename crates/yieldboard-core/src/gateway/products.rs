use std::sync::Arc;

use yieldboard_api::AdminClient;
use yieldboard_api::models::ProductListQuery;

use super::{ListSource, ProductGateway, convert_page};
use crate::model::{Product, ProductDraft, ProductFilter, ProductId};
use crate::normalize::{ListResult, Normalized, normalize};

/// Product catalog gateway backed by the admin API.
#[derive(Debug, Clone)]
pub struct ProductsGateway {
    client: Arc<AdminClient>,
}

impl ProductsGateway {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }
}

impl ListSource for ProductsGateway {
    type Item = Product;
    type Filter = ProductFilter;

    async fn fetch(&self, page: u32, page_size: u32, filter: &ProductFilter) -> ListResult<Product> {
        let query = ProductListQuery {
            page: page.max(1),
            limit: page_size.max(1),
            risk_level: filter.risk_level.map(|r| r.to_string()),
            investment_type: filter.investment_type.map(|t| t.to_string()),
        };
        let resp = normalize(|| self.client.list_products(&query)).await?;
        convert_page(resp.data, resp.total)
    }
}

impl ProductGateway for ProductsGateway {
    async fn create(&self, draft: &ProductDraft) -> Normalized<Option<String>> {
        let payload = draft.to_payload(None);
        let resp = normalize(|| self.client.add_product(&payload)).await?;
        Ok(resp.message)
    }

    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Normalized<Option<String>> {
        let payload = draft.to_payload(Some(id));
        let resp = normalize(|| self.client.update_product(&payload)).await?;
        Ok(resp.message)
    }

    async fn delete(&self, id: &ProductId) -> Normalized<Option<String>> {
        let resp = normalize(|| self.client.delete_product(id.as_str())).await?;
        Ok(resp.message)
    }
}
