// Product catalog endpoints
//
// All four operations live under `/products/`. Delete carries the identity
// in a JSON body, not in the path.

use reqwest::Method;
use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{
    DeleteProductBody, MessageResponse, ProductListQuery, ProductListResponse, ProductPayload,
};

impl AdminClient {
    /// List one page of products.
    ///
    /// `GET /products/list-products?page&limit[&risk_level][&investment_type]`
    pub async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> Result<ProductListResponse, Error> {
        let url = self.endpoint("products/list-products")?;
        debug!(page = query.page, limit = query.limit, "listing products");
        self.get_with_query(url, query).await
    }

    /// Create a product.
    ///
    /// `POST /products/add-product`
    pub async fn add_product(&self, payload: &ProductPayload) -> Result<MessageResponse, Error> {
        let url = self.endpoint("products/add-product")?;
        debug!(name = %payload.name, "adding product");
        self.send_ack(Method::POST, url, payload).await
    }

    /// Update a product. `payload.id` must be set.
    ///
    /// `PATCH /products/update-product`
    pub async fn update_product(
        &self,
        payload: &ProductPayload,
    ) -> Result<MessageResponse, Error> {
        let url = self.endpoint("products/update-product")?;
        debug!(id = ?payload.id, "updating product");
        self.send_ack(Method::PATCH, url, payload).await
    }

    /// Delete a product by identity.
    ///
    /// `DELETE /products/delete-product` with `{"productId": "..."}`
    pub async fn delete_product(&self, product_id: &str) -> Result<MessageResponse, Error> {
        let url = self.endpoint("products/delete-product")?;
        debug!(product_id, "deleting product");
        self.send_ack(Method::DELETE, url, &DeleteProductBody { product_id })
            .await
    }
}
