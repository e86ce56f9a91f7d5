use issuer_types::{IssuerId, Product, ProductFields, ProductId};
use reqwest::Method;

use super::issuer_path;
use crate::api::{ApiClient, Saved};
use crate::error::ClientResult;

/// Products of one issuer.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    api: &'a ApiClient,
    issuer: IssuerId,
}

impl<'a> Products<'a> {
    pub(crate) fn new(api: &'a ApiClient, issuer: IssuerId) -> Self {
        Self { api, issuer }
    }

    fn collection(&self) -> String {
        format!("{}/products", issuer_path(self.issuer))
    }

    fn item(&self, id: ProductId) -> String {
        format!("{}/{id}", self.collection())
    }

    pub async fn list(&self) -> ClientResult<Option<Vec<Product>>> {
        self.api.fetch(&self.collection()).await
    }

    pub async fn get(&self, id: ProductId) -> ClientResult<Option<Product>> {
        self.api.fetch(&self.item(id)).await
    }

    pub async fn create(&self, fields: &ProductFields) -> ClientResult<Saved<Product>> {
        self.api.save(Method::POST, &self.collection(), fields).await
    }

    pub async fn update(
        &self,
        id: ProductId,
        fields: &ProductFields,
    ) -> ClientResult<Saved<Product>> {
        self.api.save(Method::PATCH, &self.item(id), fields).await
    }

    pub async fn delete(&self, id: ProductId) -> ClientResult<bool> {
        self.api.remove(&self.item(id)).await
    }
}
