use issuer_types::{url_safe_id, IssuerId, License, LicenseFields};
use reqwest::Method;

use super::issuer_path;
use crate::api::{ApiClient, Saved};
use crate::error::ClientResult;

/// Licenses of one issuer.
///
/// License ids are standard base64 and are re-encoded with
/// [`url_safe_id`] before they go into a path.
#[derive(Debug, Clone, Copy)]
pub struct Licenses<'a> {
    api: &'a ApiClient,
    issuer: IssuerId,
}

impl<'a> Licenses<'a> {
    pub(crate) fn new(api: &'a ApiClient, issuer: IssuerId) -> Self {
        Self { api, issuer }
    }

    fn collection(&self) -> String {
        format!("{}/licenses", issuer_path(self.issuer))
    }

    fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection(), url_safe_id(id))
    }

    pub async fn list(&self) -> ClientResult<Option<Vec<License>>> {
        self.api.fetch(&self.collection()).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Option<License>> {
        self.api.fetch(&self.item(id)).await
    }

    pub async fn create(&self, fields: &LicenseFields) -> ClientResult<Saved<License>> {
        self.api.save(Method::POST, &self.collection(), fields).await
    }

    pub async fn update(&self, id: &str, fields: &LicenseFields) -> ClientResult<Saved<License>> {
        self.api.save(Method::PATCH, &self.item(id), fields).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<bool> {
        self.api.remove(&self.item(id)).await
    }
}
