use issuer_types::{IssuerId, LicenseIssuer, LicenseIssuerChanges, NewLicenseIssuer};
use reqwest::Method;

use super::{issuer_path, ISSUERS_PATH};
use crate::api::{ApiClient, Saved};
use crate::error::ClientResult;

/// `/api/license-issuers`. Listing and creating issuers needs the
/// administrative credential.
#[derive(Debug, Clone, Copy)]
pub struct Issuers<'a> {
    api: &'a ApiClient,
}

impl<'a> Issuers<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ClientResult<Option<Vec<LicenseIssuer>>> {
        self.api.fetch(ISSUERS_PATH).await
    }

    pub async fn get(&self, id: IssuerId) -> ClientResult<Option<LicenseIssuer>> {
        self.api.fetch(&issuer_path(id)).await
    }

    pub async fn create(&self, issuer: &NewLicenseIssuer) -> ClientResult<Saved<LicenseIssuer>> {
        self.api.save(Method::POST, ISSUERS_PATH, issuer).await
    }

    pub async fn update(
        &self,
        id: IssuerId,
        changes: &LicenseIssuerChanges,
    ) -> ClientResult<Saved<LicenseIssuer>> {
        self.api.save(Method::PATCH, &issuer_path(id), changes).await
    }

    pub async fn delete(&self, id: IssuerId) -> ClientResult<bool> {
        self.api.remove(&issuer_path(id)).await
    }
}
