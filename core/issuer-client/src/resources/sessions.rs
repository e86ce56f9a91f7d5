use issuer_types::{url_safe_id, IssuerId, LicenseSession};

use super::issuer_path;
use crate::api::ApiClient;
use crate::error::ClientResult;

/// Sessions of one license.
///
/// Sessions are opened by licensed software, so this client can only read
/// and revoke them.
#[derive(Debug, Clone)]
pub struct Sessions<'a> {
    api: &'a ApiClient,
    collection: String,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(api: &'a ApiClient, issuer: IssuerId, license: &str) -> Self {
        let collection = format!(
            "{}/licenses/{}/sessions",
            issuer_path(issuer),
            url_safe_id(license)
        );
        Self { api, collection }
    }

    fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection, url_safe_id(id))
    }

    pub async fn list(&self) -> ClientResult<Option<Vec<LicenseSession>>> {
        self.api.fetch(&self.collection).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Option<LicenseSession>> {
        self.api.fetch(&self.item(id)).await
    }

    /// Revokes a session. Returns true if the server confirmed it.
    pub async fn delete(&self, id: &str) -> ClientResult<bool> {
        self.api.remove(&self.item(id)).await
    }
}
