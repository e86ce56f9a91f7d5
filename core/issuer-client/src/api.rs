//! The authenticated request layer.

use std::fmt;
use std::sync::Arc;

use issuer_session::{CredentialStore, Navigator, Route};
use issuer_types::{Credential, IssuerId, LoginRequest, LoginResponse};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::resources::{Issuers, Licenses, Products, Sessions};

const LOGIN_PATH: &str = "/api/login";

/// Outcome of a create or update call.
///
/// `record` is `None` when the server answered with a non-success status;
/// `status` is always the exact status the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved<T> {
    pub record: Option<T>,
    pub status: u16,
}

impl<T> Saved<T> {
    /// True if the server accepted the change.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.record.is_some()
    }
}

/// HTTP client bound to a credential store and a navigator.
///
/// Every request made through [`authenticated_fetch`](Self::authenticated_fetch)
/// carries the current bearer token. A `401` clears the credential and
/// navigates to [`Route::Login`]; a `403` navigates to [`Route::Home`].
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: Client,
    credentials: CredentialStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an unusable base URL, or
    /// [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        credentials: CredentialStore,
        navigator: Arc<dyn Navigator>,
    ) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        Ok(Self {
            config,
            http,
            credentials,
            navigator,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The credential store this client reads from and clears.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Starts a request to `path` on the configured server.
    ///
    /// The builder is not authenticated yet; pass it to [`send`](Self::send).
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.config.endpoint(path))
    }

    /// Builds and sends a request through [`authenticated_fetch`](Self::authenticated_fetch).
    ///
    /// # Errors
    ///
    /// Same as [`authenticated_fetch`](Self::authenticated_fetch), plus
    /// [`ClientError::Http`] if the request cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        self.authenticated_fetch(builder.build()?).await
    }

    /// Sends `request` with the current bearer token.
    ///
    /// Any `Authorization` header already on the request is replaced. The
    /// response is returned whatever its status; `401` and `403` side effects
    /// have already run by the time this returns.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidToken`] if the token cannot be sent as a
    /// header, or [`ClientError::Http`] on transport failure.
    pub async fn authenticated_fetch(&self, mut request: Request) -> ClientResult<Response> {
        let credential = self.credentials.get();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.token))
            .map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        let method = request.method().clone();
        let url = request.url().clone();
        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "api request");

        self.handle_status(status);
        Ok(response)
    }

    fn handle_status(&self, status: StatusCode) {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("credential rejected, logging out");
                if let Err(e) = self.credentials.clear() {
                    warn!(error = %e, "failed to persist logout");
                }
                self.navigator.navigate(Route::Login);
            }
            StatusCode::FORBIDDEN => {
                warn!("permission denied");
                self.navigator.navigate(Route::Home);
            }
            _ => {}
        }
    }

    /// Exchanges a username and password for a credential and stores it.
    ///
    /// Returns `Ok(false)` if the server refuses the login; the stored
    /// credential is then left as it was.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, an undecodable success body,
    /// or if the new credential cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<bool> {
        let response = self
            .http
            .post(self.config.endpoint(LOGIN_PATH))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            info!(username, status = status.as_u16(), "login refused");
            return Ok(false);
        }

        let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;
        let credential = Credential::from(body);
        let issuer_id = credential.issuer_id;
        self.credentials.set(credential)?;
        info!(username, issuer_id, "logged in");
        Ok(true)
    }

    /// Forgets the stored credential. No request is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the reset credential cannot be persisted.
    pub fn logout(&self) -> ClientResult<()> {
        self.credentials.clear()?;
        info!("logged out");
        Ok(())
    }

    /// License issuers, the top-level tenants.
    #[must_use]
    pub fn issuers(&self) -> Issuers<'_> {
        Issuers::new(self)
    }

    /// Licenses owned by `issuer`.
    #[must_use]
    pub fn licenses(&self, issuer: IssuerId) -> Licenses<'_> {
        Licenses::new(self, issuer)
    }

    /// Sessions activated against `license` of `issuer`.
    #[must_use]
    pub fn sessions<'a>(&'a self, issuer: IssuerId, license: &str) -> Sessions<'a> {
        Sessions::new(self, issuer, license)
    }

    /// Products owned by `issuer`.
    #[must_use]
    pub fn products(&self, issuer: IssuerId) -> Products<'_> {
        Products::new(self, issuer)
    }

    // ── shared resource plumbing ─────────────────────────────────

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        let response = self.send(self.request(Method::GET, path)).await?;
        if !response.status().is_success() {
            debug!(path, status = response.status().as_u16(), "fetch returned no record");
            return Ok(None);
        }
        Ok(Some(decode(response).await?))
    }

    pub(crate) async fn save<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Saved<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path).json(body)).await?;
        let status = response.status();
        let record = if status.is_success() {
            Some(decode(response).await?)
        } else {
            debug!(path, status = status.as_u16(), "save rejected");
            None
        };
        Ok(Saved {
            record,
            status: status.as_u16(),
        })
    }

    pub(crate) async fn remove(&self, path: &str) -> ClientResult<bool> {
        let response = self.send(self.request(Method::DELETE, path)).await?;
        Ok(response.status().is_success())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
