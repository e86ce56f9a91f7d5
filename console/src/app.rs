//! Command dispatch.

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use issuer_client::{ApiClient, ClientConfig, Saved};
use issuer_forms::{
    FormErrors, IssuerSettingsForm, LicenseForm, LoginForm, NewIssuerForm, ProductForm,
};
use issuer_session::{CredentialStore, FileStore, KeyValueStore, Route};
use issuer_types::IssuerId;
use serde::Serialize;
use tracing::debug;

use crate::cli::{
    Cli, Command, IssuerAction, LicenseAction, LicenseInput, ProductAction, ProductInput,
    SessionAction,
};
use crate::navigator::ConsoleNavigator;

#[derive(Serialize)]
struct Whoami {
    logged_in: bool,
    issuer_id: IssuerId,
    privileged: bool,
}

/// A configured console: API client, credential store and output sink.
pub struct Console<W: Write> {
    api: ApiClient,
    navigator: Arc<ConsoleNavigator>,
    out: W,
}

impl<W: Write> Console<W> {
    /// Builds a console from the parsed arguments, writing results to `out`.
    ///
    /// # Errors
    ///
    /// Fails if the state file location cannot be determined or the client
    /// configuration is invalid.
    pub fn new(cli: &Cli, out: W) -> Result<Self> {
        let kv: Arc<dyn KeyValueStore> = match &cli.state_file {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(FileStore::open_default().context("locating state file")?),
        };
        let credentials = CredentialStore::load(kv);

        let config = ClientConfig {
            base_url: cli.base_url.clone(),
            timeout_secs: Some(cli.timeout),
            ..ClientConfig::default()
        };
        let navigator = Arc::new(ConsoleNavigator::new());
        let api = ApiClient::new(config, credentials, navigator.clone())
            .context("configuring API client")?;

        Ok(Self {
            api,
            navigator,
            out,
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.api.credentials()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Fails on invalid input, transport errors, and any request the server
    /// did not satisfy.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Login { username, password } => self.login(username, password).await,
            Command::Logout => {
                self.api.logout()?;
                writeln!(self.out, "logged out")?;
                Ok(())
            }
            Command::Whoami => {
                let view = self.credentials().view();
                self.print(&Whoami {
                    logged_in: view.logged_in,
                    issuer_id: view.issuer_id,
                    privileged: view.privileged,
                })
            }
            Command::Issuers { action } => self.issuers(action).await,
            Command::Licenses { issuer, action } => {
                let issuer = self.issuer_or_current(issuer)?;
                self.licenses(issuer, action).await
            }
            Command::Sessions { issuer, action } => {
                let issuer = self.issuer_or_current(issuer)?;
                self.sessions(issuer, action).await
            }
            Command::Products { issuer, action } => {
                let issuer = self.issuer_or_current(issuer)?;
                self.products(issuer, action).await
            }
        }
    }

    async fn login(&mut self, username: String, password: String) -> Result<()> {
        let mut form = LoginForm::new(username, password);
        check(form.validate(), form.errors())?;

        let ok = self
            .api
            .login(form.username.value(), form.password.value())
            .await
            .context("logging in")?;
        if !ok {
            bail!("login refused: check username and password");
        }
        let issuer_id = self.credentials().issuer_id();
        writeln!(self.out, "logged in as issuer {issuer_id}")?;
        Ok(())
    }

    fn issuer_or_current(&self, issuer: Option<IssuerId>) -> Result<IssuerId> {
        match issuer {
            Some(id) => Ok(id),
            None if self.credentials().is_logged_in() => Ok(self.credentials().issuer_id()),
            None => bail!("not logged in; run `issuer-console login` or pass --issuer"),
        }
    }

    // ── issuers ──────────────────────────────────────────────────

    async fn issuers(&mut self, action: IssuerAction) -> Result<()> {
        let issuers = self.api.issuers();
        match action {
            IssuerAction::List => {
                let list = issuers.list().await?;
                self.found(list, "issuers")
            }
            IssuerAction::Get { id } => {
                let issuer = issuers.get(id).await?;
                self.found(issuer, &format!("issuer {id}"))
            }
            IssuerAction::Create {
                username,
                password,
                confirm,
                email,
                phone,
                max_licenses,
                inactive,
            } => {
                let mut form = NewIssuerForm {
                    active: !inactive,
                    ..NewIssuerForm::default()
                };
                form.username.set(username);
                form.password_confirm.set(confirm.unwrap_or_else(|| password.clone()));
                form.password.set(password);
                form.email.set(email);
                form.phone_number.set(phone);
                form.max_licenses.set(max_licenses);
                check(form.validate(), form.errors())?;

                let saved = issuers.create(&form.to_payload()).await?;
                self.saved(saved, "issuer")
            }
            IssuerAction::Update {
                id,
                username,
                email,
                phone,
                max_licenses,
                active,
            } => {
                let current = issuers
                    .get(id)
                    .await?
                    .ok_or_else(|| self.missing(&format!("issuer {id}")))?;
                let mut form = IssuerSettingsForm::from(&current);
                if let Some(v) = username {
                    form.username.set(v);
                }
                if let Some(v) = email {
                    form.email.set(v);
                }
                if let Some(v) = phone {
                    form.phone_number.set(v);
                }
                if let Some(v) = max_licenses {
                    form.max_licenses.set(v);
                }
                if let Some(v) = active {
                    form.active = v;
                }
                check(form.validate(), form.errors())?;

                let saved = issuers.update(id, &form.to_changes()).await?;
                self.saved(saved, "issuer")
            }
            IssuerAction::Delete { id } => {
                let deleted = issuers.delete(id).await?;
                self.deleted(deleted, &format!("issuer {id}"))
            }
        }
    }

    // ── licenses ─────────────────────────────────────────────────

    async fn licenses(&mut self, issuer: IssuerId, action: LicenseAction) -> Result<()> {
        let licenses = self.api.licenses(issuer);
        match action {
            LicenseAction::List => {
                let list = licenses.list().await?;
                self.found(list, "licenses")
            }
            LicenseAction::Get { id } => {
                let license = licenses.get(&id).await?;
                self.found(license, &format!("license {id}"))
            }
            LicenseAction::Create { input } => {
                let mut form = LicenseForm::default();
                apply_license_input(&mut form, input);
                check(form.validate(), form.errors())?;

                let saved = licenses.create(&form.to_fields()).await?;
                self.saved(saved, "license")
            }
            LicenseAction::Update { id, input } => {
                let current = licenses
                    .get(&id)
                    .await?
                    .ok_or_else(|| self.missing(&format!("license {id}")))?;
                let mut form = LicenseForm::from(&current);
                apply_license_input(&mut form, input);
                check(form.validate(), form.errors())?;

                let saved = licenses.update(&id, &form.to_fields()).await?;
                self.saved(saved, "license")
            }
            LicenseAction::Delete { id } => {
                let deleted = licenses.delete(&id).await?;
                self.deleted(deleted, &format!("license {id}"))
            }
        }
    }

    // ── sessions ─────────────────────────────────────────────────

    async fn sessions(&mut self, issuer: IssuerId, action: SessionAction) -> Result<()> {
        match action {
            SessionAction::List { license } => {
                let list = self.api.sessions(issuer, &license).list().await?;
                self.found(list, &format!("sessions of license {license}"))
            }
            SessionAction::Get { license, session } => {
                let found = self.api.sessions(issuer, &license).get(&session).await?;
                self.found(found, &format!("session {session}"))
            }
            SessionAction::Revoke { license, session } => {
                let revoked = self.api.sessions(issuer, &license).delete(&session).await?;
                self.deleted(revoked, &format!("session {session}"))
            }
        }
    }

    // ── products ─────────────────────────────────────────────────

    async fn products(&mut self, issuer: IssuerId, action: ProductAction) -> Result<()> {
        let products = self.api.products(issuer);
        match action {
            ProductAction::List => {
                let list = products.list().await?;
                self.found(list, "products")
            }
            ProductAction::Get { id } => {
                let product = products.get(id).await?;
                self.found(product, &format!("product {id}"))
            }
            ProductAction::Create { input } => {
                let mut form = ProductForm::default();
                apply_product_input(&mut form, input);
                check(form.validate(), form.errors())?;

                let saved = products.create(&form.to_fields()).await?;
                self.saved(saved, "product")
            }
            ProductAction::Update { id, input } => {
                let current = products
                    .get(id)
                    .await?
                    .ok_or_else(|| self.missing(&format!("product {id}")))?;
                let mut form = ProductForm::from(&current);
                apply_product_input(&mut form, input);
                check(form.validate(), form.errors())?;

                let saved = products.update(id, &form.to_fields()).await?;
                self.saved(saved, "product")
            }
            ProductAction::Delete { id } => {
                let deleted = products.delete(id).await?;
                self.deleted(deleted, &format!("product {id}"))
            }
        }
    }

    // ── output ───────────────────────────────────────────────────

    fn print<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn found<T: Serialize>(&mut self, value: Option<T>, what: &str) -> Result<()> {
        match value {
            Some(value) => self.print(&value),
            None => Err(self.missing(what)),
        }
    }

    fn saved<T: Serialize>(&mut self, saved: Saved<T>, what: &str) -> Result<()> {
        debug!(status = saved.status, "save finished");
        match saved.record {
            Some(record) => self.print(&record),
            None => Err(self.rejected(what, saved.status)),
        }
    }

    fn deleted(&mut self, ok: bool, what: &str) -> Result<()> {
        if !ok {
            return Err(self.missing(what));
        }
        writeln!(self.out, "deleted {what}")?;
        Ok(())
    }

    fn missing(&self, what: &str) -> anyhow::Error {
        match self.navigator.last_route() {
            Some(Route::Login) => anyhow!("could not load {what}: not logged in"),
            Some(Route::Home) => anyhow!("could not load {what}: permission denied"),
            None => anyhow!("could not load {what}: not found or request failed"),
        }
    }

    fn rejected(&self, what: &str, status: u16) -> anyhow::Error {
        match self.navigator.last_route() {
            Some(Route::Login) => anyhow!("could not save {what}: not logged in"),
            Some(Route::Home) => anyhow!("could not save {what}: permission denied"),
            None => anyhow!("server rejected {what} (status {status})"),
        }
    }
}

fn check(ok: bool, errors: FormErrors<'_>) -> Result<()> {
    if ok {
        return Ok(());
    }
    let mut message = String::from("invalid input");
    for (field, messages) in errors {
        for m in messages {
            message.push_str(&format!("\n  {field}: {m}"));
        }
    }
    bail!(message)
}

fn apply_license_input(form: &mut LicenseForm, input: LicenseInput) {
    if input.product.is_some() {
        form.product_id = input.product;
    }
    if let Some(v) = input.name {
        form.name.set(v);
    }
    if let Some(v) = input.note {
        form.note.set(v);
    }
    if let Some(v) = input.tags {
        form.tags.set(v);
    }
    if !input.data.is_empty() {
        form.data.set(input.data);
    }
    if let Some(v) = input.max_sessions {
        form.max_sessions.set(v);
    }
    if let Some(v) = input.valid_until {
        form.expires = true;
        form.valid_until.set(v);
    }
    if input.no_expiry {
        form.expires = false;
    }
}

fn apply_product_input(form: &mut ProductForm, input: ProductInput) {
    if let Some(v) = input.name {
        form.name.set(v);
    }
    if let Some(v) = input.contact_email {
        form.contact_email.set(v);
    }
    if let Some(v) = input.data {
        form.data.set(v);
    }
    if let Some(v) = input.active {
        form.active = v;
    }
}
