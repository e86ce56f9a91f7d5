//! Per-entity forms.
//!
//! `validate` checks every field, so all errors can be shown at once, and
//! returns true only if all of them pass. Payload conversions read the
//! current values and do not validate again.

use chrono::{DateTime, Local, Utc};
use issuer_types::datetime::{
    add_days, format_datetime, format_datetime_local, next_midnight, parse_datetime,
};
use issuer_types::{
    format_tags, parse_tags, License, LicenseDataField, LicenseFields, LicenseIssuer,
    LicenseIssuerChanges, NewLicenseIssuer, Product, ProductFields, ProductId,
};

use crate::field::Field;
use crate::rules;

/// Days a new license is valid for unless the user picks another expiry.
pub const DEFAULT_LICENSE_DAYS: i64 = 30;

/// Messages for each field that failed its last validation, in form order.
pub type FormErrors<'a> = Vec<(&'static str, &'a [String])>;

fn failed<'a, const N: usize>(fields: [(&'static str, &'a [String]); N]) -> FormErrors<'a> {
    fields.into_iter().filter(|(_, e)| !e.is_empty()).collect()
}

// ── Login ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: Field<String>,
    pub password: Field<String>,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Field::new(username.into()),
            password: Field::new(password.into()),
        }
    }

    pub fn validate(&mut self) -> bool {
        let username = self.username.validate_with(|v| rules::username(v));
        let password = self.password.validate_with(|v| rules::password(v));
        username && password
    }

    #[must_use]
    pub fn errors(&self) -> FormErrors<'_> {
        failed([
            ("username", self.username.errors()),
            ("password", self.password.errors()),
        ])
    }
}

// ── New issuer ──────────────────────────────────────────────────

/// Registration of a new license issuer (administrative).
#[derive(Debug, Clone)]
pub struct NewIssuerForm {
    pub active: bool,
    pub username: Field<String>,
    pub password: Field<String>,
    pub password_confirm: Field<String>,
    pub email: Field<String>,
    pub phone_number: Field<String>,
    pub max_licenses: Field<i64>,
}

impl Default for NewIssuerForm {
    fn default() -> Self {
        Self {
            active: true,
            username: Field::default(),
            password: Field::default(),
            password_confirm: Field::default(),
            email: Field::default(),
            phone_number: Field::default(),
            max_licenses: Field::new(1),
        }
    }
}

impl NewIssuerForm {
    pub fn validate(&mut self) -> bool {
        let username = self.username.validate_with(|v| rules::username(v));
        let name = self.username.value().clone();
        let password = self
            .password
            .validate_with(|v| rules::new_password(v, &name));
        let typed = self.password.value().clone();
        let confirm = self
            .password_confirm
            .validate_with(|v| rules::password_confirm(v, &typed));
        let email = self.email.validate_with(|v| rules::email(v));
        let phone = self.phone_number.validate_with(|v| rules::phone_number(v));
        let max = self.max_licenses.validate_with(|v| rules::max_licenses(*v));
        username && password && confirm && email && phone && max
    }

    #[must_use]
    pub fn errors(&self) -> FormErrors<'_> {
        failed([
            ("username", self.username.errors()),
            ("password", self.password.errors()),
            ("password_confirm", self.password_confirm.errors()),
            ("email", self.email.errors()),
            ("phone_number", self.phone_number.errors()),
            ("max_licenses", self.max_licenses.errors()),
        ])
    }

    #[must_use]
    pub fn to_payload(&self) -> NewLicenseIssuer {
        NewLicenseIssuer {
            active: self.active,
            username: self.username.value().clone(),
            password: self.password.value().clone(),
            email: self.email.value().clone(),
            phone_number: self.phone_number.value().clone(),
            max_licenses: *self.max_licenses.value(),
        }
    }
}

// ── Issuer settings ─────────────────────────────────────────────

/// Editable settings of an existing issuer.
#[derive(Debug, Clone)]
pub struct IssuerSettingsForm {
    pub active: bool,
    pub username: Field<String>,
    pub email: Field<String>,
    pub phone_number: Field<String>,
    pub max_licenses: Field<i64>,
}

impl From<&LicenseIssuer> for IssuerSettingsForm {
    fn from(issuer: &LicenseIssuer) -> Self {
        let mut form = Self {
            active: issuer.active,
            username: Field::default(),
            email: Field::default(),
            phone_number: Field::default(),
            max_licenses: Field::new(1),
        };
        form.username.reset(Some(issuer.username.clone()));
        form.email.reset(Some(issuer.email.clone()));
        form.phone_number.reset(Some(issuer.phone_number.clone()));
        form.max_licenses.reset(Some(issuer.max_licenses));
        form
    }
}

impl IssuerSettingsForm {
    pub fn validate(&mut self) -> bool {
        let username = self.username.validate_with(|v| rules::username(v));
        let email = self.email.validate_with(|v| rules::email(v));
        let phone = self.phone_number.validate_with(|v| rules::phone_number(v));
        let max = self.max_licenses.validate_with(|v| rules::max_licenses(*v));
        username && email && phone && max
    }

    #[must_use]
    pub fn errors(&self) -> FormErrors<'_> {
        failed([
            ("username", self.username.errors()),
            ("email", self.email.errors()),
            ("phone_number", self.phone_number.errors()),
            ("max_licenses", self.max_licenses.errors()),
        ])
    }

    #[must_use]
    pub fn to_changes(&self) -> LicenseIssuerChanges {
        LicenseIssuerChanges {
            active: Some(self.active),
            username: Some(self.username.value().clone()),
            email: Some(self.email.value().clone()),
            phone_number: Some(self.phone_number.value().clone()),
            max_licenses: Some(*self.max_licenses.value()),
        }
    }
}

// ── License ─────────────────────────────────────────────────────

/// Create or edit a license.
///
/// Tags are edited as one `a; b; c` string and the expiry as a
/// `YYYY-MM-DDTHH:MM` local time. The expiry is only checked and sent when
/// `expires` is set.
#[derive(Debug, Clone)]
pub struct LicenseForm {
    pub product_id: Option<ProductId>,
    pub name: Field<String>,
    pub note: Field<String>,
    pub tags: Field<String>,
    pub data: Field<Vec<LicenseDataField>>,
    pub max_sessions: Field<i64>,
    pub expires: bool,
    pub valid_until: Field<String>,
}

impl Default for LicenseForm {
    fn default() -> Self {
        Self::starting_at(&Local::now())
    }
}

impl LicenseForm {
    /// A blank form whose suggested expiry is the first midnight after
    /// `now` plus [`DEFAULT_LICENSE_DAYS`].
    #[must_use]
    pub fn starting_at(now: &DateTime<Local>) -> Self {
        let suggested = next_midnight(&add_days(now.clone(), DEFAULT_LICENSE_DAYS))
            .map(|dt| format_datetime(&dt))
            .unwrap_or_default();
        Self {
            product_id: None,
            name: Field::default(),
            note: Field::default(),
            tags: Field::default(),
            data: Field::default(),
            max_sessions: Field::new(1),
            expires: false,
            valid_until: Field::new(suggested),
        }
    }

    pub fn validate(&mut self) -> bool {
        let name = self.name.validate_with(|v| rules::license_name(v));
        let note = self.note.validate_with(|v| rules::license_note(v));
        let tags = self.tags.validate_with(|v| rules::license_tags(v));
        let data = self.data.validate_with(|v| rules::license_data_fields(v));
        let sessions = self.max_sessions.validate_with(|v| rules::max_sessions(*v));
        let expiry = if self.expires {
            self.valid_until.validate_with(|v| rules::valid_until(v))
        } else {
            self.valid_until.validate_with(|_| Vec::new())
        };
        name && note && tags && data && sessions && expiry
    }

    #[must_use]
    pub fn errors(&self) -> FormErrors<'_> {
        failed([
            ("name", self.name.errors()),
            ("note", self.note.errors()),
            ("tags", self.tags.errors()),
            ("data", self.data.errors()),
            ("max_sessions", self.max_sessions.errors()),
            ("valid_until", self.valid_until.errors()),
        ])
    }

    /// The expiry to send, if the license expires and the input parses.
    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expires
            .then(|| parse_datetime(self.valid_until.value()))
            .flatten()
    }

    #[must_use]
    pub fn to_fields(&self) -> LicenseFields {
        LicenseFields {
            product_id: self.product_id,
            name: Some(self.name.value().clone()),
            note: Some(self.note.value().clone()),
            tags: Some(parse_tags(self.tags.value())),
            data: Some(self.data.value().clone()),
            max_sessions: Some(*self.max_sessions.value()),
            valid_until: self.expiry(),
        }
    }
}

impl From<&License> for LicenseForm {
    fn from(license: &License) -> Self {
        let mut form = Self::default();
        form.product_id = license.product_id;
        form.name.reset(Some(license.name.clone()));
        form.note.reset(Some(license.note.clone()));
        form.tags.reset(Some(format_tags(&license.tags)));
        form.data.reset(Some(license.data.clone()));
        form.max_sessions.reset(Some(license.max_sessions));
        if license.valid_until.is_some() {
            form.expires = true;
            let until = format_datetime_local(license.valid_until);
            form.valid_until.reset(Some(until));
        }
        form
    }
}

// ── Product ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProductForm {
    pub active: bool,
    pub name: Field<String>,
    pub contact_email: Field<String>,
    pub data: Field<String>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            active: true,
            name: Field::default(),
            contact_email: Field::default(),
            data: Field::default(),
        }
    }
}

impl ProductForm {
    pub fn validate(&mut self) -> bool {
        let name = self.name.validate_with(|v| rules::product_name(v));
        let email = self.contact_email.validate_with(|v| rules::email(v));
        self.data.validate_with(|_| Vec::new());
        name && email
    }

    #[must_use]
    pub fn errors(&self) -> FormErrors<'_> {
        failed([
            ("name", self.name.errors()),
            ("contact_email", self.contact_email.errors()),
        ])
    }

    #[must_use]
    pub fn to_fields(&self) -> ProductFields {
        ProductFields {
            active: Some(self.active),
            name: Some(self.name.value().clone()),
            contact_email: Some(self.contact_email.value().clone()),
            data: Some(self.data.value().clone()),
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        let mut form = Self {
            active: product.active,
            ..Self::default()
        };
        form.name.reset(Some(product.name.clone()));
        form.contact_email.reset(Some(product.contact_email.clone()));
        form.data.reset(Some(product.data.clone()));
        form
    }
}
