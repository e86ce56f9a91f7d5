//! Small wire codecs: URL-safe identifiers, tag lists and license data fields.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Re-encodes a standard base64 identifier into its URL-safe form so it can
/// be embedded in a path segment. Every `/` becomes `_` and every `+` becomes `-`.
#[must_use]
pub fn url_safe_id(id: &str) -> String {
    id.replace('/', "_").replace('+', "-")
}

/// Splits a `;`-delimited tag list into trimmed tags.
///
/// A trailing empty entry (left by a terminal `;`, or by empty input) is
/// dropped. Empty entries elsewhere are kept so validation can reject them.
#[must_use]
pub fn parse_tags(s: &str) -> Vec<String> {
    let mut tags: Vec<String> = s.split(';').map(|t| t.trim().to_string()).collect();
    if tags.last().is_some_and(String::is_empty) {
        tags.pop();
    }
    tags
}

/// Joins tags back into the editable `a; b` form.
#[must_use]
pub fn format_tags(tags: &[String]) -> String {
    tags.join("; ")
}

/// One named value in a license's free-form data payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseDataField {
    pub field: String,
    pub value: String,
}

impl LicenseDataField {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

struct OrderedFields<'a>(&'a [LicenseDataField]);

impl Serialize for OrderedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|f| (&f.field, &f.value)))
    }
}

struct DecodedFields(Vec<LicenseDataField>);

impl<'de> Deserialize<'de> for DecodedFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = DecodedFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of license data fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((field, value)) = map.next_entry::<String, serde_json::Value>()? {
                    let value = match value {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    };
                    fields.push(LicenseDataField { field, value });
                }
                Ok(DecodedFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Encodes license data fields as a JSON object, keeping field order.
#[must_use]
pub fn encode_license_data(fields: &[LicenseDataField]) -> String {
    // String keys and values cannot fail to serialize.
    serde_json::to_string(&OrderedFields(fields)).unwrap_or_default()
}

/// Decodes a license data payload back into fields, in document order.
///
/// Empty or malformed payloads decode to no fields.
#[must_use]
pub fn decode_license_data(data: &str) -> Vec<LicenseDataField> {
    if data.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str::<DecodedFields>(data)
        .map(|d| d.0)
        .unwrap_or_default()
}

// ── serde helpers for record fields ──────────────────────────────

pub(crate) fn deserialize_license_data<'de, D>(
    deserializer: D,
) -> Result<Vec<LicenseDataField>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(decode_license_data).unwrap_or_default())
}

pub(crate) fn serialize_license_data<S>(
    fields: &[LicenseDataField],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode_license_data(fields))
}

pub(crate) fn serialize_opt_license_data<S>(
    fields: &Option<Vec<LicenseDataField>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match fields {
        Some(fields) => serialize_license_data(fields, serializer),
        None => serializer.serialize_none(),
    }
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads an optional timestamp; `null`, missing and `""` are all absent.
pub(crate) fn optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => chrono::DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&chrono::Utc)))
            .map_err(de::Error::custom),
    }
}
