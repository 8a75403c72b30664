// Wire records for the backend's JSON and form endpoints.
//
// These mirror the payloads exactly as the backend emits them. Domain
// types with normalized MACs and typed statuses live in `lanwake-core`.

use serde::{Deserialize, Deserializer, Serialize};

/// A persisted device as returned by `GET /devices`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub mac: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_wake: Option<String>,
}

/// One entry of the discovery result list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveredRecord {
    pub mac: String,
    pub ip: String,
    #[serde(default)]
    pub already_imported: bool,
}

/// Discovery session snapshot from `GET /discover/status`.
///
/// Every field is optional on the wire; a missing or `null` field reads
/// as the idle value so partial payloads still render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DiscoveryStatusRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<DiscoveredRecord>,
}

/// Form body for `POST /add` and `POST /update/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceForm {
    pub name: String,
    pub mac: String,
    pub ip: String,
    pub description: String,
}

/// Result of a form submission.
///
/// The form endpoints answer with a redirect whether or not the change
/// was applied, so HTTP status is reported as data rather than as an
/// error. Only transport failures surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// 3xx: the backend accepted the submission and redirected.
    Redirected { location: Option<String> },
    /// 2xx without a redirect.
    Completed { status: u16 },
    /// 4xx / 5xx.
    Rejected { status: u16 },
}

impl FormOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirected { .. })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
