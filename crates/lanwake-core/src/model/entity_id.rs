// ── Core identity types ──
//
// DeviceId is the backend's opaque key for a persisted device.
// MacAddress is the identity used when matching discovered devices
// against imported ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DeviceId ────────────────────────────────────────────────────────

/// Backend identifier for a persisted device (short hex hash in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to upper-case colon-separated format
/// (`AA:BB:CC:DD:EE:FF`), the form the backend stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, dotted, or bare hex.
    /// Input that is not a 48-bit address is kept, upper-cased.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let well_formed = raw
            .chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '-' | '.'))
            && raw.chars().filter(char::is_ascii_hexdigit).count() == 12;

        if well_formed {
            Self(Self::format_input(raw))
        } else {
            Self(raw.to_uppercase().replace('-', ":"))
        }
    }

    /// Live formatter for MAC input fields.
    ///
    /// Drops every non-hex character, groups the rest in pairs joined by
    /// `:`, and upper-cases: `aabbccddeeff` becomes `AA:BB:CC:DD:EE:FF`,
    /// a partial `aabbc` becomes `AA:BB:C`.
    pub fn format_input(raw: &str) -> String {
        let hex: Vec<char> = raw
            .chars()
            .filter(char::is_ascii_hexdigit)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        hex.chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Whether this holds exactly six colon-separated octets.
    pub fn is_canonical(&self) -> bool {
        self.0.len() == 17
            && self.0.split(':').count() == 6
            && self
                .0
                .split(':')
                .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
