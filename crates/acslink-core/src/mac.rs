// ── MAC normalizer ──
//
// Subscriber records, ACS parameters, and device ids all spell hardware
// addresses differently. Everything is compared in one canonical form:
// 12 lowercase hex characters, no separators.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// Placeholder other subsystems emit when they have no MAC ("N/A" once
/// the separator is gone and the case is folded).
const PLACEHOLDER: &str = "na";

/// Strip `:` and `-` separators and lowercase. `None` if nothing is left.
pub fn normalize(raw: &str) -> Option<String> {
    let normalized: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (!normalized.is_empty()).then_some(normalized)
}

/// `true` iff the normalized form is exactly 12 hex characters.
pub fn is_valid(raw: &str) -> bool {
    normalize(raw).is_some_and(|n| {
        n.len() == 12 && n.bytes().all(|b| b.is_ascii_hexdigit()) && n != PLACEHOLDER
    })
}

/// The OUI-derived prefix ACS device ids conventionally start with
/// (`00259E-HG8245H-…` → `00259e`).
///
/// Approximate: the prefix identifies a vendor, not a unit, and nothing
/// forces an ACS to build ids this way.
pub fn extract_from_device_id(device_id: &str) -> Option<String> {
    let prefix = device_id.get(..6)?;
    prefix
        .bytes()
        .all(|b| b.is_ascii_hexdigit())
        .then(|| prefix.to_ascii_lowercase())
}

// ── MacAddress ──────────────────────────────────────────────────────

/// A validated hardware address in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacAddress(String);

impl MacAddress {
    /// Validate and normalize. Rejects anything [`is_valid`] rejects.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if !is_valid(raw) {
            return Err(CoreError::InvalidMac { input: raw.into() });
        }
        normalize(raw)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidMac { input: raw.into() })
    }

    /// Canonical 12-character form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First three octets.
    pub fn oui(&self) -> &str {
        self.0.get(..6).unwrap_or_default()
    }
}

/// Colon-separated for display: `aa:bb:cc:11:22:33`.
impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.as_bytes();
        for (i, pair) in bytes.chunks(2).enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(std::str::from_utf8(pair).map_err(|_| fmt::Error)?)?;
        }
        Ok(())
    }
}

impl FromStr for MacAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
