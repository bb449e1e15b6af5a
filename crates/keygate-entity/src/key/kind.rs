//! License key tier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tier of a license key. Drives the default expiry at creation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "key_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Thirty-day key.
    Basic,
    /// Ninety-day key.
    Premium,
    /// Never expires.
    Lifetime,
}

impl KeyType {
    /// Default validity period for a freshly issued key of this tier.
    pub fn default_validity(&self) -> Option<Duration> {
        match self {
            Self::Basic => Some(Duration::days(30)),
            Self::Premium => Some(Duration::days(90)),
            Self::Lifetime => None,
        }
    }

    /// Expiry timestamp for a key of this tier issued at `issued_at`.
    pub fn expiry_from(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.default_validity().map(|d| issued_at + d)
    }

    /// Return the tier as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Lifetime => "lifetime",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = keygate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "premium" => Ok(Self::Premium),
            "lifetime" => Ok(Self::Lifetime),
            _ => Err(keygate_core::AppError::validation(format!(
                "Invalid key type: '{s}'. Expected one of: basic, premium, lifetime"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_expiry_per_tier() {
        let now = Utc::now();
        assert_eq!(KeyType::Basic.expiry_from(now), Some(now + Duration::days(30)));
        assert_eq!(KeyType::Premium.expiry_from(now), Some(now + Duration::days(90)));
        assert_eq!(KeyType::Lifetime.expiry_from(now), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Premium".parse::<KeyType>().unwrap(), KeyType::Premium);
        assert!("gold".parse::<KeyType>().is_err());
    }
}
