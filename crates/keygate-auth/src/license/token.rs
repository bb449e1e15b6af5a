//! Legacy client token returned on a successful connect.
//!
//! The token is an MD5 digest over `{prefix}-{secret}-{hwid}-{shared}`.
//! Existing clients compare against this exact derivation. It carries no
//! expiry and is never verified server-side, so it must not be treated as
//! session material or extended into an authentication mechanism.

use md5::{Digest, Md5};

use keygate_core::config::admission::AdmissionConfig;

/// Derives the legacy client token from configured constants.
#[derive(Debug, Clone)]
pub struct ClientTokenDeriver {
    prefix: String,
    shared_secret: String,
}

impl ClientTokenDeriver {
    /// Build from admission configuration.
    pub fn new(config: &AdmissionConfig) -> Self {
        Self {
            prefix: config.token_prefix.clone(),
            shared_secret: config.token_secret.clone(),
        }
    }

    /// Lowercase hex digest for a key secret and hardware id.
    pub fn derive(&self, key_secret: &str, hwid: &str) -> String {
        let input = format!("{}-{}-{}-{}", self.prefix, key_secret, hwid, self.shared_secret);
        hex::encode(Md5::digest(input.as_bytes()))
    }
}
