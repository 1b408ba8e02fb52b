//! Minimal secrets accessor.
//!
//! The pipeline has exactly one secret in scope: the internal auth token
//! used to authenticate ingestion/worker calls (spec.md section 6). A
//! full encrypted secret store is out of scope; this exists as the seam
//! a real deployment would swap in for one.

use anyhow::{anyhow, Result};

#[derive(Debug, Clone)]
pub struct SecretManager {
    internal_auth_token: String,
}

impl SecretManager {
    pub fn new(internal_auth_token: impl Into<String>) -> Self {
        Self {
            internal_auth_token: internal_auth_token.into(),
        }
    }

    pub fn internal_auth_token(&self) -> Result<&str> {
        if self.internal_auth_token.is_empty() {
            return Err(anyhow!("internal auth token is not configured"));
        }
        Ok(&self.internal_auth_token)
    }
}
