use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::util::signer_provider;

/// Addresses of the three contracts making up a reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveAddresses {
  /// Fund contract.
  pub reserve: Address,
  /// Pricing contract.
  pub conversion_rates: Address,
  pub sanity_rates: Address,
}

/// Connection settings of a deployed reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveConfig {
  pub rpc_url: Url,
  pub addresses: ReserveAddresses,
}

impl ReserveConfig {
  /// # Errors
  /// - Malformed JSON, URL or address
  pub fn from_json(json: &str) -> Result<ReserveConfig> {
    serde_json::from_str(json).context("Failed to parse reserve config")
  }

  /// # Errors
  /// - File cannot be read
  /// - Malformed JSON, URL or address
  pub fn from_file(path: impl AsRef<Path>) -> Result<ReserveConfig> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
      .with_context(|| format!("Failed to read {}", path.display()))?;
    Self::from_json(&json)
  }

  /// Provider for the configured endpoint, signing with `signer`.
  #[must_use]
  pub fn connect(&self, signer: PrivateKeySigner) -> DynProvider {
    signer_provider(self.rpc_url.clone(), signer)
  }
}
