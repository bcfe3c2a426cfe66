//! Creation bytecode and ABI of the reserve contracts.
//!
//! Artifacts are read from a single JSON document keyed by contract:
//!
//! ```json
//! {
//!   "reserve": { "abi": [..], "bytecode": "0x.." },
//!   "conversion_rates": { "abi": [..], "bytecode": "0x.." },
//!   "sanity_rates": { "abi": [..], "bytecode": "0x.." }
//! }
//! ```

use std::fs;
use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// ABI and creation bytecode of a single contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractCode {
  pub abi: JsonAbi,
  pub bytecode: Bytes,
}

impl ContractCode {
  /// Creation code with ABI encoded constructor arguments appended.
  ///
  /// # Errors
  /// - Bytecode is empty
  pub fn deploy_code(&self, constructor_args: &[u8]) -> Result<Bytes> {
    if self.bytecode.is_empty() {
      Err(anyhow!("Contract artifact has no creation bytecode."))
    } else {
      let code = self
        .bytecode
        .iter()
        .chain(constructor_args)
        .copied()
        .collect::<Vec<u8>>();
      Ok(code.into())
    }
  }
}

/// Artifacts of every contract making up a reserve.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifacts {
  pub reserve: ContractCode,
  pub conversion_rates: ContractCode,
  pub sanity_rates: ContractCode,
}

impl ContractArtifacts {
  /// Parses artifacts from a JSON string.
  ///
  /// # Errors
  /// - Malformed JSON or missing contract entry
  pub fn from_json(json: &str) -> Result<ContractArtifacts> {
    serde_json::from_str(json).context("Failed to parse contract artifacts")
  }

  /// Reads artifacts from a JSON file.
  ///
  /// # Errors
  /// - File cannot be read
  /// - Malformed JSON or missing contract entry
  pub fn from_file(path: impl AsRef<Path>) -> Result<ContractArtifacts> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
      .with_context(|| format!("Failed to read {}", path.display()))?;
    Self::from_json(&json)
  }
}
