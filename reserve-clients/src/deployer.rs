use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolValue;
use anyhow::{anyhow, bail, Result};
use reserve_abi::artifacts::{ContractArtifacts, ContractCode};
use tracing::info;
use url::Url;

use crate::config::ReserveAddresses;
use crate::reserve::Reserve;
use crate::util::signer_provider;

/// Deploys and links new reserve contracts. The signer becomes admin of
/// every deployed contract.
pub struct Deployer {
  provider: DynProvider,
  admin: Address,
  artifacts: ContractArtifacts,
}

impl Deployer {
  #[must_use]
  pub fn new(
    provider: DynProvider,
    admin: Address,
    artifacts: ContractArtifacts,
  ) -> Deployer {
    Deployer {
      provider,
      admin,
      artifacts,
    }
  }

  #[must_use]
  pub fn from_signer(
    rpc_url: Url,
    signer: PrivateKeySigner,
    artifacts: ContractArtifacts,
  ) -> Deployer {
    let admin = signer.address();
    Deployer::new(signer_provider(rpc_url, signer), admin, artifacts)
  }

  /// Deploys pricing, fund and sanity contracts for `network`, then links
  /// them together.
  ///
  /// # Errors
  /// - Any deployment fails
  /// - Linking transactions fail
  pub async fn deploy(&self, network: Address) -> Result<ReserveAddresses> {
    let conversion_rates = self
      .deploy_contract(
        &self.artifacts.conversion_rates,
        &(self.admin,).abi_encode_params(),
      )
      .await?;
    let reserve = self
      .deploy_contract(
        &self.artifacts.reserve,
        &(network, conversion_rates, self.admin).abi_encode_params(),
      )
      .await?;
    let sanity_rates = self
      .deploy_contract(
        &self.artifacts.sanity_rates,
        &(self.admin,).abi_encode_params(),
      )
      .await?;
    let addresses = ReserveAddresses {
      reserve,
      conversion_rates,
      sanity_rates,
    };
    Reserve::new(self.provider.clone(), &addresses)
      .link_contracts(network)
      .await?;
    Ok(addresses)
  }

  /// Deploys a single contract with ABI encoded `constructor_args`.
  ///
  /// # Errors
  /// - Artifact has no bytecode
  /// - Failed to send transaction or transaction reverted
  /// - Receipt carries no contract address
  pub async fn deploy_contract(
    &self,
    code: &ContractCode,
    constructor_args: &[u8],
  ) -> Result<Address> {
    let tx = TransactionRequest::default()
      .with_deploy_code(code.deploy_code(constructor_args)?);
    let receipt = self
      .provider
      .send_transaction(tx)
      .await?
      .get_receipt()
      .await?;
    let tx_hash = receipt.transaction_hash();
    if !receipt.status() {
      bail!("Deployment transaction {tx_hash} reverted.");
    }
    let address = receipt
      .contract_address()
      .ok_or_else(|| anyhow!("No contract address in receipt {tx_hash}."))?;
    info!(%address, tx = %tx_hash, "Deployed contract");
    Ok(address)
  }
}
