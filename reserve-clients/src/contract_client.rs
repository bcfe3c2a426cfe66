use alloy::primitives::{Address, TxHash};
use alloy::providers::DynProvider;
use anyhow::Result;
use reserve_abi::IPermissionGroups::{self, IPermissionGroupsInstance};

use crate::util::confirm;

/// Abstracts a client bound to one deployed reserve contract.
///
/// Every reserve contract shares the same permission groups: a single admin
/// transferred in two steps, plus operator and alerter lists. Those calls
/// are provided here.
#[async_trait::async_trait]
pub trait ContractClient: Sized {
  fn build_client(address: Address, provider: DynProvider) -> Self;

  fn address(&self) -> Address;

  fn provider(&self) -> &DynProvider;

  fn permission_groups(&self) -> IPermissionGroupsInstance<DynProvider> {
    IPermissionGroups::new(self.address(), self.provider().clone())
  }

  /// Current admin of the contract.
  ///
  /// # Errors
  /// - RPC call fails
  async fn admin(&self) -> Result<Address> {
    Ok(self.permission_groups().admin().call().await?)
  }

  /// Admin nominated by [`ContractClient::transfer_admin`] that has not
  /// claimed the role yet. Zero if none.
  ///
  /// # Errors
  /// - RPC call fails
  async fn pending_admin(&self) -> Result<Address> {
    Ok(self.permission_groups().pendingAdmin().call().await?)
  }

  /// # Errors
  /// - RPC call fails
  async fn operators(&self) -> Result<Vec<Address>> {
    Ok(self.permission_groups().getOperators().call().await?)
  }

  /// # Errors
  /// - RPC call fails
  async fn alerters(&self) -> Result<Vec<Address>> {
    Ok(self.permission_groups().getAlerters().call().await?)
  }

  /// Nominates `new_admin`, which must then call
  /// [`ContractClient::claim_admin`].
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn transfer_admin(&self, new_admin: Address) -> Result<TxHash> {
    let pending = self
      .permission_groups()
      .transferAdmin(new_admin)
      .send()
      .await?;
    confirm(pending).await
  }

  /// Claims the admin role. The signer must be the pending admin.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn claim_admin(&self) -> Result<TxHash> {
    let pending = self.permission_groups().claimAdmin().send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn add_operator(&self, operator: Address) -> Result<TxHash> {
    let pending = self
      .permission_groups()
      .addOperator(operator)
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn remove_operator(&self, operator: Address) -> Result<TxHash> {
    let pending = self
      .permission_groups()
      .removeOperator(operator)
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn add_alerter(&self, alerter: Address) -> Result<TxHash> {
    let pending = self.permission_groups().addAlerter(alerter).send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  async fn remove_alerter(&self, alerter: Address) -> Result<TxHash> {
    let pending = self
      .permission_groups()
      .removeAlerter(alerter)
      .send()
      .await?;
    confirm(pending).await
  }
}
