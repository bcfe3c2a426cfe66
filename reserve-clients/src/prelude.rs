pub use alloy::primitives::{address, Address, TxHash, I256, U256};
pub use alloy::providers::DynProvider;
pub use alloy::signers::local::PrivateKeySigner;
pub use anyhow::Result;
pub use reserve_abi::artifacts::{ContractArtifacts, ContractCode};
pub use reserve_abi::tokens::ETH_TOKEN_ADDRESS;
pub use reserve_core::asset_index::AssetIndex;
pub use reserve_core::compact_batch::EncodedBatch;
pub use reserve_core::compact_data::Side;
pub use reserve_core::Rate;

pub use crate::config::{ReserveAddresses, ReserveConfig};
pub use crate::contract_client::ContractClient;
pub use crate::deployer::Deployer;
pub use crate::fund_client::FundClient;
pub use crate::index_cache::IndexCache;
pub use crate::pricing_client::{PricingClient, StepFunction, TokenControlInfo};
pub use crate::rate_update::{plan_rate_update, RateRequest, RateSource};
pub use crate::reserve::Reserve;
pub use crate::sanity_client::SanityClient;
pub use crate::token::TokenClient;
pub use crate::util::signer_provider;
