//! # Reserve Clients
//!
//! Offchain Rust clients for operating a KyberNetwork-style reserve: a fund
//! contract, a pricing contract and a sanity rates contract.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reserve_clients::prelude::*;
//!
//! # async fn example(signer: PrivateKeySigner) -> Result<()> {
//! let config = ReserveConfig::from_file("reserve.json")?;
//! let reserve = Reserve::from_config(&config, signer);
//!
//! // Sends a compact update when every rate is within range of its base.
//! let knc = address!("0xdd974D5C2e2928deA5F71b9825b8b646686BD200");
//! let buy = U256::from(439_790_000_000_000_000_000_u128);
//! let sell = U256::from(2_273_000_000_000_000_u128);
//! reserve.set_rates(&[RateRequest::new(knc, buy, sell)]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Clients
//!
//! - [`FundClient`](fund_client::FundClient) - Trading switch, balances and
//!   withdrawals
//! - [`PricingClient`](pricing_client::PricingClient) - Token listing, rates
//!   and step functions
//! - [`SanityClient`](sanity_client::SanityClient) - Sanity rates
//! - [`Reserve`](reserve::Reserve) - All three behind one handle
//! - [`Deployer`](deployer::Deployer) - Deploys and links new reserves

pub mod config;
pub mod contract_client;
pub mod deployer;
pub mod fund_client;
pub mod index_cache;
pub mod prelude;
pub mod pricing_client;
pub mod rate_update;
pub mod reserve;
pub mod sanity_client;
pub mod token;
pub mod util;
