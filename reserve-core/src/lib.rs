#![allow(clippy::missing_errors_doc)]

pub mod asset_index;
pub mod compact_batch;
pub mod compact_data;
pub mod error;
pub mod util;

/// Exchange rate against the reference asset, 18-decimal fixed point.
pub type Rate = alloy_primitives::U256;
