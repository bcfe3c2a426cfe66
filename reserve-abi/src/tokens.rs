use alloy::primitives::{address, Address};

/// Pseudo-token address the reserve contracts use for ether.
pub const ETH_TOKEN_ADDRESS: Address =
  address!("0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// Width in bytes of one compact data slot (`bytes14`).
pub const COMPACT_SLOT_BYTES: usize = 14;

