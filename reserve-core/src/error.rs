use alloy_primitives::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
  // `compact_batch`
  #[error(
    "Assets {first} and {second} share compact slot ({array_idx}, {field_idx})."
  )]
  IndexConflict {
    array_idx: u64,
    field_idx: u8,
    first: Address,
    second: Address,
  },
  #[error("No compact data index resolved for asset {0}.")]
  MissingIndex(Address),
  // `asset_index`
  #[error("Field index {field_idx} exceeds the 14 fields of a compact slot.")]
  FieldIndexOutOfRange { field_idx: u64 },
  // `util`
  #[error("Token amount {0} does not fit the requested decimals.")]
  TokenAmount(String),
}
