use crate::error::CoreError::{self, FieldIndexOutOfRange};

/// Number of assets sharing one array slot of the compact data table.
pub const FIELDS_PER_SLOT: usize = 14;

/// Storage coordinates of an asset in the pricing contract's compact data
/// table. Assigned when the asset is listed and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetIndex {
  array_idx: u64,
  field_idx: u8,
}

impl AssetIndex {
  /// Validates the field offset against the slot width.
  pub fn new(array_idx: u64, field_idx: u64) -> Result<AssetIndex, CoreError> {
    u8::try_from(field_idx)
      .ok()
      .filter(|f| usize::from(*f) < FIELDS_PER_SLOT)
      .map(|field_idx| AssetIndex {
        array_idx,
        field_idx,
      })
      .ok_or(FieldIndexOutOfRange { field_idx })
  }

  #[must_use]
  pub fn array_idx(&self) -> u64 {
    self.array_idx
  }

  #[must_use]
  pub fn field_idx(&self) -> u8 {
    self.field_idx
  }
}
