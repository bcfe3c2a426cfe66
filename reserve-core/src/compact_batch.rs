use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::asset_index::{AssetIndex, FIELDS_PER_SLOT};
use crate::compact_data::AssetUpdate;
use crate::error::CoreError::{self, IndexConflict, MissingIndex};
use crate::Rate;

/// Compact bytes of one array slot, one byte per field.
pub type SlotBytes = [u8; FIELDS_PER_SLOT];

/// Buy and sell compact bytes for all assets sharing one array slot. Fields
/// of assets outside the batch stay zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
  pub array_idx: u64,
  pub buy: SlotBytes,
  pub sell: SlotBytes,
}

impl SlotGroup {
  #[must_use]
  pub fn new(array_idx: u64) -> SlotGroup {
    SlotGroup {
      array_idx,
      buy: [0; FIELDS_PER_SLOT],
      sell: [0; FIELDS_PER_SLOT],
    }
  }
}

/// Wire form of one rate update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodedBatch {
  /// Absolute rates for every asset of the batch.
  BaseRates {
    assets: Vec<Address>,
    buy_rates: Vec<Rate>,
    sell_rates: Vec<Rate>,
  },
  /// Compact deltas grouped by array slot, in ascending slot order.
  Compact { groups: Vec<SlotGroup> },
}

impl EncodedBatch {
  #[must_use]
  pub fn is_base_update(&self) -> bool {
    matches!(self, EncodedBatch::BaseRates { .. })
  }

  /// Compact buy bytes per group, empty for a base rate update.
  #[must_use]
  pub fn compact_buy(&self) -> Vec<SlotBytes> {
    self.groups().iter().map(|group| group.buy).collect()
  }

  /// Compact sell bytes per group, empty for a base rate update.
  #[must_use]
  pub fn compact_sell(&self) -> Vec<SlotBytes> {
    self.groups().iter().map(|group| group.sell).collect()
  }

  /// Array slot of each group, matching `compact_buy` and `compact_sell`
  /// position by position.
  #[must_use]
  pub fn array_indices(&self) -> Vec<u64> {
    self.groups().iter().map(|group| group.array_idx).collect()
  }

  fn groups(&self) -> &[SlotGroup] {
    match self {
      EncodedBatch::BaseRates { .. } => &[],
      EncodedBatch::Compact { groups } => groups,
    }
  }
}

/// Encodes a batch of per-asset updates.
///
/// If any side of any asset needs a base reset the whole batch becomes a
/// base rate update carrying every asset's requested rates, since the
/// contract cannot mix resets and compact writes in one call. Otherwise the
/// compact bytes are packed into their array slots.
///
/// Every asset needs an index, and no two assets may share a slot.
pub fn encode(
  updates: &BTreeMap<Address, AssetUpdate>,
  indices: &BTreeMap<Address, AssetIndex>,
) -> Result<EncodedBatch, CoreError> {
  let resolved = resolve_indices(updates, indices)?;
  if updates.values().any(AssetUpdate::base_changed) {
    Ok(EncodedBatch::BaseRates {
      assets: updates.keys().copied().collect(),
      buy_rates: updates.values().map(|u| u.requested_buy).collect(),
      sell_rates: updates.values().map(|u| u.requested_sell).collect(),
    })
  } else {
    let mut groups = BTreeMap::<u64, SlotGroup>::new();
    for (update, index) in updates.values().zip(resolved) {
      let group = groups
        .entry(index.array_idx())
        .or_insert_with(|| SlotGroup::new(index.array_idx()));
      let field = usize::from(index.field_idx());
      group.buy[field] = update.buy.compact;
      group.sell[field] = update.sell.compact;
    }
    Ok(EncodedBatch::Compact {
      groups: groups.into_values().collect(),
    })
  }
}

/// Looks up the index of every asset, in batch order, rejecting assets that
/// share a slot.
fn resolve_indices(
  updates: &BTreeMap<Address, AssetUpdate>,
  indices: &BTreeMap<Address, AssetIndex>,
) -> Result<Vec<AssetIndex>, CoreError> {
  let mut owners = BTreeMap::new();
  updates
    .keys()
    .map(|asset| {
      let index = *indices.get(asset).ok_or(MissingIndex(*asset))?;
      match owners.entry(index) {
        Entry::Vacant(slot) => {
          slot.insert(*asset);
          Ok(index)
        }
        Entry::Occupied(slot) => Err(IndexConflict {
          array_idx: index.array_idx(),
          field_idx: index.field_idx(),
          first: *slot.get(),
          second: *asset,
        }),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::compact_data::PriceUpdate;
  use crate::util::proptest::*;
  use alloy_primitives::address;
  use proptest::prelude::*;

  const ASSET_1: Address =
    address!("0x14535eE720e329f66071B86486763Da4637034aE");
  const ASSET_2: Address =
    address!("0x24535eE720e329f66071B86486763Da4637034aE");
  const ASSET_3: Address =
    address!("0x34535eE720e329f66071B86486763Da4637034aE");

  fn compact_only(buy: u8, sell: u8) -> AssetUpdate {
    let base = Rate::from(1_000_000u64);
    let side = |compact| PriceUpdate {
      base,
      compact,
      base_changed: false,
    };
    AssetUpdate {
      requested_buy: base,
      requested_sell: base,
      buy: side(buy),
      sell: side(sell),
    }
  }

  fn index(array_idx: u64, field_idx: u64) -> AssetIndex {
    AssetIndex::new(array_idx, field_idx).expect("valid index")
  }

  fn packed_batch() -> (
    BTreeMap<Address, AssetUpdate>,
    BTreeMap<Address, AssetIndex>,
  ) {
    let updates = BTreeMap::from([
      (ASSET_1, compact_only(23, 26)),
      (ASSET_2, compact_only(24, 27)),
      (ASSET_3, compact_only(25, 28)),
    ]);
    let indices = BTreeMap::from([
      (ASSET_1, index(3, 9)),
      (ASSET_2, index(9, 5)),
      (ASSET_3, index(9, 6)),
    ]);
    (updates, indices)
  }

  #[test]
  fn packs_groups_by_array_slot() -> Result<(), CoreError> {
    let (updates, indices) = packed_batch();
    let batch = encode(&updates, &indices)?;
    assert!(!batch.is_base_update());
    assert_eq!(vec![3, 9], batch.array_indices());
    assert_eq!(
      vec![
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 23, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 24, 25, 0, 0, 0, 0, 0, 0, 0],
      ],
      batch.compact_buy()
    );
    assert_eq!(
      vec![
        [0, 0, 0, 0, 0, 0, 0, 0, 0, 26, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 27, 28, 0, 0, 0, 0, 0, 0, 0],
      ],
      batch.compact_sell()
    );
    Ok(())
  }

  #[test]
  fn shared_slot_conflicts() {
    let (updates, mut indices) = packed_batch();
    indices.insert(ASSET_3, index(9, 5));
    assert_eq!(
      encode(&updates, &indices),
      Err(IndexConflict {
        array_idx: 9,
        field_idx: 5,
        first: ASSET_2,
        second: ASSET_3,
      })
    );
  }

  #[test]
  fn missing_index_fails() {
    let (updates, mut indices) = packed_batch();
    indices.remove(&ASSET_2);
    assert_eq!(encode(&updates, &indices), Err(MissingIndex(ASSET_2)));
  }

  #[test]
  fn one_reset_sends_every_asset() -> Result<(), CoreError> {
    let (mut updates, indices) = packed_batch();
    let reset = AssetUpdate::compute(
      Rate::from(5_000u64),
      Rate::from(1_000_000u64),
      Rate::from(1_000u64),
      Rate::from(1_000_000u64),
    );
    updates.insert(ASSET_2, reset);
    let batch = encode(&updates, &indices)?;
    assert_eq!(
      batch,
      EncodedBatch::BaseRates {
        assets: vec![ASSET_1, ASSET_2, ASSET_3],
        buy_rates: vec![
          Rate::from(1_000_000u64),
          Rate::from(5_000u64),
          Rate::from(1_000_000u64),
        ],
        sell_rates: vec![Rate::from(1_000_000u64); 3],
      }
    );
    assert!(batch.compact_buy().is_empty());
    assert!(batch.compact_sell().is_empty());
    assert!(batch.array_indices().is_empty());
    Ok(())
  }

  #[test]
  fn empty_batch() -> Result<(), CoreError> {
    let batch = encode(&BTreeMap::new(), &BTreeMap::new())?;
    assert_eq!(batch, EncodedBatch::Compact { groups: vec![] });
    Ok(())
  }

  prop_compose! {
    /// Distinct assets with distinct slots and rates around a shared base.
    fn rate_batch()
      (slots in proptest::collection::btree_set((0u64..4, 0u64..14), 1..20),
       base in base_rate())
      (changes in proptest::collection::vec(
         (-200i64..200, -200i64..200), slots.len()),
       slots in Just(slots),
       base in Just(base))
      -> (BTreeMap<Address, AssetUpdate>, BTreeMap<Address, AssetIndex>) {
      let mut updates = BTreeMap::new();
      let mut indices = BTreeMap::new();
      for (i, ((array_idx, field_idx), (buy, sell))) in
        slots.into_iter().zip(changes).enumerate()
      {
        let asset = Address::with_last_byte(u8::try_from(i).expect("asset"));
        let update = AssetUpdate::compute(
          scale_rate(base, buy),
          scale_rate(base, sell),
          base,
          base,
        );
        updates.insert(asset, update);
        indices.insert(asset, index(array_idx, field_idx));
      }
      (updates, indices)
    }
  }

  proptest! {
    #[test]
    fn batch_form_follows_resets((updates, indices) in rate_batch()) {
      let batch = encode(&updates, &indices)?;
      let any_reset = updates.values().any(AssetUpdate::base_changed);
      prop_assert_eq!(batch.is_base_update(), any_reset);
      if let EncodedBatch::BaseRates { assets, buy_rates, sell_rates } = &batch
      {
        prop_assert_eq!(assets.len(), updates.len());
        for (i, asset) in assets.iter().enumerate() {
          prop_assert_eq!(buy_rates[i], updates[asset].requested_buy);
          prop_assert_eq!(sell_rates[i], updates[asset].requested_sell);
        }
      }
    }

    #[test]
    fn compact_bytes_land_in_their_slot((updates, indices) in rate_batch()) {
      let batch = encode(&updates, &indices)?;
      if let EncodedBatch::Compact { groups } = &batch {
        for (asset, update) in &updates {
          let index = indices[asset];
          let group = groups
            .iter()
            .find(|g| g.array_idx == index.array_idx())
            .expect("group");
          let field = usize::from(index.field_idx());
          prop_assert_eq!(group.buy[field], update.buy.compact);
          prop_assert_eq!(group.sell[field], update.sell.compact);
        }
        let slots: std::collections::BTreeSet<u64> =
          indices.values().map(AssetIndex::array_idx).collect();
        let slots = slots.into_iter().collect::<Vec<_>>();
        prop_assert_eq!(batch.array_indices(), slots);
      }
    }
  }
}
