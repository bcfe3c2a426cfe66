use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::Rate;

/// Compact deltas are expressed in units of 0.1% of the base rate.
pub const COMPACT_UNITS_PER_RATE: u64 = 1000;

/// Side of the pricing contract a rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
  Buy,
  Sell,
}

impl Side {
  #[must_use]
  pub fn is_buy(self) -> bool {
    matches!(self, Side::Buy)
  }
}

/// Result of comparing a requested rate with the stored base rate for one
/// (asset, side) pair.
///
/// If `base_changed` is set, `base` is the requested rate and `compact` is
/// zero. Otherwise `base` is the current base rate and `compact` is the
/// biased single-byte delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
  pub base: Rate,
  pub compact: u8,
  pub base_changed: bool,
}

impl PriceUpdate {
  /// Computes the compact update of `requested` relative to `base`.
  ///
  /// A zero base is unset on-chain and always needs a reset, unless the
  /// requested rate is zero too. Otherwise the delta must land in
  /// `[-127, 126]` to fit a slot; anything else resets the base.
  #[must_use]
  pub fn compute(requested: Rate, base: Rate) -> PriceUpdate {
    if base.is_zero() {
      return PriceUpdate {
        base: requested,
        compact: 0,
        base_changed: requested != base,
      };
    }
    compact_delta(requested, base)
      .and_then(|delta| i8::try_from(delta).ok())
      .filter(|delta| *delta != i8::MIN && *delta != i8::MAX)
      .map_or(
        PriceUpdate {
          base: requested,
          compact: 0,
          base_changed: true,
        },
        |delta| PriceUpdate {
          base,
          compact: delta.to_le_bytes()[0],
          base_changed: false,
        },
      )
  }

  /// Signed delta stored in `compact`, in units of 0.1%.
  #[must_use]
  pub fn delta(&self) -> i8 {
    decode_compact(self.compact)
  }
}

/// Signed relative change `(requested / base - 1) * 1000`, truncated toward
/// zero. `None` if the magnitude overflows.
#[must_use]
pub fn compact_delta(requested: Rate, base: Rate) -> Option<i64> {
  if base.is_zero() {
    return None;
  }
  let (magnitude, negative) = if requested >= base {
    (requested - base, false)
  } else {
    (base - requested, true)
  };
  let units = magnitude.checked_mul(U256::from(COMPACT_UNITS_PER_RATE))? / base;
  let units = i64::try_from(units).ok()?;
  Some(if negative { -units } else { units })
}

/// Recovers the signed delta from its on-chain byte, values from 128 up
/// being negative.
#[must_use]
pub fn decode_compact(byte: u8) -> i8 {
  i8::from_le_bytes([byte])
}

/// Buy and sell side results for one asset, together with the requested
/// absolute rates needed if the batch falls back to a base rate update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUpdate {
  pub requested_buy: Rate,
  pub requested_sell: Rate,
  pub buy: PriceUpdate,
  pub sell: PriceUpdate,
}

impl AssetUpdate {
  #[must_use]
  pub fn compute(
    requested_buy: Rate,
    requested_sell: Rate,
    base_buy: Rate,
    base_sell: Rate,
  ) -> AssetUpdate {
    AssetUpdate {
      requested_buy,
      requested_sell,
      buy: PriceUpdate::compute(requested_buy, base_buy),
      sell: PriceUpdate::compute(requested_sell, base_sell),
    }
  }

  #[must_use]
  pub fn base_changed(&self) -> bool {
    self.buy.base_changed || self.sell.base_changed
  }

  #[must_use]
  pub fn side(&self, side: Side) -> &PriceUpdate {
    match side {
      Side::Buy => &self.buy,
      Side::Sell => &self.sell,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::util::proptest::*;
  use proptest::prelude::*;

  fn rate(value: u128) -> Rate {
    Rate::from(value)
  }

  proptest! {
    #[test]
    fn small_change_fits_slot(
      base in base_rate(),
      change in -127i64..=126,
    ) {
      let requested = scale_rate(base, change);
      let update = PriceUpdate::compute(requested, base);
      prop_assert!(!update.base_changed);
      prop_assert_eq!(update.base, base);
      // Flooring `requested` can cost at most one unit
      let delta = i64::from(update.delta());
      prop_assert!((delta - change).abs() <= 1);
      if change < 0 {
        prop_assert!(update.compact >= 128 || update.compact == 0);
      }
    }

    #[test]
    fn big_rise_resets_base(
      base in base_rate(),
      change in 128i64..100_000,
    ) {
      let requested = scale_rate(base, change);
      let update = PriceUpdate::compute(requested, base);
      prop_assert_eq!(
        update,
        PriceUpdate { base: requested, compact: 0, base_changed: true }
      );
    }

    #[test]
    fn big_drop_resets_base(
      base in base_rate(),
      change in -1000i64..=-128,
    ) {
      let requested = scale_rate(base, change);
      let update = PriceUpdate::compute(requested, base);
      prop_assert_eq!(
        update,
        PriceUpdate { base: requested, compact: 0, base_changed: true }
      );
    }

    #[test]
    fn compute_is_pure(
      base in base_rate(),
      change in -1000i64..1000,
    ) {
      let requested = scale_rate(base, change);
      prop_assert_eq!(
        PriceUpdate::compute(requested, base),
        PriceUpdate::compute(requested, base)
      );
    }

    #[test]
    fn biased_byte_roundtrip(delta in -127i8..=126) {
      let byte = delta.to_le_bytes()[0];
      prop_assert_eq!(decode_compact(byte), delta);
      if delta < 0 {
        prop_assert_eq!(i16::from(byte), i16::from(delta) + 256);
      }
    }
  }

  #[test]
  fn unchanged_rate() {
    let base = rate(500_000_000_000_000_000_000);
    let update = PriceUpdate::compute(base, base);
    assert_eq!(
      update,
      PriceUpdate {
        base,
        compact: 0,
        base_changed: false
      }
    );
  }

  #[test]
  fn zero_base() {
    assert_eq!(
      PriceUpdate::compute(rate(100), Rate::ZERO),
      PriceUpdate {
        base: rate(100),
        compact: 0,
        base_changed: true
      }
    );
    assert_eq!(
      PriceUpdate::compute(Rate::ZERO, Rate::ZERO),
      PriceUpdate {
        base: Rate::ZERO,
        compact: 0,
        base_changed: false
      }
    );
  }

  #[test]
  fn zero_requested_resets_base() {
    let update = PriceUpdate::compute(Rate::ZERO, rate(1_000));
    assert!(update.base_changed);
    assert_eq!(Rate::ZERO, update.base);
  }

  #[test]
  fn slot_boundaries() {
    let base = rate(1_000);
    assert_eq!(126, PriceUpdate::compute(rate(1_126), base).compact);
    assert!(PriceUpdate::compute(rate(1_127), base).base_changed);
    assert_eq!(129, PriceUpdate::compute(rate(873), base).compact);
    assert_eq!(-127, PriceUpdate::compute(rate(873), base).delta());
    assert!(PriceUpdate::compute(rate(872), base).base_changed);
  }

  #[test]
  fn truncates_toward_zero() {
    // -0.1 units truncates to 0, not -1
    let update = PriceUpdate::compute(rate(9_999), rate(10_000));
    assert!(!update.base_changed);
    assert_eq!(0, update.compact);
    // -1.9 units truncates to -1
    let update = PriceUpdate::compute(rate(9_981), rate(10_000));
    assert_eq!(-1, update.delta());
    assert_eq!(255, update.compact);
    // 1.9 units truncates to 1
    let update = PriceUpdate::compute(rate(10_019), rate(10_000));
    assert_eq!(1, update.compact);
  }

  #[test]
  fn large_change_in_real_units() {
    let base = rate(1_820_000_000_000_000);
    let requested = scale_rate(base, 200);
    assert_eq!(
      PriceUpdate::compute(requested, base),
      PriceUpdate {
        base: requested,
        compact: 0,
        base_changed: true
      }
    );
  }

  #[test]
  fn huge_requested_rate_does_not_overflow() {
    let update = PriceUpdate::compute(Rate::MAX, rate(1));
    assert!(update.base_changed);
    assert_eq!(Rate::MAX, update.base);
    assert_eq!(None, compact_delta(Rate::MAX, rate(1)));
  }

  #[test]
  fn asset_update_sides() {
    let base = rate(1_000_000);
    let update =
      AssetUpdate::compute(rate(1_010_000), rate(990_000), base, base);
    assert!(!update.base_changed());
    assert_eq!(10, update.side(Side::Buy).delta());
    assert_eq!(-10, update.side(Side::Sell).delta());

    let update = AssetUpdate::compute(rate(1_010_000), rate(1), base, base);
    assert!(update.base_changed());
    assert!(!update.buy.base_changed);
  }
}
