use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::CoreError::{self, TokenAmount};

/// Converts a human readable token amount into its smallest unit, truncating
/// digits beyond `decimals`.
///   `wei = value * 10^decimals`
pub fn token_wei(value: Decimal, decimals: u8) -> Result<U256, CoreError> {
  let mantissa = u128::try_from(value.mantissa())
    .map_err(|_| TokenAmount(value.to_string()))?;
  let scale = value.scale();
  let ten = U256::from(10u8);
  let decimals = u32::from(decimals);
  let scaled = if decimals >= scale {
    ten
      .checked_pow(U256::from(decimals - scale))
      .and_then(|factor| U256::from(mantissa).checked_mul(factor))
  } else {
    ten
      .checked_pow(U256::from(scale - decimals))
      .map(|factor| U256::from(mantissa) / factor)
  };
  scaled.ok_or(TokenAmount(value.to_string()))
}
