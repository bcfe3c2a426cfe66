#![allow(clippy::too_many_arguments)]

mod interfaces;

pub mod artifacts;
pub mod tokens;

pub use interfaces::conversion_rates::IConversionRates;
pub use interfaces::erc20::IERC20;
pub use interfaces::kyber_reserve::IKyberReserve;
pub use interfaces::permission_groups::IPermissionGroups;
pub use interfaces::sanity_rates::ISanityRates;
