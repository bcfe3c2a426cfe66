pub mod conversion_rates;
pub mod erc20;
pub mod kyber_reserve;
pub mod permission_groups;
pub mod sanity_rates;
