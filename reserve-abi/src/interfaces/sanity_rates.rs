use alloy::sol;

sol! {
  /// Guard rails against unreasonable rates from the pricing contract.
  #[derive(Debug, PartialEq, Eq)]
  #[sol(rpc)]
  interface ISanityRates {
    function setSanityRates(address[] calldata srcs, uint256[] calldata rates)
      external;
    function setReasonableDiff(address[] calldata srcs, uint256[] calldata diff)
      external;
    function getSanityRate(address src, address dest)
      external
      view
      returns (uint256);
    function reasonableDiffInBps(address token) external view returns (uint256);
  }
}
