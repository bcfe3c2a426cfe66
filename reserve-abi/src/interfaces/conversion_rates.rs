use alloy::sol;

sol! {
  /// Pricing contract of a reserve.
  ///
  /// Rates are stored as a base rate per (token, side) plus a one-byte
  /// compact delta in units of 0.1%, packed 14 tokens per `bytes14` slot of
  /// the compact data table. Step functions further adjust the rate by
  /// trade quantity and by net imbalance since the last rate update.
  #[derive(Debug, PartialEq, Eq)]
  #[sol(rpc)]
  interface IConversionRates {
    function addToken(address token) external;
    function setTokenControlInfo(
      address token,
      uint256 minimalRecordResolution,
      uint256 maxPerBlockImbalance,
      uint256 maxTotalImbalance
    ) external;
    function enableTokenTrade(address token) external;
    function disableTokenTrade(address token) external;
    function getListedTokens() external view returns (address[] memory);
    function getTokenBasicData(address token)
      external
      view
      returns (bool listed, bool enabled);

    /// Position of `token` in the compact data table and its current
    /// compact bytes.
    function getCompactData(address token)
      external
      view
      returns (
        uint256 arrayIndex,
        uint256 fieldOffset,
        bytes1 buy,
        bytes1 sell
      );

    function setBaseRate(
      address[] calldata tokens,
      uint256[] calldata baseBuy,
      uint256[] calldata baseSell,
      bytes14[] calldata buy,
      bytes14[] calldata sell,
      uint256 blockNumber,
      uint256[] calldata indices
    ) external;
    function setCompactData(
      bytes14[] calldata buy,
      bytes14[] calldata sell,
      uint256 blockNumber,
      uint256[] calldata indices
    ) external;

    function setQtyStepFunction(
      address token,
      int256[] calldata xBuy,
      int256[] calldata yBuy,
      int256[] calldata xSell,
      int256[] calldata ySell
    ) external;
    function setImbalanceStepFunction(
      address token,
      int256[] calldata xBuy,
      int256[] calldata yBuy,
      int256[] calldata xSell,
      int256[] calldata ySell
    ) external;
    function getStepFunctionData(address token, uint256 command, uint256 param)
      external
      view
      returns (int256);

    function setValidRateDurationInBlocks(uint256 duration) external;
    function validRateDurationInBlocks() external view returns (uint256);

    function setReserveAddress(address reserve) external;
    function reserveContract() external view returns (address);

    function getBasicRate(address token, bool buy)
      external
      view
      returns (uint256);
    function getRateUpdateBlock(address token) external view returns (uint256);
    function getRate(
      address token,
      uint256 currentBlockNumber,
      bool buy,
      uint256 qty
    )
      external
      view
      returns (uint256);
  }
}
