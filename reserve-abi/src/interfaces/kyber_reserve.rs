use alloy::sol;

sol! {
  /// Fund contract of a reserve: holds inventory, executes trades routed by
  /// the network contract and guards withdrawals.
  #[derive(Debug, PartialEq, Eq)]
  #[sol(rpc)]
  interface IKyberReserve {
    function tradeEnabled() external view returns (bool);
    function enableTrade() external returns (bool);
    function disableTrade() external returns (bool);

    /// Withdraw approvals are keyed by `keccak256(token ++ destination)`.
    function approvedWithdrawAddresses(bytes32 key)
      external
      view
      returns (bool);
    function approveWithdrawAddress(address token, address addr, bool approve)
      external;
    function withdraw(address token, uint256 amount, address destination)
      external
      returns (bool);

    /// Balance of `token`, the ETH pseudo-token address for ether.
    function getBalance(address token) external view returns (uint256);

    function setContracts(
      address kyberNetwork,
      address conversionRates,
      address sanityRates
    ) external;
    function kyberNetwork() external view returns (address);
    function conversionRatesContract() external view returns (address);
    function sanityRatesContract() external view returns (address);

    event TradeEnabled(bool enable);
    event WithdrawAddressApproved(address token, address addr, bool approve);
    event WithdrawFunds(address token, uint256 amount, address destination);
    event SetContractAddresses(address network, address rate, address sanity);
  }
}
