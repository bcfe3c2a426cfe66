use alloy::sol;

sol! {
  /// Admin, operator and alerter roles shared by every reserve contract.
  ///
  /// Admin transfer is two-step: the current admin nominates a pending
  /// admin, which then claims the role from its own account.
  #[derive(Debug, PartialEq, Eq)]
  #[sol(rpc)]
  interface IPermissionGroups {
    function admin() external view returns (address);
    function pendingAdmin() external view returns (address);
    function getOperators() external view returns (address[] memory);
    function getAlerters() external view returns (address[] memory);

    function transferAdmin(address newAdmin) external;
    function claimAdmin() external;

    function addOperator(address newOperator) external;
    function removeOperator(address operator) external;
    function addAlerter(address newAlerter) external;
    function removeAlerter(address alerter) external;

    event TransferAdminPending(address pendingAdmin);
    event AdminClaimed(address newAdmin, address previousAdmin);
    event OperatorAdded(address newOperator, bool isAdd);
    event AlerterAdded(address newAlerter, bool isAdd);
  }
}
