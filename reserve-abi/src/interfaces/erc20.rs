use alloy::sol;

sol! {
  #[derive(Debug, PartialEq, Eq)]
  #[sol(rpc)]
  interface IERC20 {
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
    function transfer(address to, uint256 amount) external returns (bool);

    event Transfer(address indexed from, address indexed to, uint256 amount);
  }
}
