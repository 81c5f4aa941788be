//! ERC-20 calldata for the three calls the frontend makes.

use crate::{ProviderError, WalletProvider};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, sol};

sol! {
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

pub fn balance_of_calldata(owner: Address) -> Bytes {
    IERC20::balanceOfCall { owner }.abi_encode().into()
}

pub fn approve_calldata(spender: Address, amount: U256) -> Bytes {
    IERC20::approveCall { spender, amount }.abi_encode().into()
}

pub fn transfer_calldata(to: Address, amount: U256) -> Bytes {
    IERC20::transferCall { to, amount }.abi_encode().into()
}

pub fn decode_balance(data: &[u8]) -> Result<U256, ProviderError> {
    IERC20::balanceOfCall::abi_decode_returns(data)
        .map_err(|err| ProviderError::Decode(format!("balanceOf return: {err}")))
}

/// `balanceOf(owner)` on `token` through the wallet's node.
pub async fn balance_of<P>(provider: &P, token: Address, owner: Address) -> Result<U256, ProviderError>
where
    P: WalletProvider + ?Sized,
{
    let raw = provider.call(token, balance_of_calldata(owner)).await?;
    decode_balance(&raw)
}
