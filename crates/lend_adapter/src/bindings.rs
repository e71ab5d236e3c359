//! Solidity call bindings via `sol!`.
//!
//! Only the functions the encoder emits (and the decoder recognizes) are
//! declared. Reads from the protocol go through the gateway traits instead.

#![allow(clippy::too_many_arguments)]

use alloy_sol_types::sol;

sol! {
    /// ERC-20 allowance management.
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// V2-style lending pool.
    interface ILendingPoolV2 {
        function deposit(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
        function withdraw(address asset, uint256 amount, address to) external returns (uint256);
    }

    /// V3-style pool.
    interface IPoolV3 {
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode) external;
        function withdraw(address asset, uint256 amount, address to) external returns (uint256);
    }

    /// V2 incentives controller (one reward token).
    interface IIncentivesControllerV2 {
        function claimRewards(address[] assets, uint256 amount, address to) external returns (uint256);
    }

    /// V3 rewards controller (reward list).
    interface IRewardsControllerV3 {
        function claimAllRewards(address[] assets, address to) external returns (address[] rewardsList, uint256[] claimedAmounts);
    }

    /// Uniswap-V2-style router used for the harvest stub.
    interface ISwapRouter {
        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] path,
            address to,
            uint256 deadline
        ) external returns (uint256[] amounts);
    }
}
