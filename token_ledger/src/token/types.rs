use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Integral amount of tokens
///
/// Amounts are arbitrary-precision so accounting can never silently wrap.
/// Signed arithmetic is used internally (burns and transfers apply negative
/// deltas) but every operation validates that the requested amount is
/// non-negative before touching state.
pub type TokenAmount = BigInt;

/// The updated values after a successful mint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MintReturn {
    /// The new balance of the recipient
    pub balance: TokenAmount,
    /// The new total supply
    pub supply: TokenAmount,
}

/// The updated value after a successful burn
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BurnReturn {
    /// New balance in the account after the successful burn
    pub balance: TokenAmount,
}

/// Return value after a successful transfer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferReturn {
    /// The new balance of the `from` account
    pub from_balance: TokenAmount,
    /// The new balance of the `to` account
    pub to_balance: TokenAmount,
}

/// Return value after a successful delegated transfer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransferFromReturn {
    /// The new balance of the `from` account
    pub from_balance: TokenAmount,
    /// The new balance of the `to` account
    pub to_balance: TokenAmount,
    /// The remaining allowance between the owner and the operator
    pub allowance: TokenAmount,
}
