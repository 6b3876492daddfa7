use ownable::OwnableError;
use thiserror::Error;

use crate::token::state::StateError as TokenStateError;
use crate::token::types::TokenAmount;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("error in underlying state {0}")]
    TokenState(#[from] TokenStateError),
    #[error("value {amount:?} for {name:?} must be non-negative")]
    InvalidNegative { name: &'static str, amount: TokenAmount },
    #[error("{name} cannot be the zero account")]
    ZeroAccount { name: &'static str },
    #[error("ownership guard rejected the call: {0}")]
    Ownership(#[from] OwnableError),
}

impl TokenError {
    /// Returns the stable classification of this error
    pub fn kind(&self) -> ErrorKind {
        self.into()
    }
}

/// Stable, machine-checkable classification of ledger failures
///
/// Callers branch on the kind; the error message carries the detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A privileged operation was attempted by a caller that is not the owner
    Unauthorized,
    /// The zero account, or a negative amount, was supplied where disallowed
    InvalidArgument,
    /// A requested debit exceeded the available balance
    InsufficientBalance,
    /// A delegated spend exceeded the approved allowance
    InsufficientAllowance,
}

impl From<&TokenError> for ErrorKind {
    fn from(error: &TokenError) -> Self {
        match error {
            TokenError::InvalidNegative { name: _, amount: _ }
            | TokenError::ZeroAccount { name: _ } => ErrorKind::InvalidArgument,
            TokenError::Ownership(ownable_error) => match ownable_error {
                OwnableError::NotOwner { caller: _, owner: _ } => ErrorKind::Unauthorized,
                OwnableError::ZeroNewOwner => ErrorKind::InvalidArgument,
            },
            TokenError::TokenState(state_error) => match state_error {
                TokenStateError::InsufficientBalance { owner: _, balance: _, delta: _ } => {
                    ErrorKind::InsufficientBalance
                }
                TokenStateError::InsufficientAllowance {
                    owner: _,
                    operator: _,
                    allowance: _,
                    delta: _,
                } => ErrorKind::InsufficientAllowance,
                TokenStateError::NegativeTotalSupply { supply: _, delta: _ }
                | TokenStateError::NegativeAllowance { amount: _, owner: _, operator: _ } => {
                    ErrorKind::InvalidArgument
                }
            },
        }
    }
}
