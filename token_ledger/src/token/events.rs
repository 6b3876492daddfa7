use ownable::AccountID;
use serde::{Deserialize, Serialize};

use super::types::TokenAmount;

/// Observable record appended to the ledger journal by a successful operation
///
/// The journal is ordered and append-only; records are written only after the
/// state change has committed, so replaying the journal against a fresh ledger
/// reproduces the same state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Movement of tokens between accounts
    ///
    /// Mints are transfers from the zero account; burns are transfers to it.
    Transfer {
        from: AccountID,
        to: AccountID,
        amount: TokenAmount,
    },
    /// An owner set an operator's spendable allowance to an absolute amount
    Approval {
        owner: AccountID,
        operator: AccountID,
        amount: TokenAmount,
    },
    /// The privileged owner changed, by handover or renouncement
    OwnershipTransferred {
        previous_owner: AccountID,
        new_owner: AccountID,
    },
}
