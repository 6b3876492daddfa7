use std::collections::BTreeMap;
use std::ops::Neg;

use num_traits::{Signed, Zero};
use ownable::{AccountID, ZERO_ACCOUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::TokenAmount;

#[derive(Error, Debug)]
pub enum StateError {
    #[error(
        "negative balance caused by decreasing {owner:?}'s balance of {balance:?} by {delta:?}"
    )]
    InsufficientBalance { owner: AccountID, balance: TokenAmount, delta: TokenAmount },
    #[error(
        "{operator:?} attempted to utilise {delta:?} of allowance {allowance:?} set by {owner:?}"
    )]
    InsufficientAllowance {
        owner: AccountID,
        operator: AccountID,
        allowance: TokenAmount,
        delta: TokenAmount,
    },
    #[error("total_supply cannot be negative, cannot apply delta of {delta:?} to {supply:?}")]
    NegativeTotalSupply { supply: TokenAmount, delta: TokenAmount },
    #[error("allowance cannot be negative, cannot set allowance between {owner:?} and {operator:?} to {amount:?}")]
    NegativeAllowance { amount: TokenAmount, owner: AccountID, operator: AccountID },
}

#[derive(Error, Debug)]
pub enum StateInvariantError {
    #[error("total supply was negative: {0}")]
    SupplyNegative(TokenAmount),
    #[error("the account for {account:?} had a negative balance of {balance:?}")]
    BalanceNegative { account: AccountID, balance: TokenAmount },
    #[error("the total supply {supply:?} does not match the sum of all balances {balance_sum:?}")]
    BalanceSupplyMismatch { supply: TokenAmount, balance_sum: TokenAmount },
    #[error(
        "a negative allowance of {allowance:?} was specified between {owner:?} and {operator:?}"
    )]
    NegativeAllowance { owner: AccountID, operator: AccountID, allowance: TokenAmount },
    #[error("stored a zero balance which should have been removed for {0}")]
    ExplicitZeroBalance(AccountID),
    #[error(
        "stored a zero allowance which should have been removed between {owner:?} and {operator:?}"
    )]
    ExplicitZeroAllowance { owner: AccountID, operator: AccountID },
    #[error("stored an allowance map for {0} though they have specified no allowances")]
    ExplicitEmptyAllowance(AccountID),
    #[error("the reserved zero account held a balance of {0:?}")]
    ZeroAccountBalance(TokenAmount),
    #[error("the reserved zero account appeared as an allowance party for {owner:?}")]
    ZeroAccountAllowance { owner: AccountID },
}

type Result<T> = std::result::Result<T, StateError>;

pub type BalanceMap = BTreeMap<AccountID, TokenAmount>;
pub type AllowanceMap = BTreeMap<AccountID, OwnerAllowanceMap>;
pub type OwnerAllowanceMap = BTreeMap<AccountID, TokenAmount>;

/// Accounting state of the token ledger
///
/// This is a simple wrapper of state and in general does not account for token
/// protocol level checks such as ensuring necessary approvals are enforced
/// during transfers. This is left for the caller to handle. However, some
/// invariants such as non-negative balances, allowances and total supply are
/// enforced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    /// Total supply of token
    pub supply: TokenAmount,
    /// Balances of accounts. Accounts with no entry hold an implicit zero
    pub balances: BalanceMap,
    /// Allowances are stored `allowances[owner][operator]`
    pub allowances: AllowanceMap,
}

impl TokenState {
    /// Creates an empty ledger state with zero supply
    pub fn new() -> Self {
        Self {
            supply: TokenAmount::zero(),
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    /// Get the balance of an account from the currently stored state
    ///
    /// Accounts that have never received tokens implicitly have a zero-balance
    pub fn get_balance(&self, owner: AccountID) -> TokenAmount {
        match self.balances.get(&owner) {
            Some(amount) => amount.clone(),
            None => TokenAmount::zero(),
        }
    }

    /// Changes the balance of the specified account by the delta
    ///
    /// Caller must ensure that the sign of the delta is consistent with token
    /// rules (i.e. negative transfers, burns etc. are not allowed). Returns
    /// the new balance of the account.
    pub fn change_balance_by(
        &mut self,
        owner: AccountID,
        delta: &TokenAmount,
    ) -> Result<TokenAmount> {
        if delta.is_zero() {
            // This is a no-op as far as mutating state
            return Ok(self.get_balance(owner));
        }

        let balance = self.get_balance(owner);
        let new_balance = &balance + delta;

        // if the new_balance is negative, return an error
        if new_balance.is_negative() {
            return Err(StateError::InsufficientBalance { owner, balance, delta: delta.clone() });
        }

        // zero balances are not stored explicitly
        if new_balance.is_zero() {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, new_balance.clone());
        }

        Ok(new_balance)
    }

    /// Increase/decrease the total supply by the specified value
    ///
    /// Returns the new total supply
    pub fn change_supply_by(&mut self, delta: &TokenAmount) -> Result<&TokenAmount> {
        let new_supply = &self.supply + delta;
        if new_supply.is_negative() {
            return Err(StateError::NegativeTotalSupply {
                supply: self.supply.clone(),
                delta: delta.clone(),
            });
        }

        self.supply = new_supply;
        Ok(&self.supply)
    }

    /// Get the allowance that an owner has approved for an operator
    ///
    /// If an existing allowance cannot be found, it is implicitly assumed to
    /// be zero
    pub fn get_allowance_between(&self, owner: AccountID, operator: AccountID) -> TokenAmount {
        match self.allowances.get(&owner).and_then(|map| map.get(&operator)) {
            Some(allowance) => allowance.clone(),
            None => TokenAmount::zero(),
        }
    }

    /// Change the allowance between owner and operator by the specified delta
    ///
    /// The resulting allowance is clamped at zero; entries and per-owner maps
    /// that reach zero are removed from the state.
    pub fn change_allowance_by(
        &mut self,
        owner: AccountID,
        operator: AccountID,
        delta: &TokenAmount,
    ) -> TokenAmount {
        if delta.is_zero() {
            // This is a no-op as far as mutating state
            return self.get_allowance_between(owner, operator);
        }

        // the owner has no allowances and the delta is negative, this is a no-op
        if delta.is_negative() && !self.allowances.contains_key(&owner) {
            return TokenAmount::zero();
        }

        let allowance_map = self.allowances.entry(owner).or_default();

        // calculate new allowance (max with zero)
        let new_allowance = match allowance_map.get(&operator) {
            Some(existing_allowance) => existing_allowance + delta,
            None => delta.clone(),
        }
        .max(TokenAmount::zero());

        // if the new allowance is zero, we can remove the entry from the state
        if new_allowance.is_zero() {
            allowance_map.remove(&operator);
        } else {
            allowance_map.insert(operator, new_allowance.clone());
        }

        // if the owner-allowance map is empty, remove it from the global map
        if allowance_map.is_empty() {
            self.allowances.remove(&owner);
        }

        new_allowance
    }

    /// Revokes an approved allowance by removing the entry from the
    /// owner-operator map
    ///
    /// If that map becomes empty, it is removed from the root map. Returns the
    /// old allowance.
    pub fn revoke_allowance(&mut self, owner: AccountID, operator: AccountID) -> TokenAmount {
        if let Some(map) = self.allowances.get_mut(&owner) {
            let old_allowance = match map.remove(&operator) {
                Some(amount) => amount,
                None => TokenAmount::zero(),
            };

            // if the allowance map has become empty it can be dropped entirely
            if map.is_empty() {
                self.allowances.remove(&owner);
            }

            old_allowance
        } else {
            // no allowance map exists, there is nothing to do
            TokenAmount::zero()
        }
    }

    /// Set the allowance between owner and operator to a specific amount,
    /// returning the old allowance
    pub fn set_allowance(
        &mut self,
        owner: AccountID,
        operator: AccountID,
        amount: &TokenAmount,
    ) -> Result<TokenAmount> {
        if amount.is_negative() {
            return Err(StateError::NegativeAllowance { owner, operator, amount: amount.clone() });
        }

        if amount.is_zero() {
            // zero allowances are not stored, so this reduces to a revocation
            return Ok(self.revoke_allowance(owner, operator));
        }

        let allowance_map = self.allowances.entry(owner).or_default();
        let old_allowance = match allowance_map.insert(operator, amount.clone()) {
            Some(old_allowance) => old_allowance,
            None => TokenAmount::zero(),
        };

        Ok(old_allowance)
    }

    /// Atomically checks if value is less than the allowance and deducts it if
    /// so
    ///
    /// Returns the new allowance if successful, else returns an error and the
    /// allowance is unchanged
    pub fn attempt_use_allowance(
        &mut self,
        operator: AccountID,
        owner: AccountID,
        amount: &TokenAmount,
    ) -> Result<TokenAmount> {
        let current_allowance = self.get_allowance_between(owner, operator);

        if amount.is_zero() {
            return Ok(current_allowance);
        }

        if current_allowance.lt(amount) {
            return Err(StateError::InsufficientAllowance {
                owner,
                operator,
                allowance: current_allowance,
                delta: amount.clone(),
            });
        }

        let new_allowance = self.change_allowance_by(owner, operator, &amount.clone().neg());

        Ok(new_allowance)
    }

    /// Checks that the current state obeys all system invariants
    ///
    /// Checks that balances, allowances and the total supply are never
    /// negative and that the sum of all balances matches the total supply.
    /// Checks that there are no explicitly stored zero balances, zero
    /// allowances or empty allowance maps. Checks that the reserved zero
    /// account never appears as a balance holder or an allowance party.
    ///
    /// Returns a state summary that can be used to check application specific
    /// invariants.
    pub fn check_invariants(&self) -> std::result::Result<StateSummary, StateInvariantError> {
        // check total supply
        if self.supply.is_negative() {
            return Err(StateInvariantError::SupplyNegative(self.supply.clone()));
        }

        // check balances
        let mut balance_sum = TokenAmount::zero();
        for (owner, balance) in &self.balances {
            if *owner == ZERO_ACCOUNT {
                return Err(StateInvariantError::ZeroAccountBalance(balance.clone()));
            }
            // all balances must be positive
            if balance.is_negative() {
                return Err(StateInvariantError::BalanceNegative {
                    account: *owner,
                    balance: balance.clone(),
                });
            }
            // zero balances should not be stored in the map
            if balance.is_zero() {
                return Err(StateInvariantError::ExplicitZeroBalance(*owner));
            }
            balance_sum += balance;
        }

        // all balances must add up to total supply
        if balance_sum.ne(&self.supply) {
            return Err(StateInvariantError::BalanceSupplyMismatch {
                supply: self.supply.clone(),
                balance_sum,
            });
        }

        // check allowances
        for (owner, allowance_map) in &self.allowances {
            if *owner == ZERO_ACCOUNT {
                return Err(StateInvariantError::ZeroAccountAllowance { owner: *owner });
            }
            // check that the allowance map isn't empty
            if allowance_map.is_empty() {
                return Err(StateInvariantError::ExplicitEmptyAllowance(*owner));
            }

            for (operator, allowance) in allowance_map {
                if *operator == ZERO_ACCOUNT {
                    return Err(StateInvariantError::ZeroAccountAllowance { owner: *owner });
                }
                // check the allowance isn't negative
                if allowance.is_negative() {
                    return Err(StateInvariantError::NegativeAllowance {
                        owner: *owner,
                        operator: *operator,
                        allowance: allowance.clone(),
                    });
                }
                // check there's no explicit zero allowance
                if allowance.is_zero() {
                    return Err(StateInvariantError::ExplicitZeroAllowance {
                        owner: *owner,
                        operator: *operator,
                    });
                }
            }
        }

        Ok(StateSummary {
            balance_map: self.balances.clone(),
            allowance_map: self.allowances.clone(),
            total_supply: self.supply.clone(),
        })
    }
}

impl Default for TokenState {
    fn default() -> Self {
        Self::new()
    }
}

/// A summary of the current state to allow checking application specific
/// invariants
#[derive(Clone, Debug)]
pub struct StateSummary {
    pub balance_map: BalanceMap,
    pub allowance_map: AllowanceMap,
    pub total_supply: TokenAmount,
}
