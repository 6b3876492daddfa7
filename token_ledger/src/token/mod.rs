use std::ops::Neg;

pub use error::{ErrorKind, TokenError};
use num_traits::Signed;
use ownable::{AccountID, Ownable, ZERO_ACCOUNT};

use self::events::TokenEvent;
use self::state::{StateError as TokenStateError, StateInvariantError, StateSummary, TokenState};
use self::types::{BurnReturn, MintReturn, TokenAmount, TransferFromReturn, TransferReturn};

mod error;
pub mod events;
pub mod state;
pub mod types;

type Result<T> = std::result::Result<T, TokenError>;

/// A fungible token ledger with owner-gated supply control
///
/// Tracks the total supply, per-account balances and per-(owner, operator)
/// allowances, and journals a notification record for every committed
/// mutation. Minting and burning are privileged operations guarded by the
/// wrapped [`Ownable`]; transfers and approvals are scoped to the caller
/// identity passed into each call.
#[derive(Clone, Debug)]
pub struct Token {
    /// Accounting state that will be inspected/mutated
    state: TokenState,
    /// Guard for the privileged mint/burn operations
    ownership: Ownable,
    /// Ordered, append-only journal of committed mutations
    events: Vec<TokenEvent>,
}

impl Token {
    /// Creates the ledger in one atomic initialization step
    ///
    /// The seed supply is minted to the creator and the creator becomes the
    /// privileged owner. No operation is accepted before this completes, so
    /// the first observable state already satisfies the supply invariant.
    pub fn new(creator: AccountID, initial_supply: &TokenAmount) -> Result<Self> {
        let amount = validate_amount(initial_supply, "initial supply")?;
        if creator == ZERO_ACCOUNT {
            return Err(TokenError::ZeroAccount { name: "creator" });
        }

        let mut state = TokenState::new();
        state.change_balance_by(creator, amount)?;
        state.change_supply_by(amount)?;

        let events = vec![
            TokenEvent::OwnershipTransferred { previous_owner: ZERO_ACCOUNT, new_owner: creator },
            TokenEvent::Transfer { from: ZERO_ACCOUNT, to: creator, amount: amount.clone() },
        ];

        tracing::debug!(creator, supply = %amount, "token ledger initialized");

        Ok(Self { state, ownership: Ownable::new(creator), events })
    }

    /// Get a reference to the wrapped accounting state
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Returns the journal of notification records, oldest first
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Opens an atomic transaction on the accounting state which allows a
    /// closure to make multiple modifications to it
    ///
    /// If the closure returns an error, the transaction is dropped atomically
    /// and no change is observed on the ledger state.
    fn transaction<F, Res>(&mut self, f: F) -> Result<Res>
    where
        F: FnOnce(&mut TokenState) -> Result<Res>,
    {
        let mut mutable_state = self.state.clone();
        let res = f(&mut mutable_state)?;
        // if closure didn't error, commit the state
        self.state = mutable_state;
        Ok(res)
    }
}

impl Token {
    /// Gets the total number of tokens in existence
    ///
    /// This equals the sum of `balance_of` called on all accounts. This equals
    /// the sum of all successful `mint` calls minus the sum of all successful
    /// `burn` calls.
    pub fn total_supply(&self) -> TokenAmount {
        self.state.supply.clone()
    }

    /// Returns the balance associated with a particular account
    ///
    /// Accounts that have never received transfers implicitly have a
    /// zero-balance
    pub fn balance_of(&self, owner: AccountID) -> TokenAmount {
        self.state.get_balance(owner)
    }

    /// Gets the allowance between owner and operator
    ///
    /// An allowance is the amount that the operator can transfer out of the
    /// owner's account via `transfer_from`.
    pub fn allowance(&self, owner: AccountID, operator: AccountID) -> TokenAmount {
        self.state.get_allowance_between(owner, operator)
    }

    /// Mints the specified value of tokens into an account
    ///
    /// Only the current owner may mint, and the recipient must not be the
    /// zero account. Upon a successful mint the recipient's balance and the
    /// total supply both increase by the requested amount, and a transfer
    /// from the zero account is journalled.
    pub fn mint(
        &mut self,
        operator: AccountID,
        to: AccountID,
        amount: &TokenAmount,
    ) -> Result<MintReturn> {
        let amount = validate_amount(amount, "mint")?;
        self.ownership.only_owner(operator)?;
        if to == ZERO_ACCOUNT {
            return Err(TokenError::ZeroAccount { name: "mint recipient" });
        }

        // Increase the balance of the account and increase total supply
        let ret = self.transaction(|state| {
            let balance = state.change_balance_by(to, amount)?;
            let supply = state.change_supply_by(amount)?.clone();
            Ok(MintReturn { balance, supply })
        })?;

        self.events.push(TokenEvent::Transfer { from: ZERO_ACCOUNT, to, amount: amount.clone() });
        tracing::debug!(operator, to, %amount, "minted new tokens");

        Ok(ret)
    }

    /// Burns an amount of token from the specified account, decreasing total
    /// token supply
    ///
    /// Only the current owner may burn. The requested value must not exceed
    /// the target's balance; a burn that would overdraw the account is
    /// discarded and this method returns an error. Burning "from" the zero
    /// account is rejected by the same balance check, as its balance is
    /// always zero.
    ///
    /// Upon successful burn:
    /// - The target's balance decreases by the requested value
    /// - The total supply decreases by the requested value
    pub fn burn(
        &mut self,
        operator: AccountID,
        target: AccountID,
        amount: &TokenAmount,
    ) -> Result<BurnReturn> {
        let amount = validate_amount(amount, "burn")?;
        self.ownership.only_owner(operator)?;

        let ret = self.transaction(|state| {
            // attempt to burn the requested amount
            let balance = state.change_balance_by(target, &amount.clone().neg())?;
            // decrease total supply
            state.change_supply_by(&amount.clone().neg())?;
            Ok(BurnReturn { balance })
        })?;

        self.events.push(TokenEvent::Transfer {
            from: target,
            to: ZERO_ACCOUNT,
            amount: amount.clone(),
        });
        tracing::debug!(operator, target, %amount, "burned tokens");

        Ok(ret)
    }

    /// Transfers an amount from the caller to another account
    ///
    /// The requested value must not exceed the caller's balance, and the
    /// recipient must not be the zero account. The balance precondition is
    /// checked before the recipient, so an overdrawn transfer reports
    /// `InsufficientBalance` whatever its destination. Transferring to the
    /// caller's own account is a balance-checked no-op.
    ///
    /// Upon successful transfer:
    /// - The from balance decreases by the requested value
    /// - The to balance increases by the requested value
    pub fn transfer(
        &mut self,
        from: AccountID,
        to: AccountID,
        amount: &TokenAmount,
    ) -> Result<TransferReturn> {
        let amount = validate_amount(amount, "transfer")?;

        let ret = self.transaction(|state| {
            let balance = state.get_balance(from);
            if balance.lt(amount) {
                return Err(TokenStateError::InsufficientBalance {
                    owner: from,
                    balance,
                    delta: amount.clone().neg(),
                }
                .into());
            }
            if to == ZERO_ACCOUNT {
                return Err(TokenError::ZeroAccount { name: "transfer recipient" });
            }

            // don't change balances if to == from
            if to == from {
                Ok(TransferReturn { from_balance: balance.clone(), to_balance: balance })
            } else {
                let to_balance = state.change_balance_by(to, amount)?;
                let from_balance = state.change_balance_by(from, &amount.clone().neg())?;
                Ok(TransferReturn { from_balance, to_balance })
            }
        })?;

        self.events.push(TokenEvent::Transfer { from, to, amount: amount.clone() });
        tracing::debug!(from, to, %amount, "transferred tokens");

        Ok(ret)
    }

    /// Sets the allowance between the caller and an operator to an absolute
    /// amount, returning the old allowance
    ///
    /// A repeated approve overwrites the previous allowance rather than
    /// adding to it. Neither party may be the zero account. A zero-amount
    /// approve clears the stored entry.
    pub fn approve(
        &mut self,
        owner: AccountID,
        operator: AccountID,
        amount: &TokenAmount,
    ) -> Result<TokenAmount> {
        let amount = validate_amount(amount, "approve")?;
        if owner == ZERO_ACCOUNT {
            return Err(TokenError::ZeroAccount { name: "approve owner" });
        }
        if operator == ZERO_ACCOUNT {
            return Err(TokenError::ZeroAccount { name: "approve operator" });
        }

        let old_allowance = self.transaction(|state| {
            Ok(state.set_allowance(owner, operator, amount)?)
        })?;

        self.events.push(TokenEvent::Approval { owner, operator, amount: amount.clone() });
        tracing::debug!(owner, operator, %amount, "approved allowance");

        Ok(old_allowance)
    }

    /// Transfers an amount from one account to another on the strength of a
    /// previously approved allowance
    ///
    /// The caller is the operator. Checks run in order: the operator's
    /// allowance must cover the requested value, then the owner's balance
    /// must cover it, then the recipient must not be the zero account. Any
    /// failure discards the whole operation, leaving balances and the
    /// allowance untouched.
    ///
    /// Upon successful transfer:
    /// - The from balance decreases by the requested value
    /// - The to balance increases by the requested value
    /// - The owner-operator allowance decreases by the requested value
    pub fn transfer_from(
        &mut self,
        operator: AccountID,
        from: AccountID,
        to: AccountID,
        amount: &TokenAmount,
    ) -> Result<TransferFromReturn> {
        let amount = validate_amount(amount, "transfer")?;

        let ret = self.transaction(|state| {
            let allowance = state.attempt_use_allowance(operator, from, amount)?;

            let balance = state.get_balance(from);
            if balance.lt(amount) {
                return Err(TokenStateError::InsufficientBalance {
                    owner: from,
                    balance,
                    delta: amount.clone().neg(),
                }
                .into());
            }
            if to == ZERO_ACCOUNT {
                return Err(TokenError::ZeroAccount { name: "transfer recipient" });
            }

            // don't change balances if to == from, the allowance is still used
            if to == from {
                Ok(TransferFromReturn {
                    from_balance: balance.clone(),
                    to_balance: balance,
                    allowance,
                })
            } else {
                let to_balance = state.change_balance_by(to, amount)?;
                let from_balance = state.change_balance_by(from, &amount.clone().neg())?;
                Ok(TransferFromReturn { from_balance, to_balance, allowance })
            }
        })?;

        self.events.push(TokenEvent::Transfer { from, to, amount: amount.clone() });
        tracing::debug!(operator, from, to, %amount, "transferred tokens by allowance");

        Ok(ret)
    }
}

impl Token {
    /// Returns the account currently holding the privileged owner role
    pub fn owner(&self) -> AccountID {
        self.ownership.owner()
    }

    /// Hands the privileged owner role to another account
    ///
    /// The caller must be the current owner and the new owner must not be the
    /// zero account. Returns the new owner.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountID,
        new_owner: AccountID,
    ) -> Result<AccountID> {
        let (previous_owner, new_owner) = self.ownership.transfer_ownership(caller, new_owner)?;

        self.events.push(TokenEvent::OwnershipTransferred { previous_owner, new_owner });
        tracing::debug!(previous_owner, new_owner, "ownership transferred");

        Ok(new_owner)
    }

    /// Gives up the privileged owner role entirely
    ///
    /// The zero account is left as owner, so mint and burn can never succeed
    /// again.
    pub fn renounce_ownership(&mut self, caller: AccountID) -> Result<()> {
        let (previous_owner, new_owner) = self.ownership.renounce_ownership(caller)?;

        self.events.push(TokenEvent::OwnershipTransferred { previous_owner, new_owner });
        tracing::debug!(previous_owner, "ownership renounced");

        Ok(())
    }

    /// Checks the state invariants, returning a state summary if they are met
    pub fn check_invariants(&self) -> std::result::Result<StateSummary, StateInvariantError> {
        self.state.check_invariants()
    }
}

/// Validates that a token amount is non-negative
///
/// Returns the argument, or an error.
pub fn validate_amount<'a>(a: &'a TokenAmount, name: &'static str) -> Result<&'a TokenAmount> {
    if a.is_negative() {
        return Err(TokenError::InvalidNegative { name, amount: a.clone() });
    }
    Ok(a)
}
