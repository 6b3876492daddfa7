use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque, comparable identity of a ledger participant
pub type AccountID = u64;

/// Reserved identity meaning "no account"
///
/// It can never hold a balance or be an approval party, and it is the terminal
/// owner left behind once ownership has been renounced.
pub const ZERO_ACCOUNT: AccountID = 0;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum OwnableError {
    #[error("caller {caller:?} is not the current owner {owner:?}")]
    NotOwner { caller: AccountID, owner: AccountID },
    #[error("new owner cannot be the zero account")]
    ZeroNewOwner,
}

type Result<T> = std::result::Result<T, OwnableError>;

/// Guards privileged operations behind a single mutable owner identity
///
/// Ownership can be handed to another account or renounced entirely.
/// Renouncing leaves the zero account as owner, after which the guard rejects
/// every caller forever.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: AccountID,
}

impl Ownable {
    /// Creates a guard owned by `initial_owner`
    pub fn new(initial_owner: AccountID) -> Self {
        Self { owner: initial_owner }
    }

    /// Returns the current owner
    pub fn owner(&self) -> AccountID {
        self.owner
    }

    /// Fails with `NotOwner` unless `caller` is the current owner
    ///
    /// Once ownership has been renounced there is no current owner and every
    /// caller is rejected, including the zero account itself.
    pub fn only_owner(&self, caller: AccountID) -> Result<()> {
        if self.owner == ZERO_ACCOUNT || caller != self.owner {
            return Err(OwnableError::NotOwner { caller, owner: self.owner });
        }
        Ok(())
    }

    /// Hands ownership to `new_owner`
    ///
    /// The caller must be the current owner and `new_owner` must not be the
    /// zero account. Returns the `(previous, new)` owner pair.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountID,
        new_owner: AccountID,
    ) -> Result<(AccountID, AccountID)> {
        self.only_owner(caller)?;
        if new_owner == ZERO_ACCOUNT {
            return Err(OwnableError::ZeroNewOwner);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        Ok((previous, new_owner))
    }

    /// Renounces ownership, leaving the zero account as owner
    ///
    /// Irreversible: there is no re-initialization path, so no privileged
    /// operation can ever succeed afterwards. Returns the `(previous, new)`
    /// owner pair.
    pub fn renounce_ownership(&mut self, caller: AccountID) -> Result<(AccountID, AccountID)> {
        self.only_owner(caller)?;
        let previous = std::mem::replace(&mut self.owner, ZERO_ACCOUNT);
        Ok((previous, ZERO_ACCOUNT))
    }
}

#[cfg(test)]
mod test {
    use super::{AccountID, Ownable, OwnableError, ZERO_ACCOUNT};

    const ALICE: AccountID = 1;
    const BOB: AccountID = 2;

    #[test]
    fn it_assigns_the_initial_owner() {
        let ownable = Ownable::new(ALICE);
        assert_eq!(ownable.owner(), ALICE);
        ownable.only_owner(ALICE).unwrap();
    }

    #[test]
    fn it_rejects_callers_that_are_not_the_owner() {
        let ownable = Ownable::new(ALICE);
        let err = ownable.only_owner(BOB).unwrap_err();
        assert_eq!(err, OwnableError::NotOwner { caller: BOB, owner: ALICE });
    }

    #[test]
    fn it_transfers_ownership() {
        let mut ownable = Ownable::new(ALICE);
        let (previous, new) = ownable.transfer_ownership(ALICE, BOB).unwrap();
        assert_eq!(previous, ALICE);
        assert_eq!(new, BOB);
        assert_eq!(ownable.owner(), BOB);

        // the old owner lost the privilege
        ownable.only_owner(ALICE).unwrap_err();
        ownable.only_owner(BOB).unwrap();
    }

    #[test]
    fn it_rejects_transfer_by_non_owner() {
        let mut ownable = Ownable::new(ALICE);
        let err = ownable.transfer_ownership(BOB, BOB).unwrap_err();
        assert_eq!(err, OwnableError::NotOwner { caller: BOB, owner: ALICE });
        assert_eq!(ownable.owner(), ALICE);
    }

    #[test]
    fn it_rejects_the_zero_account_as_new_owner() {
        let mut ownable = Ownable::new(ALICE);
        let err = ownable.transfer_ownership(ALICE, ZERO_ACCOUNT).unwrap_err();
        assert_eq!(err, OwnableError::ZeroNewOwner);
        assert_eq!(ownable.owner(), ALICE);
    }

    #[test]
    fn it_renounces_ownership_terminally() {
        let mut ownable = Ownable::new(ALICE);
        let (previous, new) = ownable.renounce_ownership(ALICE).unwrap();
        assert_eq!(previous, ALICE);
        assert_eq!(new, ZERO_ACCOUNT);
        assert_eq!(ownable.owner(), ZERO_ACCOUNT);

        // no caller can ever pass the guard again, not even the zero account
        ownable.only_owner(ALICE).unwrap_err();
        ownable.only_owner(ZERO_ACCOUNT).unwrap_err();
        ownable.transfer_ownership(ALICE, BOB).unwrap_err();
        ownable.transfer_ownership(ZERO_ACCOUNT, BOB).unwrap_err();
        ownable.renounce_ownership(ZERO_ACCOUNT).unwrap_err();
    }
}
