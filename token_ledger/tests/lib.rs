use num_traits::Zero;
use ownable::{AccountID, ZERO_ACCOUNT};
use token_ledger::token::events::TokenEvent;
use token_ledger::token::types::TokenAmount;
use token_ledger::token::{ErrorKind, Token};

const CREATOR: AccountID = 1;
const ALICE: AccountID = 2;
const BOB: AccountID = 3;

fn deployed_token() -> Token {
    Token::new(CREATOR, &TokenAmount::from(5_000_000)).unwrap()
}

#[test]
fn initial_supply() {
    let token = deployed_token();

    assert_eq!(token.total_supply(), TokenAmount::from(5_000_000));
    assert_eq!(token.balance_of(CREATOR), TokenAmount::from(5_000_000));
    token.check_invariants().unwrap();
}

#[test]
fn minting() {
    let mut token = deployed_token();

    assert_eq!(token.balance_of(ALICE), TokenAmount::zero());

    token.mint(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();
    assert_eq!(token.balance_of(ALICE), TokenAmount::from(100));
    assert_eq!(token.total_supply(), TokenAmount::from(5_000_100));

    // minting to the zero account is rejected outright
    let err = token.mint(CREATOR, ZERO_ACCOUNT, &TokenAmount::from(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(token.total_supply(), TokenAmount::from(5_000_100));
    token.check_invariants().unwrap();
}

#[test]
fn burning() {
    let mut token = deployed_token();
    token.mint(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();

    // burning more than the account owns fails and changes nothing
    let err = token.burn(CREATOR, ALICE, &TokenAmount::from(150)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    assert_eq!(token.balance_of(ALICE), TokenAmount::from(100));

    // burning "from" the zero account trips the same balance check
    let err = token.burn(CREATOR, ZERO_ACCOUNT, &TokenAmount::from(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);

    token.burn(CREATOR, ALICE, &TokenAmount::from(50)).unwrap();
    assert_eq!(token.balance_of(ALICE), TokenAmount::from(50));
    assert_eq!(token.total_supply(), TokenAmount::from(5_000_050));
    token.check_invariants().unwrap();
}

#[test]
fn transferring_tokens() {
    let mut token = deployed_token();

    token.transfer(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();
    assert_eq!(token.balance_of(ALICE), TokenAmount::from(100));
    assert_eq!(token.balance_of(CREATOR), TokenAmount::from(4_999_900));

    token.transfer(ALICE, BOB, &TokenAmount::from(20)).unwrap();
    assert_eq!(token.balance_of(ALICE), TokenAmount::from(80));
    assert_eq!(token.balance_of(BOB), TokenAmount::from(20));

    // a transfer beyond the sender's balance is rejected whatever the target
    let err = token
        .transfer(ALICE, ZERO_ACCOUNT, &TokenAmount::from(2_000_000_000_000_u64))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);
    let err = token.transfer(ALICE, BOB, &TokenAmount::from(81)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientBalance);

    // the supply never moves on transfers
    assert_eq!(token.total_supply(), TokenAmount::from(5_000_000));
    token.check_invariants().unwrap();
}

#[test]
fn allowing_an_account_some_allowance() {
    let mut token = deployed_token();

    // approving the zero account is rejected
    let err = token.approve(CREATOR, ZERO_ACCOUNT, &TokenAmount::from(100)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    token.approve(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();
    assert_eq!(token.allowance(CREATOR, ALICE), TokenAmount::from(100));
    token.check_invariants().unwrap();
}

#[test]
fn transferring_with_an_allowance() {
    let mut token = deployed_token();
    token.approve(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();

    // spending beyond the approved amount fails before any balance moves
    let err = token.transfer_from(ALICE, CREATOR, BOB, &TokenAmount::from(200)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientAllowance);
    assert_eq!(token.allowance(CREATOR, ALICE), TokenAmount::from(100));
    assert_eq!(token.balance_of(BOB), TokenAmount::zero());

    token.transfer_from(ALICE, CREATOR, BOB, &TokenAmount::from(50)).unwrap();
    assert_eq!(token.allowance(CREATOR, ALICE), TokenAmount::from(50));
    assert_eq!(token.balance_of(BOB), TokenAmount::from(50));
    assert_eq!(token.balance_of(CREATOR), TokenAmount::from(4_999_950));
    token.check_invariants().unwrap();
}

#[test]
fn transfer_ownership() {
    let mut token = deployed_token();
    assert_eq!(token.owner(), CREATOR);

    token.transfer_ownership(CREATOR, ALICE).unwrap();
    assert_eq!(token.owner(), ALICE);
}

#[test]
fn renounce_ownership() {
    let mut token = deployed_token();
    token.transfer_ownership(CREATOR, ALICE).unwrap();

    token.renounce_ownership(ALICE).unwrap();
    assert_eq!(token.owner(), ZERO_ACCOUNT);

    // minting is gone for good, for every caller
    for caller in [CREATOR, ALICE, BOB, ZERO_ACCOUNT] {
        let err = token.mint(caller, BOB, &TokenAmount::from(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}

#[test]
fn the_journal_replays_a_session() {
    let mut token = deployed_token();
    token.mint(CREATOR, ALICE, &TokenAmount::from(100)).unwrap();
    token.transfer(ALICE, BOB, &TokenAmount::from(40)).unwrap();
    token.approve(BOB, ALICE, &TokenAmount::from(10)).unwrap();
    token.transfer_ownership(CREATOR, ALICE).unwrap();

    let expected = vec![
        TokenEvent::OwnershipTransferred { previous_owner: ZERO_ACCOUNT, new_owner: CREATOR },
        TokenEvent::Transfer { from: ZERO_ACCOUNT, to: CREATOR, amount: TokenAmount::from(5_000_000) },
        TokenEvent::Transfer { from: ZERO_ACCOUNT, to: ALICE, amount: TokenAmount::from(100) },
        TokenEvent::Transfer { from: ALICE, to: BOB, amount: TokenAmount::from(40) },
        TokenEvent::Approval { owner: BOB, operator: ALICE, amount: TokenAmount::from(10) },
        TokenEvent::OwnershipTransferred { previous_owner: CREATOR, new_owner: ALICE },
    ];
    assert_eq!(token.events(), expected.as_slice());

    // the journal is a serializable, replayable record
    let encoded = serde_json::to_string(token.events()).unwrap();
    let replayed: Vec<TokenEvent> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(replayed, expected);
}
