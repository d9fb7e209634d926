// End-to-End Ledger Integration Test
//
// This suite drives the ledger through the full exercised surface:
//
// 1. Burn gated by an active lock, released by explicit unlock
// 2. Lock list drain semantics (shift-on-remove, index-addressed)
// 3. Freeze as a per-account, transfer-only circuit breaker
// 4. Pause as the global transfer circuit breaker
// 5. Auto-expiry of locks without explicit unlock
// 6. Admin/owner role lifecycle
//
// Time is driven by a manual clock so expiry behavior is deterministic.

use std::sync::Arc;

use timelock_ledger::{
    Address, Balance, LedgerError, LedgerMetadata, LedgerStateManager, ManualTimeSource,
};

const GENESIS_TIME: u64 = 1_700_000_000;

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

fn whole(tokens: u64) -> Balance {
    Balance::from_whole(tokens)
}

/// Fresh ledger with 100 tokens credited to account 0 (the owner)
fn deploy() -> (LedgerStateManager, Arc<ManualTimeSource>) {
    let clock = Arc::new(ManualTimeSource::new(GENESIS_TIME));
    let ledger = LedgerStateManager::new(
        LedgerMetadata::new("Ferrum", "FRR"),
        addr(0),
        whole(100),
        clock.clone(),
    );
    (ledger, clock)
}

#[test]
fn burn_respects_active_locks_until_unlocked() {
    let (ledger, _) = deploy();
    let owner = addr(0);

    ledger.burn(owner, whole(5)).unwrap();
    assert_eq!(ledger.total_supply(), whole(95));
    assert_eq!(ledger.balance_of(owner), whole(95));

    // Lock 94 of the remaining 95 far in the future; only 1 stays spendable.
    ledger
        .lock(owner, owner, whole(94), GENESIS_TIME + 1_000_000)
        .unwrap();
    assert_eq!(ledger.available_balance(owner), whole(1));

    // Burning 1 fits, burning past the available portion does not.
    let err = ledger.burn(owner, whole(2)).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientAvailableBalance { .. }
    ));

    ledger.unlock(owner, owner, 0).unwrap();
    ledger.burn(owner, whole(1)).unwrap();
    assert_eq!(ledger.total_supply(), whole(94));
}

#[test]
fn unlock_shifts_indices_and_drains_front_to_back() {
    let (ledger, _) = deploy();
    let owner = addr(0);
    let later = GENESIS_TIME + 1_000;

    // Single lock in and out.
    ledger.lock(owner, owner, whole(10), later).unwrap();
    ledger.unlock(owner, owner, 0).unwrap();
    assert_eq!(ledger.time_lock_length(owner), 0);

    // Two locks, removed tail-first then head.
    ledger.lock(owner, owner, whole(20), later).unwrap();
    ledger.lock(owner, owner, whole(30), later + 1).unwrap();
    assert_eq!(ledger.locked_balance(owner), whole(50));
    ledger.unlock(owner, owner, 1).unwrap();
    ledger.unlock(owner, owner, 0).unwrap();
    assert_eq!(ledger.locked_balance(owner), whole(0));

    // Two locks drained by repeated index 0: removal shifts the tail down.
    ledger.lock(owner, owner, whole(20), later).unwrap();
    ledger.lock(owner, owner, whole(30), later + 1).unwrap();
    ledger.unlock(owner, owner, 0).unwrap();
    assert_eq!(ledger.time_lock_length(owner), 1);
    let remaining = ledger.time_lock_at(owner, 0).unwrap();
    assert_eq!(remaining.amount, whole(30));
    ledger.unlock(owner, owner, 0).unwrap();
    assert_eq!(ledger.time_lock_length(owner), 0);

    // Draining past the end is an error, not a silent success.
    assert_eq!(
        ledger.unlock(owner, owner, 0),
        Err(LedgerError::IndexOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn freeze_blocks_transfers_in_both_directions_only() {
    let (ledger, _) = deploy();
    let (owner, other) = (addr(0), addr(1));

    ledger.transfer(owner, other, whole(1)).unwrap();

    ledger.freeze_account(owner, owner).unwrap();
    assert!(ledger.is_frozen(owner));
    assert!(matches!(
        ledger.transfer(owner, other, whole(1)),
        Err(LedgerError::FrozenAccount(_))
    ));
    // Receiving is blocked too.
    assert!(matches!(
        ledger.transfer(other, owner, whole(1)),
        Err(LedgerError::FrozenAccount(_))
    ));

    // Burn and lock are not gated by freeze.
    ledger.burn(owner, whole(1)).unwrap();
    ledger
        .lock(owner, owner, whole(5), GENESIS_TIME + 100)
        .unwrap();
    ledger.unlock(owner, owner, 0).unwrap();

    ledger.unfreeze_account(owner, owner).unwrap();
    ledger.transfer(owner, other, whole(1)).unwrap();
    assert_eq!(ledger.balance_of(other), whole(2));
}

#[test]
fn pause_blocks_all_transfers_and_nothing_else() {
    let (ledger, _) = deploy();
    let (owner, other) = (addr(0), addr(1));

    ledger.transfer(owner, other, whole(10)).unwrap();
    ledger.pause(owner).unwrap();
    assert!(ledger.is_paused());

    assert_eq!(
        ledger.transfer(owner, other, whole(1)),
        Err(LedgerError::Paused)
    );
    assert_eq!(
        ledger.transfer(other, owner, whole(1)),
        Err(LedgerError::Paused)
    );

    // Burn, lock and unlock proceed while paused.
    ledger.burn(other, whole(1)).unwrap();
    ledger
        .lock(owner, other, whole(2), GENESIS_TIME + 100)
        .unwrap();
    ledger.unlock(owner, other, 0).unwrap();

    ledger.unpause(owner).unwrap();
    ledger.transfer(owner, other, whole(1)).unwrap();
    assert_eq!(ledger.balance_of(other), whole(10));
}

#[test]
fn locks_expire_by_time_without_explicit_unlock() {
    let (ledger, clock) = deploy();
    let (owner, other) = (addr(0), addr(1));
    let delay = 3;

    ledger.transfer(owner, other, whole(1)).unwrap();
    let available = ledger.available_balance(owner);
    assert_eq!(available, whole(99));

    // Lock everything that is available for a few seconds.
    ledger
        .lock(owner, owner, available, GENESIS_TIME + delay)
        .unwrap();
    assert_eq!(ledger.available_balance(owner), whole(0));
    assert_eq!(ledger.time_lock_length(owner), 1);

    // While the lock is active, even a small transfer is over-committed.
    assert!(matches!(
        ledger.transfer(owner, other, whole(2)),
        Err(LedgerError::InsufficientAvailableBalance { .. })
    ));

    // Past the release time the balance frees itself, but the stale lock
    // record stays in the list until someone unlocks it.
    clock.advance(delay + 1);
    assert_eq!(ledger.available_balance(owner), whole(99));
    assert_eq!(ledger.time_lock_length(owner), 1);

    ledger.transfer(owner, other, whole(3)).unwrap();
    assert_eq!(ledger.balance_of(other), whole(4));
    assert_eq!(ledger.time_lock_length(owner), 1);
}

#[test]
fn expired_locks_do_not_count_against_new_locks() {
    let (ledger, clock) = deploy();
    let owner = addr(0);

    ledger
        .lock(owner, owner, whole(60), GENESIS_TIME + 10)
        .unwrap();
    // A second lock of 60 would overcommit while the first is active.
    assert!(matches!(
        ledger.lock(owner, owner, whole(60), GENESIS_TIME + 100),
        Err(LedgerError::InvalidAmount(_))
    ));

    clock.advance(11);
    // The first lock expired, so the full balance is available again even
    // though its record is still present.
    assert_eq!(ledger.time_lock_length(owner), 1);
    ledger
        .lock(owner, owner, whole(60), GENESIS_TIME + 100)
        .unwrap();
    assert_eq!(ledger.time_lock_length(owner), 2);
}

#[test]
fn admin_and_owner_role_lifecycle() {
    let (ledger, _) = deploy();
    let (owner, admin, outsider) = (addr(0), addr(1), addr(2));
    let later = GENESIS_TIME + 100;

    // Unprivileged callers are rejected at every gate.
    for result in [
        ledger.lock(outsider, owner, whole(1), later),
        ledger.unlock(outsider, owner, 0),
        ledger.freeze_account(outsider, owner),
        ledger.pause(outsider),
        ledger.add_admin(outsider, outsider),
        ledger.transfer_ownership(outsider, outsider),
    ] {
        assert_eq!(result, Err(LedgerError::Unauthorized(outsider)));
    }

    // Admins may run the circuit breakers and lock management...
    ledger.add_admin(owner, admin).unwrap();
    assert!(ledger.is_admin(admin));
    ledger.lock(admin, owner, whole(1), later).unwrap();
    ledger.unlock(admin, owner, 0).unwrap();
    ledger.pause(admin).unwrap();
    ledger.unpause(admin).unwrap();
    ledger.freeze_account(admin, outsider).unwrap();
    ledger.unfreeze_account(admin, outsider).unwrap();

    // ...but role management stays owner-only.
    assert_eq!(
        ledger.add_admin(admin, outsider),
        Err(LedgerError::Unauthorized(admin))
    );
    assert_eq!(
        ledger.remove_admin(admin, admin),
        Err(LedgerError::Unauthorized(admin))
    );

    // An admin may drop its own role; doing it twice fails.
    ledger.renounce_admin(admin).unwrap();
    assert!(!ledger.is_admin(admin));
    assert_eq!(
        ledger.renounce_admin(admin),
        Err(LedgerError::Unauthorized(admin))
    );

    // Ownership hands over completely.
    ledger.transfer_ownership(owner, admin).unwrap();
    assert_eq!(ledger.owner(), admin);
    assert_eq!(
        ledger.pause(owner),
        Err(LedgerError::Unauthorized(owner))
    );
    ledger.pause(admin).unwrap();
}

#[test]
fn snapshot_reflects_state_and_serializes() {
    let (ledger, _) = deploy();
    let (owner, other) = (addr(0), addr(1));

    ledger.transfer(owner, other, whole(25)).unwrap();
    ledger.add_admin(owner, other).unwrap();
    ledger
        .lock(owner, other, whole(5), GENESIS_TIME + 50)
        .unwrap();

    let snapshot = ledger.snapshot();
    assert_eq!(snapshot.total_supply, whole(100));
    assert_eq!(snapshot.owner, owner);
    assert_eq!(snapshot.admins, vec![other]);
    assert_eq!(snapshot.taken_at, GENESIS_TIME);
    assert_eq!(snapshot.accounts.len(), 2);

    let json = ledger.snapshot_json().unwrap();
    assert!(json.contains(&other.to_string()));
    assert!(json.contains("\"symbol\": \"FRR\""));
}
