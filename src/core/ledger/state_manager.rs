//! Ledger State Manager
//!
//! Implements the time-locked, freezable, pausable fungible-token ledger as a
//! strictly sequential state machine. Every mutating operation validates all
//! of its preconditions first and only then touches state, under a single
//! write lock, so a rejected call leaves the ledger byte-for-byte unchanged
//! and no caller ever observes a partially applied effect.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::core::ledger::access_control::RoleTable;
use crate::types::error::{LedgerError, Result};
use crate::types::ledger_types::{
    AccountState, Address, Balance, LedgerMetadata, LedgerSnapshot, TimeLock,
};
use crate::utils::time::TimeSource;

/// Full mutable ledger state, guarded as one unit
#[derive(Debug)]
struct LedgerState {
    /// All accounts ever referenced by a balance-affecting operation
    accounts: HashMap<Address, AccountState>,
    /// Sum of all account balances; shrinks only via burn
    total_supply: Balance,
    /// Global circuit breaker for transfers
    paused: bool,
    /// Owner and admin roles
    roles: RoleTable,
    /// Token identity metadata
    metadata: LedgerMetadata,
}

/// LedgerStateManager serializes every mutating call through one exclusive
/// write path; reads take a shared lock and see a consistent version.
pub struct LedgerStateManager {
    state: RwLock<LedgerState>,
    time_source: Arc<dyn TimeSource>,
}

impl LedgerStateManager {
    /// Create a ledger with the entire initial supply credited to `owner`.
    ///
    /// There is no issuance path after construction; supply only shrinks,
    /// via `burn`.
    pub fn new(
        metadata: LedgerMetadata,
        owner: Address,
        initial_supply: Balance,
        time_source: Arc<dyn TimeSource>,
    ) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(
            owner,
            AccountState {
                balance: initial_supply,
                ..Default::default()
            },
        );

        Self {
            state: RwLock::new(LedgerState {
                accounts,
                total_supply: initial_supply,
                paused: false,
                roles: RoleTable::new(owner),
                metadata,
            }),
            time_source,
        }
    }

    /// Current ledger time from the injected source
    pub fn current_time(&self) -> u64 {
        self.time_source.now()
    }

    // ------------------------------------------------------------------------
    //                           Balance and transfer
    // ------------------------------------------------------------------------

    /// Move `amount` from `from` to `to`.
    ///
    /// Gates, in order: global pause, freeze on either side, then available
    /// balance recomputed against the current time so expired locks no
    /// longer bind even if not yet removed.
    pub fn transfer(&self, from: Address, to: Address, amount: Balance) -> Result<()> {
        let now = self.current_time();
        let mut state = self.state.write();

        if state.paused {
            warn!(%from, %to, "transfer rejected: ledger paused");
            return Err(LedgerError::Paused);
        }
        if state.accounts.get(&from).is_some_and(|a| a.frozen) {
            return Err(LedgerError::FrozenAccount(from));
        }
        if state.accounts.get(&to).is_some_and(|a| a.frozen) {
            return Err(LedgerError::FrozenAccount(to));
        }

        let available = state
            .accounts
            .get(&from)
            .map(|a| a.available_balance(now))
            .unwrap_or_default();
        if amount > available {
            return Err(LedgerError::InsufficientAvailableBalance {
                requested: amount.value(),
                available: available.value(),
            });
        }

        // All gates passed; both legs commit together.
        let sender = state.accounts.entry(from).or_default();
        sender.balance = sender.balance.saturating_sub(amount);
        let recipient = state.accounts.entry(to).or_default();
        recipient.balance = recipient.balance.saturating_add(amount);

        debug!(%from, %to, %amount, "transfer committed");
        Ok(())
    }

    /// Burn `amount` from the caller's own balance.
    ///
    /// Like transfer, burn may only consume the unlocked portion. Pause and
    /// freeze do not gate burning.
    pub fn burn(&self, caller: Address, amount: Balance) -> Result<()> {
        let now = self.current_time();
        let mut state = self.state.write();

        let available = state
            .accounts
            .get(&caller)
            .map(|a| a.available_balance(now))
            .unwrap_or_default();
        if amount > available {
            return Err(LedgerError::InsufficientAvailableBalance {
                requested: amount.value(),
                available: available.value(),
            });
        }

        let account = state.accounts.entry(caller).or_default();
        account.balance = account.balance.saturating_sub(amount);
        state.total_supply = state.total_supply.saturating_sub(amount);

        debug!(%caller, %amount, "burn committed");
        Ok(())
    }

    // ------------------------------------------------------------------------
    //                                Locking
    // ------------------------------------------------------------------------

    /// Append a time lock to `account` (owner or admin only).
    ///
    /// The amount is checked against the balance still available after all
    /// currently active locks, so sequential locks cannot overcommit.
    pub fn lock(
        &self,
        caller: Address,
        account: Address,
        amount: Balance,
        release_time: u64,
    ) -> Result<()> {
        let now = self.current_time();
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;

        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount(
                "lock amount must be greater than zero".to_string(),
            ));
        }
        let available = state
            .accounts
            .get(&account)
            .map(|a| a.available_balance(now))
            .unwrap_or_default();
        if amount > available {
            return Err(LedgerError::InvalidAmount(format!(
                "lock amount {} exceeds available balance {}",
                amount, available
            )));
        }
        if release_time <= now {
            return Err(LedgerError::InvalidTime { release_time, now });
        }

        state
            .accounts
            .entry(account)
            .or_default()
            .locks
            .push(TimeLock::new(amount, release_time));

        debug!(%account, %amount, release_time, "lock appended");
        Ok(())
    }

    /// Remove the lock at `index` from `account` (owner or admin only).
    ///
    /// Removal is unconditional: an admin may release a still-active lock
    /// early. Later entries shift down, so repeated `unlock(account, 0)`
    /// drains the list front to back.
    pub fn unlock(&self, caller: Address, account: Address, index: usize) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;

        let len = state
            .accounts
            .get(&account)
            .map(|a| a.locks.len())
            .unwrap_or(0);
        if index >= len {
            return Err(LedgerError::IndexOutOfRange { index, len });
        }

        // index < len, so the account exists and the removal cannot panic
        if let Some(acct) = state.accounts.get_mut(&account) {
            let removed = acct.locks.remove(index);
            debug!(%account, index, amount = %removed.amount, "lock removed");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    //                      Freeze / pause circuit breakers
    // ------------------------------------------------------------------------

    /// Freeze `account`: transfers to or from it fail until unfrozen.
    /// Burn, lock and unlock stay available. Idempotent.
    pub fn freeze_account(&self, caller: Address, account: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;
        state.accounts.entry(account).or_default().frozen = true;
        debug!(%account, "account frozen");
        Ok(())
    }

    /// Clear the freeze flag on `account`. Idempotent.
    pub fn unfreeze_account(&self, caller: Address, account: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;
        state.accounts.entry(account).or_default().frozen = false;
        debug!(%account, "account unfrozen");
        Ok(())
    }

    /// Set the global pause flag: all transfers fail while set. Idempotent.
    pub fn pause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;
        state.paused = true;
        debug!("ledger paused");
        Ok(())
    }

    /// Clear the global pause flag. Idempotent.
    pub fn unpause(&self, caller: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_privileged(&caller)?;
        state.paused = false;
        debug!("ledger unpaused");
        Ok(())
    }

    // ------------------------------------------------------------------------
    //                             Role management
    // ------------------------------------------------------------------------

    /// Grant the admin role to `account` (owner only)
    pub fn add_admin(&self, caller: Address, account: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_owner(&caller)?;
        state.roles.add_admin(account);
        debug!(%account, "admin added");
        Ok(())
    }

    /// Revoke the admin role from `account` (owner only; no-op for non-admins)
    pub fn remove_admin(&self, caller: Address, account: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_owner(&caller)?;
        state.roles.remove_admin(&account);
        debug!(%account, "admin removed");
        Ok(())
    }

    /// Hand ownership to an explicit successor (owner only).
    ///
    /// There is no owner renunciation without a successor.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.require_owner(&caller)?;
        state.roles.transfer_ownership(new_owner);
        debug!(%new_owner, "ownership transferred");
        Ok(())
    }

    /// Caller drops its own admin role
    pub fn renounce_admin(&self, caller: Address) -> Result<()> {
        let mut state = self.state.write();
        state.roles.renounce_admin(&caller)?;
        debug!(%caller, "admin renounced");
        Ok(())
    }

    // ------------------------------------------------------------------------
    //                                  Reads
    // ------------------------------------------------------------------------

    /// Total balance of `account`, including any locked portion
    pub fn balance_of(&self, account: Address) -> Balance {
        let state = self.state.read();
        state
            .accounts
            .get(&account)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    /// Sum of lock amounts still active at the current time
    pub fn locked_balance(&self, account: Address) -> Balance {
        let now = self.current_time();
        let state = self.state.read();
        state
            .accounts
            .get(&account)
            .map(|a| a.locked_balance(now))
            .unwrap_or_default()
    }

    /// Balance minus the currently locked portion
    pub fn available_balance(&self, account: Address) -> Balance {
        let now = self.current_time();
        let state = self.state.read();
        state
            .accounts
            .get(&account)
            .map(|a| a.available_balance(now))
            .unwrap_or_default()
    }

    /// Number of lock records, counting expired entries not yet unlocked
    pub fn time_lock_length(&self, account: Address) -> usize {
        let state = self.state.read();
        state
            .accounts
            .get(&account)
            .map(|a| a.locks.len())
            .unwrap_or(0)
    }

    /// Lock record at `index` in creation order
    pub fn time_lock_at(&self, account: Address, index: usize) -> Result<TimeLock> {
        let state = self.state.read();
        let locks = state.accounts.get(&account).map(|a| a.locks.as_slice());
        locks
            .and_then(|locks| locks.get(index))
            .copied()
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: locks.map(|l| l.len()).unwrap_or(0),
            })
    }

    /// Current total supply
    pub fn total_supply(&self) -> Balance {
        self.state.read().total_supply
    }

    /// Whether `account` is frozen
    pub fn is_frozen(&self, account: Address) -> bool {
        let state = self.state.read();
        state.accounts.get(&account).is_some_and(|a| a.frozen)
    }

    /// Whether the global pause flag is set
    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.state.read().roles.owner()
    }

    /// Whether `account` holds the admin role
    pub fn is_admin(&self, account: Address) -> bool {
        self.state.read().roles.is_admin(&account)
    }

    /// Ledger identity metadata
    pub fn metadata(&self) -> LedgerMetadata {
        self.state.read().metadata.clone()
    }

    /// Point-in-time copy of the full state, accounts sorted by address
    pub fn snapshot(&self) -> LedgerSnapshot {
        let now = self.current_time();
        let state = self.state.read();
        let mut accounts: Vec<(Address, AccountState)> = state
            .accounts
            .iter()
            .map(|(addr, acct)| (*addr, acct.clone()))
            .collect();
        accounts.sort_by_key(|(addr, _)| *addr);

        LedgerSnapshot {
            metadata: state.metadata.clone(),
            total_supply: state.total_supply,
            paused: state.paused,
            owner: state.roles.owner(),
            admins: state.roles.admins_sorted(),
            accounts,
            taken_at: now,
        }
    }

    /// Snapshot serialized as pretty JSON
    pub fn snapshot_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}
