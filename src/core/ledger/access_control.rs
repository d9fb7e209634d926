//! Access control for privileged ledger operations
//!
//! A flat role table: one owner plus a set of admins. Every privileged
//! operation gates on a capability check against these two sets; there is
//! no hierarchy beyond owner-only versus owner-or-admin.

use crate::types::error::{LedgerError, Result};
use crate::types::ledger_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role table holding the singleton owner and the admin set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleTable {
    owner: Address,
    admins: HashSet<Address>,
}

impl RoleTable {
    /// Create a role table with the given owner and no admins
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            admins: HashSet::new(),
        }
    }

    /// Current owner
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `account` currently holds the admin role
    pub fn is_admin(&self, account: &Address) -> bool {
        self.admins.contains(account)
    }

    /// Whether `account` may perform owner-or-admin operations
    pub fn is_privileged(&self, account: &Address) -> bool {
        *account == self.owner || self.is_admin(account)
    }

    /// Admin set, sorted for deterministic iteration
    pub fn admins_sorted(&self) -> Vec<Address> {
        let mut admins: Vec<Address> = self.admins.iter().copied().collect();
        admins.sort();
        admins
    }

    /// Gate for owner-or-admin operations
    pub fn require_privileged(&self, caller: &Address) -> Result<()> {
        if self.is_privileged(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(*caller))
        }
    }

    /// Gate for owner-only operations
    pub fn require_owner(&self, caller: &Address) -> Result<()> {
        if *caller == self.owner {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(*caller))
        }
    }

    /// Grant the admin role. Granting twice is a no-op.
    pub fn add_admin(&mut self, account: Address) {
        self.admins.insert(account);
    }

    /// Revoke the admin role. Revoking a non-admin is a no-op.
    pub fn remove_admin(&mut self, account: &Address) {
        self.admins.remove(account);
    }

    /// Hand ownership to an explicit successor
    ///
    /// The previous owner keeps no implicit privilege; if it was also an
    /// admin it stays one, otherwise it becomes an ordinary account.
    pub fn transfer_ownership(&mut self, new_owner: Address) {
        self.owner = new_owner;
    }

    /// Caller drops its own admin role
    pub fn renounce_admin(&mut self, caller: &Address) -> Result<()> {
        if !self.admins.remove(caller) {
            return Err(LedgerError::Unauthorized(*caller));
        }
        Ok(())
    }
}
