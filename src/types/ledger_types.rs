//! Ledger types
//!
//! This module defines the data model for the timelock ledger:
//! - Fixed-width account addresses
//! - 18-decimal fixed-point balances
//! - Per-account time locks and freeze state
//! - Ledger metadata and serializable snapshots

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of decimal places used by the fixed-point balance representation
pub const DECIMALS: u8 = 18;

/// One whole token in base units (10^18)
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Fixed-width opaque account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Build an address from its raw bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw byte view
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Parse an address from a hex string (with or without `0x` prefix)
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid address hex"))
    }
}

/// Token balance in 18-decimal fixed-point base units
///
/// `u128` because realistic supplies exceed `u64` once scaled by 10^18.
/// Arithmetic is checked; callers validate before mutating so the checked
/// paths double as invariant assertions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Balance(u128);

impl Balance {
    /// Create a new balance from base units
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// Create a balance from whole tokens (scaled by 10^18)
    pub fn from_whole(tokens: u64) -> Self {
        Self(tokens as u128 * UNIT)
    }

    /// Get the base-unit value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// True when the balance is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Balance) -> Option<Balance> {
        self.0.checked_add(other.0).map(Balance)
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Balance) -> Option<Balance> {
        self.0.checked_sub(other.0).map(Balance)
    }

    /// Saturating addition
    pub fn saturating_add(self, other: Balance) -> Balance {
        Balance(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction
    pub fn saturating_sub(self, other: Balance) -> Balance {
        Balance(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timed hold on part of a balance
///
/// Locks are append-only and immutable; they leave the list only through an
/// explicit index-addressed unlock. Expiry is evaluated lazily against the
/// supplied timestamp, never by a background sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLock {
    /// Locked amount, always > 0 at creation
    pub amount: Balance,
    /// Unix timestamp (seconds) after which the lock no longer binds balance
    pub release_time: u64,
}

impl TimeLock {
    /// Create a new time lock
    pub fn new(amount: Balance, release_time: u64) -> Self {
        Self {
            amount,
            release_time,
        }
    }

    /// A lock is active while its release time is strictly in the future
    pub fn is_active(&self, now: u64) -> bool {
        self.release_time > now
    }
}

/// Per-account ledger state
///
/// Accounts come into existence implicitly on first balance-affecting
/// reference and are never destroyed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountState {
    /// Total tokens owned, including the locked portion
    pub balance: Balance,
    /// Insertion-ordered lock list; expired entries stay until unlocked
    pub locks: Vec<TimeLock>,
    /// When set, the account can neither send nor receive transfers
    pub frozen: bool,
}

impl AccountState {
    /// Sum of lock amounts still active at `now`
    ///
    /// Expired locks contribute zero without being removed from the list.
    pub fn locked_balance(&self, now: u64) -> Balance {
        self.locks
            .iter()
            .filter(|lock| lock.is_active(now))
            .fold(Balance::default(), |acc, lock| {
                acc.saturating_add(lock.amount)
            })
    }

    /// Balance minus the currently locked portion
    pub fn available_balance(&self, now: u64) -> Balance {
        self.balance.saturating_sub(self.locked_balance(now))
    }
}

/// Ledger identity and display metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerMetadata {
    /// Name of the token
    pub name: String,
    /// Symbol for the token (e.g., "FRR")
    pub symbol: String,
    /// Number of decimal places for token precision
    pub decimals: u8,
}

impl LedgerMetadata {
    /// Create new ledger metadata with the standard 18-decimal precision
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: DECIMALS,
        }
    }

    /// Override the decimal precision
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

/// Serializable point-in-time copy of the full ledger state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Ledger metadata
    pub metadata: LedgerMetadata,
    /// Current total supply in base units
    pub total_supply: Balance,
    /// Global pause flag
    pub paused: bool,
    /// Current owner
    pub owner: Address,
    /// Current admin set, sorted
    pub admins: Vec<Address>,
    /// All known accounts, sorted by address for deterministic output
    pub accounts: Vec<(Address, AccountState)>,
    /// Ledger time at which the snapshot was taken
    pub taken_at: u64,
}
