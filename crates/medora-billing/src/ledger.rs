//! # Purchase Ledger
//!
//! The simulated app-store account: which user bought what, and until when.
//!
//! ```text
//! purchase(pkg)  ──► ledger[user] = { pkg, expires_at }
//! restore()      ──► ledger[user] unexpired? re-apply : nothing to restore
//! cancel()       ──► ledger.remove(user)
//! ```
//!
//! The ledger outlives re-initialization, which is what lets a reinstall
//! (initialize again with the same user id) get its subscription back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One user's last purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub package_id: String,
    pub expires_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// True while `now` is inside the purchased window.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Purchases keyed by user id.
#[derive(Debug, Default)]
pub struct PurchaseLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        PurchaseLedger::default()
    }

    /// Records (or replaces) a user's purchase.
    pub fn record(&mut self, user_id: &str, entry: LedgerEntry) {
        self.entries.insert(user_id.to_string(), entry);
    }

    /// Returns the user's purchase if it has not expired.
    ///
    /// An expired entry is dropped on lookup.
    pub fn current(&mut self, user_id: &str, now: DateTime<Utc>) -> Option<LedgerEntry> {
        match self.entries.get(user_id) {
            Some(entry) if entry.is_current(now) => Some(entry.clone()),
            Some(_) => {
                self.entries.remove(user_id);
                None
            }
            None => None,
        }
    }

    /// Forgets the user's purchase, returning it if there was one.
    pub fn remove(&mut self, user_id: &str) -> Option<LedgerEntry> {
        self.entries.remove(user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
