//! Canonical storage of proposed transfers, their approvals and the lock ledger.
//!
//! The registry performs no timing or quorum checks; the engine guards every
//! state flip. `locked_amount` always equals the sum of amounts of transactions
//! that are neither executed nor expired.
//!
//! Records are never removed, so every persistent write also extends the
//! entry's TTL.

use soroban_sdk::{Address, BytesN, Env, IntoVal, Val, Vec};

use crate::errors::VaultError;
use crate::events;
use crate::types::{DataKey, Transaction};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub struct Registry<'a> {
    env: &'a Env,
}

impl<'a> Registry<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    pub fn exists(&self, id: &BytesN<32>) -> bool {
        self.env
            .storage()
            .persistent()
            .has(&DataKey::Transaction(id.clone()))
    }

    pub fn is_live(&self, id: &BytesN<32>) -> bool {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Live(id.clone()))
            .unwrap_or(false)
    }

    pub fn get(&self, id: &BytesN<32>) -> Result<Transaction, VaultError> {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::Transaction(id.clone()))
            .ok_or(VaultError::NotFound)
    }

    pub fn locked_amount(&self) -> i128 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::Locked)
            .unwrap_or(0)
    }

    /// Number of transactions reserved so far.
    pub fn nonce(&self) -> u64 {
        self.env
            .storage()
            .instance()
            .get(&DataKey::Nonce)
            .unwrap_or(0)
    }

    /// Creates the record and locks `amount` against `held_balance`.
    pub fn reserve(
        &self,
        id: BytesN<32>,
        proposer: Address,
        recipient: Address,
        amount: i128,
        now: u64,
        held_balance: i128,
    ) -> Result<Transaction, VaultError> {
        let locked = self.locked_amount();
        if amount > held_balance - locked {
            return Err(VaultError::InsufficientBalance);
        }

        let tx = Transaction {
            id: id.clone(),
            proposer: proposer.clone(),
            recipient,
            amount,
            executed: false,
            proposed_at: now,
        };

        self.put(&DataKey::Transaction(id.clone()), &tx);
        self.put(&DataKey::Live(id.clone()), &true);
        self.put(&DataKey::ApprovalCount(id.clone()), &0u32);

        // one slot per entry keeps appends constant-cost
        let slot = self.history_len(&proposer);
        self.put(&DataKey::History(proposer.clone(), slot), &id);
        self.put(&DataKey::HistoryLen(proposer), &(slot + 1));

        self.set_locked(locked + amount);
        let nonce = self.nonce();
        self.env
            .storage()
            .instance()
            .set(&DataKey::Nonce, &(nonce + 1));

        events::created(self.env, &tx);
        Ok(tx)
    }

    /// Must be called exactly once per transaction, on execution or expiry.
    pub fn release_lock(&self, tx: &Transaction) {
        let locked = self.locked_amount();
        self.set_locked(locked - tx.amount);
    }

    pub fn mark_executed(&self, tx: &mut Transaction) {
        tx.executed = true;
        self.put(&DataKey::Transaction(tx.id.clone()), tx);
    }

    pub fn mark_dead(&self, id: &BytesN<32>) {
        self.put(&DataKey::Live(id.clone()), &false);
        self.extend(&DataKey::Transaction(id.clone()));
    }

    pub fn has_approved(&self, id: &BytesN<32>, owner: &Address) -> bool {
        self.env
            .storage()
            .persistent()
            .has(&DataKey::Approved(id.clone(), owner.clone()))
    }

    /// Flags `(id, owner)` and returns the new tally.
    pub fn record_approval(&self, id: &BytesN<32>, owner: &Address) -> u32 {
        self.put(&DataKey::Approved(id.clone(), owner.clone()), &true);

        let count = self.approval_count(id) + 1;
        self.put(&DataKey::ApprovalCount(id.clone()), &count);
        self.extend(&DataKey::Transaction(id.clone()));
        self.extend(&DataKey::Live(id.clone()));
        count
    }

    pub fn approval_count(&self, id: &BytesN<32>) -> u32 {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::ApprovalCount(id.clone()))
            .unwrap_or(0)
    }

    pub fn history_len(&self, proposer: &Address) -> u32 {
        self.env
            .storage()
            .persistent()
            .get(&DataKey::HistoryLen(proposer.clone()))
            .unwrap_or(0)
    }

    /// Up to `limit` ids proposed by `proposer`, oldest first, from `start`.
    pub fn history(&self, proposer: &Address, start: u32, limit: u32) -> Vec<BytesN<32>> {
        let storage = self.env.storage().persistent();
        let end = start
            .saturating_add(limit)
            .min(self.history_len(proposer));

        let mut ids = Vec::new(self.env);
        for slot in start..end {
            if let Some(id) = storage.get(&DataKey::History(proposer.clone(), slot)) {
                ids.push_back(id);
            }
        }
        ids
    }

    fn set_locked(&self, locked: i128) {
        self.env.storage().instance().set(&DataKey::Locked, &locked);
    }

    fn put<V: IntoVal<Env, Val>>(&self, key: &DataKey, value: &V) {
        self.env.storage().persistent().set(key, value);
        self.extend(key);
    }

    fn extend(&self, key: &DataKey) {
        self.env.storage().persistent().extend_ttl(
            key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }
}
