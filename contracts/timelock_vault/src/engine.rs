//! Approval and execution state machine.
//!
//! A transaction is `Pending` until it is either executed (quorum reached and
//! timelock elapsed) or expired (approval window closed first). Both end states
//! are absorbing. Expiry is lazy: it is applied by the first `approve` or
//! `execute` that observes the closed window, or by an explicit `expire`.
//! Until then the transaction keeps its funds locked.
//!
//! Every operation takes `now` explicitly so behavior depends only on the call
//! sequence and the supplied timestamps.

use soroban_sdk::{log, xdr::ToXdr, Address, Bytes, BytesN, Env};

use crate::custody::Custody;
use crate::errors::VaultError;
use crate::events;
use crate::registry::Registry;
use crate::types::{Transaction, TxStatus, VaultConfig};

pub struct Engine<'a, C: Custody> {
    env: &'a Env,
    registry: Registry<'a>,
    custody: C,
    config: VaultConfig,
}

impl<'a, C: Custody> Engine<'a, C> {
    pub fn new(env: &'a Env, custody: C, config: VaultConfig) -> Self {
        Self {
            env,
            registry: Registry::new(env),
            custody,
            config,
        }
    }

    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    pub fn quorum(&self) -> u32 {
        self.config.quorum()
    }

    pub fn available_balance(&self) -> i128 {
        self.custody.held_balance() - self.registry.locked_amount()
    }

    /// Reserves `amount` for `recipient` and records the proposer's approval.
    pub fn propose(
        &self,
        proposer: &Address,
        recipient: &Address,
        amount: i128,
        now: u64,
    ) -> Result<BytesN<32>, VaultError> {
        self.require_owner(proposer)?;
        if amount <= 0 {
            return Err(VaultError::InvalidAmount);
        }

        let nonce = self.registry.nonce();
        let id = self.transaction_id(recipient, amount, now, nonce);
        if self.registry.exists(&id) {
            return Err(VaultError::DuplicateId);
        }

        let held = self.custody.held_balance();
        let tx = self.registry.reserve(
            id.clone(),
            proposer.clone(),
            recipient.clone(),
            amount,
            now,
            held,
        )?;

        let approvals = self.registry.record_approval(&tx.id, proposer);
        events::approved(self.env, &tx.id, proposer, approvals);
        log!(self.env, "transfer proposed", tx.id, amount, now);

        Ok(id)
    }

    /// Records an approval and executes once quorum is reached and the
    /// timelock has elapsed.
    ///
    /// Fails with `ApprovalWindowExpired` after expiring the transaction when
    /// the window has closed; the expiry is kept.
    pub fn approve(
        &self,
        id: &BytesN<32>,
        approver: &Address,
        now: u64,
    ) -> Result<TxStatus, VaultError> {
        self.require_owner(approver)?;
        let tx = self.live_transaction(id)?;
        if tx.executed {
            return Err(VaultError::AlreadyExecuted);
        }
        if self.registry.has_approved(id, approver) {
            return Err(VaultError::AlreadyApproved);
        }
        if now > self.config.approval_deadline(tx.proposed_at) {
            self.expire_transaction(&tx);
            return Err(VaultError::ApprovalWindowExpired);
        }

        let approvals = self.registry.record_approval(id, approver);
        events::approved(self.env, id, approver, approvals);
        log!(self.env, "transfer approved", id.clone(), approvals);

        if approvals < self.quorum() {
            return Ok(TxStatus::Pending);
        }

        match self.execute(id, now) {
            Ok(_) => Ok(TxStatus::Executed),
            Err(VaultError::TimelockNotElapsed) => {
                log!(self.env, "quorum reached before timelock", id.clone());
                Ok(TxStatus::Pending)
            }
            Err(err) => Err(err),
        }
    }

    /// Sends the reserved funds to the recipient.
    ///
    /// The record is flipped to executed and the lock released before the
    /// transfer is attempted; a rejected transfer leaves it executed and fails
    /// with `TransferFailed`.
    pub fn execute(&self, id: &BytesN<32>, now: u64) -> Result<Transaction, VaultError> {
        let mut tx = self.live_transaction(id)?;
        if tx.executed {
            return Err(VaultError::AlreadyExecuted);
        }
        if now > self.config.approval_deadline(tx.proposed_at) {
            self.expire_transaction(&tx);
            return Err(VaultError::ApprovalWindowExpired);
        }
        if now < self.config.unlock_time(tx.proposed_at) {
            return Err(VaultError::TimelockNotElapsed);
        }
        if self.registry.approval_count(id) < self.quorum() {
            return Err(VaultError::QuorumNotMet);
        }

        self.registry.release_lock(&tx);
        self.registry.mark_executed(&mut tx);

        if !self.custody.transfer(&tx.recipient, tx.amount) {
            log!(self.env, "transfer rejected", tx.id, tx.amount);
            return Err(VaultError::TransferFailed);
        }

        events::executed(self.env, &tx);
        log!(self.env, "transfer executed", tx.id, tx.amount);
        Ok(tx)
    }

    /// Releases the lock of a transaction whose approval window has closed.
    pub fn expire(&self, id: &BytesN<32>, now: u64) -> Result<Transaction, VaultError> {
        let tx = self.live_transaction(id)?;
        if tx.executed {
            return Err(VaultError::AlreadyExecuted);
        }
        if now <= self.config.approval_deadline(tx.proposed_at) {
            return Err(VaultError::ApprovalWindowOpen);
        }

        self.expire_transaction(&tx);
        Ok(tx)
    }

    pub fn status(&self, id: &BytesN<32>) -> Result<TxStatus, VaultError> {
        let tx = self.registry.get(id)?;
        Ok(if tx.executed {
            TxStatus::Executed
        } else if self.registry.is_live(id) {
            TxStatus::Pending
        } else {
            TxStatus::Expired
        })
    }

    fn expire_transaction(&self, tx: &Transaction) {
        self.registry.release_lock(tx);
        self.registry.mark_dead(&tx.id);
        events::expired(self.env, tx);
        log!(self.env, "transfer expired", tx.id.clone(), tx.amount);
    }

    fn live_transaction(&self, id: &BytesN<32>) -> Result<Transaction, VaultError> {
        if !self.registry.is_live(id) {
            return Err(VaultError::NotFound);
        }
        self.registry.get(id)
    }

    fn require_owner(&self, who: &Address) -> Result<(), VaultError> {
        if self.config.is_owner(who) {
            Ok(())
        } else {
            Err(VaultError::NotOwner)
        }
    }

    /// sha256(recipient || amount || proposed_at || nonce)
    fn transaction_id(
        &self,
        recipient: &Address,
        amount: i128,
        now: u64,
        nonce: u64,
    ) -> BytesN<32> {
        let mut preimage = Bytes::new(self.env);
        preimage.append(&recipient.clone().to_xdr(self.env));
        preimage.extend_from_array(&amount.to_be_bytes());
        preimage.extend_from_array(&now.to_be_bytes());
        preimage.extend_from_array(&nonce.to_be_bytes());
        self.env.crypto().sha256(&preimage).to_bytes()
    }
}
