use soroban_sdk::{contracttype, Address, BytesN, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    Token,
    Nonce,
    Locked,
    Transaction(BytesN<32>),
    Live(BytesN<32>),
    ApprovalCount(BytesN<32>),
    Approved(BytesN<32>, Address),
    History(Address, u32),
    HistoryLen(Address),
}

/// Parameters fixed at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    pub owners: Vec<Address>,
    /// Seconds after `proposed_at` during which approvals are accepted.
    pub approval_window: u64,
    /// Seconds after `proposed_at` before a transfer may execute.
    pub timelock_period: u64,
}

impl VaultConfig {
    /// Strict majority of the owner set.
    pub fn quorum(&self) -> u32 {
        self.owners.len() / 2 + 1
    }

    pub fn is_owner(&self, who: &Address) -> bool {
        self.owners.iter().any(|owner| &owner == who)
    }

    pub fn approval_deadline(&self, proposed_at: u64) -> u64 {
        proposed_at.saturating_add(self.approval_window)
    }

    pub fn unlock_time(&self, proposed_at: u64) -> u64 {
        proposed_at.saturating_add(self.timelock_period)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub id: BytesN<32>,
    pub proposer: Address,
    pub recipient: Address,
    pub amount: i128,
    pub executed: bool,
    pub proposed_at: u64,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxStatus {
    Pending,
    Executed,
    Expired,
}
