//! Contract events for indexers. Topics are `(name, id)`.

use soroban_sdk::{contractevent, Address, BytesN, Env};

use crate::types::Transaction;

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Created {
    #[topic]
    pub id: BytesN<32>,
    pub proposer: Address,
    pub recipient: Address,
    pub amount: i128,
    pub proposed_at: u64,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Approved {
    #[topic]
    pub id: BytesN<32>,
    pub approver: Address,
    pub approvals: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Executed {
    #[topic]
    pub id: BytesN<32>,
    pub recipient: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expired {
    #[topic]
    pub id: BytesN<32>,
    pub amount: i128,
}

pub fn created(env: &Env, tx: &Transaction) {
    Created {
        id: tx.id.clone(),
        proposer: tx.proposer.clone(),
        recipient: tx.recipient.clone(),
        amount: tx.amount,
        proposed_at: tx.proposed_at,
    }
    .publish(env);
}

pub fn approved(env: &Env, id: &BytesN<32>, approver: &Address, approvals: u32) {
    Approved {
        id: id.clone(),
        approver: approver.clone(),
        approvals,
    }
    .publish(env);
}

pub fn executed(env: &Env, tx: &Transaction) {
    Executed {
        id: tx.id.clone(),
        recipient: tx.recipient.clone(),
        amount: tx.amount,
    }
    .publish(env);
}

pub fn expired(env: &Env, tx: &Transaction) {
    Expired {
        id: tx.id.clone(),
        amount: tx.amount,
    }
    .publish(env);
}
