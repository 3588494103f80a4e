use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};

use crate::custody::TokenCustody;
use crate::engine::Engine;
use crate::errors::VaultError;
use crate::registry::{Registry, DAY_IN_LEDGERS};
use crate::types::{DataKey, Transaction, TxStatus, VaultConfig};

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contract]
pub struct TimelockVault;

#[contractimpl]
impl TimelockVault {
    pub fn initialize(
        env: Env,
        owners: Vec<Address>,
        token: Address,
        approval_window: u64,
        timelock_period: u64,
    ) -> Result<(), VaultError> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(VaultError::AlreadyInitialized);
        }

        if owners.is_empty() {
            return Err(VaultError::EmptyOwnerList);
        }

        // Check for duplicate owners
        for i in 0..owners.len() {
            for j in (i + 1)..owners.len() {
                if owners.get_unchecked(i) == owners.get_unchecked(j) {
                    return Err(VaultError::DuplicateOwner);
                }
            }
        }

        // A transaction must be able to clear its timelock inside the window
        if timelock_period > approval_window {
            return Err(VaultError::InvalidConfig);
        }

        let config = VaultConfig {
            owners,
            approval_window,
            timelock_period,
        };
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Token, &token);
        Self::extend_instance_ttl(&env);
        Ok(())
    }

    pub fn propose(
        env: Env,
        proposer: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<BytesN<32>, VaultError> {
        proposer.require_auth();
        let now = env.ledger().timestamp();
        Self::engine(&env)?.propose(&proposer, &recipient, amount, now)
    }

    /// A lazily detected expiry is reported as `TxStatus::Expired` rather than
    /// an error so the released lock is committed by the host.
    pub fn approve(env: Env, id: BytesN<32>, approver: Address) -> Result<TxStatus, VaultError> {
        approver.require_auth();
        let now = env.ledger().timestamp();
        match Self::engine(&env)?.approve(&id, &approver, now) {
            Err(VaultError::ApprovalWindowExpired) => Ok(TxStatus::Expired),
            result => result,
        }
    }

    pub fn execute(env: Env, id: BytesN<32>) -> Result<TxStatus, VaultError> {
        let now = env.ledger().timestamp();
        match Self::engine(&env)?.execute(&id, now) {
            Ok(_) => Ok(TxStatus::Executed),
            Err(VaultError::ApprovalWindowExpired) => Ok(TxStatus::Expired),
            Err(err) => Err(err),
        }
    }

    pub fn expire(env: Env, id: BytesN<32>) -> Result<(), VaultError> {
        let now = env.ledger().timestamp();
        Self::engine(&env)?.expire(&id, now)?;
        Ok(())
    }

    pub fn get_transaction(env: Env, id: BytesN<32>) -> Result<Transaction, VaultError> {
        Self::require_initialized(&env)?;
        Registry::new(&env).get(&id)
    }

    /// Ids proposed by `proposer`, oldest first, paged by `start` and `limit`.
    pub fn get_history(
        env: Env,
        proposer: Address,
        start: u32,
        limit: u32,
    ) -> Result<Vec<BytesN<32>>, VaultError> {
        Self::require_initialized(&env)?;
        Ok(Registry::new(&env).history(&proposer, start, limit))
    }

    pub fn history_len(env: Env, proposer: Address) -> Result<u32, VaultError> {
        Self::require_initialized(&env)?;
        Ok(Registry::new(&env).history_len(&proposer))
    }

    pub fn status(env: Env, id: BytesN<32>) -> Result<TxStatus, VaultError> {
        Self::engine(&env)?.status(&id)
    }

    pub fn approval_count(env: Env, id: BytesN<32>) -> Result<u32, VaultError> {
        Self::require_initialized(&env)?;
        let registry = Registry::new(&env);
        registry.get(&id)?;
        Ok(registry.approval_count(&id))
    }

    pub fn has_approved(env: Env, id: BytesN<32>, owner: Address) -> Result<bool, VaultError> {
        Self::require_initialized(&env)?;
        Ok(Registry::new(&env).has_approved(&id, &owner))
    }

    pub fn is_live(env: Env, id: BytesN<32>) -> Result<bool, VaultError> {
        Self::require_initialized(&env)?;
        Ok(Registry::new(&env).is_live(&id))
    }

    pub fn quorum(env: Env) -> Result<u32, VaultError> {
        Ok(Self::config(env)?.quorum())
    }

    pub fn available_balance(env: Env) -> Result<i128, VaultError> {
        Ok(Self::engine(&env)?.available_balance())
    }

    pub fn locked_amount(env: Env) -> Result<i128, VaultError> {
        Self::require_initialized(&env)?;
        Ok(Registry::new(&env).locked_amount())
    }

    pub fn owners(env: Env) -> Result<Vec<Address>, VaultError> {
        Ok(Self::config(env)?.owners)
    }

    pub fn is_owner(env: Env, who: Address) -> Result<bool, VaultError> {
        Ok(Self::config(env)?.is_owner(&who))
    }

    pub fn config(env: Env) -> Result<VaultConfig, VaultError> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(VaultError::NotInitialized)
    }

    pub fn token(env: Env) -> Result<Address, VaultError> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(VaultError::NotInitialized)
    }
}

impl TimelockVault {
    fn require_initialized(env: &Env) -> Result<(), VaultError> {
        if env.storage().instance().has(&DataKey::Config) {
            Ok(())
        } else {
            Err(VaultError::NotInitialized)
        }
    }

    fn engine(env: &Env) -> Result<Engine<'_, TokenCustody<'_>>, VaultError> {
        let config = Self::config(env.clone())?;
        let token = Self::token(env.clone())?;
        Self::extend_instance_ttl(env);
        Ok(Engine::new(env, TokenCustody::new(env, &token), config))
    }

    fn extend_instance_ttl(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }
}
