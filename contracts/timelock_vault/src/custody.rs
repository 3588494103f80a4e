use soroban_sdk::{token, Address, Env};

/// Holder of the vault's funds.
pub trait Custody {
    /// Total balance held, locked or not.
    fn held_balance(&self) -> i128;

    /// Sends `amount` to `to`. Returns `false` when the transfer is rejected.
    fn transfer(&self, to: &Address, amount: i128) -> bool;
}

/// Custody backed by a token contract balance of the current contract.
pub struct TokenCustody<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> TokenCustody<'a> {
    pub fn new(env: &'a Env, token_address: &Address) -> Self {
        Self {
            env,
            client: token::Client::new(env, token_address),
        }
    }
}

impl Custody for TokenCustody<'_> {
    fn held_balance(&self) -> i128 {
        self.client.balance(&self.env.current_contract_address())
    }

    fn transfer(&self, to: &Address, amount: i128) -> bool {
        let vault = self.env.current_contract_address();
        matches!(self.client.try_transfer(&vault, to, &amount), Ok(Ok(_)))
    }
}
