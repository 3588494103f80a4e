#![no_std]

//! Multi-owner custody vault. Outbound transfers need a majority of owners
//! and a minimum delay, and lock their amount until executed or expired.

mod custody;
mod engine;
mod errors;
mod events;
mod registry;
mod types;
mod vault;

pub use custody::{Custody, TokenCustody};
pub use engine::Engine;
pub use errors::VaultError;
pub use registry::Registry;
pub use types::{Transaction, TxStatus, VaultConfig};
pub use vault::{TimelockVault, TimelockVaultClient};
