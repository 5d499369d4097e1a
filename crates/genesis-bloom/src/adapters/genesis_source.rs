//! Genesis Document Key Source
//!
//! Extracts every public key that can appear in a genesis file:
//!
//! | Section                       | Field                         |
//! |-------------------------------|-------------------------------|
//! | `initial_accounts`            | `owner_key`, `active_key`     |
//! | `initial_assets`              | `collateral_records[].owner`  |
//! | `initial_balances`            | `owner`                       |
//! | `initial_vesting_balances`    | `owner`                       |
//! | `initial_witness_candidates`  | `block_signing_key`           |
//!
//! Every other field of the document is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::KeySet;
use crate::error::LoadError;
use crate::ports::KeySource;

/// The subset of a genesis document that carries keys
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenesisDocument {
    pub initial_accounts: Vec<GenesisAccount>,
    pub initial_assets: Vec<GenesisAsset>,
    pub initial_balances: Vec<GenesisOwned>,
    pub initial_vesting_balances: Vec<GenesisOwned>,
    pub initial_witness_candidates: Vec<GenesisWitness>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenesisAccount {
    pub owner_key: String,
    pub active_key: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenesisAsset {
    #[serde(default)]
    pub collateral_records: Vec<GenesisOwned>,
}

/// Any record whose key lives in an `owner` field
#[derive(Clone, Debug, Deserialize)]
pub struct GenesisOwned {
    pub owner: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GenesisWitness {
    pub block_signing_key: String,
}

impl GenesisDocument {
    /// Collect the distinct keys of every category
    pub fn keys(&self) -> KeySet {
        let mut keys = KeySet::new();

        for account in &self.initial_accounts {
            keys.insert(account.owner_key.as_str());
            keys.insert(account.active_key.as_str());
        }

        keys.extend(
            self.initial_assets
                .iter()
                .flat_map(|asset| &asset.collateral_records)
                .map(|cr| cr.owner.as_str()),
        );
        keys.extend(self.initial_balances.iter().map(|b| b.owner.as_str()));
        keys.extend(self.initial_vesting_balances.iter().map(|vb| vb.owner.as_str()));
        keys.extend(
            self.initial_witness_candidates
                .iter()
                .map(|w| w.block_signing_key.as_str()),
        );

        keys
    }
}

/// Reads a genesis JSON document from any reader
pub struct GenesisKeySource<R> {
    reader: R,
}

impl<R: Read> GenesisKeySource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl GenesisKeySource<BufReader<File>> {
    /// Open a genesis file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file = File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened genesis file");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> KeySource for GenesisKeySource<R> {
    fn load_keys(&mut self) -> Result<KeySet, LoadError> {
        let document: GenesisDocument = serde_json::from_reader(&mut self.reader)?;
        debug!(
            accounts = document.initial_accounts.len(),
            assets = document.initial_assets.len(),
            balances = document.initial_balances.len(),
            vesting_balances = document.initial_vesting_balances.len(),
            witnesses = document.initial_witness_candidates.len(),
            "Parsed genesis document"
        );
        Ok(document.keys())
    }
}
