use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use crate::models::{Asset, AssetGroup, Transaction};

pub const SNAPSHOT_VERSION: u32 = 1;

/// Portable snapshot of the whole portfolio. Asset entries carry their
/// derived fields for the benefit of other readers, but import ignores them
/// and re-replays the transaction log.
#[derive(Clone, Debug, Deserialize, Getters, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    version: u32,
    exported_at: DateTime<Utc>,
    assets: Vec<Asset>,
    groups: Vec<AssetGroup>,
    transactions: Vec<Transaction>,
}

impl Snapshot {
    pub fn capture(assets: &[Asset], groups: &[AssetGroup], transactions: &[Transaction]) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at: Utc::now(),
            assets: assets.to_vec(),
            groups: groups.to_vec(),
            transactions: transactions.to_vec(),
        }
    }

    pub fn into_parts(self) -> (Vec<Asset>, Vec<AssetGroup>, Vec<Transaction>) {
        (self.assets, self.groups, self.transactions)
    }
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .with_context(|| "Failed to serialize snapshot")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot to '{}'", path.display()))?;

    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from '{}'", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse snapshot '{}'", path.display()))?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(anyhow::anyhow!(
            "Snapshot version {} is newer than supported version {}",
            snapshot.version,
            SNAPSHOT_VERSION
        ));
    }

    Ok(snapshot)
}
