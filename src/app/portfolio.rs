use std::path::Path;

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    db::{init, store},
    engine,
    models::{
        Asset, AssetCategory, AssetGroup, PortfolioStats, TimelinePoint, Transaction,
        TransactionType,
    },
    snapshot::{self, Snapshot},
};

const CURRENCY_SETTING: &str = "currency";
const DEFAULT_CURRENCY: &str = "USD";

/// Identity and opening figures for a new asset. The opening figures are
/// turned into synthesized transactions, never stored directly.
#[derive(Clone, Debug)]
pub struct NewAsset {
    pub ticker: String,
    pub name: String,
    pub category: AssetCategory,
    pub color: String,
    pub icon: Option<String>,
    pub total_invested: Decimal,
    pub current_value: Decimal,
}

/// In-memory portfolio state backed by the SQLite store. Every mutation of
/// an asset's transaction set re-replays that asset's full log before the
/// call returns, so derived fields are never stale.
pub struct Portfolio {
    connection: Pool<Sqlite>,
    currency: String,
    assets: Vec<Asset>,
    groups: Vec<AssetGroup>,
    transactions: Vec<Transaction>,
}

impl Portfolio {
    pub async fn load(connection: Pool<Sqlite>) -> Result<Self> {
        init::create_all(&connection)
            .await
            .with_context(|| "Failed to initialize database schema")?;

        let groups = store::load_groups(&connection).await?;
        let assets = store::load_assets(&connection).await?;
        let transactions = store::load_transactions(&connection).await?;
        let currency = store::get_setting(CURRENCY_SETTING, &connection)
            .await?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let mut portfolio = Self {
            connection,
            currency,
            assets,
            groups,
            transactions,
        };

        // The store only holds identity fields; derived state always comes
        // from replaying the transaction log.
        let asset_ids: Vec<String> = portfolio.assets.iter().map(|a| a.id().clone()).collect();
        for asset_id in asset_ids {
            portfolio.sync_asset(&asset_id);
        }

        Ok(portfolio)
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn groups(&self) -> &[AssetGroup] {
        &self.groups
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id() == asset_id)
    }

    /// All transactions in reverse chronological order, as shown on the
    /// activity screen.
    pub fn recent_transactions(&self) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self.transactions.iter().collect();
        transactions.sort_by(|a, b| b.date().cmp(a.date()));
        transactions
    }

    /// The asset's transactions in reverse chronological order, as shown on
    /// the detail screen.
    pub fn transactions_for(&self, asset_id: &str) -> Vec<&Transaction> {
        let mut transactions: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|transaction| transaction.asset_id() == asset_id)
            .collect();
        transactions.sort_by(|a, b| b.date().cmp(a.date()));
        transactions
    }

    pub fn stats(&self) -> PortfolioStats {
        engine::portfolio_stats(&self.assets)
    }

    pub fn history(&self) -> Vec<TimelinePoint> {
        engine::portfolio_history(&self.assets)
    }

    /// Creates an asset and synthesizes its opening ledger: a buy for the
    /// invested amount backdated one second, plus a price update when the
    /// stated current value differs. The backdating guarantees the buy sorts
    /// ahead of the price update.
    pub async fn add_asset(&mut self, new_asset: NewAsset) -> Result<String> {
        ensure!(
            new_asset.total_invested >= Decimal::ZERO,
            "Invested amount must be non-negative"
        );
        ensure!(
            new_asset.current_value >= Decimal::ZERO,
            "Current value must be non-negative"
        );

        let asset_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let asset = Asset::new(
            asset_id.clone(),
            new_asset.ticker.clone(),
            new_asset.name,
            new_asset.category,
            new_asset.color,
            new_asset.icon,
            None,
            self.assets.len(),
        );
        store::insert_asset(&asset, &self.connection).await?;
        self.assets.push(asset);

        let opening_buy = Transaction::new(
            Uuid::new_v4().to_string(),
            asset_id.clone(),
            new_asset.ticker.clone(),
            TransactionType::Buy,
            new_asset.total_invested,
            now - Duration::seconds(1),
        );
        store::insert_transaction(&opening_buy, &self.connection).await?;
        self.transactions.push(opening_buy);

        if new_asset.current_value != new_asset.total_invested {
            let opening_update = Transaction::new(
                Uuid::new_v4().to_string(),
                asset_id.clone(),
                new_asset.ticker,
                TransactionType::PriceUpdate,
                new_asset.current_value,
                now,
            );
            store::insert_transaction(&opening_update, &self.connection).await?;
            self.transactions.push(opening_update);
        }

        self.sync_asset(&asset_id);

        Ok(asset_id)
    }

    /// Removes an asset and cascades to its transactions. Nothing is left to
    /// replay afterwards.
    pub async fn delete_asset(&mut self, asset_id: &str) -> Result<()> {
        ensure!(
            self.asset(asset_id).is_some(),
            "Unknown asset '{}'",
            asset_id
        );

        store::delete_asset(asset_id, &self.connection).await?;
        self.assets.retain(|asset| asset.id() != asset_id);
        self.transactions
            .retain(|transaction| transaction.asset_id() != asset_id);

        Ok(())
    }

    pub async fn update_asset_details(
        &mut self,
        asset_id: &str,
        name: String,
        color: String,
        icon: Option<String>,
    ) -> Result<()> {
        let asset = self
            .assets
            .iter_mut()
            .find(|asset| asset.id() == asset_id)
            .with_context(|| format!("Unknown asset '{}'", asset_id))?;

        asset.update_details(name, color, icon);
        store::update_asset(asset, &self.connection).await?;

        Ok(())
    }

    pub async fn add_transaction(
        &mut self,
        asset_id: &str,
        kind: TransactionType,
        amount: Decimal,
        date: DateTime<Utc>,
    ) -> Result<String> {
        ensure!(amount >= Decimal::ZERO, "Amount must be non-negative");

        let ticker = self
            .asset(asset_id)
            .with_context(|| format!("Unknown asset '{}'", asset_id))?
            .ticker()
            .clone();

        let transaction = Transaction::new(
            Uuid::new_v4().to_string(),
            asset_id.to_string(),
            ticker,
            kind,
            amount,
            date,
        );
        store::insert_transaction(&transaction, &self.connection).await?;

        let transaction_id = transaction.id().clone();
        self.transactions.push(transaction);
        self.sync_asset(asset_id);

        Ok(transaction_id)
    }

    pub async fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id() == transaction_id)
            .with_context(|| format!("Unknown transaction '{}'", transaction_id))?;

        let removed = self.transactions.remove(index);
        store::delete_transaction(transaction_id, &self.connection).await?;
        self.sync_asset(removed.asset_id());

        Ok(())
    }

    pub async fn add_group(&mut self, name: String, color: String) -> Result<String> {
        let group = AssetGroup::new(Uuid::new_v4().to_string(), name, color);
        store::insert_group(&group, &self.connection).await?;

        let group_id = group.id().clone();
        self.groups.push(group);

        Ok(group_id)
    }

    pub async fn delete_group(&mut self, group_id: &str) -> Result<()> {
        ensure!(
            self.groups.iter().any(|group| group.id() == group_id),
            "Unknown group '{}'",
            group_id
        );

        store::delete_group(group_id, &self.connection).await?;
        self.groups.retain(|group| group.id() != group_id);
        for asset in &mut self.assets {
            if asset.group_id().as_deref() == Some(group_id) {
                asset.set_group_id(None);
            }
        }

        Ok(())
    }

    pub async fn move_to_group(&mut self, asset_id: &str, group_id: Option<String>) -> Result<()> {
        if let Some(group_id) = &group_id {
            ensure!(
                self.groups.iter().any(|group| group.id() == group_id),
                "Unknown group '{}'",
                group_id
            );
        }

        let asset = self
            .assets
            .iter_mut()
            .find(|asset| asset.id() == asset_id)
            .with_context(|| format!("Unknown asset '{}'", asset_id))?;

        asset.set_group_id(group_id);
        store::update_asset(asset, &self.connection).await?;

        Ok(())
    }

    /// Reassigns display order to match the given id sequence.
    pub async fn reorder_assets(&mut self, ordered_ids: &[String]) -> Result<()> {
        for (order, asset_id) in ordered_ids.iter().enumerate() {
            let asset = self
                .assets
                .iter_mut()
                .find(|asset| asset.id() == asset_id)
                .with_context(|| format!("Unknown asset '{}'", asset_id))?;
            asset.set_order(order);
            store::update_asset(asset, &self.connection).await?;
        }
        self.assets.sort_by_key(|asset| *asset.order());

        Ok(())
    }

    pub async fn set_currency(&mut self, currency: &str) -> Result<()> {
        store::set_setting(CURRENCY_SETTING, currency, &self.connection).await?;
        self.currency = currency.to_string();

        Ok(())
    }

    /// Clears every store. The expected state afterwards is a freshly reset
    /// portfolio: no assets, no groups, no transactions, empty timeline.
    pub async fn reset(&mut self) -> Result<()> {
        store::truncate_tables(&self.connection).await?;
        self.assets.clear();
        self.groups.clear();
        self.transactions.clear();

        Ok(())
    }

    pub fn export_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot::capture(&self.assets, &self.groups, &self.transactions);
        snapshot::write_snapshot(&snapshot, path)
    }

    /// Replaces the current state with the snapshot's. Derived fields in the
    /// file are ignored; every asset is re-replayed from its transactions.
    pub async fn import_snapshot(&mut self, path: &Path) -> Result<()> {
        let snapshot = snapshot::read_snapshot(path)?;
        let (assets, groups, transactions) = snapshot.into_parts();

        for transaction in &transactions {
            ensure!(
                *transaction.amount() >= Decimal::ZERO,
                "Snapshot transaction '{}' has a negative amount",
                transaction.id()
            );
        }

        store::truncate_tables(&self.connection).await?;
        for group in &groups {
            store::insert_group(group, &self.connection).await?;
        }
        for asset in &assets {
            store::insert_asset(asset, &self.connection).await?;
        }
        for transaction in &transactions {
            store::insert_transaction(transaction, &self.connection).await?;
        }

        self.assets = assets;
        self.groups = groups;
        self.transactions = transactions;

        let asset_ids: Vec<String> = self.assets.iter().map(|a| a.id().clone()).collect();
        for asset_id in asset_ids {
            self.sync_asset(&asset_id);
        }

        Ok(())
    }

    /// Regenerates the asset's derived fields from the full transaction set.
    fn sync_asset(&mut self, asset_id: &str) {
        let outcome = engine::replay(asset_id, &self.transactions);
        if let Some(asset) = self.assets.iter_mut().find(|asset| asset.id() == asset_id) {
            asset.apply_outcome(outcome);
        }
    }
}
