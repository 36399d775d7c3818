#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
    use tempfile::TempDir;

    use crate::app::{NewAsset, Portfolio};
    use crate::models::{AssetCategory, TransactionType};

    async fn test_pool() -> (TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let options = SqliteConnectOptions::new()
            .filename(dir.path().join("test.db"))
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.unwrap();
        (dir, pool)
    }

    fn new_asset(ticker: &str, invested: Decimal, current_value: Decimal) -> NewAsset {
        NewAsset {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            category: AssetCategory::Stock,
            color: "#10b981".to_string(),
            icon: None,
            total_invested: invested,
            current_value,
        }
    }

    #[tokio::test]
    async fn creating_an_asset_synthesizes_its_opening_ledger() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();

        let transactions = portfolio.transactions_for(&asset_id);
        assert_eq!(transactions.len(), 2);
        // Reverse chronological: the price update follows the backdated buy.
        assert_eq!(*transactions[0].kind(), TransactionType::PriceUpdate);
        assert_eq!(*transactions[0].amount(), dec!(1000));
        assert_eq!(*transactions[1].kind(), TransactionType::Buy);
        assert_eq!(*transactions[1].amount(), dec!(900));

        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(1000));
        assert_eq!(*asset.total_invested(), dec!(900));
        assert_eq!(asset.price_history().len(), 2);
    }

    #[tokio::test]
    async fn equal_opening_figures_skip_the_price_update() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("VWCE", dec!(500), dec!(500)))
            .await
            .unwrap();

        assert_eq!(portfolio.transactions_for(&asset_id).len(), 1);
        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(500));
        assert_eq!(*asset.total_invested(), dec!(500));
    }

    #[tokio::test]
    async fn adding_and_deleting_a_transaction_recomputes_the_asset() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(500), dec!(500)))
            .await
            .unwrap();

        let dividend_id = portfolio
            .add_transaction(&asset_id, TransactionType::Dividend, dec!(10), Utc::now())
            .await
            .unwrap();

        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(510));
        assert_eq!(*asset.total_invested(), dec!(500));
        assert_eq!(asset.price_history().len(), 2);

        portfolio.delete_transaction(&dividend_id).await.unwrap();

        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(500));
        assert_eq!(asset.price_history().len(), 1);
    }

    #[tokio::test]
    async fn negative_amounts_are_rejected_at_the_boundary() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(500), dec!(500)))
            .await
            .unwrap();

        let result = portfolio
            .add_transaction(&asset_id, TransactionType::Buy, dec!(-5), Utc::now())
            .await;

        assert!(result.is_err());
        assert_eq!(portfolio.transactions_for(&asset_id).len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_asset_cascades_to_its_transactions() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool.clone()).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();
        portfolio.delete_asset(&asset_id).await.unwrap();

        assert!(portfolio.assets().is_empty());
        assert!(portfolio.transactions().is_empty());

        // The cascade is persisted, not just in memory.
        let reloaded = Portfolio::load(pool).await.unwrap();
        assert!(reloaded.assets().is_empty());
        assert!(reloaded.transactions().is_empty());
    }

    #[tokio::test]
    async fn reload_rebuilds_derived_fields_from_the_log() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool.clone()).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();
        portfolio
            .add_transaction(&asset_id, TransactionType::Dividend, dec!(25), Utc::now())
            .await
            .unwrap();
        drop(portfolio);

        let reloaded = Portfolio::load(pool).await.unwrap();
        let asset = reloaded.asset(&asset_id).unwrap();

        assert_eq!(*asset.current_value(), dec!(1025));
        assert_eq!(*asset.total_invested(), dec!(900));
        assert_eq!(asset.price_history().len(), 3);
    }

    #[tokio::test]
    async fn groups_attach_and_detach_assets() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(100), dec!(100)))
            .await
            .unwrap();
        let group_id = portfolio
            .add_group("Tech".to_string(), "#3b82f6".to_string())
            .await
            .unwrap();

        portfolio
            .move_to_group(&asset_id, Some(group_id.clone()))
            .await
            .unwrap();
        assert_eq!(
            portfolio.asset(&asset_id).unwrap().group_id().as_deref(),
            Some(group_id.as_str())
        );

        portfolio.delete_group(&group_id).await.unwrap();
        assert!(portfolio.groups().is_empty());
        assert!(portfolio.asset(&asset_id).unwrap().group_id().is_none());
    }

    #[tokio::test]
    async fn reordering_assigns_positions_in_sequence() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let first = portfolio
            .add_asset(new_asset("AAPL", dec!(100), dec!(100)))
            .await
            .unwrap();
        let second = portfolio
            .add_asset(new_asset("BTC", dec!(200), dec!(200)))
            .await
            .unwrap();

        portfolio
            .reorder_assets(&[second.clone(), first.clone()])
            .await
            .unwrap();

        assert_eq!(portfolio.assets()[0].id(), &second);
        assert_eq!(portfolio.assets()[1].id(), &first);
        assert_eq!(*portfolio.assets()[0].order(), 0);
        assert_eq!(*portfolio.assets()[1].order(), 1);
    }

    #[tokio::test]
    async fn group_and_reorder_leave_derived_fields_untouched() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();
        let before = portfolio.asset(&asset_id).unwrap().price_history().clone();

        let group_id = portfolio
            .add_group("Tech".to_string(), "#3b82f6".to_string())
            .await
            .unwrap();
        portfolio
            .move_to_group(&asset_id, Some(group_id))
            .await
            .unwrap();
        portfolio.reorder_assets(&[asset_id.clone()]).await.unwrap();

        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(1000));
        assert_eq!(asset.price_history(), &before);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let (_dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool.clone()).await.unwrap();

        portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();
        portfolio
            .add_group("Tech".to_string(), "#3b82f6".to_string())
            .await
            .unwrap();

        portfolio.reset().await.unwrap();

        assert!(portfolio.assets().is_empty());
        assert!(portfolio.groups().is_empty());
        assert!(portfolio.transactions().is_empty());
        assert!(portfolio.history().is_empty());
        assert_eq!(*portfolio.stats().total_value(), Decimal::ZERO);

        let reloaded = Portfolio::load(pool).await.unwrap();
        assert!(reloaded.assets().is_empty());
    }

    #[tokio::test]
    async fn snapshot_round_trip_restores_the_portfolio() {
        let (dir, pool) = test_pool().await;
        let mut portfolio = Portfolio::load(pool).await.unwrap();

        let asset_id = portfolio
            .add_asset(new_asset("AAPL", dec!(900), dec!(1000)))
            .await
            .unwrap();
        portfolio
            .add_transaction(&asset_id, TransactionType::Dividend, dec!(25), Utc::now())
            .await
            .unwrap();

        let path = dir.path().join("snapshot.json");
        portfolio.export_snapshot(&path).unwrap();
        portfolio.reset().await.unwrap();
        portfolio.import_snapshot(&path).await.unwrap();

        let asset = portfolio.asset(&asset_id).unwrap();
        assert_eq!(*asset.current_value(), dec!(1025));
        assert_eq!(*asset.total_invested(), dec!(900));
        assert_eq!(asset.price_history().len(), 3);
    }
}
