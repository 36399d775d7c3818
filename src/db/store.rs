use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::models::{Asset, AssetCategory, AssetGroup, Transaction, TransactionType};

pub async fn load_assets(connection: &Pool<Sqlite>) -> Result<Vec<Asset>> {
    let rows = sqlx::query("SELECT * FROM assets ORDER BY display_order")
        .fetch_all(connection)
        .await
        .with_context(|| "Failed to load assets")?;

    rows.into_iter().map(parse_asset).collect()
}

pub async fn load_groups(connection: &Pool<Sqlite>) -> Result<Vec<AssetGroup>> {
    let rows = sqlx::query("SELECT * FROM asset_groups ORDER BY created_at")
        .fetch_all(connection)
        .await
        .with_context(|| "Failed to load asset groups")?;

    rows.into_iter().map(parse_group).collect()
}

pub async fn load_transactions(connection: &Pool<Sqlite>) -> Result<Vec<Transaction>> {
    let rows = sqlx::query("SELECT * FROM transactions ORDER BY transaction_date")
        .fetch_all(connection)
        .await
        .with_context(|| "Failed to load transactions")?;

    rows.into_iter().map(parse_transaction).collect()
}

pub async fn insert_asset(asset: &Asset, connection: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assets
        (id, ticker, asset_name, category, color, icon, group_id, display_order)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(asset.id())
    .bind(asset.ticker())
    .bind(asset.name())
    .bind(asset.category().to_str())
    .bind(asset.color())
    .bind(asset.icon())
    .bind(asset.group_id())
    .bind(*asset.order() as i64)
    .execute(connection)
    .await
    .with_context(|| format!("Failed to insert asset '{}'", asset.ticker()))?;

    Ok(())
}

pub async fn update_asset(asset: &Asset, connection: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE assets
        SET asset_name = ?, color = ?, icon = ?, group_id = ?, display_order = ?
        WHERE id = ?
        "#,
    )
    .bind(asset.name())
    .bind(asset.color())
    .bind(asset.icon())
    .bind(asset.group_id())
    .bind(*asset.order() as i64)
    .bind(asset.id())
    .execute(connection)
    .await
    .with_context(|| format!("Failed to update asset '{}'", asset.id()))?;

    Ok(())
}

/// Removes an asset together with every transaction that references it.
pub async fn delete_asset(asset_id: &str, connection: &Pool<Sqlite>) -> Result<()> {
    let mut tx = connection.begin().await?;

    sqlx::query("DELETE FROM transactions WHERE asset_id = ?")
        .bind(asset_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(asset_id)
        .execute(&mut *tx)
        .await?;

    tx.commit()
        .await
        .with_context(|| format!("Failed to delete asset '{}'", asset_id))?;

    Ok(())
}

pub async fn insert_group(group: &AssetGroup, connection: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO asset_groups (id, group_name, color)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(group.id())
    .bind(group.name())
    .bind(group.color())
    .execute(connection)
    .await
    .with_context(|| format!("Failed to insert group '{}'", group.name()))?;

    Ok(())
}

/// Removes a group and detaches any assets still pointing at it.
pub async fn delete_group(group_id: &str, connection: &Pool<Sqlite>) -> Result<()> {
    let mut tx = connection.begin().await?;

    sqlx::query("UPDATE assets SET group_id = NULL WHERE group_id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM asset_groups WHERE id = ?")
        .bind(group_id)
        .execute(&mut *tx)
        .await?;

    tx.commit()
        .await
        .with_context(|| format!("Failed to delete group '{}'", group_id))?;

    Ok(())
}

pub async fn insert_transaction(
    transaction: &Transaction,
    connection: &Pool<Sqlite>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions
        (id, asset_id, ticker, transaction_type, amount, transaction_date)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(transaction.id())
    .bind(transaction.asset_id())
    .bind(transaction.ticker())
    .bind(transaction.kind().to_str())
    .bind(transaction.amount().round_dp(4).to_f64())
    .bind(transaction.date().to_rfc3339())
    .execute(connection)
    .await
    .with_context(|| format!("Failed to insert transaction '{}'", transaction.id()))?;

    Ok(())
}

pub async fn delete_transaction(transaction_id: &str, connection: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(transaction_id)
        .execute(connection)
        .await
        .with_context(|| format!("Failed to delete transaction '{}'", transaction_id))?;

    Ok(())
}

pub async fn truncate_tables(connection: &Pool<Sqlite>) -> Result<()> {
    let mut tx = connection.begin().await?;

    sqlx::query("DELETE FROM transactions")
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM assets").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM asset_groups")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

pub async fn get_setting(key: &str, connection: &Pool<Sqlite>) -> Result<Option<String>> {
    let row = sqlx::query("SELECT setting_value FROM settings WHERE setting_key = ?")
        .bind(key)
        .fetch_optional(connection)
        .await
        .with_context(|| format!("Failed to read setting '{}'", key))?;

    row.map(|row| parse_string_from_row(&row, "setting_value"))
        .transpose()
}

pub async fn set_setting(key: &str, value: &str, connection: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (setting_key, setting_value)
        VALUES (?, ?)
        ON CONFLICT (setting_key) DO UPDATE SET setting_value = excluded.setting_value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(connection)
    .await
    .with_context(|| format!("Failed to write setting '{}'", key))?;

    Ok(())
}

pub fn parse_string_from_row(row: &SqliteRow, column: &str) -> Result<String> {
    row.try_get::<String, _>(column)
        .with_context(|| format!("Failed to parse String from column '{}'", column))
}

pub fn parse_opt_string_from_row(row: &SqliteRow, column: &str) -> Result<Option<String>> {
    row.try_get::<Option<String>, _>(column)
        .with_context(|| format!("Failed to parse Option<String> from column '{}'", column))
}

pub fn parse_i64_from_row(row: &SqliteRow, column: &str) -> Result<i64> {
    row.try_get::<i64, _>(column)
        .with_context(|| format!("Failed to parse i64 from column '{}'", column))
}

pub fn parse_decimal_from_row(row: &SqliteRow, column: &str) -> Result<Decimal> {
    let value: f64 = row
        .try_get(column)
        .with_context(|| format!("Failed to parse f64 from column '{}'", column))?;
    Decimal::from_f64(value)
        .with_context(|| format!("Failed to convert f64 to Decimal for column '{}'", column))
}

pub fn parse_datetime_from_row(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let text = parse_string_from_row(row, column)?;
    let parsed = DateTime::parse_from_rfc3339(&text)
        .with_context(|| format!("Failed to parse datetime '{}' from column '{}'", text, column))?;
    Ok(parsed.with_timezone(&Utc))
}

pub fn parse_transaction_type_from_row(row: &SqliteRow, column: &str) -> Result<TransactionType> {
    let type_str = parse_string_from_row(row, column)?;
    TransactionType::parse_str(&type_str)
        .with_context(|| format!("Failed to parse TransactionType from column '{}'", column))
}

pub fn parse_category_from_row(row: &SqliteRow, column: &str) -> Result<AssetCategory> {
    let category_str = parse_string_from_row(row, column)?;
    AssetCategory::parse_str(&category_str)
        .with_context(|| format!("Failed to parse AssetCategory from column '{}'", column))
}

/// Builds an asset from its stored identity fields. The derived fields start
/// zeroed; the caller replays the transaction log to fill them in.
pub fn parse_asset(row: SqliteRow) -> Result<Asset> {
    let id = parse_string_from_row(&row, "id")?;
    let ticker = parse_string_from_row(&row, "ticker")?;
    let name = parse_string_from_row(&row, "asset_name")?;
    let category = parse_category_from_row(&row, "category")?;
    let color = parse_string_from_row(&row, "color")?;
    let icon = parse_opt_string_from_row(&row, "icon")?;
    let group_id = parse_opt_string_from_row(&row, "group_id")?;
    let order = parse_i64_from_row(&row, "display_order")? as usize;

    Ok(Asset::new(
        id, ticker, name, category, color, icon, group_id, order,
    ))
}

pub fn parse_group(row: SqliteRow) -> Result<AssetGroup> {
    let id = parse_string_from_row(&row, "id")?;
    let name = parse_string_from_row(&row, "group_name")?;
    let color = parse_string_from_row(&row, "color")?;

    Ok(AssetGroup::new(id, name, color))
}

pub fn parse_transaction(row: SqliteRow) -> Result<Transaction> {
    let id = parse_string_from_row(&row, "id")?;
    let asset_id = parse_string_from_row(&row, "asset_id")?;
    let ticker = parse_string_from_row(&row, "ticker")?;
    let kind = parse_transaction_type_from_row(&row, "transaction_type")?;
    let amount = parse_decimal_from_row(&row, "amount")?;
    let date = parse_datetime_from_row(&row, "transaction_date")?;

    Ok(Transaction::new(id, asset_id, ticker, kind, amount, date))
}
