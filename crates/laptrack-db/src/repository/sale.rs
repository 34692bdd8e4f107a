//! # Sale Repository
//!
//! Append-only sale records and the atomic sale commit.
//!
//! ## Sale Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commit_sale(Settlement { record, removed_unit_ids: [u1, u2] })         │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  DELETE FROM laptops_stock WHERE id = u1   → 1 row                      │
//! │  DELETE FROM laptops_stock WHERE id = u2   → 0 rows (already sold!)     │
//! │       │                                                                 │
//! │       ├── removed < requested → ROLLBACK, DbError::Consistency          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO laptops_sold (...)                                         │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  Readers see both changes or neither                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two operators selling the same unit concurrently cannot both succeed:
//! the second transaction deletes fewer rows than it asked for and rolls
//! back.

use laptrack_core::{Condition, LaptopSpec, Money, SaleRecord, Settlement};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::{from_millis, to_millis, to_u32};
use crate::error::{DbError, DbResult};

const SELECT_SALE: &str = r#"
    SELECT
        sale_id, brand, model, processor, ram_gb, storage, graphics_card,
        condition, buying_cost_per_unit_cents, final_selling_price_per_unit_cents,
        quantity_sold, total_profit_cents, date_sold_ms, date_added_original_ms,
        image_url
    FROM laptops_sold
"#;

#[derive(sqlx::FromRow)]
struct SaleRow {
    sale_id: String,
    brand: String,
    model: String,
    processor: String,
    ram_gb: i64,
    storage: String,
    graphics_card: Option<String>,
    condition: Condition,
    buying_cost_per_unit_cents: i64,
    final_selling_price_per_unit_cents: i64,
    quantity_sold: i64,
    total_profit_cents: i64,
    date_sold_ms: i64,
    date_added_original_ms: i64,
    image_url: Option<String>,
}

impl TryFrom<SaleRow> for SaleRecord {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        Ok(SaleRecord {
            sale_id: row.sale_id,
            spec: LaptopSpec {
                brand: row.brand,
                model: row.model,
                processor: row.processor,
                ram_gb: to_u32("ram_gb", row.ram_gb)?,
                storage: row.storage,
                graphics_card: row.graphics_card,
                condition: row.condition,
            },
            buying_cost_per_unit: Money::from_cents(row.buying_cost_per_unit_cents),
            final_selling_price_per_unit: Money::from_cents(row.final_selling_price_per_unit_cents),
            quantity_sold: to_u32("quantity_sold", row.quantity_sold)?,
            total_profit: Money::from_cents(row.total_profit_cents),
            date_sold: from_millis("date_sold_ms", row.date_sold_ms)?,
            date_added_original: from_millis("date_added_original_ms", row.date_added_original_ms)?,
            image_url: row.image_url,
        })
    }
}

/// Repository for sale records.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// All sale records, most recent first.
    pub async fn list(&self) -> DbResult<Vec<SaleRecord>> {
        let sql = format!("{} ORDER BY date_sold_ms DESC, rowid DESC", SELECT_SALE);
        let rows: Vec<SaleRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed sales");
        rows.into_iter().map(SaleRecord::try_from).collect()
    }

    pub async fn get_by_id(&self, sale_id: &str) -> DbResult<Option<SaleRecord>> {
        let sql = format!("{} WHERE sale_id = ?1", SELECT_SALE);
        let row: Option<SaleRow> = sqlx::query_as(&sql)
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SaleRecord::try_from).transpose()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM laptops_sold")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Retires the settled units and appends the sale record atomically.
    ///
    /// ## Errors
    /// - `DbError::Consistency` if fewer units were removed than the sale
    ///   needs. Nothing is written in that case.
    /// - Any other `DbError` if the store fails; the transaction is rolled
    ///   back when it is dropped uncommitted.
    pub async fn commit_sale(&self, settlement: &Settlement) -> DbResult<SaleRecord> {
        let record = &settlement.record;
        let requested = settlement.removed_unit_ids.len();

        if requested != record.quantity_sold as usize {
            warn!(
                sale_id = %record.sale_id,
                quantity = record.quantity_sold,
                ids = requested,
                "Sale quantity does not match unit list"
            );
            return Err(DbError::Consistency {
                requested: record.quantity_sold as usize,
                removed: 0,
            });
        }

        let mut tx = self.pool.begin().await?;

        let mut removed: u64 = 0;
        for id in &settlement.removed_unit_ids {
            removed += sqlx::query("DELETE FROM laptops_stock WHERE id = ?1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        if removed != requested as u64 {
            warn!(
                sale_id = %record.sale_id,
                requested,
                removed,
                "Units missing from stock, rolling back sale"
            );
            tx.rollback().await?;
            return Err(DbError::Consistency {
                requested,
                removed: usize::try_from(removed).unwrap_or(usize::MAX),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO laptops_sold (
                sale_id, brand, model, processor, ram_gb, storage, graphics_card,
                condition, buying_cost_per_unit_cents, final_selling_price_per_unit_cents,
                quantity_sold, total_profit_cents, date_sold_ms, date_added_original_ms,
                image_url
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15
            )
            "#,
        )
        .bind(&record.sale_id)
        .bind(&record.spec.brand)
        .bind(&record.spec.model)
        .bind(&record.spec.processor)
        .bind(i64::from(record.spec.ram_gb))
        .bind(&record.spec.storage)
        .bind(&record.spec.graphics_card)
        .bind(record.spec.condition)
        .bind(record.buying_cost_per_unit.cents())
        .bind(record.final_selling_price_per_unit.cents())
        .bind(i64::from(record.quantity_sold))
        .bind(record.total_profit.cents())
        .bind(to_millis(record.date_sold))
        .bind(to_millis(record.date_added_original))
        .bind(&record.image_url)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %record.sale_id,
            quantity = record.quantity_sold,
            profit_cents = record.total_profit.cents(),
            "Sale committed"
        );

        let mut stored = record.clone();
        stored.date_sold = from_millis("date_sold_ms", to_millis(record.date_sold))?;
        stored.date_added_original =
            from_millis("date_added_original_ms", to_millis(record.date_added_original))?;
        Ok(stored)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::test_support::{at, batch, memory_db};
    use crate::error::DbError;
    use laptrack_core::{group_units, settle, Money};

    #[tokio::test]
    async fn test_commit_sale_removes_oldest_and_records_profit() {
        let db = memory_db().await;
        let stored = db.stock().add_units(&batch("Dell", 2, at(0))).await.unwrap();

        let groups = group_units(&db.stock().list().await.unwrap());
        let settlement =
            settle(&groups[0], 1, Money::from_major_minor(35_000, 0), at(60)).unwrap();
        let record = db.sales().commit_sale(&settlement).await.unwrap();

        assert_eq!(record.total_profit, Money::from_major_minor(5_000, 0));
        assert_eq!(record.date_added_original, stored[0].date_added);

        let left = db.stock().list().await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, stored[1].id);

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales, vec![record]);
    }

    #[tokio::test]
    async fn test_second_commit_of_same_units_rolls_back() {
        let db = memory_db().await;
        db.stock().add_units(&batch("HP", 2, at(0))).await.unwrap();
        let groups = group_units(&db.stock().list().await.unwrap());

        let first = settle(&groups[0], 1, Money::from_cents(100), at(1)).unwrap();
        let second = settle(&groups[0], 1, Money::from_cents(100), at(2)).unwrap();

        db.sales().commit_sale(&first).await.unwrap();
        let err = db.sales().commit_sale(&second).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Consistency {
                requested: 1,
                removed: 0
            }
        ));
        assert_eq!(db.sales().count().await.unwrap(), 1);
        assert_eq!(db.stock().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_removal_leaves_no_trace() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Asus", 3, at(0))).await.unwrap();
        let groups = group_units(&db.stock().list().await.unwrap());

        // Sell the oldest unit on its own first, then try a stale 2-unit sale.
        let single = settle(&groups[0], 1, Money::from_cents(100), at(1)).unwrap();
        let stale = settle(&groups[0], 2, Money::from_cents(100), at(2)).unwrap();
        db.sales().commit_sale(&single).await.unwrap();

        let err = db.sales().commit_sale(&stale).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Consistency {
                requested: 2,
                removed: 1
            }
        ));

        // The unit the stale sale did manage to delete is back.
        assert_eq!(db.stock().count().await.unwrap(), 2);
        assert!(db
            .stock()
            .get_by_id(&stale.removed_unit_ids[1])
            .await
            .unwrap()
            .is_some());
        assert!(db
            .sales()
            .get_by_id(&stale.record.sale_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_mismatched_settlement_rejected_before_writing() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Acer", 2, at(0))).await.unwrap();
        let groups = group_units(&db.stock().list().await.unwrap());

        let mut settlement = settle(&groups[0], 2, Money::from_cents(100), at(1)).unwrap();
        settlement.removed_unit_ids.pop();

        assert!(matches!(
            db.sales().commit_sale(&settlement).await,
            Err(DbError::Consistency { .. })
        ));
        assert_eq!(db.stock().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Dell", 3, at(0))).await.unwrap();

        for (i, when) in [at(10), at(30), at(20)].into_iter().enumerate() {
            let groups = group_units(&db.stock().list().await.unwrap());
            let s = settle(&groups[0], 1, Money::from_cents(100 + i as i64), when).unwrap();
            db.sales().commit_sale(&s).await.unwrap();
        }

        let dates: Vec<_> = db
            .sales()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.date_sold)
            .collect();
        assert_eq!(dates, vec![at(30), at(20), at(10)]);
    }

    #[tokio::test]
    async fn test_snapshot_after_sale() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Dell", 2, at(0))).await.unwrap();
        let mut snap = db.load_snapshot().await.unwrap();

        let s = settle(&snap.groups()[0], 2, Money::from_major_minor(29_000, 0), at(5)).unwrap();
        db.sales().commit_sale(&s).await.unwrap();
        snap.apply_sale(&s);

        let fresh = db.load_snapshot().await.unwrap();
        assert_eq!(snap.stock(), fresh.stock());
        assert_eq!(fresh.dashboard().total_profit, Money::from_major_minor(-2_000, 0));
        assert!(fresh.groups().is_empty());
    }
}
