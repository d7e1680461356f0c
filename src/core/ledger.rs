//! Ledger business logic - Manual and generated income/expense entries.
//!
//! This module provides functions for creating, retrieving, updating, and deleting ledger
//! entries. Amounts are stored as non-negative values; the entry kind carries the direction.
//! Updates touch exactly one row, which is what gives generated entries their isolated-edit
//! behaviour: nothing here ever reads or writes the originating blueprint.

use super::period::Period;
use crate::{
    entities::{EntryCategory, EntryKind, LedgerEntry, ledger_entry},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Fields of a manually entered ledger entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Income or expense
    pub kind: EntryKind,
    /// Ledger category
    pub category: EntryCategory,
    /// Human-readable description
    pub description: String,
    /// Positive amount
    pub amount: f64,
    /// Booking date
    pub entry_date: NaiveDate,
    /// Optional notes
    pub notes: Option<String>,
}

/// Partial update of one ledger entry. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryChanges {
    /// New description
    pub description: Option<String>,
    /// New amount; also marks a variable placeholder as filled in
    pub amount: Option<f64>,
    /// New booking date
    pub entry_date: Option<NaiveDate>,
    /// New notes; `Some(None)` clears them
    pub notes: Option<Option<String>>,
}

impl EntryChanges {
    /// Whether the update would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.entry_date.is_none()
            && self.notes.is_none()
    }
}

/// Rejects non-finite and negative amounts.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Creates a manual ledger entry after validating description and amount.
#[instrument(skip(db, entry), fields(kind = %entry.kind, amount = entry.amount))]
pub async fn create_entry<C>(db: &C, entry: NewEntry) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    if validate_amount(entry.amount)? == 0.0 {
        return Err(Error::InvalidAmount {
            amount: entry.amount,
        });
    }

    let description = entry.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::invalid_input("description", "must not be empty"));
    }

    let now = Utc::now();
    let model = ledger_entry::ActiveModel {
        kind: Set(entry.kind),
        category: Set(entry.category),
        description: Set(description),
        amount: Set(entry.amount),
        amount_pending: Set(false),
        entry_date: Set(entry.entry_date),
        notes: Set(entry.notes),
        blueprint_id: Set(None),
        recurrence_period: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = model.insert(db).await?;
    debug!("Created ledger entry {}", created.id);
    Ok(created)
}

/// Retrieves a specific entry by its ID, `None` if it doesn't exist.
pub async fn get_entry_by_id<C>(db: &C, entry_id: i64) -> Result<Option<ledger_entry::Model>>
where
    C: ConnectionTrait,
{
    LedgerEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All entries booked inside `period`, oldest first.
pub async fn get_entries_for_period<C>(db: &C, period: Period) -> Result<Vec<ledger_entry::Model>>
where
    C: ConnectionTrait,
{
    LedgerEntry::find()
        .filter(ledger_entry::Column::EntryDate.between(period.first_day(), period.last_day()))
        .order_by_asc(ledger_entry::Column::EntryDate)
        .order_by_asc(ledger_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All entries booked during `year`, oldest first.
pub async fn get_entries_for_year<C>(db: &C, year: i32) -> Result<Vec<ledger_entry::Model>>
where
    C: ConnectionTrait,
{
    let start = Period::new(year, 1)?.first_day();
    let end = Period::new(year, 12)?.last_day();
    LedgerEntry::find()
        .filter(ledger_entry::Column::EntryDate.between(start, end))
        .order_by_asc(ledger_entry::Column::EntryDate)
        .order_by_asc(ledger_entry::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies `changes` to exactly one entry and returns the updated row.
#[instrument(skip(db, changes))]
pub async fn update_entry<C>(
    db: &C,
    entry_id: i64,
    changes: EntryChanges,
) -> Result<ledger_entry::Model>
where
    C: ConnectionTrait,
{
    let entry = get_entry_by_id(db, entry_id)
        .await?
        .ok_or(Error::EntryNotFound { id: entry_id })?;

    if changes.is_empty() {
        return Ok(entry);
    }

    let mut active: ledger_entry::ActiveModel = entry.into();

    if let Some(description) = changes.description {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::invalid_input("description", "must not be empty"));
        }
        active.description = Set(description);
    }
    if let Some(amount) = changes.amount {
        active.amount = Set(validate_amount(amount)?);
        active.amount_pending = Set(false);
    }
    if let Some(entry_date) = changes.entry_date {
        active.entry_date = Set(entry_date);
    }
    if let Some(notes) = changes.notes {
        active.notes = Set(notes);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Deletes one entry. Deleting a generated entry does not touch its blueprint.
pub async fn delete_entry<C>(db: &C, entry_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = LedgerEntry::delete_by_id(entry_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::EntryNotFound { id: entry_id });
    }
    Ok(())
}

/// Signed total of a set of entries (income positive, expense negative).
/// Pending placeholders count as zero.
#[must_use]
pub fn net_total(entries: &[ledger_entry::Model]) -> f64 {
    entries
        .iter()
        .filter(|e| !e.amount_pending)
        .map(|e| match e.kind {
            EntryKind::Income => e.amount,
            EntryKind::Expense => -e.amount,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_entry_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut entry = sample_entry(EntryKind::Expense, 10.0, date(2025, 3, 1));
            entry.amount = amount;
            let result = create_entry(&db, entry).await;
            assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        }

        let mut entry = sample_entry(EntryKind::Expense, 10.0, date(2025, 3, 1));
        entry.description = "   ".to_string();
        let result = create_entry(&db, entry).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_entries_for_period_filters_by_month() -> Result<()> {
        let db = setup_test_db().await?;
        create_entry(&db, sample_entry(EntryKind::Income, 100.0, date(2025, 3, 1))).await?;
        create_entry(&db, sample_entry(EntryKind::Income, 50.0, date(2025, 3, 31))).await?;
        create_entry(&db, sample_entry(EntryKind::Income, 75.0, date(2025, 4, 1))).await?;

        let march = get_entries_for_period(&db, Period::new(2025, 3)?).await?;
        assert_eq!(march.len(), 2);
        assert_eq!(march[0].amount, 100.0);
        assert_eq!(march[1].amount, 50.0);

        let year = get_entries_for_year(&db, 2025).await?;
        assert_eq!(year.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_entry_changes_only_given_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let mut entry = sample_entry(EntryKind::Expense, 30.0, date(2025, 5, 10));
        entry.notes = Some("original".to_string());
        let created = create_entry(&db, entry).await?;

        let updated = update_entry(
            &db,
            created.id,
            EntryChanges {
                amount: Some(42.5),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.amount, 42.5);
        assert_eq!(updated.notes.as_deref(), Some("original"));
        assert_eq!(updated.entry_date, date(2025, 5, 10));

        let cleared = update_entry(
            &db,
            created.id,
            EntryChanges {
                notes: Some(None),
                ..Default::default()
            },
        )
        .await?;
        assert!(cleared.notes.is_none());
        assert_eq!(cleared.amount, 42.5);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_entry_rejects_negative_amount() -> Result<()> {
        let db = setup_test_db().await?;
        let created =
            create_entry(&db, sample_entry(EntryKind::Expense, 30.0, date(2025, 5, 10))).await?;

        let result = update_entry(
            &db,
            created.id,
            EntryChanges {
                amount: Some(-1.0),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let unchanged = get_entry_by_id(&db, created.id).await?.unwrap();
        assert_eq!(unchanged.amount, 30.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let result = update_entry(&db, 999, EntryChanges::default()).await;
        assert!(matches!(result, Err(Error::EntryNotFound { id: 999 })));
        let result = delete_entry(&db, 999).await;
        assert!(matches!(result, Err(Error::EntryNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_net_total_signs_and_pending() -> Result<()> {
        let db = setup_test_db().await?;
        let income =
            create_entry(&db, sample_entry(EntryKind::Income, 200.0, date(2025, 6, 1))).await?;
        let expense =
            create_entry(&db, sample_entry(EntryKind::Expense, 80.0, date(2025, 6, 2))).await?;
        let mut pending = expense.clone();
        pending.amount_pending = true;

        assert_eq!(net_total(&[income.clone(), expense]), 120.0);
        assert_eq!(net_total(&[income, pending]), 200.0);
        Ok(())
    }
}
