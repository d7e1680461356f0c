//! Recurring blueprint engine
//!
//! Turns recurring blueprints into concrete ledger entries, one per
//! (blueprint, month). Generation is "just in time": callers ask for a period
//! and the engine books whatever is due and not yet booked. The
//! `(blueprint_id, recurrence_period)` pair on existing entries is checked
//! before every insert, so asking for the same period twice is a no-op.
//!
//! Generated entries are ordinary ledger rows afterwards. Editing one goes
//! through [`update_generated_entry`], which touches that row only; the
//! blueprint and the entries of other months are never rewritten.

use super::{
    ledger::{self, EntryChanges},
    period::Period,
};
use crate::{
    config::studio::BlueprintConfig,
    entities::{
        AmountKind, EntryCategory, EntryKind, LedgerEntry, RecurringBlueprint, ledger_entry,
        recurring_blueprint,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::{collections::HashSet, fmt};
use tracing::{debug, info, instrument, warn};

/// Fields of a new recurring blueprint.
#[derive(Debug, Clone)]
pub struct NewBlueprint {
    /// Item reference shown on generated entries
    pub description: String,
    /// Income or expense
    pub kind: EntryKind,
    /// Ledger category
    pub category: EntryCategory,
    /// Amount per occurrence (required for fixed blueprints)
    pub amount: Option<f64>,
    /// Fixed or variable amount
    pub amount_kind: AmountKind,
    /// First occurrence
    pub first_date: NaiveDate,
    /// Last occurrence, inclusive by month
    pub end_date: Option<NaiveDate>,
    /// Free-text note
    pub note: Option<String>,
}

/// Changes to the future-occurrence parameters of a blueprint.
/// `None` leaves a field unchanged; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct BlueprintChanges {
    /// New description for future entries
    pub description: Option<String>,
    /// New amount for future entries
    pub amount: Option<Option<f64>>,
    /// New amount kind for future entries
    pub amount_kind: Option<AmountKind>,
    /// New end date
    pub end_date: Option<Option<NaiveDate>>,
    /// New note for future entries
    pub note: Option<Option<String>>,
}

/// Why a blueprint was left out of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Fixed blueprint without an amount
    MissingAmount,
    /// Amount is non-finite, negative, or zero for a fixed blueprint
    InvalidAmount(f64),
    /// End date lies before the first occurrence
    EndBeforeStart {
        /// First occurrence
        first_date: NaiveDate,
        /// Configured end
        end_date: NaiveDate,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAmount => f.write_str("fixed blueprint has no amount"),
            Self::InvalidAmount(amount) => write!(f, "amount {amount} is not usable"),
            Self::EndBeforeStart {
                first_date,
                end_date,
            } => write!(f, "end date {end_date} is before first date {first_date}"),
        }
    }
}

impl From<SkipReason> for Error {
    fn from(reason: SkipReason) -> Self {
        match reason {
            SkipReason::InvalidAmount(amount) => Self::InvalidAmount { amount },
            SkipReason::MissingAmount => {
                Self::invalid_input("amount", "a fixed blueprint needs an amount")
            }
            reason @ SkipReason::EndBeforeStart { .. } => {
                Self::invalid_input("end_date", reason.to_string())
            }
        }
    }
}

/// A blueprint that was not generated, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedBlueprint {
    /// Blueprint id
    pub blueprint_id: i64,
    /// Blueprint description
    pub description: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Outcome of generating one period.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Period that was generated
    pub period: Period,
    /// Entries inserted by this run
    pub created: Vec<ledger_entry::Model>,
    /// Blueprints whose entry for this period already existed
    pub already_generated: usize,
    /// Malformed blueprints that were skipped
    pub skipped: Vec<SkippedBlueprint>,
}

/// Checks that a blueprint can produce entries and returns the amount to book.
///
/// Variable blueprints book a `0.0` placeholder that is filled in later.
fn bookable_amount(blueprint: &recurring_blueprint::Model) -> std::result::Result<f64, SkipReason> {
    check_parameters(
        blueprint.amount,
        blueprint.amount_kind,
        blueprint.first_date,
        blueprint.end_date,
    )
}

fn check_parameters(
    amount: Option<f64>,
    amount_kind: AmountKind,
    first_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> std::result::Result<f64, SkipReason> {
    if let Some(end_date) = end_date
        && end_date < first_date
    {
        return Err(SkipReason::EndBeforeStart {
            first_date,
            end_date,
        });
    }

    match (amount_kind, amount) {
        (AmountKind::Fixed, None) => Err(SkipReason::MissingAmount),
        (AmountKind::Fixed, Some(a)) if !a.is_finite() || a <= 0.0 => {
            Err(SkipReason::InvalidAmount(a))
        }
        (AmountKind::Fixed, Some(a)) => Ok(a),
        (AmountKind::Variable, Some(a)) if !a.is_finite() || a < 0.0 => {
            Err(SkipReason::InvalidAmount(a))
        }
        (AmountKind::Variable, _) => Ok(0.0),
    }
}

/// Whether the blueprint's recurrence includes `period`.
#[must_use]
pub fn recurs_in(blueprint: &recurring_blueprint::Model, period: Period) -> bool {
    Period::of(blueprint.first_date) <= period
        && blueprint
            .end_date
            .is_none_or(|end| period <= Period::of(end))
}

/// Generates the ledger entries due in `year`/`month`.
///
/// Idempotent: blueprints that already have an entry for the period are
/// counted in `already_generated` and left alone. Malformed blueprints are
/// skipped with a warning; they never abort the batch. All inserts of one run
/// commit together.
#[instrument(skip(db))]
pub async fn generate_for_month(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<GenerationReport> {
    let period = Period::new(year, month)?;
    let period_key = period.to_string();

    let txn = db.begin().await?;

    let blueprints = RecurringBlueprint::find()
        .filter(recurring_blueprint::Column::IsActive.eq(true))
        .order_by_asc(recurring_blueprint::Column::Id)
        .all(&txn)
        .await?;

    let already: HashSet<i64> = LedgerEntry::find()
        .filter(ledger_entry::Column::RecurrencePeriod.eq(period_key.as_str()))
        .filter(ledger_entry::Column::BlueprintId.is_not_null())
        .all(&txn)
        .await?
        .into_iter()
        .filter_map(|entry| entry.blueprint_id)
        .collect();

    let mut report = GenerationReport {
        period,
        created: Vec::new(),
        already_generated: 0,
        skipped: Vec::new(),
    };
    let now = Utc::now();

    for blueprint in blueprints {
        if !recurs_in(&blueprint, period) {
            continue;
        }
        if already.contains(&blueprint.id) {
            report.already_generated += 1;
            continue;
        }

        let amount = match bookable_amount(&blueprint) {
            Ok(amount) => amount,
            Err(reason) => {
                warn!(
                    "Skipping blueprint {} ('{}') for {}: {}",
                    blueprint.id, blueprint.description, period, reason
                );
                report.skipped.push(SkippedBlueprint {
                    blueprint_id: blueprint.id,
                    description: blueprint.description,
                    reason,
                });
                continue;
            }
        };

        let entry = ledger_entry::ActiveModel {
            kind: Set(blueprint.kind),
            category: Set(blueprint.category),
            description: Set(blueprint.description.clone()),
            amount: Set(amount),
            amount_pending: Set(blueprint.amount_kind == AmountKind::Variable),
            entry_date: Set(period.day_clamped(blueprint.first_date.day())),
            notes: Set(blueprint.note.clone()),
            blueprint_id: Set(Some(blueprint.id)),
            recurrence_period: Set(Some(period_key.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = entry.insert(&txn).await?;
        debug!(
            "Generated entry {} from blueprint {} for {}",
            created.id, blueprint.id, period
        );
        report.created.push(created);
    }

    txn.commit().await?;

    info!(
        "Generation for {}: {} created, {} already present, {} skipped",
        period,
        report.created.len(),
        report.already_generated,
        report.skipped.len()
    );
    Ok(report)
}

/// Runs [`generate_for_month`] for every period from `from` to `to`, inclusive.
pub async fn generate_range(
    db: &DatabaseConnection,
    from: Period,
    to: Period,
) -> Result<Vec<GenerationReport>> {
    if from > to {
        return Err(Error::invalid_input(
            "period",
            format!("range start {from} is after end {to}"),
        ));
    }

    let mut reports = Vec::new();
    let mut period = from;
    loop {
        reports.push(generate_for_month(db, period.year(), period.month()).await?);
        if period == to {
            break;
        }
        period = period.next();
    }
    Ok(reports)
}

/// Edits one generated entry in isolation.
///
/// Only the targeted row changes; the blueprint and sibling entries generated
/// from it keep their values.
#[instrument(skip(db, changes))]
pub async fn update_generated_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    changes: EntryChanges,
) -> Result<ledger_entry::Model> {
    let entry = ledger::get_entry_by_id(db, entry_id)
        .await?
        .ok_or(Error::EntryNotFound { id: entry_id })?;

    if entry.blueprint_id.is_none() {
        return Err(Error::invalid_input(
            "entry",
            format!("entry {entry_id} was not generated from a blueprint"),
        ));
    }

    ledger::update_entry(db, entry_id, changes).await
}

/// Creates a blueprint after validating its parameters.
#[instrument(skip(db, blueprint), fields(description = %blueprint.description))]
pub async fn create_blueprint<C>(
    db: &C,
    blueprint: NewBlueprint,
) -> Result<recurring_blueprint::Model>
where
    C: ConnectionTrait,
{
    let description = blueprint.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::invalid_input("description", "must not be empty"));
    }
    check_parameters(
        blueprint.amount,
        blueprint.amount_kind,
        blueprint.first_date,
        blueprint.end_date,
    )?;

    let now = Utc::now();
    let model = recurring_blueprint::ActiveModel {
        description: Set(description),
        kind: Set(blueprint.kind),
        category: Set(blueprint.category),
        amount: Set(blueprint.amount),
        amount_kind: Set(blueprint.amount_kind),
        first_date: Set(blueprint.first_date),
        end_date: Set(blueprint.end_date),
        note: Set(blueprint.note),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves a blueprint by ID.
pub async fn get_blueprint_by_id<C>(
    db: &C,
    blueprint_id: i64,
) -> Result<Option<recurring_blueprint::Model>>
where
    C: ConnectionTrait,
{
    RecurringBlueprint::find_by_id(blueprint_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All active blueprints, ordered by description.
pub async fn get_active_blueprints<C>(db: &C) -> Result<Vec<recurring_blueprint::Model>>
where
    C: ConnectionTrait,
{
    RecurringBlueprint::find()
        .filter(recurring_blueprint::Column::IsActive.eq(true))
        .order_by_asc(recurring_blueprint::Column::Description)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Entries generated from one blueprint, oldest first.
pub async fn get_generated_entries<C>(
    db: &C,
    blueprint_id: i64,
) -> Result<Vec<ledger_entry::Model>>
where
    C: ConnectionTrait,
{
    LedgerEntry::find()
        .filter(ledger_entry::Column::BlueprintId.eq(blueprint_id))
        .order_by_asc(ledger_entry::Column::EntryDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Changes the parameters used for future occurrences.
///
/// Entries already generated keep their amounts and notes.
#[instrument(skip(db, changes))]
pub async fn update_blueprint_future<C>(
    db: &C,
    blueprint_id: i64,
    changes: BlueprintChanges,
) -> Result<recurring_blueprint::Model>
where
    C: ConnectionTrait,
{
    let blueprint = get_blueprint_by_id(db, blueprint_id)
        .await?
        .ok_or(Error::BlueprintNotFound { id: blueprint_id })?;

    let amount = changes.amount.unwrap_or(blueprint.amount);
    let amount_kind = changes.amount_kind.unwrap_or(blueprint.amount_kind);
    let end_date = changes.end_date.unwrap_or(blueprint.end_date);
    check_parameters(amount, amount_kind, blueprint.first_date, end_date)?;

    let mut active: recurring_blueprint::ActiveModel = blueprint.into();
    if let Some(description) = changes.description {
        let description = description.trim().to_string();
        if description.is_empty() {
            return Err(Error::invalid_input("description", "must not be empty"));
        }
        active.description = Set(description);
    }
    if let Some(note) = changes.note {
        active.note = Set(note);
    }
    active.amount = Set(amount);
    active.amount_kind = Set(amount_kind);
    active.end_date = Set(end_date);
    active.updated_at = Set(Utc::now());

    active.update(db).await.map_err(Into::into)
}

/// Stops a blueprint from generating further entries. Existing entries stay.
pub async fn deactivate_blueprint<C>(
    db: &C,
    blueprint_id: i64,
) -> Result<recurring_blueprint::Model>
where
    C: ConnectionTrait,
{
    let blueprint = get_blueprint_by_id(db, blueprint_id)
        .await?
        .ok_or(Error::BlueprintNotFound { id: blueprint_id })?;

    let mut active: recurring_blueprint::ActiveModel = blueprint.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}

/// Seeds blueprints from configuration.
///
/// Entries whose description already exists are left alone. Malformed entries
/// are skipped with a warning; database errors abort the seeding.
pub async fn seed_blueprints(
    db: &DatabaseConnection,
    configs: &[BlueprintConfig],
) -> Result<usize> {
    let existing: HashSet<String> = RecurringBlueprint::find()
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.description)
        .collect();

    let mut seeded = 0;
    for config in configs {
        if existing.contains(config.description.trim()) {
            debug!("Blueprint '{}' already present, not seeding", config.description);
            continue;
        }
        let new_blueprint = match config.to_new_blueprint() {
            Ok(b) => b,
            Err(e) => {
                warn!("Skipping configured blueprint '{}': {}", config.description, e);
                continue;
            }
        };
        match create_blueprint(db, new_blueprint).await {
            Ok(_) => seeded += 1,
            Err(e @ Error::Database(_)) => return Err(e),
            Err(e) => warn!("Skipping configured blueprint '{}': {}", config.description, e),
        }
    }

    info!("Seeded {seeded} recurring blueprints from configuration.");
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_fixed_fee_example() -> Result<()> {
        let db = setup_test_db().await?;
        let blueprint =
            create_fixed_blueprint(&db, "Gallery hosting", 52.00, date(2025, 7, 15))
                .await?;

        let first = generate_for_month(&db, 2025, 8).await?;
        assert_eq!(first.created.len(), 1);
        let second = generate_for_month(&db, 2025, 8).await?;
        assert!(second.created.is_empty());
        assert_eq!(second.already_generated, 1);

        let august = get_generated_entries(&db, blueprint.id).await?;
        assert_eq!(august.len(), 1);
        assert_eq!(august[0].amount, 52.00);
        assert_eq!(august[0].entry_date, date(2025, 8, 15));
        assert!(!august[0].amount_pending);

        let september = generate_for_month(&db, 2025, 9).await?;
        assert_eq!(september.created.len(), 1);
        assert_eq!(september.created[0].entry_date, date(2025, 9, 15));

        let all = get_generated_entries(&db, blueprint.id).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], august[0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_generation_is_idempotent_for_many_blueprints() -> Result<()> {
        let db = setup_test_db().await?;
        create_fixed_blueprint(&db, "Studio rent", 900.0, date(2025, 1, 1)).await?;
        create_fixed_blueprint(&db, "Adobe", 24.99, date(2025, 2, 28)).await?;
        create_variable_blueprint(&db, "Electricity", date(2025, 1, 10)).await?;

        let once = generate_for_month(&db, 2025, 3).await?;
        let twice = generate_for_month(&db, 2025, 3).await?;
        assert_eq!(once.created.len(), 3);
        assert!(twice.created.is_empty());
        assert_eq!(twice.already_generated, 3);

        let entries = ledger::get_entries_for_period(&db, Period::new(2025, 3)?).await?;
        assert_eq!(entries.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_entries_before_first_or_after_end() -> Result<()> {
        let db = setup_test_db().await?;
        let mut blueprint = fixed_blueprint("Insurance", 30.0, date(2025, 3, 5));
        blueprint.end_date = Some(date(2025, 5, 1));
        create_blueprint(&db, blueprint).await?;

        assert!(generate_for_month(&db, 2025, 2).await?.created.is_empty());
        assert_eq!(generate_for_month(&db, 2025, 5).await?.created.len(), 1);
        assert!(generate_for_month(&db, 2025, 6).await?.created.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_due_day_clamped_to_short_month() -> Result<()> {
        let db = setup_test_db().await?;
        create_fixed_blueprint(&db, "Cloud backup", 9.0, date(2025, 1, 31)).await?;

        let report = generate_for_month(&db, 2025, 2).await?;
        assert_eq!(report.created[0].entry_date, date(2025, 2, 28));
        Ok(())
    }

    #[tokio::test]
    async fn test_variable_blueprint_books_pending_placeholder() -> Result<()> {
        let db = setup_test_db().await?;
        create_variable_blueprint(&db, "Electricity", date(2025, 1, 10)).await?;

        let report = generate_for_month(&db, 2025, 4).await?;
        let entry = &report.created[0];
        assert!(entry.amount_pending);
        assert_eq!(entry.amount, 0.0);
        assert_eq!(entry.recurrence_period.as_deref(), Some("2025-04"));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_blueprint_is_skipped_not_fatal() -> Result<()> {
        let db = setup_test_db().await?;
        let good = create_fixed_blueprint(&db, "Studio rent", 900.0, date(2025, 1, 1)).await?;
        let broken = insert_raw_blueprint(&db, "Broken fee", AmountKind::Fixed, None).await?;
        let negative =
            insert_raw_blueprint(&db, "Negative fee", AmountKind::Fixed, Some(-3.0)).await?;

        let report = generate_for_month(&db, 2025, 6).await?;
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].blueprint_id, Some(good.id));
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .any(|s| s.blueprint_id == broken.id && s.reason == SkipReason::MissingAmount));
        assert!(report
            .skipped
            .iter()
            .any(|s| s.blueprint_id == negative.id && s.reason == SkipReason::InvalidAmount(-3.0)));
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_generated_entry_is_isolated() -> Result<()> {
        let db = setup_test_db().await?;
        let blueprint = create_variable_blueprint(&db, "Electricity", date(2025, 1, 10)).await?;
        generate_range(&db, Period::new(2025, 1)?, Period::new(2025, 3)?).await?;

        let before = get_generated_entries(&db, blueprint.id).await?;
        assert_eq!(before.len(), 3);

        let edited = update_generated_entry(
            &db,
            before[1].id,
            EntryChanges {
                amount: Some(87.30),
                notes: Some(Some("meter 10432".to_string())),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(edited.amount, 87.30);
        assert!(!edited.amount_pending);

        let after = get_generated_entries(&db, blueprint.id).await?;
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);

        let blueprint_after = get_blueprint_by_id(&db, blueprint.id).await?.unwrap();
        assert_eq!(blueprint_after, blueprint);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_generated_entry_rejects_manual_entry() -> Result<()> {
        let db = setup_test_db().await?;
        let manual = ledger::create_entry(
            &db,
            sample_entry(EntryKind::Expense, 12.0, date(2025, 1, 3)),
        )
        .await?;

        let result = update_generated_entry(&db, manual.id, EntryChanges::default()).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_blueprint_changes_only_affect_future_periods() -> Result<()> {
        let db = setup_test_db().await?;
        let blueprint = create_fixed_blueprint(&db, "Adobe", 24.99, date(2025, 1, 5)).await?;
        generate_for_month(&db, 2025, 1).await?;

        update_blueprint_future(
            &db,
            blueprint.id,
            BlueprintChanges {
                amount: Some(Some(29.99)),
                ..Default::default()
            },
        )
        .await?;
        generate_for_month(&db, 2025, 2).await?;

        let entries = get_generated_entries(&db, blueprint.id).await?;
        assert_eq!(entries[0].amount, 24.99);
        assert_eq!(entries[1].amount, 29.99);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_update_blueprint_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let mut missing = fixed_blueprint("No amount", 1.0, date(2025, 1, 1));
        missing.amount = None;
        assert!(matches!(
            create_blueprint(&db, missing).await,
            Err(Error::InvalidInput { .. })
        ));

        let mut backwards = fixed_blueprint("Backwards", 5.0, date(2025, 6, 1));
        backwards.end_date = Some(date(2025, 1, 1));
        assert!(create_blueprint(&db, backwards).await.is_err());

        let blueprint = create_fixed_blueprint(&db, "Valid", 5.0, date(2025, 1, 1)).await?;
        let result = update_blueprint_future(
            &db,
            blueprint.id,
            BlueprintChanges {
                amount: Some(Some(f64::NAN)),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let result = update_blueprint_future(&db, 999, BlueprintChanges::default()).await;
        assert!(matches!(result, Err(Error::BlueprintNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivated_blueprint_stops_generating() -> Result<()> {
        let db = setup_test_db().await?;
        let blueprint = create_fixed_blueprint(&db, "Old plan", 10.0, date(2025, 1, 1)).await?;
        generate_for_month(&db, 2025, 1).await?;
        deactivate_blueprint(&db, blueprint.id).await?;

        let report = generate_for_month(&db, 2025, 2).await?;
        assert!(report.created.is_empty());
        assert_eq!(get_generated_entries(&db, blueprint.id).await?.len(), 1);
        assert!(get_active_blueprints(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_range_rejects_reversed_range() -> Result<()> {
        let db = setup_test_db().await?;
        let result = generate_range(&db, Period::new(2025, 5)?, Period::new(2025, 1)?).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_blueprints_skips_malformed_and_existing() -> Result<()> {
        let db = setup_test_db().await?;
        let configs = vec![
            BlueprintConfig {
                description: "Lightroom".to_string(),
                kind: "expense".to_string(),
                category: "software".to_string(),
                amount: Some(11.99),
                amount_kind: "fixed".to_string(),
                first_date: "2025-01-04".to_string(),
                end_date: None,
                note: None,
            },
            BlueprintConfig {
                description: "Bad date".to_string(),
                kind: "expense".to_string(),
                category: "software".to_string(),
                amount: Some(1.0),
                amount_kind: "fixed".to_string(),
                first_date: "not-a-date".to_string(),
                end_date: None,
                note: None,
            },
            BlueprintConfig {
                description: "No amount".to_string(),
                kind: "expense".to_string(),
                category: "other".to_string(),
                amount: None,
                amount_kind: "fixed".to_string(),
                first_date: "2025-01-04".to_string(),
                end_date: None,
                note: None,
            },
        ];

        assert_eq!(seed_blueprints(&db, &configs).await?, 1);
        assert_eq!(seed_blueprints(&db, &configs).await?, 0);
        assert_eq!(get_active_blueprints(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_generation_books_each_blueprint_once() -> Result<()> {
        let db = std::sync::Arc::new(setup_test_db().await?);
        for i in 0..20 {
            create_fixed_blueprint(&db, &format!("Plan {i}"), 10.0, date(2025, 1, 1)).await?;
        }

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let db = std::sync::Arc::clone(&db);
                tokio::spawn(async move { generate_for_month(&db, 2025, 8).await })
            })
            .collect();
        let mut created = 0;
        for task in tasks {
            created += task.await.unwrap()?.created.len();
        }

        assert_eq!(created, 20);
        let august = LedgerEntry::find()
            .filter(ledger_entry::Column::RecurrencePeriod.eq("2025-08"))
            .count(db.as_ref())
            .await?;
        assert_eq!(august, 20);
        Ok(())
    }
}
