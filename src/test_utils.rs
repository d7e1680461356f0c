//! Shared test utilities for the studio ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        agenda::{self, NewAppointment, NewSession},
        ledger::NewEntry,
        recurring::{self, NewBlueprint},
        workflow,
    },
    entities::{
        AmountKind, AppointmentStatus, EntryCategory, EntryKind, appointment,
        recurring_blueprint, workflow_session,
    },
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing_subscriber::EnvFilter;

/// Routes tracing output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date; panics on invalid input.
#[must_use]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A manual ledger entry in the `other` category.
#[must_use]
pub fn sample_entry(kind: EntryKind, amount: f64, entry_date: NaiveDate) -> NewEntry {
    NewEntry {
        kind,
        category: EntryCategory::Other,
        description: "Test entry".to_string(),
        amount,
        entry_date,
        notes: None,
    }
}

/// A fixed-amount expense blueprint without end date or note.
#[must_use]
pub fn fixed_blueprint(description: &str, amount: f64, first_date: NaiveDate) -> NewBlueprint {
    NewBlueprint {
        description: description.to_string(),
        kind: EntryKind::Expense,
        category: EntryCategory::Software,
        amount: Some(amount),
        amount_kind: AmountKind::Fixed,
        first_date,
        end_date: None,
        note: None,
    }
}

/// Creates a fixed-amount expense blueprint.
pub async fn create_fixed_blueprint(
    db: &DatabaseConnection,
    description: &str,
    amount: f64,
    first_date: NaiveDate,
) -> Result<recurring_blueprint::Model> {
    recurring::create_blueprint(db, fixed_blueprint(description, amount, first_date)).await
}

/// Creates a variable-amount expense blueprint.
pub async fn create_variable_blueprint(
    db: &DatabaseConnection,
    description: &str,
    first_date: NaiveDate,
) -> Result<recurring_blueprint::Model> {
    let mut blueprint = fixed_blueprint(description, 0.0, first_date);
    blueprint.amount = None;
    blueprint.amount_kind = AmountKind::Variable;
    blueprint.category = EntryCategory::Studio;
    recurring::create_blueprint(db, blueprint).await
}

/// Inserts a blueprint row directly, bypassing validation.
/// Used to simulate malformed data written by older versions or by hand.
pub async fn insert_raw_blueprint(
    db: &DatabaseConnection,
    description: &str,
    amount_kind: AmountKind,
    amount: Option<f64>,
) -> Result<recurring_blueprint::Model> {
    let now = Utc::now();
    let model = recurring_blueprint::ActiveModel {
        description: Set(description.to_string()),
        kind: Set(EntryKind::Expense),
        category: Set(EntryCategory::Other),
        amount: Set(amount),
        amount_kind: Set(amount_kind),
        first_date: Set(date(2025, 1, 1)),
        end_date: Set(None),
        note: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Creates an appointment titled "Test session".
pub async fn create_test_appointment(
    db: &DatabaseConnection,
    client_name: &str,
    date: NaiveDate,
    status: AppointmentStatus,
) -> Result<appointment::Model> {
    agenda::create_appointment(
        db,
        NewAppointment {
            client_name: client_name.to_string(),
            title: "Test session".to_string(),
            date,
            status,
        },
    )
    .await
}

/// Creates a workflow session in the "Editing" stage.
pub async fn create_test_session(
    db: &DatabaseConnection,
    appointment_id: Option<i64>,
    client_name: &str,
    session_date: NaiveDate,
    total_value: f64,
) -> Result<workflow_session::Model> {
    agenda::create_session(
        db,
        NewSession {
            appointment_id,
            client_name: client_name.to_string(),
            session_date,
            stage: "Editing".to_string(),
            total_value,
        },
    )
    .await
}

/// Builds an appointment model without touching the database.
#[must_use]
pub fn appointment_model(
    id: i64,
    client_name: &str,
    date: NaiveDate,
    status: AppointmentStatus,
) -> appointment::Model {
    appointment::Model {
        id,
        client_name: client_name.to_string(),
        title: "Test session".to_string(),
        date,
        status,
        created_at: Utc::now(),
    }
}

/// Seeds the built-in workflow stages.
pub async fn seed_test_stages(db: &DatabaseConnection) -> Result<()> {
    workflow::seed_default_stages(db).await?;
    Ok(())
}
