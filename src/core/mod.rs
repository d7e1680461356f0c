//! Core business logic - framework-agnostic operations over the studio database.
//!
//! Nothing in here knows about Discord. Every operation takes a `SeaORM`
//! connection, so the same code runs against a file database, an in-memory
//! database in tests, or an open transaction.

/// Appointments and workflow sessions
pub mod agenda;
/// Debounced revenue recalculation worker
pub mod debounce;
/// Appointment/session drift detection and repair
pub mod integrity;
/// Manual and generated ledger entries
pub mod ledger;
/// Calendar month value type
pub mod period;
/// Recurring blueprint engine
pub mod recurring;
/// Text summaries for the bot
pub mod report;
/// Monthly revenue cache
pub mod revenue;
/// Key-value markers in `system_state`
pub mod state;
/// Workflow stages and add-on provisioning
pub mod workflow;
