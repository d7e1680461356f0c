//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod appointment;
pub mod enums;
pub mod ledger_entry;
pub mod recurring_blueprint;
pub mod revenue_cache;
pub mod system_state;
pub mod workflow_session;
pub mod workflow_stage;

// Re-export specific types to avoid conflicts
pub use appointment::{
    Column as AppointmentColumn, Entity as Appointment, Model as AppointmentModel,
};
pub use enums::{Addon, AmountKind, AppointmentStatus, EntryCategory, EntryKind};
pub use ledger_entry::{
    Column as LedgerEntryColumn, Entity as LedgerEntry, Model as LedgerEntryModel,
};
pub use recurring_blueprint::{
    Column as RecurringBlueprintColumn, Entity as RecurringBlueprint,
    Model as RecurringBlueprintModel,
};
pub use revenue_cache::{
    Column as RevenueCacheColumn, Entity as RevenueCache, Model as RevenueCacheModel,
};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
pub use workflow_session::{
    Column as WorkflowSessionColumn, Entity as WorkflowSession, Model as WorkflowSessionModel,
};
pub use workflow_stage::{
    Column as WorkflowStageColumn, Entity as WorkflowStage, Model as WorkflowStageModel,
};
