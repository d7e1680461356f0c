//! Workflow session entity - A job moving through the post-production workflow.
//!
//! Sessions point at their appointment through `appointment_id`, but the two
//! tables are edited independently and no foreign key is enforced. Drift
//! between them is detected and repaired by `core::integrity`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Appointment this session was created from, if any
    pub appointment_id: Option<i64>,
    /// Client name, copied from the appointment at creation
    pub client_name: String,
    /// Day the session took place
    pub session_date: Date,
    /// Name of the workflow stage the session is in
    pub stage: String,
    /// Total billed for the session
    pub total_value: f64,
    /// When the session was created
    pub created_at: DateTimeUtc,
    /// When the session was last modified
    pub updated_at: DateTimeUtc,
}

/// Sessions link to appointments loosely, without a declared relation
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
