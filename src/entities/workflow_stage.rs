//! Workflow stage entity - Ordered labels of the post-production board.

use super::enums::Addon;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Workflow stage database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "workflow_stages")]
pub struct Model {
    /// Unique identifier for the stage
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Stage label, unique across the board
    #[sea_orm(unique)]
    pub name: String,
    /// Sort position on the board
    pub position: i32,
    /// Add-on that provisioned this stage, `None` for built-in stages
    pub addon: Option<Addon>,
    /// Inactive stages are hidden from the board
    pub is_active: bool,
    /// When the stage was created
    pub created_at: DateTimeUtc,
    /// When the stage was last modified
    pub updated_at: DateTimeUtc,
}

/// `WorkflowStage` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
