//! Revenue cache entity - Pre-aggregated revenue per calendar month.
//!
//! Keyed by `(year, month)`. Rows are disposable: the whole table is wiped
//! whenever the cache format version stored in `system_state` changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly revenue cache database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_cache")]
pub struct Model {
    /// Calendar year
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    /// Calendar month, 1-12
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
    /// Revenue from workflow sessions booked in the month
    pub operational_revenue: f64,
    /// Revenue from income ledger entries booked in the month
    pub extra_revenue: f64,
    /// When the aggregates were last written
    pub updated_at: DateTimeUtc,
    /// Identifier of the row in a remote copy, if synced
    pub remote_id: Option<String>,
    /// When the row was last pushed to the remote copy
    pub remote_synced_at: Option<DateTimeUtc>,
}

/// `RevenueCache` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
