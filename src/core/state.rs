//! Key-value markers in the `system_state` table.
//!
//! Markers gate whole subsystems (for example the revenue cache format
//! version), so reads and writes go through these two helpers only.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::debug;

/// Reads the value stored under `key`, `None` if the key was never set.
pub async fn get_state_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let value = SystemState::find_by_id(key.to_string())
        .one(db)
        .await?
        .map(|state| state.value);
    debug!("System state '{key}': {value:?}");
    Ok(value)
}

/// Inserts or updates the value stored under `key`.
pub async fn set_state_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let marker = system_state::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.to_string()),
        updated_at: Set(Utc::now()),
    };

    SystemState::insert(marker)
        .on_conflict(
            OnConflict::column(system_state::Column::Key)
                .update_columns([system_state::Column::Value, system_state::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}
