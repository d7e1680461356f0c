//! Workflow stage labels and add-on provisioning.
//!
//! The board has a fixed set of built-in stages. Add-ons bring their own
//! labels, provisioned by name: enabling an add-on creates the missing labels
//! after the current last stage and reactivates existing ones, disabling it
//! only deactivates. Running either operation twice changes nothing.

pub use crate::entities::Addon;

use crate::{
    entities::{WorkflowStage, workflow_stage},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Built-in stages, in board order.
pub const DEFAULT_STAGES: [&str; 4] = ["Scheduled", "Shot", "Editing", "Delivered"];

/// Stage used for sessions created when no stage is configured.
pub const FALLBACK_STAGE: &str = "Scheduled";

impl Addon {
    /// Stage labels this add-on provisions, in board order
    #[must_use]
    pub const fn stage_names(self) -> [&'static str; 2] {
        match self {
            Self::GalleryProofing => ["Proofs sent", "Awaiting selection"],
        }
    }
}

async fn last_position<C>(db: &C) -> Result<i32>
where
    C: ConnectionTrait,
{
    Ok(WorkflowStage::find()
        .order_by_desc(workflow_stage::Column::Position)
        .one(db)
        .await?
        .map_or(0, |stage| stage.position))
}

async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<workflow_stage::Model>>
where
    C: ConnectionTrait,
{
    WorkflowStage::find()
        .filter(workflow_stage::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates the built-in stages that are missing. Returns how many were created.
pub async fn seed_default_stages(db: &DatabaseConnection) -> Result<usize> {
    let txn = db.begin().await?;
    let mut position = last_position(&txn).await?;
    let mut created = 0;
    let now = Utc::now();

    for name in DEFAULT_STAGES {
        if find_by_name(&txn, name).await?.is_some() {
            continue;
        }
        position += 1;
        workflow_stage::ActiveModel {
            name: Set(name.to_string()),
            position: Set(position),
            addon: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        created += 1;
    }

    txn.commit().await?;
    debug!("Seeded {created} default workflow stages.");
    Ok(created)
}

/// Active stages in board order.
pub async fn get_active_stages<C>(db: &C) -> Result<Vec<workflow_stage::Model>>
where
    C: ConnectionTrait,
{
    WorkflowStage::find()
        .filter(workflow_stage::Column::IsActive.eq(true))
        .order_by_asc(workflow_stage::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Name of the first active stage, or [`FALLBACK_STAGE`] if the board is empty.
pub async fn initial_stage_name<C>(db: &C) -> Result<String>
where
    C: ConnectionTrait,
{
    Ok(get_active_stages(db)
        .await?
        .into_iter()
        .next()
        .map_or_else(|| FALLBACK_STAGE.to_string(), |stage| stage.name))
}

/// Provisions (`enabled`) or deprovisions the stages of `addon`.
///
/// Returns the add-on's stages as they exist afterwards.
#[instrument(skip(db))]
pub async fn provision_addon_stages(
    db: &DatabaseConnection,
    addon: Addon,
    enabled: bool,
) -> Result<Vec<workflow_stage::Model>> {
    let txn = db.begin().await?;
    let mut position = last_position(&txn).await?;
    let now = Utc::now();
    let mut stages = Vec::new();

    for name in addon.stage_names() {
        match find_by_name(&txn, name).await? {
            Some(stage) if stage.is_active == enabled => stages.push(stage),
            Some(stage) => {
                let mut active: workflow_stage::ActiveModel = stage.into();
                active.is_active = Set(enabled);
                active.addon = Set(Some(addon));
                active.updated_at = Set(now);
                stages.push(active.update(&txn).await?);
            }
            None if enabled => {
                position += 1;
                let stage = workflow_stage::ActiveModel {
                    name: Set(name.to_string()),
                    position: Set(position),
                    addon: Set(Some(addon)),
                    is_active: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                stages.push(stage);
            }
            None => {}
        }
    }

    txn.commit().await?;
    info!(
        "Add-on {} {}: {} stages",
        addon,
        if enabled { "enabled" } else { "disabled" },
        stages.len()
    );
    Ok(stages)
}
