//! Appointment entity - A booking on the studio agenda.

use super::enums::AppointmentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Appointment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    /// Unique identifier for the appointment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Client the appointment is booked for
    pub client_name: String,
    /// Short title (e.g., "Newborn session")
    pub title: String,
    /// Day of the appointment
    pub date: Date,
    /// Booking status
    pub status: AppointmentStatus,
    /// When the appointment was created
    pub created_at: DateTimeUtc,
}

/// Appointments are referenced loosely by workflow sessions, without a foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
