//! Agenda business logic - appointments and the workflow sessions created from them.
//!
//! The two tables are edited independently: a session keeps a loose
//! `appointment_id` reference that nothing enforces. Drift between them is the
//! concern of `core::integrity`.

use crate::{
    entities::{
        Appointment, AppointmentStatus, WorkflowSession, appointment, workflow_session,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields of a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    /// Client the appointment is for
    pub client_name: String,
    /// Short title
    pub title: String,
    /// Day of the appointment
    pub date: NaiveDate,
    /// Initial status
    pub status: AppointmentStatus,
}

/// Fields of a new workflow session.
#[derive(Debug, Clone)]
pub struct NewSession {
    /// Appointment reference, if any
    pub appointment_id: Option<i64>,
    /// Client name
    pub client_name: String,
    /// Day of the session
    pub session_date: NaiveDate,
    /// Workflow stage label
    pub stage: String,
    /// Total billed
    pub total_value: f64,
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_input(field, "must not be empty"));
    }
    Ok(value.to_string())
}

/// Books an appointment.
pub async fn create_appointment<C>(db: &C, new: NewAppointment) -> Result<appointment::Model>
where
    C: ConnectionTrait,
{
    let model = appointment::ActiveModel {
        client_name: Set(required("client_name", &new.client_name)?),
        title: Set(required("title", &new.title)?),
        date: Set(new.date),
        status: Set(new.status),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves an appointment by ID.
pub async fn get_appointment_by_id<C>(
    db: &C,
    appointment_id: i64,
) -> Result<Option<appointment::Model>>
where
    C: ConnectionTrait,
{
    Appointment::find_by_id(appointment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Changes the status of an appointment.
pub async fn set_appointment_status<C>(
    db: &C,
    appointment_id: i64,
    status: AppointmentStatus,
) -> Result<appointment::Model>
where
    C: ConnectionTrait,
{
    let appointment = get_appointment_by_id(db, appointment_id)
        .await?
        .ok_or_else(|| {
            Error::invalid_input("appointment", format!("appointment {appointment_id} not found"))
        })?;
    let mut active: appointment::ActiveModel = appointment.into();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// All appointments, by date.
pub async fn get_all_appointments<C>(db: &C) -> Result<Vec<appointment::Model>>
where
    C: ConnectionTrait,
{
    Appointment::find()
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a workflow session.
pub async fn create_session<C>(db: &C, new: NewSession) -> Result<workflow_session::Model>
where
    C: ConnectionTrait,
{
    if !new.total_value.is_finite() || new.total_value < 0.0 {
        return Err(Error::InvalidAmount {
            amount: new.total_value,
        });
    }
    let now = Utc::now();
    let model = workflow_session::ActiveModel {
        appointment_id: Set(new.appointment_id),
        client_name: Set(required("client_name", &new.client_name)?),
        session_date: Set(new.session_date),
        stage: Set(required("stage", &new.stage)?),
        total_value: Set(new.total_value),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves a session by ID.
pub async fn get_session_by_id<C>(
    db: &C,
    session_id: i64,
) -> Result<Option<workflow_session::Model>>
where
    C: ConnectionTrait,
{
    WorkflowSession::find_by_id(session_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All workflow sessions, by date.
pub async fn get_all_sessions<C>(db: &C) -> Result<Vec<workflow_session::Model>>
where
    C: ConnectionTrait,
{
    WorkflowSession::find()
        .order_by_asc(workflow_session::Column::SessionDate)
        .order_by_asc(workflow_session::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sessions that took place during `year`.
pub async fn get_sessions_for_year<C>(db: &C, year: i32) -> Result<Vec<workflow_session::Model>>
where
    C: ConnectionTrait,
{
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::InvalidPeriod { year, month: 1 })?;
    let end =
        NaiveDate::from_ymd_opt(year, 12, 31).ok_or(Error::InvalidPeriod { year, month: 12 })?;
    WorkflowSession::find()
        .filter(workflow_session::Column::SessionDate.between(start, end))
        .order_by_asc(workflow_session::Column::SessionDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Re-points (or clears) the appointment reference of one session.
pub async fn set_session_appointment<C>(
    db: &C,
    session_id: i64,
    appointment_id: Option<i64>,
) -> Result<workflow_session::Model>
where
    C: ConnectionTrait,
{
    let session = get_session_by_id(db, session_id).await?.ok_or_else(|| {
        Error::invalid_input("session", format!("session {session_id} not found"))
    })?;
    let mut active: workflow_session::ActiveModel = session.into();
    active.appointment_id = Set(appointment_id);
    active.updated_at = Set(Utc::now());
    active.update(db).await.map_err(Into::into)
}
