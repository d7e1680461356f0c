//! Data integrity reconciliation between appointments and workflow sessions.
//!
//! Detection is a pure comparison of the two collections and never writes.
//! Repair applies one single-field fix per issue and keeps going when an
//! individual fix fails. Detecting again after a repair must report nothing;
//! [`check_and_repair`] does exactly that and returns what is left.

use super::{agenda, workflow};
use crate::{
    entities::{AppointmentStatus, appointment, workflow_session},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::{
    collections::{HashMap, HashSet},
    fmt,
};
use tracing::{error, info, instrument, warn};

/// One kind of drift between the two collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityIssue {
    /// Confirmed appointment that no session refers to
    MissingSession {
        /// The appointment lacking a session
        appointment_id: i64,
    },
    /// Session pointing at an appointment that does not exist
    OrphanSession {
        /// The session
        session_id: i64,
        /// The dangling reference
        appointment_id: i64,
    },
    /// Session linked to an appointment of another client or day
    MismatchedLink {
        /// The session
        session_id: i64,
        /// Appointment it currently points at
        linked_appointment_id: i64,
        /// Appointment matching the session's client and day
        expected_appointment_id: i64,
    },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSession { appointment_id } => {
                write!(f, "confirmed appointment {appointment_id} has no session")
            }
            Self::OrphanSession {
                session_id,
                appointment_id,
            } => write!(
                f,
                "session {session_id} refers to missing appointment {appointment_id}"
            ),
            Self::MismatchedLink {
                session_id,
                linked_appointment_id,
                expected_appointment_id,
            } => write!(
                f,
                "session {session_id} is linked to appointment {linked_appointment_id} \
                 but belongs to {expected_appointment_id}"
            ),
        }
    }
}

/// Result of a repair pass.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    /// Issues fixed
    pub repaired: Vec<IntegrityIssue>,
    /// Issues whose fix failed, with the error message
    pub failed: Vec<(IntegrityIssue, String)>,
}

fn same_client(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn matches_session(appointment: &appointment::Model, session: &workflow_session::Model) -> bool {
    appointment.date == session.session_date
        && same_client(&appointment.client_name, &session.client_name)
}

/// Compares the two collections and lists every drift found.
///
/// Mismatched links are resolved first; an appointment counts as having a
/// session if some session refers to it after those links are re-pointed.
#[must_use]
pub fn detect_issues(
    appointments: &[appointment::Model],
    sessions: &[workflow_session::Model],
) -> Vec<IntegrityIssue> {
    let by_id: HashMap<i64, &appointment::Model> =
        appointments.iter().map(|a| (a.id, a)).collect();
    let direct_links: HashSet<i64> = sessions.iter().filter_map(|s| s.appointment_id).collect();

    let mut issues = Vec::new();
    let mut effective_links = HashSet::new();

    for session in sessions {
        let Some(linked_id) = session.appointment_id else {
            continue;
        };
        let Some(linked) = by_id.get(&linked_id) else {
            issues.push(IntegrityIssue::OrphanSession {
                session_id: session.id,
                appointment_id: linked_id,
            });
            continue;
        };

        if matches_session(linked, session) {
            effective_links.insert(linked_id);
            continue;
        }

        // Prefer a matching appointment that nobody links to yet.
        let candidates: Vec<&appointment::Model> = appointments
            .iter()
            .filter(|a| a.id != linked_id && matches_session(a, session))
            .collect();
        let expected = candidates
            .iter()
            .find(|a| !direct_links.contains(&a.id))
            .or_else(|| candidates.first());

        if let Some(expected) = expected {
            issues.push(IntegrityIssue::MismatchedLink {
                session_id: session.id,
                linked_appointment_id: linked_id,
                expected_appointment_id: expected.id,
            });
            effective_links.insert(expected.id);
        } else {
            // Nothing better to point at; the link stays as the user set it.
            effective_links.insert(linked_id);
        }
    }

    for appointment in appointments {
        if appointment.status == AppointmentStatus::Confirmed
            && !effective_links.contains(&appointment.id)
        {
            issues.push(IntegrityIssue::MissingSession {
                appointment_id: appointment.id,
            });
        }
    }

    issues
}

/// Loads both collections and runs [`detect_issues`]. Read-only.
#[instrument(skip(db))]
pub async fn check_integrity(db: &DatabaseConnection) -> Result<Vec<IntegrityIssue>> {
    let appointments = agenda::get_all_appointments(db).await?;
    let sessions = agenda::get_all_sessions(db).await?;
    let issues = detect_issues(&appointments, &sessions);
    if issues.is_empty() {
        info!(
            "Integrity check passed ({} appointments, {} sessions).",
            appointments.len(),
            sessions.len()
        );
    } else {
        warn!("Integrity check found {} issues.", issues.len());
    }
    Ok(issues)
}

async fn repair_one(db: &DatabaseConnection, issue: IntegrityIssue) -> Result<()> {
    match issue {
        IntegrityIssue::MissingSession { appointment_id } => {
            let appointment = agenda::get_appointment_by_id(db, appointment_id)
                .await?
                .ok_or_else(|| {
                    Error::invalid_input(
                        "appointment",
                        format!("appointment {appointment_id} no longer exists"),
                    )
                })?;
            let stage = workflow::initial_stage_name(db).await?;
            agenda::create_session(
                db,
                agenda::NewSession {
                    appointment_id: Some(appointment.id),
                    client_name: appointment.client_name,
                    session_date: appointment.date,
                    stage,
                    total_value: 0.0,
                },
            )
            .await?;
        }
        IntegrityIssue::OrphanSession { session_id, .. } => {
            agenda::set_session_appointment(db, session_id, None).await?;
        }
        IntegrityIssue::MismatchedLink {
            session_id,
            expected_appointment_id,
            ..
        } => {
            agenda::set_session_appointment(db, session_id, Some(expected_appointment_id)).await?;
        }
    }
    Ok(())
}

/// Applies one targeted fix per issue.
///
/// Failures are logged and collected; the remaining issues are still processed.
#[instrument(skip(db, issues), fields(issues = issues.len()))]
pub async fn repair_issues(db: &DatabaseConnection, issues: &[IntegrityIssue]) -> RepairReport {
    let mut report = RepairReport::default();
    for &issue in issues {
        match repair_one(db, issue).await {
            Ok(()) => {
                info!("Repaired: {issue}");
                report.repaired.push(issue);
            }
            Err(e) => {
                error!("Failed to repair '{issue}': {e}");
                report.failed.push((issue, e.to_string()));
            }
        }
    }
    report
}

/// Detects, repairs, and detects again. Returns the repair report and the
/// issues still present afterwards (empty when a fixed point was reached).
pub async fn check_and_repair(
    db: &DatabaseConnection,
) -> Result<(RepairReport, Vec<IntegrityIssue>)> {
    let issues = check_integrity(db).await?;
    let report = repair_issues(db, &issues).await;
    let remaining = check_integrity(db).await?;
    if !remaining.is_empty() {
        warn!("{} issues remain after repair.", remaining.len());
    }
    Ok((report, remaining))
}
