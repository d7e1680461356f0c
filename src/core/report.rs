//! Plain-text summaries of core results, shared by the bot commands.
//!
//! Everything here is pure formatting so it can be tested without Discord.

use super::{
    integrity::{IntegrityIssue, RepairReport},
    recurring::GenerationReport,
    revenue::CacheEntry,
};
use crate::entities::{EntryKind, ledger_entry, recurring_blueprint};
use std::fmt::Write;

/// Formats an amount with an explicit sign, e.g. `+$52.00` or `-$10.50`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+${amount:.2}")
    } else {
        format!("-${:.2}", amount.abs())
    }
}

/// One line describing a ledger entry.
#[must_use]
pub fn format_entry_line(entry: &ledger_entry::Model) -> String {
    let signed = match entry.kind {
        EntryKind::Income => entry.amount,
        EntryKind::Expense => -entry.amount,
    };
    let amount = if entry.amount_pending {
        "pending".to_string()
    } else {
        format_amount(signed)
    };
    format!(
        "#{} {} | {} | {} | {}",
        entry.id, entry.entry_date, amount, entry.category, entry.description
    )
}

/// One line describing a blueprint.
#[must_use]
pub fn format_blueprint_line(blueprint: &recurring_blueprint::Model) -> String {
    let amount = blueprint
        .amount
        .map_or_else(|| "variable".to_string(), |a| format!("${a:.2}"));
    let until = blueprint
        .end_date
        .map_or_else(String::new, |end| format!(" until {end}"));
    format!(
        "#{} {} ({}, {}) {} from {}{}",
        blueprint.id,
        blueprint.description,
        blueprint.kind,
        blueprint.category,
        amount,
        blueprint.first_date,
        until
    )
}

/// Multi-line summary of one generation run.
pub fn format_generation_report(report: &GenerationReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Period {}: {} created, {} already generated, {} skipped",
        report.period,
        report.created.len(),
        report.already_generated,
        report.skipped.len()
    )?;
    for entry in &report.created {
        writeln!(out, "  {}", format_entry_line(entry))?;
    }
    for skipped in &report.skipped {
        writeln!(
            out,
            "  skipped #{} {}: {}",
            skipped.blueprint_id, skipped.description, skipped.reason
        )?;
    }
    Ok(out)
}

/// One line per cached month followed by the year total.
pub fn format_revenue_months(year: i32, months: &[CacheEntry]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for entry in months {
        writeln!(
            out,
            "{}  sessions ${:>10.2}  extra ${:>10.2}  total ${:>10.2}",
            entry.period,
            entry.operational_revenue,
            entry.extra_revenue,
            entry.total()
        )?;
    }
    let total: f64 = months.iter().map(CacheEntry::total).sum();
    write!(out, "{year} total: ${total:.2}")?;
    Ok(out)
}

/// Lists detected issues, or states that none were found.
pub fn format_issues(issues: &[IntegrityIssue]) -> Result<String, std::fmt::Error> {
    if issues.is_empty() {
        return Ok("No integrity issues found.".to_string());
    }
    let mut out = String::new();
    writeln!(out, "{} integrity issues:", issues.len())?;
    for issue in issues {
        writeln!(out, "  - {issue}")?;
    }
    Ok(out)
}

/// Summary of a repair pass and what is left afterwards.
pub fn format_repair(
    report: &RepairReport,
    remaining: &[IntegrityIssue],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Repaired {} issues, {} failed.",
        report.repaired.len(),
        report.failed.len()
    )?;
    for (issue, message) in &report.failed {
        writeln!(out, "  failed: {issue} ({message})")?;
    }
    if remaining.is_empty() {
        write!(out, "Data is consistent.")?;
    } else {
        write!(out, "{} issues remain.", remaining.len())?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{period::Period, recurring::SkipReason, recurring::SkippedBlueprint},
        entities::EntryCategory,
        test_utils::*,
    };
    use chrono::Utc;

    fn entry(kind: EntryKind, amount: f64, pending: bool) -> ledger_entry::Model {
        let now = Utc::now();
        ledger_entry::Model {
            id: 7,
            kind,
            category: EntryCategory::Software,
            description: "Editing suite".to_string(),
            amount,
            amount_pending: pending,
            entry_date: date(2025, 7, 15),
            notes: None,
            blueprint_id: Some(1),
            recurrence_period: Some("2025-07".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_format_amount_sign() {
        assert_eq!(format_amount(52.0), "+$52.00");
        assert_eq!(format_amount(-10.5), "-$10.50");
        assert_eq!(format_amount(0.0), "+$0.00");
    }

    #[test]
    fn test_expense_line_is_negative() {
        let line = format_entry_line(&entry(EntryKind::Expense, 52.0, false));
        assert_eq!(line, "#7 2025-07-15 | -$52.00 | software | Editing suite");
    }

    #[test]
    fn test_pending_line_hides_placeholder() {
        let line = format_entry_line(&entry(EntryKind::Expense, 0.0, true));
        assert!(line.contains("pending"));
        assert!(!line.contains("$0.00"));
    }

    #[test]
    fn test_generation_report_lists_skips() {
        let report = GenerationReport {
            period: Period::new(2025, 7).unwrap(),
            created: vec![entry(EntryKind::Expense, 52.0, false)],
            already_generated: 2,
            skipped: vec![SkippedBlueprint {
                blueprint_id: 3,
                description: "Broken".to_string(),
                reason: SkipReason::MissingAmount,
            }],
        };
        let text = format_generation_report(&report).unwrap();
        assert!(text.starts_with("Period 2025-07: 1 created, 2 already generated, 1 skipped"));
        assert!(text.contains("skipped #3 Broken: fixed blueprint has no amount"));
    }

    #[test]
    fn test_format_issues_empty() {
        assert_eq!(format_issues(&[]).unwrap(), "No integrity issues found.");
    }

    #[test]
    fn test_format_repair_consistent() {
        let report = RepairReport {
            repaired: vec![IntegrityIssue::MissingSession { appointment_id: 4 }],
            failed: Vec::new(),
        };
        let text = format_repair(&report, &[]).unwrap();
        assert_eq!(text, "Repaired 1 issues, 0 failed.\nData is consistent.");
    }
}
