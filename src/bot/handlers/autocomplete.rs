//! Autocomplete handlers for Discord slash command parameters.

use crate::{bot::BotData, core::period::Period, errors::Error};

/// Suggests `YYYY-MM` periods: next month, then the current month and back
/// to January of the previous year, filtered by what the user typed.
pub async fn autocomplete_period(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let current = Period::current();
    period_suggestions(current, partial)
}

fn period_suggestions(current: Period, partial: &str) -> Vec<String> {
    let latest = current.next();
    let mut periods: Vec<Period> = [current.year() - 1, current.year()]
        .into_iter()
        .filter_map(|year| Period::months_of(year).ok())
        .flatten()
        .chain([latest])
        .filter(|p| *p <= latest)
        .collect();
    periods.sort_unstable_by(|a, b| b.cmp(a));
    periods.dedup();

    let partial = partial.trim();
    periods
        .into_iter()
        .map(|p| p.to_string())
        .filter(|p| p.starts_with(partial))
        .take(25) // Discord autocomplete limit
        .collect()
}
