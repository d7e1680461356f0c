//! Monthly revenue cache
//!
//! Keeps operational revenue (workflow sessions) and extra revenue (income
//! ledger entries) aggregated per calendar month so that dashboards never sum
//! raw records on every read. Rows live in the `revenue_cache` table and are
//! mirrored in memory.
//!
//! The cache is an explicit service object: [`RevenueCache::open`] checks the
//! stored format version and wipes everything on mismatch, and
//! [`RevenueCache::reset`] clears it on demand. There is no partial migration
//! between versions.

use super::{agenda, ledger, period::Period, state};
use crate::{
    entities::{
        EntryKind, RevenueCache as RevenueCacheTable, ledger_entry, revenue_cache,
        workflow_session,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Current cache format. Changing it invalidates every cached month.
pub const CACHE_FORMAT_VERSION: &str = "2";

const CACHE_VERSION_KEY: &str = "revenue_cache_version";

/// Aggregated revenue for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Month the aggregates belong to
    pub period: Period,
    /// Revenue from workflow sessions
    pub operational_revenue: f64,
    /// Revenue from income ledger entries
    pub extra_revenue: f64,
    /// When the aggregates were last written
    pub updated_at: DateTime<Utc>,
    /// Identifier in a remote copy, preserved across updates
    pub remote_id: Option<String>,
    /// Last push to the remote copy
    pub remote_synced_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    /// Operational plus extra revenue
    #[must_use]
    pub fn total(&self) -> f64 {
        self.operational_revenue + self.extra_revenue
    }
}

impl TryFrom<revenue_cache::Model> for CacheEntry {
    type Error = Error;

    fn try_from(row: revenue_cache::Model) -> Result<Self> {
        Ok(Self {
            period: Period::new(row.year, u32::try_from(row.month)?)?,
            operational_revenue: row.operational_revenue,
            extra_revenue: row.extra_revenue,
            updated_at: row.updated_at,
            remote_id: row.remote_id,
            remote_synced_at: row.remote_synced_at,
        })
    }
}

/// Raw records a year of revenue is computed from.
#[derive(Debug, Clone, Default)]
pub struct RevenueSources {
    /// Workflow sessions
    pub sessions: Vec<workflow_session::Model>,
    /// Ledger entries; only settled income counts
    pub entries: Vec<ledger_entry::Model>,
}

impl RevenueSources {
    /// `(operational, extra)` revenue inside `period`.
    #[must_use]
    pub fn totals_for(&self, period: Period) -> (f64, f64) {
        let operational = self
            .sessions
            .iter()
            .filter(|s| period.contains(s.session_date))
            .map(|s| s.total_value)
            .sum();
        let extra = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Income && !e.amount_pending)
            .filter(|e| period.contains(e.entry_date))
            .map(|e| e.amount)
            .sum();
        (operational, extra)
    }
}

/// Loads the sessions and ledger entries of `year`.
pub async fn load_sources<C>(db: &C, year: i32) -> Result<RevenueSources>
where
    C: ConnectionTrait,
{
    Ok(RevenueSources {
        sessions: agenda::get_sessions_for_year(db, year).await?,
        entries: ledger::get_entries_for_year(db, year).await?,
    })
}

fn validate_revenue(amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount { amount })
    }
}

/// Writes one month, keeping remote identifiers of an existing row.
async fn upsert_row<C>(
    db: &C,
    period: Period,
    operational_revenue: f64,
    extra_revenue: f64,
    now: DateTime<Utc>,
) -> Result<CacheEntry>
where
    C: ConnectionTrait,
{
    let month = i32::try_from(period.month())?;
    let existing = RevenueCacheTable::find_by_id((period.year(), month))
        .one(db)
        .await?;

    let row = if let Some(row) = existing {
        let mut active: revenue_cache::ActiveModel = row.into();
        active.operational_revenue = Set(operational_revenue);
        active.extra_revenue = Set(extra_revenue);
        active.updated_at = Set(now);
        active.update(db).await?
    } else {
        revenue_cache::ActiveModel {
            year: Set(period.year()),
            month: Set(month),
            operational_revenue: Set(operational_revenue),
            extra_revenue: Set(extra_revenue),
            updated_at: Set(now),
            remote_id: Set(None),
            remote_synced_at: Set(None),
        }
        .insert(db)
        .await?
    };

    CacheEntry::try_from(row)
}

/// Month-keyed revenue cache backed by the `revenue_cache` table.
#[derive(Debug, Clone)]
pub struct RevenueCache {
    db: Arc<DatabaseConnection>,
    version: String,
    entries: Arc<RwLock<BTreeMap<Period, CacheEntry>>>,
}

impl RevenueCache {
    /// Opens the cache with the current [`CACHE_FORMAT_VERSION`].
    pub async fn open(db: Arc<DatabaseConnection>) -> Result<Self> {
        Self::open_with_version(db, CACHE_FORMAT_VERSION).await
    }

    /// Opens the cache, wiping every row if the stored version differs from `version`.
    #[instrument(skip(db))]
    pub async fn open_with_version(db: Arc<DatabaseConnection>, version: &str) -> Result<Self> {
        let stored = state::get_state_value(db.as_ref(), CACHE_VERSION_KEY).await?;

        if stored.as_deref() != Some(version) {
            let txn = db.begin().await?;
            let wiped = RevenueCacheTable::delete_many().exec(&txn).await?.rows_affected;
            state::set_state_value(&txn, CACHE_VERSION_KEY, version).await?;
            txn.commit().await?;
            warn!(
                "Revenue cache version changed ({:?} -> {}), wiped {} cached months",
                stored, version, wiped
            );
        }

        let mut entries = BTreeMap::new();
        for row in RevenueCacheTable::find().all(db.as_ref()).await? {
            let entry = CacheEntry::try_from(row)?;
            entries.insert(entry.period, entry);
        }
        info!("Revenue cache opened with {} cached months.", entries.len());

        Ok(Self {
            db,
            version: version.to_string(),
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Format version this cache was opened with
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Cached entry for the month, `None` if it was never computed.
    pub async fn get_month(&self, year: i32, month: u32) -> Option<CacheEntry> {
        let period = Period::new(year, month).ok()?;
        self.entries.read().await.get(&period).cloned()
    }

    /// All cached months of `year`, in calendar order.
    pub async fn months(&self, year: i32) -> Vec<CacheEntry> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.period.year() == year)
            .cloned()
            .collect()
    }

    /// Sum of cached totals for `year`.
    pub async fn year_total(&self, year: i32) -> f64 {
        self.months(year).await.iter().map(CacheEntry::total).sum()
    }

    /// Stores new aggregates for one month, keeping remote identifiers and stamping `updated_at`.
    #[instrument(skip(self))]
    pub async fn update_month(
        &self,
        year: i32,
        month: u32,
        operational_revenue: f64,
        extra_revenue: f64,
    ) -> Result<CacheEntry> {
        let period = Period::new(year, month)?;
        let entry = upsert_row(
            self.db.as_ref(),
            period,
            validate_revenue(operational_revenue)?,
            validate_revenue(extra_revenue)?,
            Utc::now(),
        )
        .await?;

        self.entries.write().await.insert(period, entry.clone());
        debug!("Cached revenue for {}: {:.2}", period, entry.total());
        Ok(entry)
    }

    /// Rebuilds all twelve months of `year` from `sources`.
    #[instrument(
        skip(self, sources),
        fields(sessions = sources.sessions.len(), entries = sources.entries.len())
    )]
    pub async fn recalculate_year(
        &self,
        year: i32,
        sources: &RevenueSources,
    ) -> Result<Vec<CacheEntry>> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        let mut rebuilt = Vec::with_capacity(12);
        for period in Period::months_of(year)? {
            let (operational, extra) = sources.totals_for(period);
            rebuilt.push(upsert_row(&txn, period, operational, extra, now).await?);
        }
        txn.commit().await?;

        let mut entries = self.entries.write().await;
        for entry in &rebuilt {
            entries.insert(entry.period, entry.clone());
        }
        info!("Recalculated revenue cache for {year}.");
        Ok(rebuilt)
    }

    /// Loads the raw records of `year` and rebuilds it.
    pub async fn refresh_year(&self, year: i32) -> Result<Vec<CacheEntry>> {
        let sources = load_sources(self.db.as_ref(), year).await?;
        self.recalculate_year(year, &sources).await
    }

    /// Records that a cached month was pushed to a remote copy.
    pub async fn record_remote_sync(
        &self,
        year: i32,
        month: u32,
        remote_id: &str,
    ) -> Result<CacheEntry> {
        let period = Period::new(year, month)?;
        let row = RevenueCacheTable::find_by_id((year, i32::try_from(month)?))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| {
                Error::invalid_input("period", format!("no cached revenue for {period}"))
            })?;

        let mut active: revenue_cache::ActiveModel = row.into();
        active.remote_id = Set(Some(remote_id.to_string()));
        active.remote_synced_at = Set(Some(Utc::now()));
        let entry = CacheEntry::try_from(active.update(self.db.as_ref()).await?)?;

        self.entries.write().await.insert(period, entry.clone());
        Ok(entry)
    }

    /// Drops every cached month. The version marker is kept.
    pub async fn reset(&self) -> Result<()> {
        let wiped = RevenueCacheTable::delete_many()
            .exec(self.db.as_ref())
            .await?
            .rows_affected;
        self.entries.write().await.clear();
        info!("Revenue cache reset ({wiped} months dropped).");
        Ok(())
    }
}
