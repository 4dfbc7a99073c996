//! Groups timestamped records into period buckets and tallies categories.
//!
//! Each aggregation kind has a fixed set of counters ([`StatusCounts`] for
//! applications, [`RoleCounts`] for users). A record whose category has no
//! counter still counts toward the bucket total and is tracked as
//! uncategorized, so `total == counters + uncategorized` always holds.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::application::ApplicationStatus;
use crate::models::user::UserRole;
use crate::services::period::{period_key, PeriodMode};

/// Fixed per-category counters of one bucket.
pub trait Counters: Default {
    type Category: Copy;

    /// Increment the counter for `category`. Returns `false` when this
    /// aggregation kind keeps no counter for it.
    fn record(&mut self, category: Self::Category) -> bool;

    /// Sum of all counters.
    fn counted(&self) -> u64;
}

/// A record that can be placed into a period bucket.
pub trait Tallied {
    type Counts: Counters;

    fn timestamp(&self) -> DateTime<Utc>;

    fn category(&self) -> <Self::Counts as Counters>::Category;
}

/// Per-status counters for application buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "APPROVED")]
    pub approved: u64,
    #[serde(rename = "REJECTED")]
    pub rejected: u64,
    #[serde(rename = "PENDING")]
    pub pending: u64,
}

impl Counters for StatusCounts {
    type Category = ApplicationStatus;

    fn record(&mut self, category: ApplicationStatus) -> bool {
        match category {
            ApplicationStatus::Approved => self.approved += 1,
            ApplicationStatus::Rejected => self.rejected += 1,
            ApplicationStatus::Pending => self.pending += 1,
        }
        true
    }

    fn counted(&self) -> u64 {
        self.approved + self.rejected + self.pending
    }
}

/// Per-role counters for user buckets. Administrators have no counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    #[serde(rename = "CLIENT")]
    pub client: u64,
    #[serde(rename = "COUNSELOR")]
    pub counselor: u64,
}

impl Counters for RoleCounts {
    type Category = UserRole;

    fn record(&mut self, category: UserRole) -> bool {
        match category {
            UserRole::Client => self.client += 1,
            UserRole::Counselor => self.counselor += 1,
            UserRole::Admin => return false,
        }
        true
    }

    fn counted(&self) -> u64 {
        self.client + self.counselor
    }
}

/// One aggregation row: a period label, its total, and category counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket<C> {
    pub period: String,
    pub total: u64,
    #[serde(flatten)]
    pub counts: C,
    #[serde(skip)]
    pub uncategorized: u64,
}

impl<C: Counters> Bucket<C> {
    fn empty(period: String) -> Self {
        Self {
            period,
            total: 0,
            counts: C::default(),
            uncategorized: 0,
        }
    }

    fn add(&mut self, category: C::Category) {
        self.total += 1;
        if !self.counts.record(category) {
            self.uncategorized += 1;
        }
    }

    /// Whether the total matches the counters plus uncategorized records.
    pub fn is_balanced(&self) -> bool {
        self.total == self.counts.counted() + self.uncategorized
    }
}

pub type ApplicationRow = Bucket<StatusCounts>;
pub type UserRow = Bucket<RoleCounts>;

/// Group `records` into buckets keyed by period.
///
/// Rows come back in order of each period's first appearance in `records`;
/// use [`sort_chronologically`] when callers need calendar order.
pub fn aggregate<R, Tz>(records: &[R], mode: PeriodMode, tz: &Tz) -> Vec<Bucket<R::Counts>>
where
    R: Tallied,
    Tz: TimeZone,
{
    let mut rows: Vec<Bucket<R::Counts>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = period_key(&record.timestamp(), mode, tz);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), rows.len());
                rows.push(Bucket::empty(key));
                rows.len() - 1
            }
        };
        rows[slot].add(record.category());
    }

    rows
}

/// Sort rows by period key. Both key formats sort lexically in calendar order.
pub fn sort_chronologically<C>(rows: &mut [Bucket<C>]) {
    rows.sort_by(|a, b| a.period.cmp(&b.period));
}
