//! Request-scoped values: the tenant identity and date ranges.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};

use crate::error::{EngineError, EngineResult};

/// The salon on whose behalf an operation runs.
///
/// Construction fails closed: a blank salon id is rejected up front rather
/// than silently matching nothing (or worse, everything) downstream. Every
/// engine operation takes a `&TenantContext`, so an operation without one
/// does not typecheck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    salon_id: String,
}

impl TenantContext {
    pub fn new(salon_id: impl Into<String>) -> EngineResult<Self> {
        let salon_id = salon_id.into();
        if salon_id.trim().is_empty() {
            return Err(EngineError::MissingTenantContext);
        }
        Ok(TenantContext { salon_id })
    }

    pub fn salon_id(&self) -> &str {
        &self.salon_id
    }
}

/// An inclusive calendar-day range, as callers express queries.
///
/// `bounds` converts it to the half-open UTC instant interval
/// `[from 00:00, to+1day 00:00)` used by the storage queries, so an
/// appointment starting at 23:59 on the last day is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> EngineResult<Self> {
        if from > to {
            return Err(EngineError::InvalidInput(format!(
                "range start {from} is after range end {to}"
            )));
        }
        Ok(DateRange { from, to })
    }

    /// A range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        DateRange { from: day, to: day }
    }

    /// Half-open `[start, end)` instant bounds for storage queries.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.from.and_time(NaiveTime::MIN).and_utc();
        let end = (self.to + Days::new(1)).and_time(NaiveTime::MIN).and_utc();
        (start, end)
    }
}
