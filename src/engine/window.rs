// src/engine/window.rs

use super::EngineError;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse reporting period selected on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
}

/// Which side of the comparison an invoice falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodSide {
    Current,
    Previous,
}

/// Inclusive timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Current period and the equivalent-length previous period it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeriodWindow {
    pub current: DateRange,
    pub previous: DateRange,
}

impl PeriodWindow {
    pub fn new(current: DateRange, previous: DateRange) -> Self {
        Self { current, previous }
    }

    /// Resolve a period selector against "now" as seen in `offset`.
    ///
    /// The current range runs from the start of the calendar week (Monday) or month
    /// through the end of today; the previous range is the same shape shifted back
    /// one week or one calendar month. Month shifts clamp the day-of-month, so
    /// March 31 compares against the last day of February.
    pub fn resolve(period: Period, now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();

        let (current_start, previous_start, previous_end) = match period {
            Period::Week => {
                let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                (start, start - Duration::days(7), today - Duration::days(7))
            }
            Period::Month => {
                let start = today.with_day(1).unwrap_or(today);
                let previous_start = start.checked_sub_months(Months::new(1)).unwrap_or(start);
                let previous_end = today.checked_sub_months(Months::new(1)).unwrap_or(today);
                (start, previous_start, previous_end)
            }
        };

        Self {
            current: DateRange::new(
                start_of_day(current_start, offset),
                end_of_day(today, offset),
            ),
            previous: DateRange::new(
                start_of_day(previous_start, offset),
                end_of_day(previous_end, offset),
            ),
        }
    }

    /// Reject inverted ranges and a previous range that reaches into the current one.
    /// Bounds are never swapped or clamped.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.current.start > self.current.end {
            return Err(EngineError::InvalidWindow(format!(
                "current range starts at {} after it ends at {}",
                self.current.start, self.current.end
            )));
        }
        if self.previous.start > self.previous.end {
            return Err(EngineError::InvalidWindow(format!(
                "previous range starts at {} after it ends at {}",
                self.previous.start, self.previous.end
            )));
        }
        if self.previous.end > self.current.start {
            return Err(EngineError::InvalidWindow(format!(
                "previous range ends at {} after the current range starts at {}",
                self.previous.end, self.current.start
            )));
        }
        Ok(())
    }

    pub fn classify(&self, date: DateTime<Utc>) -> PeriodSide {
        if date >= self.current.start {
            PeriodSide::Current
        } else {
            PeriodSide::Previous
        }
    }

    /// Overall range the invoice source has to cover.
    pub fn fetch_range(&self) -> DateRange {
        DateRange::new(self.previous.start, self.current.end)
    }
}

fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    local_to_utc(date, NaiveTime::MIN, offset)
}

fn end_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let last_nano = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
    local_to_utc(date, last_nano, offset)
}

fn local_to_utc(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<Utc> {
    // A fixed offset has no gaps or folds, so the conversion is exact.
    let local = date.and_time(time);
    DateTime::<Utc>::from_naive_utc_and_offset(local - offset, Utc)
}
