//! Daily forecast aggregation.
//!
//! Turns a list of 3-hour forecast samples into per-calendar-day views. Dates
//! are always derived in an explicit time zone handed to the aggregator.

mod group;
mod sample;
mod strategy;

pub use group::{group_by_date, local_time, DayGroup};
pub use sample::{MalformedSampleError, RawSample, Sample, SampleField};
pub use strategy::{DayStrategy, DaySummary, MinMax, NearNoon};

use chrono::{TimeZone, Utc};

/// Number of days emitted when no limit is configured
pub const DEFAULT_MAX_DAYS: usize = 5;

/// Groups samples by calendar date and reduces each day with a [`DayStrategy`]
#[derive(Debug, Clone)]
pub struct DailyAggregator<Tz: TimeZone = Utc> {
    max_days: usize,
    tz: Tz,
}

impl DailyAggregator<Utc> {
    pub fn utc(max_days: usize) -> Self {
        Self::new(max_days, Utc)
    }
}

impl Default for DailyAggregator<Utc> {
    fn default() -> Self {
        Self::utc(DEFAULT_MAX_DAYS)
    }
}

impl<Tz: TimeZone> DailyAggregator<Tz> {
    pub fn new(max_days: usize, tz: Tz) -> Self {
        Self { max_days, tz }
    }

    pub fn max_days(&self) -> usize {
        self.max_days
    }

    pub fn time_zone(&self) -> &Tz {
        &self.tz
    }

    /// Reduce every date group with `strategy`, arrange, then keep the first `max_days`
    pub fn run<S: DayStrategy>(&self, samples: &[Sample], strategy: &S) -> Vec<S::Output> {
        let mut days: Vec<S::Output> = group_by_date(samples, &self.tz)
            .iter()
            .map(|group| strategy.reduce(group, &self.tz))
            .collect();

        strategy.arrange(&mut days);
        days.truncate(self.max_days);
        days
    }

    /// Min/max summaries in first-seen date order
    pub fn summarize(&self, samples: &[Sample]) -> Vec<DaySummary> {
        self.run(samples, &MinMax)
    }

    /// Near-noon representative sample per day, chronologically
    pub fn select_midday(&self, samples: &[Sample]) -> Vec<Sample> {
        self.run(samples, &NearNoon)
    }

    /// Validate raw feed entries, then summarize them.
    ///
    /// Fails on the first malformed entry without producing partial output.
    pub fn daily_summaries<R: RawSample>(
        &self,
        items: &[R],
    ) -> Result<Vec<DaySummary>, MalformedSampleError> {
        let samples = to_samples(items)?;
        Ok(self.summarize(&samples))
    }

    pub fn midday_samples<R: RawSample>(
        &self,
        items: &[R],
    ) -> Result<Vec<Sample>, MalformedSampleError> {
        let samples = to_samples(items)?;
        Ok(self.select_midday(&samples))
    }
}

/// Convert every raw entry, stopping at the first malformed one
pub fn to_samples<R: RawSample>(items: &[R]) -> Result<Vec<Sample>, MalformedSampleError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| Sample::from_raw(index, item))
        .collect()
}
