use chrono::{TimeZone, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use super::group::{local_time, DayGroup};
use super::sample::Sample;
use crate::condition::{is_daytime_code, Condition};

/// Local wall-clock hour the near-noon view aims for (11:30)
const MIDDAY_HOUR: f64 = 11.5;

/// Per-day reduction applied to each calendar-date group
pub trait DayStrategy {
    type Output;

    fn reduce<Tz: TimeZone>(&self, group: &DayGroup<'_>, tz: &Tz) -> Self::Output;

    /// Reorder the reduced days before truncation. Default keeps first-seen order.
    fn arrange(&self, _days: &mut Vec<Self::Output>) {}
}

/// Aggregated view of every sample sharing a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DaySummary {
    /// Calendar date key (YYYY-MM-DD)
    pub date: String,
    /// Timestamp of the first sample seen for this date
    pub timestamp: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Representative icon code, preferring a daytime variant
    pub icon: String,
    pub condition: Condition,
    /// Description of the first sample seen for this date
    pub description: String,
}

/// Min/max temperature summary per day
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl DayStrategy for MinMax {
    type Output = DaySummary;

    fn reduce<Tz: TimeZone>(&self, group: &DayGroup<'_>, _tz: &Tz) -> DaySummary {
        let first = group.first;
        let mut summary = DaySummary {
            date: group.date.format("%Y-%m-%d").to_string(),
            timestamp: first.timestamp,
            temp_min: first.temperature,
            temp_max: first.temperature,
            icon: first.condition_code.clone(),
            condition: first.condition(),
            description: first.description.clone(),
        };

        for sample in &group.rest {
            summary.temp_min = summary.temp_min.min(sample.temperature);
            summary.temp_max = summary.temp_max.max(sample.temperature);
            // last daytime code wins
            if is_daytime_code(&sample.condition_code) {
                summary.icon = sample.condition_code.clone();
            }
        }

        summary.condition = Condition::from_icon_code(&summary.icon);
        summary
    }
}

/// One sample per day: the one nearest to local 11:30, output chronologically
#[derive(Debug, Clone, Copy, Default)]
pub struct NearNoon;

impl NearNoon {
    fn distance<Tz: TimeZone>(sample: &Sample, tz: &Tz) -> f64 {
        let local = local_time(sample.timestamp, tz);
        let hour = f64::from(local.hour()) + f64::from(local.minute()) / 60.0;
        (hour - MIDDAY_HOUR).abs()
    }
}

impl DayStrategy for NearNoon {
    type Output = Sample;

    fn reduce<Tz: TimeZone>(&self, group: &DayGroup<'_>, tz: &Tz) -> Sample {
        let mut best = group.first;
        let mut best_distance = Self::distance(best, tz);

        for &sample in &group.rest {
            let distance = Self::distance(sample, tz);
            if distance < best_distance {
                best = sample;
                best_distance = distance;
            }
        }

        best.clone()
    }

    fn arrange(&self, days: &mut Vec<Sample>) {
        days.sort_by_key(|sample| sample.timestamp);
    }
}
