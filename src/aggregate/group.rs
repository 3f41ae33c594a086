use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use indexmap::map::Entry;
use indexmap::IndexMap;

use super::sample::Sample;

/// All samples sharing one calendar date, in input order
#[derive(Debug, Clone)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub first: &'a Sample,
    pub rest: Vec<&'a Sample>,
}

impl<'a> DayGroup<'a> {
    pub fn samples(&self) -> impl Iterator<Item = &'a Sample> + '_ {
        std::iter::once(self.first).chain(self.rest.iter().copied())
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always false: a group exists only once a sample lands on its date
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Wall-clock time of a unix timestamp in `tz`.
/// Timestamps outside chrono's range saturate to its bounds.
pub fn local_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> DateTime<Tz> {
    let utc = DateTime::from_timestamp(timestamp, 0).unwrap_or(if timestamp < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });
    utc.with_timezone(tz)
}

/// Group samples by their calendar date in `tz`.
///
/// Groups come back in the order their date first appears in `samples`,
/// not sorted by date.
pub fn group_by_date<'a, Tz: TimeZone>(samples: &'a [Sample], tz: &Tz) -> Vec<DayGroup<'a>> {
    let mut days: IndexMap<NaiveDate, DayGroup<'a>> = IndexMap::new();

    for sample in samples {
        let date = local_time(sample.timestamp, tz).date_naive();
        match days.entry(date) {
            Entry::Occupied(mut entry) => entry.get_mut().rest.push(sample),
            Entry::Vacant(entry) => {
                entry.insert(DayGroup {
                    date,
                    first: sample,
                    rest: Vec::new(),
                });
            }
        }
    }

    days.into_values().collect()
}
