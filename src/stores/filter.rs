use std::str::FromStr;

use chrono::Month;

use crate::models::Trip;

/// Month criterion of the list view. `All` is the empty selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("month filter must be empty or a number from 1 to 12, got {0:?}")]
pub struct InvalidMonth(pub String);

impl FromStr for MonthFilter {
    type Err = InvalidMonth;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(MonthFilter::All);
        }
        match trimmed.parse::<u32>() {
            Ok(month @ 1..=12) => Ok(MonthFilter::Month(month)),
            _ => Err(InvalidMonth(raw.to_string())),
        }
    }
}

impl MonthFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(month) => trip.start_month() == *month,
        }
    }

    /// English month name for 1..=12.
    pub fn month_name(month: u32) -> &'static str {
        u8::try_from(month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .map(|month| month.name())
            .unwrap_or("")
    }
}

/// Trips whose start month matches, in their original order.
pub fn filter_by_month(trips: &[Trip], filter: MonthFilter) -> Vec<Trip> {
    trips
        .iter()
        .filter(|trip| filter.matches(trip))
        .cloned()
        .collect()
}
