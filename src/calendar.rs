use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DAY_COUNT: usize = 7;
pub const HOUR_COUNT: usize = 12;
pub const FIRST_HOUR: u8 = 7;
pub const LAST_HOUR: u8 = FIRST_HOUR + HOUR_COUNT as u8 - 1;

/// Day column of the weekly grid, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; DAY_COUNT] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }

    /// Day column for today's date in local time.
    pub fn today() -> Self {
        use chrono::Datelike;
        Self::from(chrono::Local::now().weekday())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day '{0}' (expected Mon..Sun)")]
pub struct ParseDayError(String);

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|day| day.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDayError(trimmed.to_string()))
    }
}

impl From<Weekday> for Day {
    fn from(value: Weekday) -> Self {
        Self::ALL[value.num_days_from_monday() as usize]
    }
}

impl From<Day> for Weekday {
    fn from(value: Day) -> Self {
        match value {
            Day::Mon => Weekday::Mon,
            Day::Tue => Weekday::Tue,
            Day::Wed => Weekday::Wed,
            Day::Thu => Weekday::Thu,
            Day::Fri => Weekday::Fri,
            Day::Sat => Weekday::Sat,
            Day::Sun => Weekday::Sun,
        }
    }
}

/// One hour row of the grid, 7:00 through 18:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourSlot(u8);

impl HourSlot {
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (FIRST_HOUR..=LAST_HOUR).map(HourSlot)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index < HOUR_COUNT {
            Some(HourSlot(FIRST_HOUR + index as u8))
        } else {
            None
        }
    }

    pub(crate) fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < HOUR_COUNT);
        HourSlot(FIRST_HOUR + index as u8)
    }

    pub fn from_hour(hour: u8) -> Option<Self> {
        (FIRST_HOUR..=LAST_HOUR).contains(&hour).then_some(HourSlot(hour))
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0 - FIRST_HOUR)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:00", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_labels_parse_case_insensitively() {
        assert_eq!("wed".parse::<Day>().unwrap(), Day::Wed);
        assert_eq!(" SUN ".parse::<Day>().unwrap(), Day::Sun);
        assert_eq!(
            "Funday".parse::<Day>().unwrap_err().to_string(),
            "unknown day 'Funday' (expected Mon..Sun)"
        );
    }

    #[test]
    fn day_weekday_conversion_is_symmetric() {
        for day in Day::ALL {
            let weekday: Weekday = day.into();
            assert_eq!(Day::from(weekday), day);
        }
    }

    #[test]
    fn hour_slots_cover_seven_to_eighteen() {
        let hours: Vec<u8> = HourSlot::all().map(HourSlot::hour).collect();
        assert_eq!(hours.len(), HOUR_COUNT);
        assert_eq!(hours.first(), Some(&7));
        assert_eq!(hours.last(), Some(&18));
        assert_eq!(HourSlot::from_hour(6), None);
        assert_eq!(HourSlot::from_hour(19), None);
        assert_eq!(HourSlot::from_index(2).map(|h| h.to_string()), Some("9:00".into()));
        assert_eq!(HourSlot::from_index(HOUR_COUNT), None);
    }
}
