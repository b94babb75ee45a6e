use indexmap::IndexMap;
use jiff::{
    ToSpan,
    civil::{Date, Weekday},
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ApplicationError, ApplicationResult},
    runway::Runway,
};

/// Night alternation for one week. Westerly operations land on `primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NightPair {
    pub primary: Runway,
    pub secondary: Runway,
}

impl NightPair {
    pub fn for_wind(self, westerly: bool) -> Runway {
        if westerly {
            self.primary
        } else {
            self.secondary
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunwaySchedule {
    day: IndexMap<Date, Runway>,
    night: IndexMap<Date, NightPair>,
    day_fallback: Runway,
    night_fallback: NightPair,
}

/// Monday of the week `date` falls in.
pub fn week_start(date: Date) -> Date {
    let offset = i64::from(date.weekday().to_monday_zero_offset());
    date.saturating_sub(offset.days())
}

fn parse_week_keys<T: Copy>(table: &IndexMap<String, T>) -> ApplicationResult<IndexMap<Date, T>> {
    table
        .iter()
        .map(|(key, value)| {
            let week: Date = key.trim().parse()?;
            if week.weekday() != Weekday::Monday {
                return Err(ApplicationError::ScheduleWeekNotMonday(week));
            }
            Ok((week, *value))
        })
        .collect()
}

impl RunwaySchedule {
    pub fn new(
        day: &IndexMap<String, Runway>,
        night: &IndexMap<String, NightPair>,
        day_fallback: Runway,
        night_fallback: NightPair,
    ) -> ApplicationResult<Self> {
        Ok(Self {
            day: parse_week_keys(day)?,
            night: parse_week_keys(night)?,
            day_fallback,
            night_fallback,
        })
    }

    /// Day alternation does not depend on the wind.
    pub fn day_runway(&self, date: Date) -> Runway {
        let week = week_start(date);
        match self.day.get(&week) {
            Some(&runway) => runway,
            None => {
                debug!(%week, fallback = %self.day_fallback, "Week missing from day alternation");
                self.day_fallback
            }
        }
    }

    pub fn night_runway(&self, date: Date, westerly: bool) -> Runway {
        let week = week_start(date);
        let pair = match self.night.get(&week) {
            Some(&pair) => pair,
            None => {
                debug!(%week, "Week missing from night alternation");
                self.night_fallback
            }
        };
        pair.for_wind(westerly)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn test_schedule() -> RunwaySchedule {
        let day = IndexMap::from([
            ("2025-08-04".to_string(), Runway::R27L),
            ("2025-08-11".to_string(), Runway::R27R),
        ]);
        let night = IndexMap::from([
            (
                "2025-08-04".to_string(),
                NightPair {
                    primary: Runway::R27L,
                    secondary: Runway::R09R,
                },
            ),
            (
                "2025-08-11".to_string(),
                NightPair {
                    primary: Runway::R09L,
                    secondary: Runway::R27R,
                },
            ),
        ]);
        let fallback = NightPair {
            primary: Runway::R27L,
            secondary: Runway::R09R,
        };
        RunwaySchedule::new(&day, &night, Runway::R27L, fallback).unwrap()
    }

    #[test]
    fn test_week_start_is_stable_within_week() {
        let monday = date(2025, 8, 11);
        for day in 11..=17 {
            assert_eq!(week_start(date(2025, 8, day)), monday);
        }
        assert_eq!(week_start(date(2025, 8, 18)), date(2025, 8, 18));
        assert_eq!(week_start(date(2025, 8, 10)), date(2025, 8, 4));
    }

    #[test]
    fn test_week_start_crosses_month_and_year() {
        assert_eq!(week_start(date(2025, 9, 3)), date(2025, 9, 1));
        assert_eq!(week_start(date(2025, 10, 2)), date(2025, 9, 29));
        assert_eq!(week_start(date(2026, 1, 1)), date(2025, 12, 29));
        assert_eq!(week_start(date(2025, 8, 17)).to_string(), "2025-08-11");
    }

    #[test]
    fn test_day_runway() {
        let schedule = test_schedule();
        assert_eq!(schedule.day_runway(date(2025, 8, 6)), Runway::R27L);
        assert_eq!(schedule.day_runway(date(2025, 8, 17)), Runway::R27R);
    }

    #[test]
    fn test_night_runway_follows_wind() {
        let schedule = test_schedule();
        assert_eq!(schedule.night_runway(date(2025, 8, 12), true), Runway::R09L);
        assert_eq!(schedule.night_runway(date(2025, 8, 12), false), Runway::R27R);
    }

    #[test]
    fn test_missing_weeks_fall_back() {
        let schedule = test_schedule();
        assert_eq!(schedule.day_runway(date(2031, 3, 5)), Runway::R27L);
        assert_eq!(schedule.night_runway(date(2031, 3, 5), true), Runway::R27L);
        assert_eq!(schedule.night_runway(date(2031, 3, 5), false), Runway::R09R);
    }

    #[test]
    fn test_week_keys_must_be_mondays() {
        let day = IndexMap::from([("2025-08-05".to_string(), Runway::R27L)]);
        let fallback = NightPair {
            primary: Runway::R27L,
            secondary: Runway::R09R,
        };
        let result = RunwaySchedule::new(&day, &IndexMap::new(), Runway::R27L, fallback);
        assert!(matches!(
            result,
            Err(ApplicationError::ScheduleWeekNotMonday(week)) if week == date(2025, 8, 5)
        ));
    }

    #[test]
    fn test_week_keys_must_be_dates() {
        let day = IndexMap::from([("next monday".to_string(), Runway::R27L)]);
        let fallback = NightPair {
            primary: Runway::R27L,
            secondary: Runway::R09R,
        };
        let result = RunwaySchedule::new(&day, &IndexMap::new(), Runway::R27L, fallback);
        assert!(matches!(result, Err(ApplicationError::TimeError(_))));
    }
}
