//! Calendar keys used to index monthly series.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);
impl Year {
    pub fn get(self) -> i32 {
        self.0
    }

    /// All twelve months of this year, January first.
    pub fn months(self) -> impl Iterator<Item = Month> {
        (1..=12).map(move |m| Month::new(m, self.0))
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month, stored as `(year, month)` so the derived ordering is chronological.
///
/// # Examples
///
/// ```
/// use era5_spi::Month;
///
/// let feb = Month::new(2, 2022);
/// assert_eq!(feb.to_string(), "2022-02");
/// assert_eq!(feb.succ(), Month::new(3, 2022));
/// assert_eq!(Month::new(12, 2022).succ(), Month::new(1, 2023));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);
impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year(), date.month())
    }

    /// First day of the month, or `None` if the month number is out of range.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    /// Carries an out of range month number into the year, e.g. month 13 of 2020 is 2021-01
    /// and month 0 is December of the previous year.
    pub fn normalised(self) -> Self {
        let months = i64::from(self.0) * 12 + i64::from(self.1) - 1;
        Self(months.div_euclid(12) as i32, months.rem_euclid(12) as u32 + 1)
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.1 >= 12 {
            Self(self.0 + 1, 1)
        } else {
            Self(self.0, self.1 + 1)
        }
    }

    /// Three letter English abbreviation ("Jan", "Feb", ...).
    pub fn abbreviation(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        self.1
            .checked_sub(1)
            .and_then(|i| NAMES.get(i as usize))
            .copied()
            .unwrap_or("???")
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

pub struct StartEndMonth {
    pub start: Month,
    pub end: Month,
}

/// Anything that resolves to an inclusive range of months.
pub trait AnyMonth {
    fn get_month_range(self) -> Option<StartEndMonth>;
}

impl AnyMonth for Month {
    fn get_month_range(self) -> Option<StartEndMonth> {
        if !(1..=12).contains(&self.1) {
            return None;
        }
        Some(StartEndMonth {
            start: self,
            end: self,
        })
    }
}

impl AnyMonth for Year {
    fn get_month_range(self) -> Option<StartEndMonth> {
        Some(StartEndMonth {
            start: Month(self.0, 1),
            end: Month(self.0, 12),
        })
    }
}

impl AnyMonth for NaiveDate {
    fn get_month_range(self) -> Option<StartEndMonth> {
        Month::from_date(self).get_month_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_ordering_is_chronological() {
        let mut months = vec![
            Month::new(1, 2021),
            Month::new(12, 2020),
            Month::new(6, 2020),
        ];
        months.sort();
        assert_eq!(
            months,
            vec![
                Month::new(6, 2020),
                Month::new(12, 2020),
                Month::new(1, 2021)
            ]
        );
    }

    #[test]
    fn test_month_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2016, 5, 17).unwrap();
        let month = Month::from_date(date);
        assert_eq!(month, Month::new(5, 2016));
        assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2016, 5, 1));
        assert_eq!(Month::new(13, 2016).first_day(), None);
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(Month::new(1, 2000).abbreviation(), "Jan");
        assert_eq!(Month::new(12, 2000).abbreviation(), "Dec");
        assert_eq!(Month::new(0, 2000).abbreviation(), "???");
    }

    #[test]
    fn test_year_range() {
        let range = Year(2022).get_month_range().unwrap();
        assert_eq!(range.start, Month::new(1, 2022));
        assert_eq!(range.end, Month::new(12, 2022));
        assert_eq!(Year(2022).months().count(), 12);
        assert!(Month::new(13, 2022).get_month_range().is_none());
    }
}
