use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::LalificadorError;

/// A `YYYY-MM` stamp prefixed to every normalized file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period(String);

fn folder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]{4})\.([0-9]{2})").expect("valid folder pattern"))
}

fn period_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}$").expect("valid period pattern"))
}

impl Period {
    /// Reads a period from a folder named like `2024.06` or `2024.06 Junio`.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        folder_pattern()
            .captures(name)
            .map(|caps| Self(format!("{}-{}", &caps[1], &caps[2])))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }

    /// The local year-month of the wall clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Period {
    type Err = LalificadorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if period_pattern().is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(LalificadorError::InvalidPeriod {
                value: s.to_string(),
            })
        }
    }
}

/// Derives the period for a file from the name of its parent folder, falling
/// back to `today` when the folder carries no `YYYY.MM` prefix.
pub fn resolve_period(parent_name: Option<&str>, today: NaiveDate) -> Period {
    match parent_name.and_then(Period::from_folder_name) {
        Some(period) => period,
        None => {
            debug!("No period in folder name {:?}, using {}", parent_name, today);
            Period::from_date(today)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn june_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 17).unwrap()
    }

    #[test]
    fn test_folder_name_supplies_period() {
        assert_eq!(resolve_period(Some("2024.06"), june_2025()).as_str(), "2024-06");
        assert_eq!(
            resolve_period(Some("2023.11 Facturas Noviembre"), june_2025()).as_str(),
            "2023-11"
        );
    }

    #[test]
    fn test_folder_prefix_must_be_at_start() {
        assert_eq!(resolve_period(Some("Pagos 2024.06"), june_2025()).as_str(), "2025-06");
        assert_eq!(resolve_period(Some("24.06"), june_2025()).as_str(), "2025-06");
        assert_eq!(resolve_period(Some("2024-06"), june_2025()).as_str(), "2025-06");
    }

    #[test]
    fn test_missing_parent_falls_back_to_today() {
        assert_eq!(resolve_period(None, june_2025()).as_str(), "2025-06");

        let january = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        assert_eq!(resolve_period(Some("misc"), january).as_str(), "2026-01");
    }

    #[test]
    fn test_current_period_shape() {
        let current = Period::current();
        assert_eq!(current.as_str().len(), 7);
        assert!(current.as_str().parse::<Period>().is_ok());
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("2025-03".parse::<Period>().unwrap().to_string(), "2025-03");
        assert!("2025.03".parse::<Period>().is_err());
        assert!("2025-3".parse::<Period>().is_err());
        assert!("2025-03 ".parse::<Period>().is_err());
    }
}
