//! Partial genealogical dates and their display service.
//!
//! # Responsibility
//! - Represent possibly partial, qualified or unknown dates.
//! - Provide a total order usable for chronological sorting.
//! - Format dates for display through a pluggable `DateDisplayer`.
//!
//! # Invariants
//! - A date with no year, month or day is undated and sorts after every
//!   dated value, whatever its free text says.
//! - Equality is structural; two undated empty dates are equal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Qualifier attached to a calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateModifier {
    #[default]
    None,
    About,
    Before,
    After,
    Estimated,
}

impl DateModifier {
    fn prefix(self) -> &'static str {
        match self {
            Self::None => "",
            Self::About => "abt ",
            Self::Before => "bef ",
            Self::After => "aft ",
            Self::Estimated => "est ",
        }
    }
}

/// Possibly partial calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u8>,
    #[serde(default)]
    pub day: Option<u8>,
    #[serde(default)]
    pub modifier: DateModifier,
    /// Free text kept for dates that could not be parsed.
    #[serde(default)]
    pub text: Option<String>,
}

impl GenDate {
    /// Empty date: no calendar components, no text.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn ym(year: i32, month: u8) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    /// Text-only date. Sorts as undated.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_modifier(mut self, modifier: DateModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Returns whether no calendar component is known.
    pub fn is_undated(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// Returns whether the date carries neither components nor text.
    pub fn is_empty(&self) -> bool {
        self.is_undated() && self.text.as_deref().map_or(true, str::is_empty)
    }

    /// Unknown components sort before known ones.
    fn sort_key(&self) -> (Option<i32>, Option<u8>, Option<u8>) {
        (self.year, self.month, self.day)
    }
}

impl Ord for GenDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_undated()
            .cmp(&other.is_undated())
            .then_with(|| self.sort_key().cmp(&other.sort_key()))
            .then_with(|| self.modifier.cmp(&other.modifier))
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for GenDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Date formatting service.
pub trait DateDisplayer {
    /// Returns display text, or `None` when there is nothing to show.
    fn display(&self, date: &GenDate) -> Option<String>;
}

/// ISO-style displayer: `1850-03-07`, `1850-03`, `1850`, `abt 1850`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoDateDisplayer;

impl DateDisplayer for IsoDateDisplayer {
    fn display(&self, date: &GenDate) -> Option<String> {
        if date.is_undated() {
            return date
                .text
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string);
        }

        let year = date
            .year
            .map_or_else(|| "????".to_string(), |year| format!("{year:04}"));
        let body = match (date.month, date.day) {
            (Some(month), Some(day)) => format!("{year}-{month:02}-{day:02}"),
            (Some(month), None) => format!("{year}-{month:02}"),
            (None, Some(day)) => format!("{year}-??-{day:02}"),
            (None, None) => year,
        };
        Some(format!("{}{body}", date.modifier.prefix()))
    }
}

#[cfg(test)]
mod tests {
    use super::{DateDisplayer, DateModifier, GenDate, IsoDateDisplayer};

    #[test]
    fn undated_values_sort_after_dated_ones() {
        let mut dates = vec![
            GenDate::empty(),
            GenDate::ymd(1901, 2, 3),
            GenDate::text("sometime"),
            GenDate::year(1850),
        ];
        dates.sort();
        assert_eq!(dates[0], GenDate::year(1850));
        assert_eq!(dates[1], GenDate::ymd(1901, 2, 3));
        assert!(dates[2].is_undated());
        assert!(dates[3].is_undated());
    }

    #[test]
    fn partial_dates_sort_before_full_dates_of_same_year() {
        assert!(GenDate::year(1850) < GenDate::ymd(1850, 1, 1));
        assert!(GenDate::ym(1850, 6) < GenDate::ymd(1850, 6, 2));
    }

    #[test]
    fn empty_dates_are_equal() {
        assert_eq!(GenDate::empty(), GenDate::empty());
        assert!(GenDate::empty().is_empty());
        assert!(!GenDate::text("x").is_empty());
    }

    #[test]
    fn iso_displayer_formats_partial_and_qualified_dates() {
        let displayer = IsoDateDisplayer;
        assert_eq!(
            displayer.display(&GenDate::ymd(1850, 3, 7)).as_deref(),
            Some("1850-03-07")
        );
        assert_eq!(
            displayer.display(&GenDate::ym(1850, 3)).as_deref(),
            Some("1850-03")
        );
        assert_eq!(
            displayer
                .display(&GenDate::year(1850).with_modifier(DateModifier::About))
                .as_deref(),
            Some("abt 1850")
        );
        assert_eq!(
            displayer.display(&GenDate::text(" spring ")).as_deref(),
            Some("spring")
        );
        assert_eq!(displayer.display(&GenDate::empty()), None);
    }
}
