//! Terms: named calendar epochs used to color the grid header
//!
//! A term is resolved per day. Two representations exist: an explicit
//! catalog of dated terms, and month rules that recur every year (with
//! rollover for ranges such as November through January). Both sit behind
//! [`TermResolver`], which is all the engine depends on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Color, ConfigError};

/// A named, closed date range
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub color: Color,
}

impl Term {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate, color: Color) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            color,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn overlaps(&self, other: &Term) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// A term recurring every year over a month range.
///
/// `end_month < start_month` means the term runs into the following year.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRule {
    pub label: String,
    pub start_month: u32,
    pub end_month: u32,
    pub color: Color,
}

impl MonthRule {
    pub fn new(label: impl Into<String>, start_month: u32, end_month: u32, color: Color) -> Self {
        Self {
            label: label.into(),
            start_month,
            end_month,
            color,
        }
    }

    fn wraps(&self) -> bool {
        self.end_month < self.start_month
    }

    pub fn covers_month(&self, month: u32) -> bool {
        if self.wraps() {
            month >= self.start_month || month <= self.end_month
        } else {
            month >= self.start_month && month <= self.end_month
        }
    }

    /// The concrete term this rule yields for `day`, if it covers the day
    pub fn term_for(&self, day: NaiveDate) -> Option<Term> {
        let month = day.month();
        if !self.covers_month(month) {
            return None;
        }
        let start_year = if self.wraps() && month <= self.end_month {
            day.year() - 1
        } else {
            day.year()
        };
        let end_year = if self.wraps() { start_year + 1 } else { start_year };

        let start = NaiveDate::from_ymd_opt(start_year, self.start_month, 1)?;
        let end = last_day_of_month(end_year, self.end_month)?;
        Some(Term::new(
            format!("{} {}", self.label, start_year),
            start,
            end,
            self.color.clone(),
        ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for month in [self.start_month, self.end_month] {
            if !(1..=12).contains(&month) {
                return Err(ConfigError::InvalidMonth {
                    label: self.label.clone(),
                    month,
                });
            }
        }
        Ok(())
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Resolves a day to the term it belongs to
pub trait TermResolver {
    /// The term containing `day`, or `None` when no term matches
    fn resolve_term(&self, day: NaiveDate) -> Option<Term>;
}

/// Where terms come from
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum TermSource {
    /// No header terms
    #[default]
    None,
    /// Explicit dated terms; the first match in catalog order wins
    Catalog(Vec<Term>),
    /// Yearly month-range rules; the first matching rule wins
    MonthRules(Vec<MonthRule>),
}

impl TermSource {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            TermSource::None => Ok(()),
            TermSource::Catalog(terms) => {
                for term in terms {
                    if term.end < term.start {
                        return Err(ConfigError::InvertedTerm {
                            name: term.name.clone(),
                            start: term.start,
                            end: term.end,
                        });
                    }
                }
                Ok(())
            }
            TermSource::MonthRules(rules) => rules.iter().try_for_each(MonthRule::validate),
        }
    }

    /// Pairs of catalog terms whose ranges share at least one day
    pub fn overlapping_terms(&self) -> Vec<(&Term, &Term)> {
        let TermSource::Catalog(terms) = self else {
            return Vec::new();
        };
        let mut pairs = Vec::new();
        for (i, a) in terms.iter().enumerate() {
            for b in &terms[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

impl TermResolver for TermSource {
    fn resolve_term(&self, day: NaiveDate) -> Option<Term> {
        match self {
            TermSource::None => None,
            TermSource::Catalog(terms) => terms.iter().find(|t| t.contains(day)).cloned(),
            TermSource::MonthRules(rules) => rules.iter().find_map(|r| r.term_for(day)),
        }
    }
}

impl TermResolver for [Term] {
    fn resolve_term(&self, day: NaiveDate) -> Option<Term> {
        self.iter().find(|t| t.contains(day)).cloned()
    }
}

impl<F> TermResolver for F
where
    F: Fn(NaiveDate) -> Option<Term>,
{
    fn resolve_term(&self, day: NaiveDate) -> Option<Term> {
        self(day)
    }
}
