//! Project filter criteria
//!
//! Stat bounds are named `min_<field>` / `max_<field>`. All bounds touching one
//! field fold into a single inclusive window, starting from `[0, +inf]` and only
//! ever tightening.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use regex::{Regex, RegexBuilder};

use super::datetime::parse_datetime;
use crate::api::{Project, ProjectStats};

/// Numeric project statistic a bound can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatField {
    Queries,
    PagesFound,
    PagesCrawled,
    PagesIndexed,
    WordsIndexed,
    StorageCredits,
    CrawlCredits,
    QueryCredits,
}

impl StatField {
    pub const ALL: [StatField; 8] = [
        StatField::Queries,
        StatField::PagesFound,
        StatField::PagesCrawled,
        StatField::PagesIndexed,
        StatField::WordsIndexed,
        StatField::StorageCredits,
        StatField::CrawlCredits,
        StatField::QueryCredits,
    ];

    /// Name used in criteria (`min_<key>`)
    pub fn key(&self) -> &'static str {
        match self {
            Self::Queries => "queries",
            Self::PagesFound => "pages_found",
            Self::PagesCrawled => "pages_crawled",
            Self::PagesIndexed => "pages_indexed",
            Self::WordsIndexed => "words_indexed",
            Self::StorageCredits => "storage_credits",
            Self::CrawlCredits => "crawl_credits",
            Self::QueryCredits => "query_credits",
        }
    }

    /// Name of the field in the stats payload
    pub fn stat_name(&self) -> &'static str {
        match self {
            Self::Queries => "total_queries",
            Self::PagesFound => "pages_found",
            Self::PagesCrawled => "pages_crawled",
            Self::PagesIndexed => "pages_indexed",
            Self::WordsIndexed => "total_words_indexed",
            Self::StorageCredits => "total_storage_credits_used",
            Self::CrawlCredits => "crawl_credits_used",
            Self::QueryCredits => "query_credits_used",
        }
    }

    pub fn value(&self, stats: &ProjectStats) -> Option<f64> {
        match self {
            Self::Queries => stats.total_queries,
            Self::PagesFound => stats.pages_found,
            Self::PagesCrawled => stats.pages_crawled,
            Self::PagesIndexed => stats.pages_indexed,
            Self::WordsIndexed => stats.total_words_indexed,
            Self::StorageCredits => stats.total_storage_credits_used,
            Self::CrawlCredits => stats.crawl_credits_used,
            Self::QueryCredits => stats.query_credits_used,
        }
    }

    /// Accepts either the criterion key or the payload field name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == name || field.stat_name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Min,
    Max,
}

/// One `min_<field>` or `max_<field>` criterion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBound {
    pub field: StatField,
    pub kind: BoundKind,
    pub value: f64,
}

impl StatBound {
    pub fn min(field: StatField, value: f64) -> Self {
        Self {
            field,
            kind: BoundKind::Min,
            value,
        }
    }

    pub fn max(field: StatField, value: f64) -> Self {
        Self {
            field,
            kind: BoundKind::Max,
            value,
        }
    }

    /// Build a bound from its criterion name, e.g. `("min_pages_found", 10.0)`
    pub fn named(name: &str, value: f64) -> Option<Self> {
        if let Some(field) = name.strip_prefix("min_").and_then(StatField::from_name) {
            Some(Self::min(field, value))
        } else {
            name.strip_prefix("max_")
                .and_then(StatField::from_name)
                .map(|field| Self::max(field, value))
        }
    }

    pub fn name(&self) -> String {
        let prefix = match self.kind {
            BoundKind::Min => "min",
            BoundKind::Max => "max",
        };
        format!("{}_{}", prefix, self.field.key())
    }
}

impl fmt::Display for StatBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value)
    }
}

impl FromStr for StatBound {
    type Err = String;

    /// Parses `min_<field>=<number>` / `max_<field>=<number>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected <min|max>_<field>=<number>, got '{}'", s))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", value.trim()))?;
        Self::named(name.trim(), value).ok_or_else(|| format!("unknown stat criterion '{}'", name))
    }
}

/// Inclusive `[min, max]` window for one stat field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for StatWindow {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
        }
    }
}

impl StatWindow {
    /// Fold a bound in; a bound never loosens the window
    pub fn tighten(&mut self, bound: &StatBound) {
        match bound.kind {
            BoundKind::Min => self.min = self.min.max(bound.value),
            BoundKind::Max => self.max = self.max.min(bound.value),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Contradictory bounds (min above max) match nothing
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// One window per field referenced by at least one bound
pub fn fold_windows(bounds: &[StatBound]) -> BTreeMap<StatField, StatWindow> {
    let mut windows: BTreeMap<StatField, StatWindow> = BTreeMap::new();
    for bound in bounds {
        windows.entry(bound.field).or_default().tighten(bound);
    }
    windows
}

/// Everything `list-projects` can filter on
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub name_pattern: Option<Regex>,
    pub inactive_days: Option<u32>,
    pub stat_bounds: Vec<StatBound>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive regex matched anywhere in the project name
    pub fn with_name_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.name_pattern = Some(RegexBuilder::new(pattern).case_insensitive(true).build()?);
        Ok(self)
    }

    pub fn with_inactive_days(mut self, days: u32) -> Self {
        self.inactive_days = Some(days);
        self
    }

    pub fn with_bound(mut self, bound: StatBound) -> Self {
        self.stat_bounds.push(bound);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name_pattern.is_none() && self.inactive_days.is_none() && self.stat_bounds.is_empty()
    }

    pub fn needs_stats(&self) -> bool {
        !self.stat_bounds.is_empty()
    }

    pub fn matches_name(&self, project: &Project) -> bool {
        self.name_pattern
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(&project.project_name))
    }

    /// True when no inactivity threshold is set, or the project was last
    /// updated strictly before `now - days`. Unparseable timestamps never match.
    pub fn matches_inactivity(&self, project: &Project, now: DateTime<Utc>) -> bool {
        let Some(days) = self.inactive_days else {
            return true;
        };
        // a cutoff before the earliest representable instant matches nothing
        let Some(cutoff) =
            TimeDelta::try_days(i64::from(days)).and_then(|age| now.checked_sub_signed(age))
        else {
            return false;
        };
        parse_datetime(project.updated_at.as_deref()).is_some_and(|updated| updated < cutoff)
    }
}
