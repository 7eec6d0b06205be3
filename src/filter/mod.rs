//! Backend-neutral filter expressions built from hard criteria.
//!
//! A [`FilterExpr`] is rendered into the wire format of whichever vector store
//! executes the query (see `crate::vectordb`). Values are lowercased because
//! the indexed attributes are.


use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::constants::EXPERIENCE_BUCKETS;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Filter over candidate attributes.
pub enum FilterExpr {
    /// Array attribute `field` contains `value`.
    Contains { field: String, value: String },
    /// Attribute `field` holds any of `values`.
    In { field: String, values: Vec<String> },
    /// Every sub-expression must hold.
    And(Vec<FilterExpr>),
}

impl FilterExpr {
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpr::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of(field: impl Into<String>, values: Vec<String>) -> Self {
        FilterExpr::In {
            field: field.into(),
            values,
        }
    }

    /// Combines filters with AND; `None` when `filters` is empty.
    pub fn all(mut filters: Vec<FilterExpr>) -> Option<Self> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(FilterExpr::And(filters)),
        }
    }

    /// Evaluates the filter against a list-valued attribute lookup.
    ///
    /// Used by in-memory stores; comparisons are case-insensitive.
    pub fn matches<'a, F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<&'a [String]>,
    {
        match self {
            FilterExpr::Contains { field, value } => lookup(field)
                .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value))),
            FilterExpr::In { field, values } => lookup(field).is_some_and(|stored| {
                stored
                    .iter()
                    .any(|v| values.iter().any(|wanted| v.eq_ignore_ascii_case(wanted)))
            }),
            FilterExpr::And(filters) => filters.iter().all(|f| f.matches(lookup)),
        }
    }
}

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+?").expect("number pattern is valid"));

static YEARS_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\+?\s*years?").expect("years pattern is valid"));

/// Maps a years string such as `"3+"` or `"5+ years"` onto a stored bucket.
pub fn parse_experience_years(years: &str) -> Option<&'static str> {
    let caps = LEADING_NUMBER.captures(years)?;
    let years: u64 = caps.get(1)?.as_str().parse().ok()?;

    let bucket = match years {
        y if y >= 10 => "10",
        y if y >= 5 => "5",
        y if y >= 3 => "3",
        _ => "1",
    };
    Some(bucket)
}

/// Canonical spelling of a degree as stored in `deg_degrees`.
pub fn normalize_degree(degree: &str) -> String {
    let lower = degree.trim().to_lowercase();
    match lower.as_str() {
        "jd" | "j.d." | "juris doctor" => "jd".to_string(),
        "master's" | "masters" | "master" | "ms" | "ma" => "master's".to_string(),
        "bachelor's" | "bachelors" | "bachelor" | "bs" | "ba" => "bachelor's".to_string(),
        "mba" => "mba".to_string(),
        "doctorate" | "phd" | "ph.d." => "doctorate".to_string(),
        _ => lower,
    }
}

fn field_filter(field: &str, mut values: Vec<String>) -> Option<FilterExpr> {
    match values.len() {
        0 => None,
        1 => values.pop().map(|value| FilterExpr::contains(field, value)),
        _ => Some(FilterExpr::any_of(field, values)),
    }
}

fn lowercased<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_lowercase()).collect()
}

/// Degree requirement on `deg_degrees`.
pub fn degree_filter<S: AsRef<str>>(degrees: &[S]) -> Option<FilterExpr> {
    let normalized = degrees
        .iter()
        .map(|d| normalize_degree(d.as_ref()))
        .collect();
    field_filter("deg_degrees", normalized)
}

/// Field-of-study requirement on `deg_fos`.
pub fn field_of_study_filter<S: AsRef<str>>(fields: &[S]) -> Option<FilterExpr> {
    field_filter("deg_fos", lowercased(fields))
}

/// Job title requirement on `exp_titles`.
pub fn title_filter<S: AsRef<str>>(titles: &[S]) -> Option<FilterExpr> {
    field_filter("exp_titles", lowercased(titles))
}

/// Employer requirement on `exp_companies`.
pub fn company_filter<S: AsRef<str>>(companies: &[S]) -> Option<FilterExpr> {
    field_filter("exp_companies", lowercased(companies))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which years attribute a years filter applies to.
pub enum YearsKind {
    /// `exp_years`
    Experience,
    /// `deg_years`
    Education,
}

impl YearsKind {
    fn field(self) -> &'static str {
        match self {
            YearsKind::Experience => "exp_years",
            YearsKind::Education => "deg_years",
        }
    }
}

/// Accepts every bucket at or above the one `min_years` maps to.
pub fn years_filter(min_years: &str, kind: YearsKind) -> Option<FilterExpr> {
    let bucket: u32 = parse_experience_years(min_years)?.parse().ok()?;

    let accepted = EXPERIENCE_BUCKETS
        .iter()
        .filter(|b| b.parse::<u32>().is_ok_and(|b| b >= bucket))
        .map(|b| b.to_string())
        .collect();

    Some(FilterExpr::any_of(kind.field(), accepted))
}

/// Builds a store-side pre-filter from free-text hard criteria.
///
/// Recognises law-degree requirements and "N years of experience/practice".
/// Returns `None` when nothing is recognised.
pub fn filter_from_hard_criteria<S: AsRef<str>>(hard_criteria: &[S]) -> Option<FilterExpr> {
    let mut filters = Vec::new();

    for criterion in hard_criteria {
        let lower = criterion.as_ref().to_lowercase();

        if (lower.contains("jd") || lower.contains("juris doctor"))
            && let Some(filter) = degree_filter(&["jd"])
        {
            filters.push(filter);
        }

        if lower.contains("year")
            && (lower.contains("experience") || lower.contains("practice"))
            && let Some(caps) = YEARS_PHRASE.captures(&lower)
            && let Some(filter) = years_filter(&format!("{}+", &caps[1]), YearsKind::Experience)
        {
            filters.push(filter);
        }
    }

    let combined = FilterExpr::all(filters);
    debug!(?combined, "Built filter from hard criteria");
    combined
}
