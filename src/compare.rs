//! Result comparison against hand-authored expected rows.
//!
//! Row order is only significant when the statement sorts its output with a
//! top-level `ORDER BY`; otherwise rows are compared as multisets.
use crate::core::db::CanonicalRow;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use tracing::debug;

static ORDER_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\border\s+by\b").unwrap());

/// Whether row order is part of a query's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    Strict,
    Unordered,
}

impl RowOrder {
    /// Classifies a statement by whether its outermost query has an `ORDER BY`.
    ///
    /// Falls back to a keyword scan when the statement does not parse.
    pub fn for_query(sql: &str) -> Self {
        let ordered = match Parser::parse_sql(&SQLiteDialect {}, sql) {
            Ok(statements) => statements.iter().any(|statement| match statement {
                Statement::Query(query) => !query.order_by.is_empty(),
                _ => false,
            }),
            Err(e) => {
                debug!("Falling back to keyword scan for ORDER BY: {}", e);
                ORDER_BY.is_match(sql)
            }
        };

        if ordered {
            RowOrder::Strict
        } else {
            RowOrder::Unordered
        }
    }
}

/// Differences between an expected and an actual result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDiff {
    /// Expected rows with no counterpart in the actual result
    pub missing: Vec<CanonicalRow>,
    /// Actual rows with no counterpart in the expected result
    pub unexpected: Vec<CanonicalRow>,
    /// First position where a strictly ordered result diverges
    pub first_misordered: Option<usize>,
}

impl RowDiff {
    pub fn is_match(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty() && self.first_misordered.is_none()
    }
}

/// Compares `actual` against `expected` under the given ordering rule.
pub fn compare_rows(expected: &[CanonicalRow], actual: &[CanonicalRow], order: RowOrder) -> RowDiff {
    let mut matched = vec![false; actual.len()];
    let mut diff = RowDiff::default();

    for want in expected {
        let found = (0..actual.len()).find(|&i| !matched[i] && want.approx_eq(&actual[i]));
        match found {
            Some(i) => matched[i] = true,
            None => diff.missing.push(want.clone()),
        }
    }
    diff.unexpected = actual
        .iter()
        .zip(&matched)
        .filter(|(_, used)| !**used)
        .map(|(row, _)| row.clone())
        .collect();

    if order == RowOrder::Strict && diff.missing.is_empty() && diff.unexpected.is_empty() {
        diff.first_misordered = expected
            .iter()
            .zip(actual)
            .position(|(want, got)| !want.approx_eq(got));
    }

    diff
}

/// Shorthand for `compare_rows(..).is_match()` with the order taken from `sql`.
pub fn matches_expected(sql: &str, expected: &[CanonicalRow], actual: &[CanonicalRow]) -> bool {
    compare_rows(expected, actual, RowOrder::for_query(sql)).is_match()
}
