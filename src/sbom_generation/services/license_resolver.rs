use crate::sbom_generation::domain::LicenseResolution;
use dashmap::DashMap;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Number of leading lines searched for a license marker
pub const LICENSE_HEADER_LINES: usize = 5;

static LICENSE_MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)SPDX-License-Identifier:\s*(?P<id>[^\s]+(?:\s+(?:AND|OR|WITH)\s+[^\s]+)*)",
    )
    .expect("static regex")
});

/// LicenseResolver service: finds declared licenses and interns them
///
/// Identical expressions resolve to the same `Arc<str>`, so thousands of
/// files declaring `GPL-2.0-only` share a single expression. The intern
/// table is a concurrent map; files can be resolved from many futures at
/// once through a shared reference.
#[derive(Debug, Default)]
pub struct LicenseResolver {
    interned: DashMap<String, Arc<str>>,
}

impl LicenseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the license declared in the header of a file
    ///
    /// # Arguments
    /// * `header` - Leading part of the file, None if it could not be read
    ///
    /// # Returns
    /// The interned expression, or `LicenseResolution::NotFound`
    pub fn resolve(&self, header: Option<&str>) -> LicenseResolution {
        header
            .and_then(Self::extract_expression)
            .map(|expression| LicenseResolution::Declared(self.intern(expression)))
            .unwrap_or(LicenseResolution::NotFound)
    }

    /// Extracts and normalizes an `SPDX-License-Identifier` expression
    ///
    /// Only the first lines are searched; operators are upper-cased and
    /// whitespace is collapsed. A closing `*/` ends the expression even
    /// without whitespace before it.
    pub fn extract_expression(text: &str) -> Option<String> {
        text.lines()
            .take(LICENSE_HEADER_LINES)
            .find_map(|line| LICENSE_MARKER_PATTERN.captures(line))
            .and_then(|caps| {
                let id = caps.name("id")?.as_str();
                let id = id.split("*/").next().unwrap_or(id);
                Some(Self::normalize(id)).filter(|expression| !expression.is_empty())
            })
    }

    fn normalize(expression: &str) -> String {
        expression
            .split_whitespace()
            .map(|part| match part.to_ascii_uppercase().as_str() {
                operator @ ("AND" | "OR" | "WITH") => operator.to_string(),
                _ => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn intern(&self, expression: String) -> Arc<str> {
        self.interned
            .entry(expression.clone())
            .or_insert_with(|| Arc::from(expression.as_str()))
            .clone()
    }

    /// Every distinct expression seen so far, sorted
    pub fn expressions(&self) -> Vec<Arc<str>> {
        let mut expressions: Vec<Arc<str>> =
            self.interned.iter().map(|entry| entry.value().clone()).collect();
        expressions.sort();
        expressions
    }
}
