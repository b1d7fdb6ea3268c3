use crate::shared::Result;
use std::cell::Cell;

/// Maximum number of exclude patterns to prevent DoS attacks
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern to prevent DoS attacks
const MAX_PATTERN_LENGTH: usize = 255;

/// UsedFilesFilter - Removes build-system files from the used-files report
///
/// Supports wildcard patterns using '*' to match zero or more characters,
/// including '/'. Patterns are matched against tree-relative names,
/// case-sensitive, and validated against a character whitelist.
/// An empty filter keeps every file.
#[derive(Debug)]
pub struct UsedFilesFilter {
    patterns: Vec<ExcludePattern>,
}

impl UsedFilesFilter {
    /// Creates a new UsedFilesFilter from raw pattern strings
    ///
    /// # Arguments
    /// * `patterns` - Pattern strings (e.g., "scripts/*", "*Makefile")
    ///
    /// # Errors
    /// - Too many patterns (> MAX_EXCLUDE_PATTERNS)
    /// - Invalid pattern format (length, characters)
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let patterns = patterns
            .into_iter()
            .map(ExcludePattern::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Keeps the file names that match no exclusion pattern, preserving order
    pub fn filter_files(&self, files: Vec<String>) -> Vec<String> {
        files.into_iter().filter(|f| !self.matches(f)).collect()
    }

    fn matches(&self, name: &str) -> bool {
        // every pattern is evaluated so each one records whether it matched
        self.patterns
            .iter()
            .fold(false, |matched, p| p.matches(name) || matched)
    }

    /// Returns the patterns that did not match any file
    ///
    /// Call after filtering to warn about patterns that had no effect.
    pub fn get_unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.get())
            .map(|p| p.original.clone())
            .collect()
    }
}

#[derive(Debug)]
struct ExcludePattern {
    original: String,
    matcher: PatternMatcher,
    matched: Cell<bool>,
}

impl ExcludePattern {
    fn new(pattern: String) -> Result<Self> {
        validate_pattern(&pattern)?;
        let matcher = compile_pattern(&pattern);

        Ok(Self {
            original: pattern,
            matcher,
            matched: Cell::new(false),
        })
    }

    fn matches(&self, name: &str) -> bool {
        let is_match = self.matcher.matches(name);
        if is_match {
            self.matched.set(true);
        }
        is_match
    }
}

/// Pattern matcher types for efficient matching
#[derive(Debug)]
enum PatternMatcher {
    /// Exact match: "Makefile"
    Exact(String),
    /// Leading wildcard: "*Makefile"
    EndsWith(String),
    /// Trailing wildcard: "scripts/*"
    StartsWith(String),
    /// Surrounding wildcards: "*/Kconfig*"
    Contains(String),
    /// Anything else; parts must appear in order, anchored where the
    /// pattern has no wildcard at that end
    Parts {
        parts: Vec<String>,
        anchored_start: bool,
        anchored_end: bool,
    },
}

impl PatternMatcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            PatternMatcher::Exact(s) => name == s,
            PatternMatcher::EndsWith(suffix) => name.ends_with(suffix),
            PatternMatcher::StartsWith(prefix) => name.starts_with(prefix),
            PatternMatcher::Contains(middle) => name.contains(middle),
            PatternMatcher::Parts {
                parts,
                anchored_start,
                anchored_end,
            } => {
                let mut rest = name;
                for (index, part) in parts.iter().enumerate() {
                    if index == 0 && *anchored_start {
                        match rest.strip_prefix(part.as_str()) {
                            Some(remaining) => rest = remaining,
                            None => return false,
                        }
                    } else if index == parts.len() - 1 && *anchored_end {
                        return rest.len() >= part.len() && rest.ends_with(part.as_str());
                    } else {
                        match rest.find(part.as_str()) {
                            Some(pos) => rest = &rest[pos + part.len()..],
                            None => return false,
                        }
                    }
                }
                true
            }
        }
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Exclusion pattern is too long: '{}' ({} chars). Maximum: {} chars",
            pattern,
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    for ch in pattern.chars() {
        if !is_valid_pattern_char(ch) {
            anyhow::bail!(
                "Exclusion pattern contains invalid character '{}' in pattern '{}'. \
                 Only alphanumeric, hyphens, underscores, dots, plus signs, slashes, and asterisks (*) are allowed.",
                ch,
                pattern
            );
        }
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}

fn is_valid_pattern_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '*')
}

fn compile_pattern(pattern: &str) -> PatternMatcher {
    let wildcard_count = pattern.matches('*').count();
    let starts = pattern.starts_with('*');
    let ends = pattern.ends_with('*');

    match wildcard_count {
        0 => PatternMatcher::Exact(pattern.to_string()),
        1 if starts => PatternMatcher::EndsWith(pattern[1..].to_string()),
        1 if ends => PatternMatcher::StartsWith(pattern[..pattern.len() - 1].to_string()),
        2 if starts && ends => PatternMatcher::Contains(pattern[1..pattern.len() - 1].to_string()),
        _ => PatternMatcher::Parts {
            parts: pattern
                .split('*')
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
                .collect(),
            anchored_start: !starts,
            anchored_end: !ends,
        },
    }
}
