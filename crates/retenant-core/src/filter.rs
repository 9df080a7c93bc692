//! Source environment name filter
//!
//! Compiles the `--include`/`--exclude` flags into case-insensitive regexes.
//! The default is include everything, exclude nothing. Patterns fail the run
//! at construction time, before any remote write.

use crate::error::MigrationError;
use regex::{Regex, RegexBuilder};

/// Name filter selecting which environments count as migration sources
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl SourceFilter {
    /// Compile optional include/exclude patterns
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, MigrationError> {
        Ok(Self {
            include: compile("--include", include)?,
            exclude: compile("--exclude", exclude)?,
        })
    }

    /// Whether an environment of this name is a migration source
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.include.as_ref().map_or(true, |re| re.is_match(name))
            && !self.exclude.as_ref().is_some_and(|re| re.is_match(name))
    }
}

fn compile(flag: &'static str, pattern: Option<&str>) -> Result<Option<Regex>, MigrationError> {
    pattern
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| MigrationError::InvalidFilter { flag, source })
        })
        .transpose()
}
