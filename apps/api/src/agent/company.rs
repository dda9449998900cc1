//! Company Detector: maps free text to a canonical company id via alias containment.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized company identifier a free-text mention resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A canonical company and its surface forms. Patterns are stored lower-cased.
#[derive(Debug, Clone)]
struct CompanyAliases {
    canonical: CompanyId,
    patterns: Vec<String>,
}

/// Alias table in declaration order. When several companies match the same
/// text, the one declared first wins.
#[derive(Debug, Clone)]
pub struct CompanyDetector {
    table: Vec<CompanyAliases>,
}

const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("네이버", &["네이버", "naver"]),
    ("카카오", &["카카오", "kakao"]),
    ("쿠팡", &["쿠팡", "coupang"]),
    ("토스", &["토스", "toss"]),
    ("삼성", &["삼성", "samsung"]),
    ("LG", &["lg", "엘지"]),
    ("현대", &["현대", "hyundai"]),
];

impl Default for CompanyDetector {
    fn default() -> Self {
        Self::from_table(
            DEFAULT_ALIASES
                .iter()
                .map(|(name, aliases)| (*name, aliases.iter().copied())),
        )
    }
}

impl CompanyDetector {
    /// Builds a detector from `(canonical, aliases)` pairs, keeping their order.
    pub fn from_table<N, I, A>(entries: impl IntoIterator<Item = (N, I)>) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let table = entries
            .into_iter()
            .map(|(canonical, aliases)| CompanyAliases {
                canonical: CompanyId::new(canonical),
                patterns: aliases
                    .into_iter()
                    .map(|a| a.as_ref().to_lowercase())
                    .filter(|a| !a.is_empty())
                    .collect(),
            })
            .collect();
        Self { table }
    }

    /// Returns the first declared company with an alias contained in `text`.
    pub fn detect(&self, text: &str) -> Option<CompanyId> {
        let lowered = text.to_lowercase();
        self.table
            .iter()
            .find(|entry| entry.patterns.iter().any(|p| lowered.contains(p.as_str())))
            .map(|entry| entry.canonical.clone())
    }
}
