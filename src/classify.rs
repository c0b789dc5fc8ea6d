//! Filename classification policy.
//!
//! Assets carry no explicit category; the upstream naming convention encodes
//! it in the filename. The policy is an ordered rule table so the priority
//! order is explicit and testable rather than buried in an if-chain.

use std::fmt;

/// Classification bucket for a cached Parquet file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Forest,
    Vegetation,
}

impl Category {
    /// Every category, in rule-priority order.
    pub const ALL: [Category; 2] = [Category::Forest, Category::Vegetation];

    /// Subdirectory name under the cache root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Forest => "forest",
            Category::Vegetation => "vegetation",
        }
    }

    /// Name of the category's timeline table in the database.
    pub fn table_name(&self) -> String {
        format!("{}_timeline", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule: a lowercase substring and the category it maps to.
struct Rule {
    pattern: &'static str,
    category: Category,
}

/// Evaluated top to bottom; the first matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        pattern: "forest",
        category: Category::Forest,
    },
    Rule {
        pattern: "vegetation",
        category: Category::Vegetation,
    },
];

/// Filenames containing this substring are always re-downloaded, even when a
/// cached copy exists. The match is case-sensitive, unlike classification.
pub const VOLATILE_MARKER: &str = "_current_";

/// Classifies a filename, case-insensitively. `None` means uncategorized:
/// the file lands directly under the cache root.
pub fn classify(filename: &str) -> Option<Category> {
    let lower = filename.to_lowercase();
    RULES
        .iter()
        .find(|r| lower.contains(r.pattern))
        .map(|r| r.category)
}

/// Whether a filename carries the volatile marker.
pub fn is_volatile(filename: &str) -> bool {
    filename.contains(VOLATILE_MARKER)
}

// -- Tests -------------------------------------------------------------------
