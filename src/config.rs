//! Index configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Tree backend behind a [`RecordIndex`](crate::RecordIndex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Plain binary search tree; `O(n)` height on sorted input.
    #[serde(alias = "bst")]
    Unbalanced,
    /// AVL tree.
    #[default]
    Avl,
    /// Red-black tree.
    #[serde(alias = "rb", alias = "redblack")]
    RedBlack,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Unbalanced, Backend::Avl, Backend::RedBlack];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Unbalanced => "unbalanced",
            Backend::Avl => "avl",
            Backend::RedBlack => "red-black",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown index backend: {0:?} (expected bst, avl or rb)")]
pub struct ParseBackendError(String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bst" | "unbalanced" => Ok(Backend::Unbalanced),
            "avl" => Ok(Backend::Avl),
            "rb" | "red-black" | "redblack" => Ok(Backend::RedBlack),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

/// Configuration for a [`RecordIndex`](crate::RecordIndex).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Tree backend keyed by tracking id
    pub backend: Backend,
    /// Page size used when a listing asks for `0`
    pub default_page_size: usize,
    /// Upper bound on a listing page (and therefore on `top_urgent`'s `k`)
    pub max_page_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Avl,
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}
