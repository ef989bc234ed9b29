//! Item kind tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin and semantics of a bundle item.
///
/// Serialized lowercase (`"file"`, `"link"`, `"text"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Raw file contents.
    File,
    /// A URL, stored as UTF-8.
    Link,
    /// A free-form text snippet, stored as UTF-8.
    Text,
}

impl ItemKind {
    /// Wire name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Link => "link",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
