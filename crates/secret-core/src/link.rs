//! Share links and link identifiers.
//!
//! A recipient may paste either the bare identifier or the whole share URL.
//! [`LinkId::parse`] accepts both and keeps only the identifier.

use std::{fmt, str::FromStr};

use url::Url;

use crate::error::LinkError;

/// Identifier of a stored secret, as assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkId(String);

impl LinkId {
    /// Parse a bare identifier or a full share URL.
    ///
    /// For URLs the last non-empty path segment is the identifier.
    ///
    /// # Invariants
    ///
    /// - The identifier is non-empty and made only of URL-unreserved
    ///   characters (`A-Z a-z 0-9 - . _ ~`), so it is always a single path
    ///   segment.
    /// - `.` and `..` are never identifiers.
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LinkError::Empty);
        }

        let malformed = |reason: &str| LinkError::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let candidate = if input.contains("://") {
            let url = Url::parse(input).map_err(|e| malformed(&e.to_string()))?;
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(str::to_string)
                .ok_or_else(|| malformed("no identifier in path"))?
        } else {
            input.trim_matches('/').to_string()
        };

        if candidate.is_empty() || candidate == "." || candidate == ".." {
            return Err(malformed("no identifier"));
        }
        if !candidate.chars().all(is_unreserved) {
            return Err(malformed("identifier must be a single path segment"));
        }
        Ok(Self(candidate))
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LinkId {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

/// Build the shareable URL for `id` under `base_url`.
pub fn share_link(base_url: &str, id: &str) -> String {
    format!("{}/{id}", base_url.trim_end_matches('/'))
}
