//! Query catalog - named base queries per resource
//!
//! Each resource maps every [`QueryName`] to a fixed SQL template via
//! [`Resource::query`](crate::core::resource::Resource::query). Templates
//! carry no WHERE or ORDER BY clause; those are appended per request.

/// Logical name of a catalogued base query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    /// Every row, unfiltered and unordered
    List,
}

impl QueryName {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryName::List => "list",
        }
    }
}

impl std::fmt::Display for QueryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(QueryName::List.as_str(), "list");
        assert_eq!(QueryName::List.to_string(), "list");
    }
}
