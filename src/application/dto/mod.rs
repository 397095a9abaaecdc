pub mod accounts;
pub mod equipment;
pub mod notifications;
pub mod requests;
pub mod teams;

/// A field a listing can be ordered by.
pub trait SortField: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder<F> {
    pub field: F,
    pub descending: bool,
}

impl<F: SortField> SortOrder<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses `field` or `-field`; unknown fields yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        F::ALL
            .iter()
            .copied()
            .find(|f| f.name() == name)
            .map(|field| Self { field, descending })
    }

    /// Unknown or missing ordering falls back to `default`.
    pub fn parse_or(raw: Option<&str>, default: Self) -> Self {
        raw.and_then(Self::parse).unwrap_or(default)
    }
}

/// Case-insensitive substring match used by in-memory search.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Blank search strings mean "no search".
pub fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
