//! Case-insensitive allow-listing of custom header names.

use std::collections::HashSet;

pub trait CustomHeaderFilter: Send + Sync {
    fn accepts(&self, header_name: &str) -> bool;
}

/// Accepts exactly the names it was built from, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowListHeaderFilter {
    names: HashSet<String>,
}

impl AllowListHeaderFilter {
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        AllowListHeaderFilter {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl CustomHeaderFilter for AllowListHeaderFilter {
    fn accepts(&self, header_name: &str) -> bool {
        self.names.contains(&header_name.to_lowercase())
    }
}

impl<F> CustomHeaderFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accepts(&self, header_name: &str) -> bool {
        self(header_name)
    }
}
