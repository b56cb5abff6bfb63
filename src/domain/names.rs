use crate::utils::error::{PopularityError, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

const BUNDLED_NAMES: &str = include_str!("../../data/pokemon_names.txt");

static BUNDLED: OnceLock<CanonicalNameSet> = OnceLock::new();

/// Immutable set of lowercase canonical names.
#[derive(Debug, Clone)]
pub struct CanonicalNameSet {
    names: HashSet<String>,
}

impl CanonicalNameSet {
    /// The Generation 1 list compiled into the binary. Built on first use.
    pub fn bundled() -> &'static CanonicalNameSet {
        BUNDLED.get_or_init(|| Self::parse(BUNDLED_NAMES))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// 一行一個名字，空行與 `#` 開頭的行會被略過
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let set = Self::parse(&content);
        if set.is_empty() {
            return Err(PopularityError::Configuration {
                message: "name list contains no entries".to_string(),
            });
        }
        Ok(set)
    }

    fn parse(content: &str) -> Self {
        Self::from_names(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Case-insensitive exact membership. The caller is expected to trim.
    pub fn is_valid(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Trims raw user input and returns the lowercase canonical form.
    pub fn check(&self, raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PopularityError::EmptyInput);
        }
        if !self.is_valid(trimmed) {
            return Err(PopularityError::InvalidName {
                name: trimmed.to_string(),
            });
        }
        Ok(trimmed.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Membership test against the bundled list.
pub fn is_valid(name: &str) -> bool {
    CanonicalNameSet::bundled().is_valid(name)
}
