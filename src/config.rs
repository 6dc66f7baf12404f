// ⚙️ Configuration - recognized categories and display settings
// Categories are data: validation only ever asks the CategorySet

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CATEGORIES: [&str; 5] = ["food", "travel", "bills", "entertainment", "other"];
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

// ============================================================================
// CONFIG FILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Recognized category names (exact, case-sensitive)
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// chrono format string for the timestamp column
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            categories: default_categories(),
            date_format: default_date_format(),
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.category_set()?;
        Ok(config)
    }

    /// Config file if one was given, defaults otherwise
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn category_set(&self) -> Result<CategorySet> {
        CategorySet::from_names(self.categories.iter().cloned())
    }
}

// ============================================================================
// CATEGORY SET
// ============================================================================

/// Ordered set of recognized category names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// Build from names; rejects an empty list, empty names and duplicates
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = CategorySet { names: Vec::new() };

        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(anyhow!("Category names cannot be empty"));
            }
            if set.contains(&name) {
                return Err(anyhow!("Duplicate category: {}", name));
            }
            set.names.push(name);
        }

        if set.names.is_empty() {
            return Err(anyhow!("At least one category is required"));
        }

        Ok(set)
    }

    pub fn with_defaults() -> Self {
        CategorySet {
            names: default_categories(),
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.names.iter().any(|name| name == category)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        let set = config.category_set().unwrap();

        assert_eq!(set.len(), 5);
        assert!(set.contains("food"));
        assert!(set.contains("travel"));
        assert!(!set.contains("Food"));
        assert!(!set.contains(""));
        assert_eq!(config.date_format, "%d-%m-%Y %H:%M");
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"categories": ["food", "rent"]}"#).unwrap();

        assert_eq!(config.categories, vec!["food".to_string(), "rent".to_string()]);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert!(config.category_set().unwrap().contains("rent"));
    }

    #[test]
    fn test_from_json_empty_object_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_bad_category_lists() {
        assert!(Config::from_json(r#"{"categories": []}"#).is_err());
        assert!(Config::from_json(r#"{"categories": ["food", ""]}"#).is_err());
        assert!(Config::from_json(r#"{"categories": ["food", "food"]}"#).is_err());
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file("/nonexistent/expense-tracker.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_without_path() {
        let config = Config::load(None::<&str>).unwrap();
        assert_eq!(config, Config::default());
    }
}
