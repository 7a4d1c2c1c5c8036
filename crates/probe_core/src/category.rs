use std::fmt;
use std::str::FromStr;

/// Languages the parser service has an endpoint for.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "java",
    "python",
    "go",
    "rust",
    "javascript",
    "php",
    "ruby",
    "erlang",
];

const UNPARSEABLE: &[&str] = &["", "other", "unknown"];

pub type WorkItemId = i64;

/// Category label used both to route a trigger and to filter store queries.
///
/// Labels are trimmed and lower-cased on construction so `"Python "` and
/// `"python"` select the same rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// False for placeholder labels the backend cannot dispatch.
    pub fn is_parseable(&self) -> bool {
        !UNPARSEABLE.contains(&self.0.as_str())
    }

    pub fn is_known_language(&self) -> bool {
        KNOWN_LANGUAGES.contains(&self.0.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    pub work_item: WorkItemId,
    pub category: Category,
}

impl TriggerRequest {
    pub fn new(work_item: WorkItemId, category: impl Into<Category>) -> Self {
        Self {
            work_item,
            category: category.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}:{}", self.work_item, self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRequestError {
    #[error("expected ID:CATEGORY, got {0:?}")]
    MissingSeparator(String),
    #[error("work item id {0:?} is not an integer")]
    InvalidId(String),
    #[error("category is empty")]
    EmptyCategory,
}

impl FromStr for TriggerRequest {
    type Err = ParseRequestError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id, category) = raw
            .split_once(':')
            .ok_or_else(|| ParseRequestError::MissingSeparator(raw.to_string()))?;
        let work_item = id
            .trim()
            .parse::<WorkItemId>()
            .map_err(|_| ParseRequestError::InvalidId(id.trim().to_string()))?;
        let category = Category::new(category);
        if category.as_str().is_empty() {
            return Err(ParseRequestError::EmptyCategory);
        }
        Ok(Self {
            work_item,
            category,
        })
    }
}
