use std::time::Duration;

use probe_core::Category;
use probe_logging::{probe_info, probe_warn};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl StoreSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 2,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

/// Count of live `white_list` rows for one category, optionally one project path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    pub category: Category,
    pub file_path: Option<String>,
}

impl CountQuery {
    pub fn for_category(category: Category) -> Self {
        Self {
            category,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Parameterised statement; binds are the category then the file path.
    pub fn count_sql(&self) -> &'static str {
        if self.file_path.is_some() {
            "SELECT COUNT(*) FROM white_list WHERE language = ? AND file_path = ? AND isdelete = 0"
        } else {
            "SELECT COUNT(*) FROM white_list WHERE language = ? AND isdelete = 0"
        }
    }

    /// Newest rows matched by this query; binds as in [`Self::count_sql`], then the limit.
    pub fn recent_sql(&self) -> &'static str {
        if self.file_path.is_some() {
            RECENT_ENTRIES_FOR_PATH_SQL
        } else {
            RECENT_ENTRIES_SQL
        }
    }
}

/// Read-only count lookup used by the verifier.
#[async_trait::async_trait]
pub trait CountStore: Send + Sync {
    async fn count(&self, query: &CountQuery) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCount {
    pub language: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistEntry {
    pub id: i64,
    pub name: String,
    pub language: String,
    pub file_path: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub language: Category,
    pub file: String,
}

impl ProjectRow {
    /// Rows this project's own folder produced for its language.
    pub fn count_query(&self) -> CountQuery {
        CountQuery::for_category(self.language.clone()).with_file_path(self.file.as_str())
    }
}

/// Columns the verifier and the report queries rely on.
pub const REQUIRED_WHITELIST_COLUMNS: &[&str] = &["language", "file_path", "isdelete"];

/// Required columns absent from `columns`; an empty `columns` means no table.
pub fn missing_columns(columns: &[String]) -> Vec<&'static str> {
    REQUIRED_WHITELIST_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
        .collect()
}

const LANGUAGE_STATS_SQL: &str = "SELECT COALESCE(language, ''), COUNT(*) AS cnt FROM white_list \
     WHERE isdelete = 0 GROUP BY language ORDER BY cnt DESC";

const RECENT_ENTRIES_SQL: &str = "SELECT CAST(id AS SIGNED), COALESCE(name, ''), COALESCE(language, ''), \
     file_path, description FROM white_list WHERE language = ? AND isdelete = 0 \
     ORDER BY id DESC LIMIT ?";

const RECENT_ENTRIES_FOR_PATH_SQL: &str = "SELECT CAST(id AS SIGNED), COALESCE(name, ''), \
     COALESCE(language, ''), file_path, description FROM white_list \
     WHERE language = ? AND file_path = ? AND isdelete = 0 ORDER BY id DESC LIMIT ?";

const WHITELIST_COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR) FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = 'white_list' ORDER BY ORDINAL_POSITION";

const PROJECTS_SQL: &str = "SELECT CAST(id AS SIGNED), COALESCE(name, ''), COALESCE(language, ''), \
     COALESCE(file, '') FROM project WHERE isdelete = 0 ORDER BY id";

const PROJECTS_WITHOUT_COMPONENTS_SQL: &str = "SELECT CAST(p.id AS SIGNED), COALESCE(p.name, ''), \
     COALESCE(p.language, ''), COALESCE(p.file, '') FROM project p \
     LEFT JOIN white_list w ON p.file = w.file_path AND w.isdelete = 0 \
     WHERE p.isdelete = 0 GROUP BY p.id, p.name, p.language, p.file \
     HAVING COUNT(w.id) = 0 ORDER BY p.language, p.id";

/// Escape a literal for use inside `LIKE '%...%'`.
pub fn like_contains(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len() + 2);
    escaped.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

type ProjectTuple = (i64, String, String, String);

fn project_from_tuple((id, name, language, file): ProjectTuple) -> ProjectRow {
    ProjectRow {
        id,
        name,
        language: Category::new(language),
        file,
    }
}

#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(settings: &StoreSettings) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.url)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        probe_info!("Connected to store (max_connections={})", settings.max_connections);
        Ok(Self { pool })
    }

    pub async fn language_stats(&self) -> Result<Vec<LanguageCount>, StoreError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(LANGUAGE_STATS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(language, count)| LanguageCount {
                language,
                count: count.max(0) as u64,
            })
            .collect())
    }

    pub async fn recent_entries(
        &self,
        query: &CountQuery,
        limit: u32,
    ) -> Result<Vec<WhitelistEntry>, StoreError> {
        let mut statement =
            sqlx::query_as::<_, (i64, String, String, Option<String>, Option<String>)>(
                query.recent_sql(),
            )
            .bind(query.category.as_str());
        if let Some(file_path) = &query.file_path {
            statement = statement.bind(file_path.as_str());
        }
        let rows = statement
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, language, file_path, description)| WhitelistEntry {
                id,
                name,
                language,
                file_path,
                description,
            })
            .collect())
    }

    /// Column names of `white_list` in the connected schema; empty when the table is absent.
    pub async fn white_list_columns(&self) -> Result<Vec<String>, StoreError> {
        let columns: Vec<String> = sqlx::query_scalar(WHITELIST_COLUMNS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(columns)
    }

    pub async fn projects(&self) -> Result<Vec<ProjectRow>, StoreError> {
        let rows: Vec<ProjectTuple> = sqlx::query_as(PROJECTS_SQL).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(project_from_tuple).collect())
    }

    /// Projects whose folder has no live dependency rows.
    pub async fn projects_without_components(&self) -> Result<Vec<ProjectRow>, StoreError> {
        let rows: Vec<ProjectTuple> = sqlx::query_as(PROJECTS_WITHOUT_COMPONENTS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(project_from_tuple).collect())
    }

    pub async fn update_project_language(
        &self,
        project_id: i64,
        language: &Category,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE project SET language = ? WHERE id = ?")
            .bind(language.as_str())
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete injected fixture rows whose `file_path` contains `pattern`.
    pub async fn purge_fixture_rows(&self, pattern: &str) -> Result<u64, StoreError> {
        if pattern.trim().is_empty() {
            return Err(StoreError::InvalidPattern);
        }
        let result = sqlx::query("DELETE FROM white_list WHERE file_path LIKE ?")
            .bind(like_contains(pattern))
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected();
        if deleted > 0 {
            probe_warn!("Purged {} white_list rows matching {:?}", deleted, pattern);
        }
        Ok(deleted)
    }
}

#[async_trait::async_trait]
impl CountStore for MySqlStore {
    async fn count(&self, query: &CountQuery) -> Result<u64, StoreError> {
        let mut statement =
            sqlx::query_scalar::<_, i64>(query.count_sql()).bind(query.category.as_str());
        if let Some(file_path) = &query.file_path {
            statement = statement.bind(file_path.as_str());
        }
        let count = statement.fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}
