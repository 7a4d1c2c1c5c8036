use probe_core::Category;
use probe_engine::{like_contains, missing_columns, CountQuery, ProjectRow};

#[test]
fn category_count_filters_soft_deleted_rows() {
    let query = CountQuery::for_category(Category::new("Python"));
    assert_eq!(query.category.as_str(), "python");
    assert_eq!(
        query.count_sql(),
        "SELECT COUNT(*) FROM white_list WHERE language = ? AND isdelete = 0"
    );
}

#[test]
fn file_path_narrows_the_count() {
    let query = CountQuery::for_category(Category::new("go")).with_file_path("/data/upload/p29");
    assert_eq!(query.file_path.as_deref(), Some("/data/upload/p29"));
    assert!(query.count_sql().contains("AND file_path = ?"));
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_contains("upload-test"), "%upload-test%");
    assert_eq!(like_contains("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_contains("a\\b"), "%a\\\\b%");
}

#[test]
fn project_query_is_scoped_to_its_folder() {
    let project = ProjectRow {
        id: 29,
        name: "gin-demo".into(),
        language: Category::new("Go"),
        file: "/data/upload/gin-demo".into(),
    };
    let query = project.count_query();
    assert_eq!(query.category, Category::new("go"));
    assert_eq!(query.file_path.as_deref(), Some("/data/upload/gin-demo"));
    assert!(query.recent_sql().contains("AND file_path = ?"));
    assert!(query.recent_sql().ends_with("LIMIT ?"));
}

#[test]
fn category_recent_entries_have_no_path_filter() {
    let query = CountQuery::for_category(Category::new("php"));
    assert!(!query.recent_sql().contains("file_path = ?"));
}

#[test]
fn schema_check_reports_missing_columns() {
    let full: Vec<String> = ["id", "name", "file_path", "description", "LANGUAGE", "isdelete"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert!(missing_columns(&full).is_empty());

    let partial = vec!["id".to_string(), "language".to_string()];
    assert_eq!(missing_columns(&partial), vec!["file_path", "isdelete"]);

    assert_eq!(
        missing_columns(&[]),
        vec!["language", "file_path", "isdelete"]
    );
}
