use crate::{Category, TriggerRequest, WorkItemId};

/// Description of one remote trigger: an endpoint path and its form payload.
///
/// Triggers are always sent as form-encoded POSTs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerCall {
    pub path: String,
    pub form: Vec<(String, String)>,
}

impl TriggerCall {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            form: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.form.push((key.into(), value.to_string()));
        self
    }

    /// Re-parse one work item for one category.
    pub fn reparse(request: &TriggerRequest) -> Self {
        Self::post("/project/reparse")
            .with_field("projectId", request.work_item)
            .with_field("language", request.category.as_str())
    }

    /// Re-parse one work item for several categories in a single call.
    pub fn reparse_multiple(work_item: WorkItemId, categories: &[Category]) -> Self {
        let joined = categories
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self::post("/project/reparse/multiple")
            .with_field("projectId", work_item)
            .with_field("languages", joined)
    }
}
