use std::path::Path;

use probe_core::Category;
use probe_logging::probe_debug;
use serde::Deserialize;
use serde_json::Value;

use crate::http::{build_client, check_status, endpoint_url, map_reqwest_error};
use crate::{HttpSettings, TriggerError, TriggerFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: &'static str,
    pub url: String,
    pub result: Result<u16, TriggerError>,
}

impl ServiceStatus {
    pub fn is_up(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Deserialize)]
struct PrimaryLanguage {
    #[serde(default)]
    language: Option<String>,
}

/// Parser endpoint for a category; java projects go through the POM parser.
pub fn parser_endpoint(category: &Category) -> String {
    match category.as_str() {
        "java" => "/parse/pom_parse".to_string(),
        other => format!("/parse/{other}_parse"),
    }
}

/// Direct probes against the backend and the parser service.
#[derive(Debug, Clone)]
pub struct ServiceProbe {
    backend_url: String,
    parser_url: String,
    client: reqwest::Client,
}

impl ServiceProbe {
    pub fn new(
        backend_url: impl Into<String>,
        parser_url: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self, TriggerError> {
        Ok(Self {
            backend_url: backend_url.into(),
            parser_url: parser_url.into(),
            client: build_client(settings)?,
        })
    }

    pub async fn check_backend(&self, company_id: i64) -> ServiceStatus {
        let path = format!("/project/statistics?companyId={company_id}");
        self.check("backend", &self.backend_url, &path).await
    }

    pub async fn check_parser(&self) -> ServiceStatus {
        self.check("parser", &self.parser_url, "/vulnerabilities/test")
            .await
    }

    async fn check(&self, name: &'static str, base_url: &str, path: &str) -> ServiceStatus {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        let result = match reqwest::Url::parse(&url) {
            Ok(parsed) => match self.client.get(parsed).send().await {
                Ok(response) => check_status(&response),
                Err(err) => Err(map_reqwest_error(err)),
            },
            Err(err) => Err(TriggerError::new(TriggerFailure::InvalidUrl, err.to_string())),
        };
        ServiceStatus { name, url, result }
    }

    /// Ask the parser for the primary language of a project folder.
    ///
    /// `Ok(None)` when the parser answers `unknown` or nothing at all.
    pub async fn detect_language(&self, folder: &Path) -> Result<Option<Category>, TriggerError> {
        let url = endpoint_url(&self.parser_url, "/parse/get_primary_language")?;
        let folder = folder.to_string_lossy();
        let response = self
            .client
            .get(url)
            .query(&[("project_folder", folder.as_ref()), ("use_optimized", "true")])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: PrimaryLanguage = serde_json::from_slice(&bytes)
            .map_err(|err| TriggerError::new(TriggerFailure::MalformedBody, err.to_string()))?;

        Ok(body
            .language
            .map(Category::new)
            .filter(|language| language.as_str() != "unknown" && !language.as_str().is_empty()))
    }

    /// Run the category's parser on a folder and return the dependency names.
    pub async fn parse_manifest(
        &self,
        category: &Category,
        folder: &Path,
    ) -> Result<Vec<String>, TriggerError> {
        let url = endpoint_url(&self.parser_url, &parser_endpoint(category))?;
        probe_debug!("parser call {} folder={:?}", url, folder);
        let folder = folder.to_string_lossy();
        let response = self
            .client
            .get(url)
            .query(&[("project_folder", folder.as_ref())])
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(&response)?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|err| TriggerError::new(TriggerFailure::MalformedBody, err.to_string()))?;

        let Value::Array(items) = body else {
            return Err(TriggerError::new(
                TriggerFailure::MalformedBody,
                "parser answer is not an array",
            ));
        };
        Ok(items.iter().filter_map(dependency_name).collect())
    }
}

fn dependency_name(item: &Value) -> Option<String> {
    match item {
        Value::String(name) => Some(name.clone()),
        Value::Object(fields) => fields
            .get("name")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        _ => None,
    }
}
