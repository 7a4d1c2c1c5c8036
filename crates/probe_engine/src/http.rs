use crate::{HttpSettings, TriggerError, TriggerFailure};

pub(crate) fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, TriggerError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| TriggerError::new(TriggerFailure::Network, err.to_string()))
}

/// Join a service base URL and an endpoint path.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<reqwest::Url, TriggerError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    reqwest::Url::parse(&joined)
        .map_err(|err| TriggerError::new(TriggerFailure::InvalidUrl, err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TriggerError {
    if err.is_timeout() {
        return TriggerError::new(TriggerFailure::Timeout, err.to_string());
    }
    TriggerError::new(TriggerFailure::Network, err.to_string())
}

pub(crate) fn check_status(response: &reqwest::Response) -> Result<u16, TriggerError> {
    let status = response.status();
    if status.is_success() {
        Ok(status.as_u16())
    } else {
        Err(TriggerError::new(
            TriggerFailure::HttpStatus(status.as_u16()),
            status.to_string(),
        ))
    }
}
