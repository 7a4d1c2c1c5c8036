use probe_core::TriggerCall;
use probe_logging::{probe_debug, probe_trace};

use crate::http::{build_client, check_status, endpoint_url, map_reqwest_error};
use crate::{HttpSettings, RespBody, TriggerAck, TriggerError, TriggerFailure, SUCCESS_CODE};

/// Fires a remote operation and reports whether the backend accepted it.
#[async_trait::async_trait]
pub trait Trigger: Send + Sync {
    async fn fire(&self, call: &TriggerCall) -> Result<TriggerAck, TriggerError>;
}

#[derive(Debug, Clone)]
pub struct HttpTrigger {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTrigger {
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self, TriggerError> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_client(settings)?,
        })
    }
}

#[async_trait::async_trait]
impl Trigger for HttpTrigger {
    async fn fire(&self, call: &TriggerCall) -> Result<TriggerAck, TriggerError> {
        let url = endpoint_url(&self.base_url, &call.path)?;
        probe_debug!("trigger POST {} form={:?}", url, call.form);

        let response = self
            .client
            .post(url)
            .form(&call.form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = check_status(&response)?;

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: RespBody = serde_json::from_slice(&bytes)
            .map_err(|err| TriggerError::new(TriggerFailure::MalformedBody, err.to_string()))?;
        probe_trace!("trigger answer {:?}", body);

        if body.code != SUCCESS_CODE {
            let message = body.message.clone();
            return Err(TriggerError::new(
                TriggerFailure::Rejected {
                    code: body.code,
                    message: message.clone(),
                },
                message.unwrap_or_else(|| "no message".to_string()),
            ));
        }

        Ok(TriggerAck { status, body })
    }
}
