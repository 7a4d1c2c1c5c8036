use std::sync::Arc;

use probe_core::{classify, Outcome, PollPolicy, TriggerCall, TriggerRequest, Verification};
use probe_logging::{probe_debug, probe_info, probe_warn};

use crate::store::{CountQuery, CountStore, ProjectRow};
use crate::trigger::Trigger;
use crate::VerifyError;

/// Fires a remote operation and watches the store for its durable effect.
///
/// The verifier only reads from the store. One verification is a straight
/// sequence: baseline read, trigger, poll window, classification.
pub struct AsyncEffectVerifier {
    trigger: Arc<dyn Trigger>,
    store: Arc<dyn CountStore>,
    policy: PollPolicy,
}

impl AsyncEffectVerifier {
    pub fn new(trigger: Arc<dyn Trigger>, store: Arc<dyn CountStore>, policy: PollPolicy) -> Self {
        Self {
            trigger,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Re-parse `request` and watch the rows of its category.
    pub async fn verify(&self, request: &TriggerRequest) -> Result<Verification, VerifyError> {
        let call = TriggerCall::reparse(request);
        let query = CountQuery::for_category(request.category.clone());
        self.verify_with(request.label(), &call, &query).await
    }

    /// Re-parse one project and watch only the rows its folder produced.
    pub async fn verify_project(&self, project: &ProjectRow) -> Result<Verification, VerifyError> {
        let request = TriggerRequest::new(project.id, project.language.clone());
        let call = TriggerCall::reparse(&request);
        self.verify_with(request.label(), &call, &project.count_query())
            .await
    }

    pub async fn verify_with(
        &self,
        label: impl Into<String>,
        call: &TriggerCall,
        query: &CountQuery,
    ) -> Result<Verification, VerifyError> {
        let label = label.into();
        let baseline = self.store.count(query).await?;
        probe_debug!("{} baseline={}", label, baseline);

        if let Err(err) = self.trigger.fire(call).await {
            let outcome = match err.kind.fail_reason() {
                Some(reason) => Outcome::Failed { reason },
                None => Outcome::Unreachable {
                    reason: err.kind.to_string(),
                },
            };
            probe_warn!("{} trigger failed: {}", label, err);
            return Ok(Verification {
                label,
                outcome,
                baseline,
                final_count: None,
                polls: 0,
            });
        }

        let mut final_count = baseline;
        let mut polls = 0;
        for wait in self.policy.schedule() {
            tokio::time::sleep(wait).await;
            final_count = self.store.count(query).await?;
            polls += 1;
            probe_debug!("{} poll {} count={}", label, polls, final_count);
            if self.policy.early_exit && final_count != baseline {
                break;
            }
        }

        let outcome = classify(baseline, final_count);
        if let Outcome::Anomaly { delta } = &outcome {
            probe_warn!("{} store count shrank by {} while polling", label, -delta);
        }
        probe_info!(
            "{} baseline={} final={} outcome={}",
            label,
            baseline,
            final_count,
            outcome
        );

        Ok(Verification {
            label,
            outcome,
            baseline,
            final_count: Some(final_count),
            polls,
        })
    }
}
