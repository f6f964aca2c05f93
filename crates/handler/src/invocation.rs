use pipeline::{
    extract_logs, route, ChatNotifier, CompletionProvider, ConfigurationError, FailureReason,
    InvocationEvent, InvocationId, InvocationResult, ModelName, NotificationMessage, Outcome,
    Route,
};
use tracing::{error, info, info_span, Instrument};

use crate::{analyze, deliver};

/// Runs the extract → route → analyze → notify pipeline for one event at a time.
///
/// Holds no per-invocation state; the same handler may serve any number of
/// sequential invocations.
pub struct InvocationHandler<C, N> {
    completion: C,
    notifier: N,
    model: ModelName,
}

impl<C, N> InvocationHandler<C, N>
where
    C: CompletionProvider,
    N: ChatNotifier,
{
    /// Creates a handler that asks `completion` for fixes using `model` and
    /// posts messages through `notifier`.
    pub fn new(completion: C, notifier: N, model: ModelName) -> Self {
        Self {
            completion,
            notifier,
            model,
        }
    }

    /// Handles `event` under a freshly generated [`InvocationId`].
    pub async fn handle(&self, event: &InvocationEvent) -> InvocationResult {
        self.handle_with_id(event, InvocationId::new_random()).await
    }

    /// Handles `event`, recording `invocation_id` on the invocation span.
    ///
    /// Always returns a result; no failure escapes as an error.
    pub async fn handle_with_id(
        &self,
        event: &InvocationEvent,
        invocation_id: InvocationId,
    ) -> InvocationResult {
        let span = info_span!("invocation", %invocation_id);
        async {
            let result = self.run(event).await;
            info!(
                status = result.status_code,
                body = %result.body,
                "Invocation finished"
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, event: &InvocationEvent) -> InvocationResult {
        let logs = extract_logs(event);

        match route(&logs) {
            Route::Empty => {
                info!("No logs found in the incoming event");
                Outcome::Failure(FailureReason::NoContent).to_result()
            }
            Route::Demo => {
                info!("Running in demo mode; sending predefined solution");
                self.finish(Outcome::DemoSolution).await
            }
            Route::NotActionable => {
                info!("Logs contain no recognizable failure indicators; skipping analysis");
                self.finish(Outcome::NoActionableContent).await
            }
            Route::Analyze => match analyze(&self.completion, &self.model, &logs).await {
                Ok(solution) => self.finish(Outcome::AnalyzedSolution { solution }).await,
                Err(err) => {
                    self.report_failure(&err, NotificationMessage::analysis_fallback(&logs))
                        .await
                }
            },
        }
    }

    async fn finish(&self, outcome: Outcome) -> InvocationResult {
        if let Some(message) = outcome.notification() {
            deliver(&self.notifier, &message).await;
        }
        outcome.to_result()
    }

    /// Top-level failure path: logs `error`, posts `fallback` best-effort,
    /// and returns a 500 result carrying the error's text.
    pub async fn report_failure(
        &self,
        error: &(dyn std::error::Error + Send + Sync),
        fallback: NotificationMessage,
    ) -> InvocationResult {
        error!(error = %error, "Analysis failed; sending fallback message");
        deliver(&self.notifier, &fallback).await;
        Outcome::Failure(FailureReason::Analysis {
            reason: error.to_string(),
        })
        .to_result()
    }
}

/// Result for an invocation that could not start because configuration is
/// missing or invalid. Nothing is posted: without settings there is no webhook.
pub fn configuration_failure(err: &ConfigurationError) -> InvocationResult {
    error!(error = %err, "Invalid configuration; invocation aborted");
    Outcome::Failure(FailureReason::Configuration {
        reason: err.to_string(),
    })
    .to_result()
}
