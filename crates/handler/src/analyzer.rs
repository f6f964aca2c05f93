use pipeline::{CompletionError, CompletionProvider, CompletionRequest, LogText, ModelName};
use tracing::info;

/// Asks the completion service for a fix for `logs` and returns the solution text.
///
/// Only the tail of the logs is sent (see [`CompletionRequest::for_logs`]).
/// Retrying on rate limits is the provider's job; any error returned here is final.
pub async fn analyze<C>(
    provider: &C,
    model: &ModelName,
    logs: &LogText,
) -> Result<String, CompletionError>
where
    C: CompletionProvider + ?Sized,
{
    let request = CompletionRequest::for_logs(model, logs);
    let response = provider.complete(&request).await?;
    let solution = response.into_solution()?;
    info!(
        chars = solution.chars().count(),
        "Received solution from completion service"
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedCompletion;
    use pipeline::{CompletionResponse, MAX_PROMPT_LOG_CHARS};

    fn model() -> ModelName {
        ModelName::new("gpt-4o").unwrap()
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let provider = ScriptedCompletion::replying(vec![Ok(CompletionResponse::with_content(
            "Pin pydantic<2",
        ))]);

        let solution = analyze(&provider, &model(), &LogText::new("error"))
            .await
            .unwrap();

        assert_eq!(solution, "Pin pydantic<2");
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn sends_only_the_log_tail() {
        let provider =
            ScriptedCompletion::replying(vec![Ok(CompletionResponse::with_content("ok"))]);
        let logs = LogText::new(format!("{}error{}", "h".repeat(5000), "t".repeat(2995)));

        analyze(&provider, &model(), &logs).await.unwrap();

        let requests = provider.requests();
        let prompt = requests[0].user_prompt().unwrap();
        assert!(!prompt.contains("hhh"));
        assert!(prompt.ends_with(logs.tail(MAX_PROMPT_LOG_CHARS)));
    }

    #[tokio::test]
    async fn provider_errors_are_returned_unchanged() {
        let provider = ScriptedCompletion::replying(vec![Err(CompletionError::UpstreamStatus {
            status: 503,
            body: "unavailable".into(),
        })]);

        let error = analyze(&provider, &model(), &LogText::new("error"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            CompletionError::UpstreamStatus { status: 503, .. }
        ));
    }
}
