use httpmock::prelude::*;
use llm::{OpenAiClient, OpenAiConfig, RetrySchedule, ATTEMPT_HEADER};
use pipeline::{CompletionError, CompletionProvider, CompletionRequest, LogText, ModelName};
use serde_json::json;
use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_millis(25);

fn client(server: &MockServer) -> OpenAiClient {
    client_with_step(&format!("{}/v1", server.base_url()), STEP)
}

fn client_with_step(api_base: &str, step: Duration) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig {
        api_base: api_base.to_string(),
        api_key: "test-openai-key".to_string(),
        request_timeout: Some(Duration::from_secs(5)),
        retry: RetrySchedule::new(3, step),
    })
    .expect("openai client should be created")
}

fn request(logs: &str) -> CompletionRequest {
    CompletionRequest::for_logs(
        &ModelName::new("gpt-4o").unwrap(),
        &LogText::new(logs.to_string()),
    )
}

fn solution_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_bearer_authenticated_chat_completion_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer test-openai-key")
            .header("content-type", "application/json")
            .header(ATTEMPT_HEADER, "1")
            .json_body_includes(
                json!({
                    "model": "gpt-4o",
                    "messages": [
                        {"role": "system", "content": "You are a helpful DevOps assistant."},
                        {"role": "user"}
                    ]
                })
                .to_string(),
            );
        then.status(200).json_body(solution_body("Pin pydantic<2"));
    });

    let response = client(&server)
        .complete(&request("Build failed: ModuleNotFoundError"))
        .await
        .expect("completion should succeed");

    mock.assert();
    assert_eq!(response.into_solution().unwrap(), "Pin pydantic<2");
}

#[tokio::test]
async fn retries_rate_limited_attempts_and_uses_the_final_response() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header(ATTEMPT_HEADER, "1");
        then.status(429).body("rate limited");
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header(ATTEMPT_HEADER, "2");
        then.status(429).body("rate limited");
    });
    let third = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header(ATTEMPT_HEADER, "3");
        then.status(200).json_body(solution_body("third time lucky"));
    });

    let started = Instant::now();
    let response = client(&server)
        .complete(&request("error: flaky"))
        .await
        .expect("third attempt should succeed");
    let elapsed = started.elapsed();

    first.assert_calls(1);
    second.assert_calls(1);
    third.assert_calls(1);
    assert_eq!(response.into_solution().unwrap(), "third time lucky");
    // One step after attempt 1, two steps after attempt 2.
    assert!(elapsed >= STEP * 3, "waited only {elapsed:?}");
}

#[tokio::test]
async fn gives_up_after_three_rate_limited_attempts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429).body("rate limited");
    });

    let step = Duration::from_millis(200);

    let started = Instant::now();
    let error = client_with_step(&format!("{}/v1", server.base_url()), step)
        .complete(&request("error: busy"))
        .await
        .expect_err("rate limiting should exhaust retries");
    let elapsed = started.elapsed();

    mock.assert_calls(3);
    assert_eq!(error, CompletionError::RateLimitExhausted { attempts: 3 });
    // Waits follow attempts 1 and 2 only; a wait after attempt 3 would add three more steps.
    assert!(elapsed >= step * 3, "waited only {elapsed:?}");
    assert!(elapsed < step * 6, "waited after the final attempt: {elapsed:?}");
}

#[tokio::test]
async fn other_error_statuses_are_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    });

    let error = client(&server)
        .complete(&request("error: boom"))
        .await
        .expect_err("500 should fail");

    mock.assert_calls(1);
    assert_eq!(
        error,
        CompletionError::UpstreamStatus {
            status: 500,
            body: "upstream exploded".to_string(),
        }
    );
}

#[tokio::test]
async fn unauthorized_is_a_hard_failure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).json_body(json!({"error": {"message": "bad key"}}));
    });

    let error = client(&server)
        .complete(&request("error"))
        .await
        .expect_err("401 should fail");

    mock.assert_calls(1);
    assert!(matches!(
        error,
        CompletionError::UpstreamStatus { status: 401, .. }
    ));
}

#[tokio::test]
async fn malformed_success_body_is_a_hard_failure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).body("<html>gateway</html>");
    });

    let error = client(&server)
        .complete(&request("error"))
        .await
        .expect_err("non-JSON body should fail");

    mock.assert_calls(1);
    assert!(matches!(error, CompletionError::MalformedResponse { .. }));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure_without_retry() {
    let step = Duration::from_secs(1);
    let client = client_with_step("http://127.0.0.1:1/v1", step);

    let started = Instant::now();
    let error = client
        .complete(&request("error"))
        .await
        .expect_err("connection should be refused");
    let elapsed = started.elapsed();

    assert!(matches!(error, CompletionError::Transport { .. }));
    assert!(elapsed < step, "slept before giving up: {elapsed:?}");
}
