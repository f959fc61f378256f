//! @ai:module:intent Runner that calls a remote triage agent over HTTP
//! @ai:module:layer infrastructure
//! @ai:module:public_api HttpAgentRunner
//! @ai:module:stateless false

use crate::config::{AgentSettings, LlmSettings};
use crate::error::{EvalError, Result};
use crate::runner::callable::{complete_response, AgentRunnerTrait};
use crate::runner::types::{AgentOutput, AgentResponse, AgentRunMetadata};
use crate::schema::{TicketResult, TicketTask};
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// @ai:intent Request body posted to the agent endpoint
#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    task: &'a TicketTask,
    llm: &'a LlmSettings,
}

/// @ai:intent HTTP agent client with a per-request timeout from the runtime limits
pub struct HttpAgentRunner {
    client: reqwest::Client,
    endpoint: String,
    llm: LlmSettings,
}

impl HttpAgentRunner {
    /// @ai:intent Create a runner posting to `endpoint`
    /// @ai:pre runtime.timeout_seconds is positive and finite, otherwise InvalidSettings
    /// @ai:effects pure
    pub fn new(endpoint: impl Into<String>, settings: &AgentSettings) -> Result<Self> {
        let timeout_seconds = settings.runtime.timeout_seconds;
        let timeout = Duration::try_from_secs_f64(timeout_seconds)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or_else(|| {
                EvalError::InvalidSettings(format!(
                    "runtime.timeout_seconds must be greater than 0 (got {})",
                    timeout_seconds
                ))
            })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            llm: settings.llm.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// @ai:intent Interpret a response body as a full response or a bare result
    /// @ai:effects pure
    fn parse_body(ticket_id: &str, body: &Value) -> Result<AgentOutput> {
        let agent_error = |message: String| EvalError::Agent {
            ticket_id: ticket_id.to_string(),
            message,
        };

        match body.get("result") {
            Some(result) => {
                let result = TicketResult::validate(result)
                    .map_err(|e| agent_error(format!("result schema violation: {}", e)))?;

                let metadata = match body.get("metadata") {
                    None | Some(Value::Null) => AgentRunMetadata::default(),
                    Some(raw) => serde_json::from_value(raw.clone())
                        .map_err(|e| agent_error(format!("invalid metadata ({})", e)))?,
                };

                Ok(AgentResponse::new(result, metadata).into())
            }
            None => {
                let result = TicketResult::validate(body)
                    .map_err(|e| agent_error(format!("result schema violation: {}", e)))?;
                Ok(result.into())
            }
        }
    }
}

impl AgentRunnerTrait for HttpAgentRunner {
    /// @ai:intent POST the task and LLM settings, then validate the answer
    /// @ai:effects network
    async fn run(&self, task: &TicketTask) -> Result<AgentResponse> {
        let agent_error = |message: String| EvalError::Agent {
            ticket_id: task.ticket_id.clone(),
            message,
        };

        let request = AgentRequest {
            task,
            llm: &self.llm,
        };

        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| agent_error(format!("request failed ({})", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(agent_error(format!("endpoint returned {}: {}", status, error_text)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| agent_error(format!("invalid response body ({})", e)))?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let output = Self::parse_body(&task.ticket_id, &body)?;
        tracing::debug!("Agent answered {} in {:.1} ms", task.ticket_id, elapsed_ms);

        Ok(complete_response(task, output, elapsed_ms, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_settings_from_str;
    use crate::schema::{TicketCategory, TicketSeverity};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn settings() -> AgentSettings {
        load_settings_from_str("[llm]\nmodel = \"triage-small\"\n\n[runtime]\ntimeout_seconds = 5.0\n")
            .unwrap()
    }

    fn task() -> TicketTask {
        TicketTask {
            ticket_id: "TKT-1".to_string(),
            title: "Checkout broken".to_string(),
            description: "Payment page returns 500".to_string(),
            metadata: None,
        }
    }

    fn result_json() -> Value {
        json!({
            "category": "incident",
            "severity": "critical",
            "next_step": "Page the on-call engineer",
            "confidence": 0.7
        })
    }

    /// Serve one canned HTTP response and return the request body the client sent
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];

            let request_body = loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break String::from_utf8_lossy(&received).to_string();
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received).to_string();

                if let Some(split) = text.find("\r\n\r\n") {
                    let length = text[..split]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    let body = &text[split + 4..];
                    if body.len() >= length {
                        break body.to_string();
                    }
                }
            };

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request_body
        });

        (format!("http://{}/triage", addr), handle)
    }

    #[test]
    fn test_parse_bare_result() {
        let output = HttpAgentRunner::parse_body("TKT-1", &result_json()).unwrap();

        match output {
            AgentOutput::Result(result) => {
                assert_eq!(result.category, TicketCategory::Incident);
                assert_eq!(result.severity, TicketSeverity::Critical);
            }
            other => panic!("expected bare result, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_response_with_metadata() {
        let body = json!({
            "result": result_json(),
            "metadata": {"usd_cost": 0.002, "tokens_in": 310, "latency_ms": 88.0}
        });

        let output = HttpAgentRunner::parse_body("TKT-1", &body).unwrap();

        match output {
            AgentOutput::Response(response) => {
                assert_eq!(response.metadata.usd_cost, Some(0.002));
                assert_eq!(response.metadata.tokens_in, Some(310));
                assert_eq!(response.metadata.latency_ms, Some(88.0));
            }
            other => panic!("expected full response, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_invalid_result() {
        let body = json!({"result": {"category": "feature", "severity": "low", "next_step": "x", "confidence": 0.5}});

        let err = HttpAgentRunner::parse_body("TKT-1", &body).unwrap_err();

        assert!(matches!(err, EvalError::Agent { ref ticket_id, .. } if ticket_id == "TKT-1"));
        assert!(err.to_string().contains("result schema violation"));
    }

    #[test]
    fn test_new_rejects_unusable_timeouts() {
        for timeout_seconds in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let mut settings = settings();
            settings.runtime.timeout_seconds = timeout_seconds;

            let result = HttpAgentRunner::new("http://localhost:9/triage", &settings);

            assert!(
                matches!(result, Err(EvalError::InvalidSettings(_))),
                "timeout {} should be rejected",
                timeout_seconds
            );
        }
    }

    #[tokio::test]
    async fn test_run_posts_task_and_llm_settings() {
        let (endpoint, server) = serve_once("200 OK", result_json().to_string()).await;
        let runner = HttpAgentRunner::new(endpoint, &settings()).unwrap();

        let response = runner.run(&task()).await.unwrap();
        let sent: Value = serde_json::from_str(&server.await.unwrap()).unwrap();

        assert_eq!(response.result.next_step, "Page the on-call engineer");
        assert!(response.metadata.latency_ms.is_some());
        assert_eq!(sent["task"]["ticket_id"], json!("TKT-1"));
        assert_eq!(sent["llm"]["model"], json!("triage-small"));
        assert_eq!(sent["llm"]["max_tokens"], json!(2048));
    }

    #[tokio::test]
    async fn test_run_maps_error_status() {
        let (endpoint, server) = serve_once("503 Service Unavailable", "{}".to_string()).await;
        let runner = HttpAgentRunner::new(endpoint, &settings()).unwrap();

        let err = runner.run(&task()).await.unwrap_err();
        server.await.unwrap();

        assert!(err.to_string().contains("503"));
    }
}
