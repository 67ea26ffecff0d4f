//! Shared fixtures for integration tests
//!
//! `StubServer` is a loopback HTTP/1.1 endpoint that answers every request
//! with one canned status and body, and records what it received.

#![allow(dead_code)]

use moodream_gateway::core::config::{GatewayConfig, LlmConfig, OracleConfig};
use moodream_gateway::core::error::{GatewayError, Result};
use moodream_gateway::llm::StructuredCommand;
use moodream_gateway::{Proof, Verifier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request captured by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub head: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

pub struct StubServer {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let body: Arc<String> = Arc::new(body.into());

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = Arc::clone(&recorded);
                let body = Arc::clone(&body);
                tokio::spawn(async move {
                    let _ = serve_one(stream, status, &body, &recorded).await;
                });
            }
        });

        Self { url, requests }
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(body_start + content_length);
    let request_body = String::from_utf8_lossy(&buf[body_start..end]).to_string();

    recorded.lock().unwrap().push(RecordedRequest {
        head,
        body: request_body,
    });

    let response = format!(
        "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Chat-completions body carrying `content` as the generated text
pub fn llm_reply(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
    .to_string()
}

/// URL of a loopback port with nothing listening on it
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

pub fn config_for(llm_url: &str, oracle_url: &str) -> GatewayConfig {
    GatewayConfig {
        llm: LlmConfig {
            api_key: "sk-test".into(),
            api_url: llm_url.into(),
            model: "gpt-4".into(),
            timeout_secs: Some(10),
        },
        oracle: OracleConfig {
            url: oracle_url.into(),
            target_contract: "DLMCore".into(),
            timeout_secs: Some(10),
        },
    }
}

/// Verifier double with a canned outcome that counts its calls
pub struct ScriptedVerifier {
    outcome: std::result::Result<String, String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<StructuredCommand>>,
}

impl ScriptedVerifier {
    pub fn accepting(proof: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(proof.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<StructuredCommand> {
        self.seen.lock().unwrap().clone()
    }
}

impl Verifier for ScriptedVerifier {
    fn verify(&self, command: &StructuredCommand) -> Result<Proof> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(command.clone());
        match &self.outcome {
            Ok(proof) => Ok(Proof::new(proof.clone())),
            Err(reason) => Err(GatewayError::Verification(reason.clone())),
        }
    }
}
