pub mod models;

pub use models::{ChatRequest, ChatResponse};

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::utils::url::construct_api_url;

/// Why a chat request did not produce an answer.
///
/// Every variant is shown to the user the same way; the detail only reaches
/// the diagnostic log.
#[derive(Debug)]
pub enum ChatError {
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The backend answered with a non-success status.
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The response body was not a valid chat reply.
    Decode(reqwest::Error),
    /// The client shut down before the request settled.
    Cancelled,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(err) => write!(f, "request failed: {err}"),
            ChatError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "backend returned {status}")
                } else {
                    write!(f, "backend returned {status}: {body}")
                }
            }
            ChatError::Decode(err) => write!(f, "malformed chat response: {err}"),
            ChatError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Transport(err) | ChatError::Decode(err) => Some(err),
            ChatError::Status { .. } | ChatError::Cancelled => None,
        }
    }
}

/// The remote service that answers questions.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError>;
}

/// `POST {base_url}/chat` over HTTP.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    chat_url: String,
}

impl HttpChatBackend {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            chat_url: construct_api_url(base_url, "chat"),
        }
    }

    /// Build a backend with its own client. Without a timeout the request
    /// waits for the transport to settle.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ChatError::Transport)?;
        Ok(Self::new(client, base_url))
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let response = self
            .client
            .post(&self.chat_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ChatError::Status { status, body });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(ChatError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;

    async fn read_http_body(stream: &mut TcpStream) -> Result<(String, Vec<u8>), String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP headers".to_string());
            }
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let request_line = head.lines().next().unwrap_or_default().to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP body".to_string());
            }
            body.extend_from_slice(&chunk[..read]);
        }
        body.truncate(content_length);
        Ok((request_line, body))
    }

    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, Arc<Mutex<Vec<(String, serde_json::Value)>>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let captured = Arc::new(Mutex::new(Vec::new()));
        let captured_for_server = Arc::clone(&captured);

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.map_err(|e| e.to_string())?;
            let (request_line, raw_body) = read_http_body(&mut stream).await?;
            let json: serde_json::Value =
                serde_json::from_slice(&raw_body).map_err(|e| e.to_string())?;
            captured_for_server.lock().await.push((request_line, json));
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|e| e.to_string())?;
            Ok::<(), String>(())
        });

        (format!("http://{addr}"), captured)
    }

    fn test_client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client should build")
    }

    #[tokio::test]
    async fn posts_question_and_decodes_answer() {
        let (base_url, captured) = serve_once(
            "200 OK",
            r#"{"answer":"Hi there","session_id":"abc123","memory_content":"ctx","memory_buffer_length":3}"#,
        )
        .await;
        let backend = HttpChatBackend::new(test_client(), &base_url);

        let response = backend
            .send(ChatRequest {
                question: "Hello".to_string(),
                session_id: None,
            })
            .await
            .expect("request should succeed");

        assert_eq!(response.answer, "Hi there");
        assert_eq!(response.session_id.as_deref(), Some("abc123"));
        assert_eq!(response.memory_buffer_length, Some(3));

        let captured = captured.lock().await.clone();
        assert_eq!(captured.len(), 1);
        assert!(captured[0].0.starts_with("POST /chat "));
        assert_eq!(
            captured[0].1,
            serde_json::json!({"question": "Hello", "session_id": null})
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base_url, _captured) =
            serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#).await;
        let backend = HttpChatBackend::new(test_client(), &base_url);

        let err = backend
            .send(ChatRequest {
                question: "Hello".to_string(),
                session_id: Some("abc".to_string()),
            })
            .await
            .expect_err("request should fail");

        match err {
            ChatError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (base_url, _captured) = serve_once("200 OK", r#"{"reply":"no answer field"}"#).await;
        let backend = HttpChatBackend::new(test_client(), &base_url);

        let err = backend
            .send(ChatRequest {
                question: "Hello".to_string(),
                session_id: None,
            })
            .await
            .expect_err("decode should fail");
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpChatBackend::new(test_client(), &format!("http://{addr}"));
        let err = backend
            .send(ChatRequest {
                question: "Hello".to_string(),
                session_id: None,
            })
            .await
            .expect_err("connection should fail");
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[test]
    fn chat_url_handles_trailing_slash() {
        let backend = HttpChatBackend::new(test_client(), "http://127.0.0.1:8000/");
        assert_eq!(backend.chat_url(), "http://127.0.0.1:8000/chat");
    }
}
