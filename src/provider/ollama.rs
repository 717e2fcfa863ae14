//! Adapter for a local Ollama daemon.
//!
//! `/api/chat` always answers with a stream of newline-delimited JSON
//! fragments. The adapter drains the whole stream and hands back a single
//! assistant message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{checked_body, ensure_messages, ChatProvider};
use super::kind::ProviderKind;
use crate::error::{Result, SuggestError};
use crate::message::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

const KIND: ProviderKind = ProviderKind::Ollama;

/// Client for the Ollama HTTP API. No authentication.
pub struct OllamaClient {
    host: String,
    client: reqwest::Client,
}

/// Ollama takes no sampling options on this path.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Default, Deserialize)]
struct StreamFragment {
    #[serde(default)]
    message: Option<FragmentMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FragmentMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    models: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Concatenates content fragments from an NDJSON body fed in arbitrary chunks.
///
/// Lines that are not valid JSON are skipped. A fragment carrying an `error`
/// field aborts the exchange.
#[derive(Debug, Default)]
pub struct NdjsonAccumulator {
    pending: Vec<u8>,
    content: String,
    done: bool,
    skipped: usize,
}

impl NdjsonAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk of the body. Complete lines are decoded at once,
    /// a trailing partial line waits for the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(chunk);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.consume_line(&line)?;
        }
        Ok(())
    }

    /// Decodes whatever is left after the stream ended and returns the full content.
    pub fn finish(mut self) -> Result<String> {
        let rest = std::mem::take(&mut self.pending);
        self.consume_line(&rest)?;
        if self.skipped > 0 {
            debug!(skipped = self.skipped, "skipped malformed stream lines");
        }
        if !self.done {
            debug!("stream ended without a done fragment");
        }
        Ok(self.content)
    }

    fn consume_line(&mut self, line: &[u8]) -> Result<()> {
        let line = line.trim_ascii();
        if line.is_empty() {
            return Ok(());
        }
        let fragment: StreamFragment = match serde_json::from_slice(line) {
            Ok(fragment) => fragment,
            Err(e) => {
                debug!(error = %e, line = %String::from_utf8_lossy(line), "skipping malformed stream line");
                self.skipped += 1;
                return Ok(());
            }
        };
        if let Some(message) = fragment.error {
            return Err(SuggestError::Provider {
                provider: KIND,
                status: 200,
                message,
            });
        }
        if let Some(message) = fragment.message {
            self.content.push_str(&message.content);
        }
        self.done |= fragment.done;
        Ok(())
    }
}

impl OllamaClient {
    pub fn new(host: &str, client: reqwest::Client) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaClient {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        ensure_messages(request)?;
        let url = format!("{}/api/chat", self.host);
        debug!(provider = %KIND, %url, model = %request.model, messages = request.messages.len(), "sending chat");

        let body = OllamaRequest {
            model: &request.model,
            messages: &request.messages,
        };
        let mut response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(SuggestError::network(KIND))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(SuggestError::network(KIND))?;
            return Err(SuggestError::from_status(KIND, status, body));
        }

        let mut acc = NdjsonAccumulator::new();
        while let Some(chunk) = response.chunk().await.map_err(SuggestError::network(KIND))? {
            acc.push(&chunk)?;
        }
        Ok(ChatCompletionResponse::single(acc.finish()?))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.host);
        debug!(provider = %KIND, %url, "listing models");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SuggestError::network(KIND))?;
        let body = checked_body(KIND, response).await?;
        let tags: TagList =
            serde_json::from_str(&body).map_err(|e| SuggestError::decode(KIND, e))?;
        Ok(tags.models.into_iter().map(|t| t.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HELLO_STREAM: &str = concat!(
        "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"lo\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"!\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
    );

    #[test]
    fn test_accumulator_joins_lines_split_across_chunks() {
        let mut acc = NdjsonAccumulator::new();
        let bytes = HELLO_STREAM.as_bytes();
        for chunk in bytes.chunks(7) {
            acc.push(chunk).unwrap();
        }
        assert_eq!(acc.finish().unwrap(), "Hello!");
    }

    #[test]
    fn test_accumulator_skips_malformed_lines() {
        let mut acc = NdjsonAccumulator::new();
        acc.push(b"{\"message\":{\"content\":\"a\"}}\n").unwrap();
        acc.push(b"{not json\n").unwrap();
        acc.push(b"\n").unwrap();
        acc.push(b"{\"message\":{\"content\":\"b\"},\"done\":true}").unwrap();
        assert_eq!(acc.finish().unwrap(), "ab");
    }

    #[test]
    fn test_accumulator_surfaces_error_fragment() {
        let mut acc = NdjsonAccumulator::new();
        let err = acc
            .push(b"{\"error\":\"model 'nope' not found\"}\n")
            .unwrap_err();
        assert!(matches!(err, SuggestError::Provider { message, .. } if message.contains("not found")));
    }

    #[tokio::test]
    async fn test_stream_concatenates_into_one_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "model": "llama3:8b",
                "messages": [{"role": "user", "content": "Hi"}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(HELLO_STREAM, "application/x-ndjson"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(&server.uri(), reqwest::Client::new());
        let req = ChatCompletionRequest::new("llama3:8b", vec![ChatMessage::user("Hi")])
            .with_temperature(0.1);
        let resp = client.create_chat_completion(&req).await.unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].index, 0);
        assert_eq!(resp.choices[0].message.role, Role::Assistant);
        assert_eq!(resp.choices[0].message.content, "Hello!");
    }

    #[tokio::test]
    async fn test_error_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&server.uri(), reqwest::Client::new());
        let req = ChatCompletionRequest::new("missing:latest", vec![ChatMessage::user("Hi")]);
        let err = client.create_chat_completion(&req).await.unwrap_err();
        assert!(matches!(err, SuggestError::Provider { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_truncated_stream_is_network_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let fragment = "{\"message\":{\"role\":\"assistant\",\"content\":\"Hel\"},\"done\":false}\n";
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/x-ndjson\r\ncontent-length: {}\r\n\r\n",
                fragment.len() + 500
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(fragment.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let client = OllamaClient::new(&format!("http://{addr}"), reqwest::Client::new());
        let req = ChatCompletionRequest::new("llama3:8b", vec![ChatMessage::user("Hi")]);
        let err = client.create_chat_completion(&req).await.unwrap_err();
        assert!(matches!(err, SuggestError::Network { provider: ProviderKind::Ollama, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_models_reads_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "llama3:8b", "size": 1}, {"name": "mistral:latest"}]
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&format!("{}/", server.uri()), reqwest::Client::new());
        assert_eq!(
            client.list_models().await.unwrap(),
            vec!["llama3:8b", "mistral:latest"]
        );
    }
}
