//! Client for the chat completion endpoint that powers the agent's replies.

use color_eyre::eyre::eyre;
use color_eyre::{eyre::WrapErr as _, Result, Section as _};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// The agent's on-stage persona, prepended to every conversation.
const SYSTEM_PROMPT: &str = "You are a very funny stand-up comedian who \
responds to any topic with wit and humor, making liberal use of puns, \
exaggeration and metaphor. Your replies should be: 1) light and playful, \
poking fun at everyday life; 2) quick-witted, always finding the funny side \
of things; 3) not without depth, showing some real thought behind the \
humor; 4) concise and punchy. Whatever the other person says, answer like a \
comedian on stage, never formally.";

/// One turn of a chat conversation, in the shape the completion API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}

impl ChatMessage {
	pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			role: role.into(),
			content: content.into(),
		}
	}
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
	model: &'a str,
	messages: &'a [ChatMessage],
	temperature: f32,
	max_tokens: u32,
	top_p: f32,
	stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
	choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
	message: ChatMessage,
}

/// Talks to an OpenAI-compatible chat completion endpoint.
#[derive(Clone)]
pub struct AiClient {
	client: reqwest::Client,
	url: Url,
	api_key: String,
	model: String,
}

impl AiClient {
	pub fn new(client: reqwest::Client, url: Url, api_key: String, model: String) -> Self {
		Self {
			client,
			url,
			api_key,
			model,
		}
	}

	/// Sends `messages` to the completion endpoint and returns the first
	/// choice's content.
	pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
		let request = CompletionRequest {
			model: &self.model,
			messages,
			temperature: 0.7,
			max_tokens: 1000,
			top_p: 0.9,
			stream: false,
		};
		let response = self
			.client
			.post(self.url.clone())
			.bearer_auth(&self.api_key)
			.json(&request)
			.send()
			.await
			.wrap_err("failed to send completion request")
			.with_note(|| format!("url was {}", self.url))?
			.error_for_status()
			.wrap_err("completion endpoint returned an error status")?;
		let completion: CompletionResponse = response
			.json()
			.await
			.wrap_err("unexpected response, expected a chat completion")?;
		let choice = completion
			.choices
			.into_iter()
			.next()
			.ok_or_else(|| eyre!("completion contained no choices"))?;
		Ok(choice.message.content)
	}

	/// Builds the comedian conversation (persona, then history, then the
	/// user's message) and completes it.
	pub async fn comedian_reply(
		&self,
		message: &str,
		history: &[ChatMessage],
	) -> Result<String> {
		let mut messages = Vec::with_capacity(history.len() + 2);
		messages.push(ChatMessage::new("system", SYSTEM_PROMPT));
		messages.extend_from_slice(history);
		messages.push(ChatMessage::new("user", message));
		self.complete(&messages).await
	}
}

// The bearer token stays out of Debug output.
impl std::fmt::Debug for AiClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AiClient")
			.field("url", &self.url)
			.field("model", &self.model)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn test_client() -> AiClient {
		AiClient::new(
			reqwest::Client::new(),
			"http://localhost:9/v1/chat/completions".parse().unwrap(),
			"test-key".to_owned(),
			"test-model".to_owned(),
		)
	}

	#[test]
	fn test_debug_does_not_expose_api_key() {
		let debugged = format!("{:?}", test_client());
		assert!(!debugged.contains("test-key"));
		assert!(debugged.contains("test-model"));
	}

	#[test]
	fn test_request_serialization() {
		let messages = [ChatMessage::new("user", "hello")];
		let request = CompletionRequest {
			model: "test-model",
			messages: &messages,
			temperature: 0.7,
			max_tokens: 1000,
			top_p: 0.9,
			stream: false,
		};
		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(value["model"], "test-model");
		assert_eq!(value["messages"][0]["role"], "user");
		assert_eq!(value["messages"][0]["content"], "hello");
		assert_eq!(value["stream"], false);
	}

	#[test]
	fn test_response_deserialization() {
		let completion: CompletionResponse = serde_json::from_value(serde_json::json!({
			"id": "cmpl-1",
			"choices": [
				{"index": 0, "message": {"role": "assistant", "content": "ha!"}}
			],
			"usage": {"total_tokens": 3}
		}))
		.unwrap();
		assert_eq!(completion.choices[0].message.content, "ha!");
	}
}
