//! V1 of the API. This is subject to change until we commit to stability, after
//! which point any breaking changes will go in a V2 api.

use axum::extract::{Host, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use did_self::crypto::ed25519::KeyPair;
use did_self::did::Metadata;
use did_self::DidSelf;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::ai::{AiClient, ChatMessage};

/// Stand-in reply for when the completion backend is unreachable, so the
/// comedian never breaks character.
const FALLBACK_REPLY: &str = "Looks like my joke signal got stuck! Let's try \
again in a bit, or you could warm up the stage with a joke of your own?";

/// Router of API V1
#[derive(Debug)]
pub struct RouterConfig {
	pub ai: AiClient,
}

impl RouterConfig {
	pub fn build(self) -> Router {
		Router::new()
			.route("/generate-did", post(generate_did))
			.route("/message", post(message))
			.with_state(AppState { ai: self.ai })
	}
}

#[derive(Debug, Clone)]
struct AppState {
	ai: AiClient,
}

#[derive(Debug, Deserialize)]
struct GenerateDidRequest {
	#[serde(default = "default_agent_name")]
	agent_name: String,
	#[serde(default)]
	endpoint: String,
}

fn default_agent_name() -> String {
	"Comedy Agent".to_owned()
}

#[derive(Debug, Serialize)]
struct GenerateDidResponse {
	did: String,
	metadata: Metadata,
}

async fn generate_did(
	Host(host): Host,
	Json(request): Json<GenerateDidRequest>,
) -> Result<Json<GenerateDidResponse>, ApiError> {
	let endpoint = if request.endpoint.is_empty() {
		let scheme = if host.starts_with("localhost") {
			"http"
		} else {
			"https"
		};
		format!("{scheme}://{host}/api/v1/message")
	} else {
		if !request.endpoint.starts_with("http://")
			&& !request.endpoint.starts_with("https://")
		{
			warn!("endpoint {:?} does not look like an http(s) url", request.endpoint);
		}
		request.endpoint
	};

	let mut metadata = Metadata::new();
	metadata.insert("name".to_owned(), request.agent_name.into());
	metadata.insert("type".to_owned(), "ComedyAgent".into());
	metadata.insert(
		"created".to_owned(),
		Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true).into(),
	);
	metadata.insert("version".to_owned(), "1.0.0".into());

	// The key pair exists only for the duration of this handler; once the
	// identifier is signed the private half is dropped for good.
	let key_pair = KeyPair::generate();
	let did = DidSelf::create(&key_pair, &endpoint, &metadata)?;
	info!("issued {}...", &did.as_str()[..30]);

	Ok(Json(GenerateDidResponse {
		did: did.as_str().to_owned(),
		metadata,
	}))
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
	message: String,
	#[serde(default)]
	sender_did: Option<String>,
	#[serde(default)]
	chat_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
	response: String,
	timestamp: String,
}

async fn message(
	State(state): State<AppState>,
	Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
	// A sender identity is optional, but if one is offered it has to hold
	// up: a string we cannot parse or whose signature fails gets the whole
	// message rejected before anything else happens.
	if let Some(sender_did) = &request.sender_did {
		let sender: DidSelf = sender_did.parse().map_err(ApiError::UntrustedSender)?;
		if !sender.is_valid() {
			return Err(ApiError::ForgedSender);
		}
		let name = sender
			.metadata()
			.get("name")
			.and_then(|name| name.as_str())
			.unwrap_or("Unknown");
		info!("message from {name:?} (endpoint {})", sender.endpoint());
	}

	let response = match state
		.ai
		.comedian_reply(&request.message, &request.chat_history)
		.await
	{
		Ok(reply) => reply,
		Err(err) => {
			warn!("completion backend failed: {err:#}");
			FALLBACK_REPLY.to_owned()
		}
	};

	Ok(Json(MessageResponse {
		response,
		timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
	}))
}

#[derive(thiserror::Error, Debug)]
enum ApiError {
	#[error("invalid sender did: {0}")]
	UntrustedSender(#[source] did_self::did::ParseError),
	#[error("sender did signature verification failed")]
	ForgedSender,
	#[error("failed to issue did")]
	Issue(#[from] did_self::did::CreateError),
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = match &self {
			Self::UntrustedSender(_) | Self::ForgedSender => StatusCode::BAD_REQUEST,
			Self::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		(status, Json(json!({ "error": self.to_string() }))).into_response()
	}
}
