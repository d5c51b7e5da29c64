pub mod ai;
pub mod v1;

use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Main router of API
#[derive(Debug)]
pub struct RouterConfig {
	pub v1: crate::v1::RouterConfig,
}

impl RouterConfig {
	pub fn build(self) -> axum::Router<()> {
		axum::Router::new()
			.route("/", get(root))
			.nest("/api/v1", self.v1.build())
			.layer(TraceLayer::new_for_http())
	}
}

async fn root() -> &'static str {
	"comedy agent api: POST /api/v1/generate-did, POST /api/v1/message"
}
