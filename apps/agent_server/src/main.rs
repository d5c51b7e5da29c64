use std::net::{Ipv6Addr, SocketAddr};

use agent_server::ai::AiClient;
use clap::Parser as _;
use color_eyre::eyre::Context as _;
use reqwest::Url;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(clap::Parser, Debug)]
struct Cli {
	#[clap(long, short, default_value = "3000")]
	port: u16,
	/// Chat completion endpoint, OpenAI api shape.
	#[clap(
		long,
		env,
		default_value = "https://api.siliconflow.cn/v1/chat/completions"
	)]
	ai_url: Url,
	#[clap(long, env, default_value = "deepseek-ai/DeepSeek-R1-Distill-Qwen-14B")]
	ai_model: String,
	/// Bearer token for the completion endpoint.
	#[clap(long, env, hide_env_values = true)]
	ai_api_key: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or("info".into()))
		.with(tracing_subscriber::fmt::layer())
		.init();

	let cli = Cli::parse();

	let reqwest_client = reqwest::Client::new();
	let ai = AiClient::new(reqwest_client, cli.ai_url, cli.ai_api_key, cli.ai_model);

	let router = agent_server::RouterConfig {
		v1: agent_server::v1::RouterConfig { ai },
	}
	.build();

	let listener = tokio::net::TcpListener::bind(SocketAddr::new(
		Ipv6Addr::UNSPECIFIED.into(),
		cli.port,
	))
	.await
	.wrap_err("failed to bind listener")?;
	info!("listening on {}", listener.local_addr().unwrap());
	axum::serve(listener, router).await.map_err(|e| e.into())
}
