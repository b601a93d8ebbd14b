use anyhow::{Context, Result};
use clap::Parser;
use driver_copilot::{
    create_router, spawn_controller, AppState, AssistantClient, ChatInteractionController, Config,
    EventSink, HttpAssistantClient, NatsRecognitionEngine, NatsSynthesisEngine, SpeechBridge,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "driver-copilot", about = "Voice-enabled chat assistant for drivers")]
struct Args {
    /// Config file path (extension optional)
    #[arg(long, default_value = "config/driver-copilot")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Start with spoken replies disabled
    #[arg(long)]
    no_speech_output: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;

    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }
    if args.no_speech_output {
        cfg.speech.output_enabled = false;
    }

    info!("Driver Copilot v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!("Assistant service: {}", cfg.assistant.base_url);

    let assistant: Arc<dyn AssistantClient> = Arc::new(HttpAssistantClient::new(
        &cfg.assistant.base_url,
        cfg.assistant.timeout(),
    )?);

    let session_id = cfg
        .speech
        .session_id
        .clone()
        .unwrap_or_else(|| format!("copilot-{}", uuid::Uuid::new_v4()));
    let bridge = Arc::new(SpeechBridge::connect(&cfg.speech.nats_url, session_id).await?);

    let (sink, events) = EventSink::channel();
    let recognition = NatsRecognitionEngine::connect(Arc::clone(&bridge), sink.clone()).await?;
    let synthesis = NatsSynthesisEngine::connect(Arc::clone(&bridge), sink.clone()).await?;

    let controller = ChatInteractionController::new(
        cfg.controller_config(),
        Box::new(recognition),
        Box::new(synthesis),
        Arc::clone(&assistant),
        sink,
    );
    let handle = spawn_controller(controller, events);

    let router = create_router(
        AppState::new(handle.clone(), assistant),
        &cfg.service.cors_origins,
    );

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("HTTP server failed")?;

    handle.shutdown().await;
    Ok(())
}
