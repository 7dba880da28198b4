//! Application entry point — voice quiz judging server.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (first CLI argument, else the platform config dir;
//!    defaults on first run), then apply `PORT` / `OPENAI_API_KEY`.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the transcription gateway, audio stager and equivalence engine.
//! 5. Serve WebSocket + health routes until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use voice_quiz::{
    audio::AudioStager,
    config::AppConfig,
    judge::EquivalenceEngine,
    pipeline::JudgePipeline,
    server,
    stt::{TranscriptionGateway, WhisperApiGateway},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voice quiz server starting up");

    // 2. Configuration
    let mut config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load_from(&path)?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    config.apply_env();

    if config.stt.api_key.is_none() {
        log::warn!("No transcription API key configured; requests are sent unauthenticated");
    }

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Pipeline
    let gateway: Arc<dyn TranscriptionGateway> =
        Arc::new(WhisperApiGateway::from_config(&config.stt));
    let stager = AudioStager::from_config(&config.audio);
    log::info!(
        "Staging clips in {} (minimum {} bytes)",
        stager.dir().display(),
        stager.min_bytes()
    );
    let engine = EquivalenceEngine::new(config.judge.fuzzy_threshold());
    let pipeline = Arc::new(JudgePipeline::new(
        stager,
        gateway,
        engine,
        config.stt.language.clone(),
    ));

    // 5. Serve
    rt.block_on(server::serve(&config.server, pipeline))
}
