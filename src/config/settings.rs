//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every field has a serde default, so a partial `settings.toml` only needs
//! to mention the values it overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::judge::FuzzyThreshold;

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Listener settings for the WebSocket server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g. `"0.0.0.0"`, `"127.0.0.1"`).
    pub host: String,
    /// TCP port.  The quiz front end connects to `ws://<host>:3001`.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the remote transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Base URL of an OpenAI-compatible API.
    ///
    /// - OpenAI: `https://api.openai.com`
    /// - Self-hosted (e.g. faster-whisper-server): `http://localhost:8000`
    pub base_url: String,
    /// API key — `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent with every request (e.g. `"whisper-1"`).
    pub model: String,
    /// Language hint as an ISO-639-1 code.
    pub language: String,
    /// Maximum seconds to wait for a transcription before giving up.
    pub timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "whisper-1".into(),
            language: "en".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for staging submitted audio clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Clips smaller than this many bytes are rejected as too short.
    pub min_audio_bytes: usize,
    /// Directory for staged clips — `None` means the system temp directory.
    pub staging_dir: Option<PathBuf>,
    /// File extension of staged clips; the transcription service uses it to
    /// detect the container format.
    pub clip_extension: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            min_audio_bytes: 5_000,
            staging_dir: None,
            clip_extension: "webm".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// JudgeConfig
// ---------------------------------------------------------------------------

/// Answer-matching tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Fuzzy similarity threshold in whole percent.
    pub fuzzy_threshold_percent: u32,
    /// Accept a similarity exactly equal to the threshold.
    pub fuzzy_inclusive: bool,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        let fuzzy = FuzzyThreshold::default();
        Self {
            fuzzy_threshold_percent: fuzzy.percent,
            fuzzy_inclusive: fuzzy.inclusive,
        }
    }
}

impl JudgeConfig {
    pub fn fuzzy_threshold(&self) -> FuzzyThreshold {
        FuzzyThreshold {
            percent: self.fuzzy_threshold_percent,
            inclusive: self.fuzzy_inclusive,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use voice_quiz::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WebSocket listener settings.
    pub server: ServerConfig,
    /// Transcription service settings.
    pub stt: SttConfig,
    /// Audio staging settings.
    pub audio: AudioConfig,
    /// Answer-matching settings.
    pub judge: JudgeConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PORT` and `OPENAI_API_KEY` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup.  Unparseable or empty values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(e) => log::warn!("ignoring PORT={port:?}: {e}"),
            }
        }

        if let Some(key) = lookup("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.stt.api_key = Some(key.trim().to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
