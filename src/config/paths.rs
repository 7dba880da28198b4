//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir:
//!   Windows: %APPDATA%\voice-quiz\
//!   macOS:   ~/Library/Application Support/voice-quiz/
//!   Linux:   ~/.config/voice-quiz/
//!
//! Staged clips go to a `voice-quiz` subdirectory of the system temp dir
//! unless `audio.staging_dir` is set.

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default directory for staged audio clips.
    pub staging_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "voice-quiz";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard config path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let staging_dir = std::env::temp_dir().join(Self::APP_NAME);

        Self {
            config_dir,
            settings_file,
            staging_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
