//! Widget configuration.
//!
//! The host page may define `window.__WEBCAM_CAPTURE_CONFIG__` before the wasm bundle loads.
//! Any field it omits takes its default.

use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::ConfigError;

pub const CONFIG_GLOBAL: &str = "__WEBCAM_CAPTURE_CONFIG__";
pub const DEFAULT_MIME_TYPE: &str = "video/webm";
pub const DEFAULT_FILE_NAME: &str = "recorded-video.webm";
pub const DEFAULT_TITLE: &str = "Webcam Video Recorder";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub title: String,
    pub video: bool,
    pub audio: bool,
    /// Media type the artifact is tagged with; also requested from the recorder when supported.
    pub mime_type: String,
    pub file_name: String,
    /// When set, the recorder flushes a chunk every `timeslice_ms` instead of once on stop.
    pub timeslice_ms: Option<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            video: true,
            audio: true,
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            timeslice_ms: None,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.video && !self.audio {
            return Err(ConfigError::NoTracks);
        }
        if self.mime_type.trim().is_empty() {
            return Err(ConfigError::EmptyMimeType);
        }
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if self.timeslice_ms == Some(0) {
            return Err(ConfigError::ZeroTimeslice);
        }
        Ok(())
    }

    /// Decodes and validates a config object handed over from JS.
    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|err| ConfigError::Decode(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the page-provided config, falling back to defaults when it is absent or invalid.
    pub fn load() -> Self {
        let Some(window) = leptos::web_sys::window() else {
            return Self::default();
        };
        let value = match js_sys::Reflect::get(&window, &CONFIG_GLOBAL.into()) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return Self::default(),
        };
        match Self::from_js(value) {
            Ok(config) => {
                leptos::logging::log!("Loaded capture config: {:?}", config);
                config
            }
            Err(err) => {
                leptos::logging::warn!("Ignoring {}: {}", CONFIG_GLOBAL, err);
                Self::default()
            }
        }
    }
}
