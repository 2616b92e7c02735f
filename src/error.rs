use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while acquiring media or producing a recording.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera or microphone access was denied")]
    PermissionDenied,
    #[error("No camera or microphone found")]
    DeviceNotFound,
    #[error("Camera or microphone is in use by another application")]
    DeviceBusy,
    #[error("Media capture is not supported in this context")]
    Unsupported,
    #[error("Platform error: {0}")]
    Platform(String),
    #[error("Recorder error: {0}")]
    Recorder(String),
    #[error("Could not assemble recording: {0}")]
    Artifact(String),
}

impl CaptureError {
    /// Classifies a rejected `getUserMedia` promise by its DOMException name.
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "SecurityError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "OverconstrainedError" | "DevicesNotFoundError" => {
                Self::DeviceNotFound
            }
            "NotReadableError" | "AbortError" | "TrackStartError" => Self::DeviceBusy,
            "NotSupportedError" | "TypeError" => Self::Unsupported,
            _ if message.is_empty() => Self::Platform(name.to_string()),
            _ => Self::Platform(format!("{name}: {message}")),
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Camera access was blocked. Allow it in your browser settings and reload."
            }
            Self::DeviceNotFound => "No camera or microphone was found.",
            Self::DeviceBusy => "Your camera is being used by another application.",
            Self::Unsupported => "This browser cannot record video here. Try a secure (https) page.",
            Self::Platform(_) => "The camera could not be started.",
            Self::Recorder(_) => "The recorder stopped unexpectedly.",
            Self::Artifact(_) => "The recording could not be saved.",
        }
    }
}

/// Errors in page-provided widget configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one of video or audio must be enabled")]
    NoTracks,
    #[error("MIME type must not be empty")]
    EmptyMimeType,
    #[error("Download file name must not be empty")]
    EmptyFileName,
    #[error("Timeslice must be greater than zero")]
    ZeroTimeslice,
    #[error("Invalid configuration object: {0}")]
    Decode(String),
}

/// Pulls a readable message out of a thrown JS value.
pub fn extract_error(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &"message".into())
                .ok()
                .and_then(|v| v.as_string())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Maps a rejected media promise to a [`CaptureError`], using the DOMException name when present.
pub fn classify_js_error(err: &JsValue) -> CaptureError {
    let name = js_sys::Reflect::get(err, &"name".into())
        .ok()
        .and_then(|v| v.as_string());
    match name {
        Some(name) => {
            let message = js_sys::Reflect::get(err, &"message".into())
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            CaptureError::from_dom_exception(&name, &message)
        }
        None => CaptureError::Platform(extract_error(err)),
    }
}
