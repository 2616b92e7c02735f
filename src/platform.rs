//! Browser media bindings: `getUserMedia`, `MediaRecorder`, `Blob` and object URLs.

use leptos::web_sys::{
    self, Blob, BlobEvent, BlobPropertyBag, HtmlVideoElement, MediaRecorderOptions,
    MediaStreamConstraints, MediaStreamTrack, Url,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::CaptureConfig;
use crate::error::{classify_js_error, extract_error, CaptureError};
use crate::session::{ArtifactStore, Chunk, MediaStream, Recorder};

// ============================================================================
// Stream
// ============================================================================

#[derive(Clone)]
pub struct WebStream(pub web_sys::MediaStream);

impl WebStream {
    fn tracks(&self) -> Vec<MediaStreamTrack> {
        self.0
            .get_tracks()
            .iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
            .collect()
    }
}

impl MediaStream for WebStream {
    fn stop_all_tracks(&self) {
        for track in self.tracks() {
            track.stop();
        }
    }
}

/// Prompts for camera/microphone access.
pub async fn acquire_stream(config: &CaptureConfig) -> Result<WebStream, CaptureError> {
    let window = web_sys::window().ok_or(CaptureError::Unsupported)?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|_| CaptureError::Unsupported)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::from_bool(config.video));
    constraints.set_audio(&JsValue::from_bool(config.audio));

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|err| classify_js_error(&err))?;
    let value = JsFuture::from(promise)
        .await
        .map_err(|err| classify_js_error(&err))?;
    value
        .dyn_into::<web_sys::MediaStream>()
        .map(WebStream)
        .map_err(|_| CaptureError::Platform("getUserMedia did not return a stream".to_string()))
}

/// Shows the stream on the preview surface. The preview is always muted.
pub fn bind_preview(video: &HtmlVideoElement, stream: &WebStream) {
    video.set_muted(true);
    video.set_src_object(Some(&stream.0));
}

// ============================================================================
// Recorder
// ============================================================================

pub struct WebChunk(pub Blob);

impl Chunk for WebChunk {
    fn byte_len(&self) -> u64 {
        self.0.size() as u64
    }
}

pub struct WebRecorder {
    inner: web_sys::MediaRecorder,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(web_sys::Event)>,
}

impl WebRecorder {
    /// Creates a recorder for `stream` and wires its events to the given callbacks.
    pub fn bind(
        stream: &WebStream,
        config: &CaptureConfig,
        mut on_chunk: impl FnMut(WebChunk) + 'static,
        mut on_stop: impl FnMut() + 'static,
    ) -> Result<Self, CaptureError> {
        let inner = if web_sys::MediaRecorder::is_type_supported(&config.mime_type) {
            let options = MediaRecorderOptions::new();
            options.set_mime_type(&config.mime_type);
            web_sys::MediaRecorder::new_with_media_stream_and_media_recorder_options(
                &stream.0, &options,
            )
        } else {
            leptos::logging::warn!(
                "Recorder does not support {}; using platform default",
                config.mime_type
            );
            web_sys::MediaRecorder::new_with_media_stream(&stream.0)
        }
        .map_err(|err| CaptureError::Recorder(extract_error(&err)))?;

        let on_data = Closure::wrap(Box::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                on_chunk(WebChunk(blob));
            }
        }) as Box<dyn FnMut(BlobEvent)>);
        let on_stop = Closure::wrap(Box::new(move |_: web_sys::Event| on_stop())
            as Box<dyn FnMut(web_sys::Event)>);

        inner.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        inner.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        Ok(Self {
            inner,
            _on_data: on_data,
            _on_stop: on_stop,
        })
    }
}

impl Recorder for WebRecorder {
    fn start(&mut self, timeslice_ms: Option<u32>) -> Result<(), CaptureError> {
        match timeslice_ms {
            Some(ms) => self
                .inner
                .start_with_time_slice(i32::try_from(ms).unwrap_or(i32::MAX)),
            None => self.inner.start(),
        }
        .map_err(|err| CaptureError::Recorder(extract_error(&err)))
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.inner
            .stop()
            .map_err(|err| CaptureError::Recorder(extract_error(&err)))
    }
}

impl Drop for WebRecorder {
    fn drop(&mut self) {
        // The closures die with us; the platform must not call into them afterwards.
        self.inner.set_ondataavailable(None);
        self.inner.set_onstop(None);
    }
}

// ============================================================================
// Artifacts
// ============================================================================

#[derive(Default)]
pub struct ObjectUrlStore;

impl ArtifactStore for ObjectUrlStore {
    type Chunk = WebChunk;

    fn publish(&self, chunks: &[WebChunk], mime_type: &str) -> Result<String, CaptureError> {
        let parts = js_sys::Array::new();
        for chunk in chunks {
            parts.push(&chunk.0);
        }
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_blob_sequence_and_options(&parts, &options)
            .map_err(|err| CaptureError::Artifact(extract_error(&err)))?;
        Url::create_object_url_with_blob(&blob)
            .map_err(|err| CaptureError::Artifact(extract_error(&err)))
    }

    fn revoke(&self, url: &str) {
        if let Err(err) = Url::revoke_object_url(url) {
            leptos::logging::warn!("Failed to revoke {}: {}", url, extract_error(&err));
        }
    }
}
