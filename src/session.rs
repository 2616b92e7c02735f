//! Capture session state machine.
//!
//! Owns the acquired stream, the recorder bound to it, the chunk buffer, and the current
//! download artifact. Platform access goes through the traits below so the state machine runs
//! the same in the browser and under native tests.

use std::mem;

use crate::config::CaptureConfig;
use crate::error::CaptureError;

// ============================================================================
// Platform Seams
// ============================================================================

/// A live audio/video source.
pub trait MediaStream {
    /// Stops every track. Safe to call more than once.
    fn stop_all_tracks(&self);
}

/// One encoded fragment emitted by a recorder.
pub trait Chunk {
    fn byte_len(&self) -> u64;
}

/// A recorder bound to a single stream.
pub trait Recorder {
    fn start(&mut self, timeslice_ms: Option<u32>) -> Result<(), CaptureError>;
    /// Requests a stop. Finalization happens later, when the platform reports it.
    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Turns drained chunks into a revocable downloadable resource.
pub trait ArtifactStore {
    type Chunk: Chunk;

    /// Concatenates `chunks` in order and returns a URL for the result.
    fn publish(&self, chunks: &[Self::Chunk], mime_type: &str) -> Result<String, CaptureError>;
    fn revoke(&self, url: &str);
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the permission prompt to resolve.
    Uninitialized,
    /// Acquisition failed. Terminal for this mount.
    Unavailable(CaptureError),
    Idle,
    Recording,
    /// Stop requested; waiting for the recorder's final flush.
    Finalizing,
    Released,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Uninitialized => PhaseKind::Uninitialized,
            Self::Unavailable(_) => PhaseKind::Unavailable,
            Self::Idle => PhaseKind::Idle,
            Self::Recording => PhaseKind::Recording,
            Self::Finalizing => PhaseKind::Finalizing,
            Self::Released => PhaseKind::Released,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Uninitialized,
    Unavailable,
    Idle,
    Recording,
    Finalizing,
    Released,
}

/// A finished recording available for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub url: String,
    pub byte_len: u64,
    pub mime_type: String,
    pub file_name: String,
}

/// UI-facing copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: PhaseKind,
    pub can_start: bool,
    pub can_stop: bool,
    pub buffered_bytes: u64,
    pub artifact: Option<Artifact>,
    pub error: Option<CaptureError>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            phase: PhaseKind::Uninitialized,
            can_start: false,
            can_stop: false,
            buffered_bytes: 0,
            artifact: None,
            error: None,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

pub struct CaptureSession<S, R, P>
where
    S: MediaStream,
    R: Recorder,
    P: ArtifactStore,
{
    config: CaptureConfig,
    phase: Phase,
    stream: Option<S>,
    recorder: Option<R>,
    chunks: Vec<P::Chunk>,
    buffered_bytes: u64,
    artifact: Option<Artifact>,
    store: P,
}

impl<S, R, P> CaptureSession<S, R, P>
where
    S: MediaStream,
    R: Recorder,
    P: ArtifactStore,
{
    pub fn new(config: CaptureConfig, store: P) -> Self {
        Self {
            config,
            phase: Phase::Uninitialized,
            stream: None,
            recorder: None,
            chunks: Vec::new(),
            buffered_bytes: 0,
            artifact: None,
            store,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_recording(&self) -> bool {
        self.phase == Phase::Recording
    }

    pub fn has_recorder(&self) -> bool {
        self.recorder.is_some()
    }

    pub fn can_start(&self) -> bool {
        self.phase == Phase::Idle && self.recorder.is_some()
    }

    pub fn can_stop(&self) -> bool {
        self.phase == Phase::Recording
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn buffered_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn buffered_bytes(&self) -> u64 {
        self.buffered_bytes
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase.kind(),
            can_start: self.can_start(),
            can_stop: self.can_stop(),
            buffered_bytes: self.buffered_bytes(),
            artifact: self.artifact.clone(),
            error: match &self.phase {
                Phase::Unavailable(err) => Some(err.clone()),
                _ => None,
            },
        }
    }

    /// Takes ownership of a granted stream and its recorder.
    ///
    /// A grant that resolves after [`release`](Self::release) has its tracks stopped at once and
    /// `false` is returned.
    pub fn attach(&mut self, stream: S, recorder: R) -> bool {
        if self.phase != Phase::Uninitialized {
            leptos::logging::warn!(
                "Media granted in phase {:?}; stopping the new stream",
                self.phase.kind()
            );
            stream.stop_all_tracks();
            return false;
        }
        self.stream = Some(stream);
        self.recorder = Some(recorder);
        self.phase = Phase::Idle;
        leptos::logging::log!("Media stream acquired; recorder ready");
        true
    }

    /// Records an acquisition failure. The session stays unusable for this mount.
    pub fn fail(&mut self, error: CaptureError) {
        leptos::logging::error!("Error accessing webcam: {}", error);
        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Unavailable(error);
        }
    }

    /// Starts a new recording. Returns `Ok(false)` when the session is not ready to start.
    pub fn start(&mut self) -> Result<bool, CaptureError> {
        if !self.can_start() {
            return Ok(false);
        }
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(false);
        };
        self.chunks.clear();
        self.buffered_bytes = 0;
        recorder.start(self.config.timeslice_ms)?;
        self.phase = Phase::Recording;
        leptos::logging::log!("Recording started");
        Ok(true)
    }

    /// Appends a chunk emitted by the recorder. Empty chunks and chunks outside a recording are
    /// dropped.
    pub fn push_chunk(&mut self, chunk: P::Chunk) {
        if chunk.byte_len() == 0 {
            return;
        }
        match self.phase {
            Phase::Recording | Phase::Finalizing => {
                self.buffered_bytes += chunk.byte_len();
                self.chunks.push(chunk);
            }
            _ => leptos::logging::warn!(
                "Dropping {} byte chunk received while {:?}",
                chunk.byte_len(),
                self.phase.kind()
            ),
        }
    }

    /// Requests the recorder to stop. Returns `Ok(false)` when nothing is recording.
    pub fn stop(&mut self) -> Result<bool, CaptureError> {
        if !self.can_stop() {
            return Ok(false);
        }
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(false);
        };
        recorder.stop()?;
        self.phase = Phase::Finalizing;
        leptos::logging::log!("Recording stopped; waiting for final data");
        Ok(true)
    }

    /// Assembles the buffered chunks into a new artifact once the recorder has flushed.
    ///
    /// Also handles a stop the platform raised on its own while recording, e.g. when a track
    /// ended. Returns `Ok(None)` when nothing was recording.
    pub fn finalize(&mut self) -> Result<Option<&Artifact>, CaptureError> {
        match self.phase {
            Phase::Finalizing => {}
            Phase::Recording => {
                leptos::logging::warn!("Recorder stopped without a stop request");
            }
            _ => return Ok(None),
        }
        self.phase = Phase::Idle;
        let chunks = mem::take(&mut self.chunks);
        let byte_len = mem::take(&mut self.buffered_bytes);
        let url = self.store.publish(&chunks, &self.config.mime_type)?;

        if let Some(previous) = self.artifact.take() {
            self.store.revoke(&previous.url);
        }
        leptos::logging::log!(
            "Recording finalized: {} chunks, {} bytes",
            chunks.len(),
            byte_len
        );
        self.artifact = Some(Artifact {
            url,
            byte_len,
            mime_type: self.config.mime_type.clone(),
            file_name: self.config.file_name.clone(),
        });
        Ok(self.artifact.as_ref())
    }

    /// Stops every track of the acquired stream, whatever the current phase.
    pub fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
        self.recorder = None;
        self.chunks.clear();
        self.buffered_bytes = 0;
        if let Some(artifact) = self.artifact.take() {
            self.store.revoke(&artifact.url);
        }
        if self.phase != Phase::Released {
            leptos::logging::log!("Capture session released");
        }
        self.phase = Phase::Released;
    }
}
