use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::CaptureConfig;
use crate::platform::{
    acquire_stream, bind_preview, ObjectUrlStore, WebChunk, WebRecorder, WebStream,
};
use crate::session::{CaptureSession, MediaStream, PhaseKind, Snapshot};
use crate::utils::{format_bytes, pill_label, status_line};

type WebSession = CaptureSession<WebStream, WebRecorder, ObjectUrlStore>;

#[component]
pub fn CaptureWidget(config: CaptureConfig) -> impl IntoView {
    let video_ref = NodeRef::<leptos::html::Video>::new();
    let snapshot = RwSignal::new(Snapshot::default());
    let (action_error, set_action_error) = signal::<Option<String>>(None);
    let session = StoredValue::new_local(WebSession::new(config.clone(), ObjectUrlStore));

    let sync = move || {
        if let Some(next) = session.try_with_value(|s| s.snapshot()) {
            snapshot.try_set(next);
        }
    };

    let acquire_config = config.clone();
    spawn_local(async move {
        let stream = match acquire_stream(&acquire_config).await {
            Ok(stream) => stream,
            Err(err) => {
                session.try_update_value(|s| s.fail(err));
                sync();
                return;
            }
        };

        let on_chunk = move |chunk: WebChunk| {
            session.try_update_value(|s| s.push_chunk(chunk));
            sync();
        };
        let on_stop = move || {
            match session.try_update_value(|s| s.finalize().map(|artifact| artifact.is_some())) {
                Some(Ok(_)) => {
                    set_action_error.try_set(None);
                }
                Some(Err(err)) => {
                    error!("Error finalizing recording: {}", err);
                    set_action_error.try_set(Some(err.user_message().to_string()));
                }
                None => {}
            }
            sync();
        };

        match WebRecorder::bind(&stream, &acquire_config, on_chunk, on_stop) {
            Ok(recorder) => {
                let attached = session.try_update_value(|s| s.attach(stream.clone(), recorder));
                match attached {
                    Some(true) => match video_ref.get_untracked() {
                        Some(video) => bind_preview(&video, &stream),
                        None => warn!("Preview element missing; recording without preview"),
                    },
                    Some(false) => {}
                    None => stream.stop_all_tracks(),
                }
            }
            Err(err) => {
                stream.stop_all_tracks();
                session.try_update_value(|s| s.fail(err));
            }
        }
        sync();
    });

    on_cleanup(move || {
        session.try_update_value(|s| s.release());
    });

    let start_recording = move |_| {
        match session.try_update_value(|s| s.start()) {
            Some(Ok(_)) => set_action_error.set(None),
            Some(Err(err)) => {
                error!("Could not start recording: {}", err);
                set_action_error.set(Some(err.user_message().to_string()));
            }
            None => {}
        }
        sync();
    };

    let stop_recording = move |_| {
        match session.try_update_value(|s| s.stop()) {
            Some(Ok(_)) => set_action_error.set(None),
            Some(Err(err)) => {
                error!("Could not stop recording: {}", err);
                set_action_error.set(Some(err.user_message().to_string()));
            }
            None => {}
        }
        sync();
    };

    view! {
        <section class="card capture-card">
            <div class="card-header">
                <div>
                    <p class="eyebrow">"Camera"</p>
                    <h1>{config.title}</h1>
                </div>
                <span class="pill"
                    class:live=move || snapshot.with(|s| s.phase == PhaseKind::Recording)
                    class:glow=move || snapshot.with(|s| s.phase == PhaseKind::Finalizing)
                    class:idle=move || snapshot.with(|s| s.phase == PhaseKind::Idle)
                >
                    {move || pill_label(snapshot.with(|s| s.phase))}
                </span>
            </div>
            <video
                node_ref=video_ref
                class="preview"
                autoplay=true
                muted=true
                style="width: 100%; max-height: 400px;"
            ></video>
            <div class="control-row">
                <button
                    on:click=start_recording
                    disabled=move || !snapshot.with(|s| s.can_start)
                >
                    "Start Recording"
                </button>
                <button
                    on:click=stop_recording
                    disabled=move || !snapshot.with(|s| s.can_stop)
                >
                    "Stop Recording"
                </button>
            </div>
            <div class="status-container">
                <p class="inline-status">{move || snapshot.with(status_line)}</p>
                {move || action_error.get().map(|err| view! { <p class="error-msg">{err}</p> })}
            </div>
            {move || snapshot.with(|s| s.artifact.clone()).map(|artifact| view! {
                <div class="download-row">
                    <a class="button primary" href=artifact.url download=artifact.file_name>
                        "Download Video"
                    </a>
                    <span class="settings-hint">{format_bytes(artifact.byte_len)}</span>
                </div>
            })}
        </section>
    }
}
