use crate::session::{PhaseKind, Snapshot};

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1_000 {
        format!("{bytes} B")
    } else if bytes < 1_000_000 {
        format!("{:.1} KB", bytes as f64 / 1e3)
    } else {
        format!("{:.1} MB", bytes as f64 / 1e6)
    }
}

/// Short label for the status pill.
pub fn pill_label(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Recording => "Live",
        PhaseKind::Finalizing => "Saving",
        PhaseKind::Idle => "Idle",
        PhaseKind::Uninitialized => "Waiting",
        PhaseKind::Unavailable | PhaseKind::Released => "Offline",
    }
}

pub fn status_line(snapshot: &Snapshot) -> String {
    if let Some(err) = &snapshot.error {
        return err.user_message().to_string();
    }
    match snapshot.phase {
        PhaseKind::Uninitialized => "Waiting for camera permission...".to_string(),
        PhaseKind::Recording if snapshot.buffered_bytes > 0 => {
            format!("Recording... {} captured", format_bytes(snapshot.buffered_bytes))
        }
        PhaseKind::Recording => "Recording...".to_string(),
        PhaseKind::Finalizing => "Saving recording...".to_string(),
        PhaseKind::Idle => match &snapshot.artifact {
            Some(artifact) => format!("Recording ready ({}).", format_bytes(artifact.byte_len)),
            None => "Ready to record.".to_string(),
        },
        PhaseKind::Unavailable => "Camera unavailable.".to_string(),
        PhaseKind::Released => "Camera released.".to_string(),
    }
}
