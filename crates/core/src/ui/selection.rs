//! Host file events for the selection surface.
//!
//! Turns egui drag-and-drop payloads into [`Candidate`]s. Type filtering is
//! left to [`SelectionSurface`](crate::selection::SelectionSurface).

use crate::selection::Candidate;
use eframe::egui;
use tracing::{debug, warn};

/// Builds a candidate from a dropped file.
///
/// Native platforms usually provide only a path; web platforms provide the
/// bytes. Returns `None` if neither yields content.
pub fn candidate_from_drop(file: &egui::DroppedFile) -> Option<Candidate> {
    let bytes = match (&file.bytes, &file.path) {
        (Some(bytes), _) => bytes.to_vec(),
        (None, Some(path)) => match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read dropped file");
                return None;
            }
        },
        (None, None) => return None,
    };

    let name = if file.name.is_empty() {
        file.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    } else {
        file.name.clone()
    };

    let mime = (!file.mime.is_empty()).then(|| file.mime.clone());

    Some(Candidate::new(name, mime, bytes))
}

/// Converts a whole drop.
///
/// Only single-file drops are read; anything else yields `None` without
/// touching the disk.
pub fn candidates_from_drop(files: &[egui::DroppedFile]) -> Option<Vec<Candidate>> {
    match files {
        [file] => candidate_from_drop(file).map(|candidate| vec![candidate]),
        _ => {
            debug!(count = files.len(), "ignoring drop: expected exactly one file");
            None
        }
    }
}

/// Prompt shown in the empty drop zone.
pub fn drop_prompt(drag_active: bool) -> &'static str {
    if drag_active {
        "Drop the image here..."
    } else {
        "Drag & drop an image here, or click to select"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ImageKind;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn uses_in_memory_bytes_and_declared_mime() {
        let file = egui::DroppedFile {
            name: "iguana.png".into(),
            mime: "image/png".into(),
            bytes: Some(Arc::from(vec![1u8, 2, 3])),
            ..Default::default()
        };
        let candidate = candidate_from_drop(&file).unwrap();
        assert_eq!(candidate.name, "iguana.png");
        assert_eq!(candidate.mime.as_deref(), Some("image/png"));
        assert_eq!(candidate.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn reads_path_when_no_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snake.jpeg");
        std::fs::File::create(&path).unwrap().write_all(b"jpeg").unwrap();

        let file = egui::DroppedFile {
            path: Some(path),
            ..Default::default()
        };
        let candidate = candidate_from_drop(&file).unwrap();
        assert_eq!(candidate.name, "snake.jpeg");
        assert_eq!(candidate.mime, None);
        assert_eq!(candidate.kind(), Some(ImageKind::Jpeg));
    }

    #[test]
    fn only_single_file_drops_become_candidates() {
        let good = egui::DroppedFile {
            name: "a.png".into(),
            bytes: Some(Arc::from(vec![0u8])),
            ..Default::default()
        };
        let empty = egui::DroppedFile::default();
        assert!(candidate_from_drop(&empty).is_none());
        assert!(candidates_from_drop(&[empty]).is_none());
        assert!(candidates_from_drop(&[]).is_none());
        assert!(candidates_from_drop(&[good.clone(), good.clone()]).is_none());
        assert_eq!(candidates_from_drop(&[good]).map(|c| c.len()), Some(1));
    }

    #[test]
    fn readable_multi_file_drop_is_still_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gecko.png");
        std::fs::File::create(&path).unwrap().write_all(b"png").unwrap();
        let dropped = egui::DroppedFile {
            path: Some(path),
            ..Default::default()
        };

        assert!(candidates_from_drop(std::slice::from_ref(&dropped)).is_some());
        assert!(candidates_from_drop(&[dropped.clone(), dropped]).is_none());
    }

    #[test]
    fn prompt_follows_drag_state() {
        assert_eq!(drop_prompt(true), "Drop the image here...");
        assert_eq!(drop_prompt(false), "Drag & drop an image here, or click to select");
    }
}
