//! The selection surface: turns a host-provided file into a [`SelectedImage`].
//!
//! Exactly one file is accepted per invocation and only JPEG/PNG images
//! pass the type filter. Rejections are silent towards the controller: the
//! surface returns `None` and logs at debug level.

use crate::error::{AppError, Result};
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::service::Upload;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// MIME types accepted by the selection surface.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// File extensions accepted when no MIME type is declared.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

/// Image encodings the classifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Matches a declared MIME type, ignoring case and parameters.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ACCEPTED_MIME_TYPES.contains(&essence.as_str()) {
            return None;
        }
        Some(if essence == "image/png" { Self::Png } else { Self::Jpeg })
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        Some(if ext == "png" { Self::Png } else { Self::Jpeg })
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Content type sent to the service.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A single file offered by the host (drop, file picker, command line).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub name: String,
    /// Declared MIME type; `None` or empty means undeclared.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Reads a candidate from disk. The type is decided by its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::UnsupportedFile(format!("{} has no file name", path.display())))?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, None, bytes))
    }

    /// The accepted image kind, if any.
    ///
    /// A declared MIME type decides on its own; the extension is only
    /// consulted when nothing was declared.
    pub fn kind(&self) -> Option<ImageKind> {
        match self.mime.as_deref().map(str::trim) {
            Some(mime) if !mime.is_empty() => ImageKind::from_mime(mime),
            _ => ImageKind::from_file_name(&self.name),
        }
    }
}

/// The image currently held by the controller.
///
/// Owns the payload and the preview handle; dropping it releases the preview.
#[derive(Debug)]
pub struct SelectedImage {
    name: String,
    kind: ImageKind,
    payload: Arc<[u8]>,
    preview: PreviewHandle,
}

impl SelectedImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// The request body for this image.
    pub fn upload(&self) -> Upload {
        Upload {
            file_name: self.name.clone(),
            kind: self.kind,
            bytes: Arc::clone(&self.payload),
        }
    }
}

/// Accepts host files and produces selections with previews attached.
#[derive(Clone)]
pub struct SelectionSurface {
    previews: Arc<dyn PreviewRegistry>,
}

impl SelectionSurface {
    pub fn new(previews: Arc<dyn PreviewRegistry>) -> Self {
        Self { previews }
    }

    /// Accepts exactly one JPEG/PNG candidate.
    ///
    /// Returns `None` for an empty drop, a multi-file drop, or a disallowed
    /// type. No preview is created for rejected candidates.
    pub fn select_file(&self, mut candidates: Vec<Candidate>) -> Option<SelectedImage> {
        if candidates.len() != 1 {
            debug!(count = candidates.len(), "selection rejected: expected exactly one file");
            return None;
        }
        let candidate = candidates.pop()?;

        let Some(kind) = candidate.kind() else {
            debug!(
                name = %candidate.name,
                mime = candidate.mime.as_deref().unwrap_or(""),
                "selection rejected: not a jpeg or png image"
            );
            return None;
        };

        let preview = PreviewHandle::acquire(Arc::clone(&self.previews), &candidate.bytes);
        debug!(name = %candidate.name, %kind, preview = %preview.id(), "image selected");

        Some(SelectedImage {
            name: candidate.name,
            kind,
            payload: Arc::from(candidate.bytes),
            preview,
        })
    }

    /// Reads `path` and runs it through [`Self::select_file`].
    pub fn select_path(&self, path: &Path) -> Result<Option<SelectedImage>> {
        let candidate = Candidate::from_path(path)?;
        Ok(self.select_file(vec![candidate]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPreviews;
    use std::io::Write;

    fn surface() -> (SelectionSurface, Arc<RecordingPreviews>) {
        let previews = Arc::new(RecordingPreviews::default());
        (SelectionSurface::new(previews.clone()), previews)
    }

    fn candidate(name: &str, mime: Option<&str>) -> Candidate {
        Candidate::new(name, mime.map(str::to_string), vec![0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn accepts_png_by_declared_type() {
        let (surface, previews) = surface();
        let image = surface
            .select_file(vec![candidate("iguana.png", Some("image/png"))])
            .expect("png accepted");

        assert_eq!(image.kind(), ImageKind::Png);
        assert_eq!(image.name(), "iguana.png");
        assert_eq!(image.payload(), &[0x89, b'P', b'N', b'G']);
        assert_eq!(previews.created(), 1);
    }

    #[test]
    fn allow_lists_drive_kind_detection() {
        for mime in ACCEPTED_MIME_TYPES {
            assert!(ImageKind::from_mime(mime).is_some(), "{mime}");
        }
        for ext in ACCEPTED_EXTENSIONS {
            assert!(ImageKind::from_extension(ext).is_some(), "{ext}");
        }
        assert_eq!(ImageKind::from_mime("image/png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("image/gif"), None);
        assert_eq!(ImageKind::from_extension("webp"), None);
    }

    #[test]
    fn accepts_jpeg_aliases() {
        let (surface, _) = surface();
        for mime in ["image/jpeg", "IMAGE/JPG", "image/jpeg; charset=binary"] {
            let image = surface.select_file(vec![candidate("gecko", Some(mime))]);
            assert_eq!(image.map(|i| i.kind()), Some(ImageKind::Jpeg), "{mime}");
        }
    }

    #[test]
    fn falls_back_to_extension_without_declared_type() {
        let (surface, _) = surface();
        for (name, kind) in [("a.JPG", ImageKind::Jpeg), ("b.jpeg", ImageKind::Jpeg), ("c.png", ImageKind::Png)] {
            let image = surface.select_file(vec![candidate(name, Some(""))]);
            assert_eq!(image.map(|i| i.kind()), Some(kind), "{name}");
        }
    }

    #[test]
    fn rejects_text_file_without_creating_preview() {
        let (surface, previews) = surface();
        assert!(surface.select_file(vec![candidate("notes.txt", Some("text/plain"))]).is_none());
        assert!(surface.select_file(vec![candidate("notes.txt", None)]).is_none());
        assert_eq!(previews.created(), 0);
    }

    #[test]
    fn declared_type_overrides_extension() {
        let (surface, _) = surface();
        assert!(surface.select_file(vec![candidate("looks.png", Some("text/plain"))]).is_none());
        assert!(surface.select_file(vec![candidate("anim.gif", Some("image/gif"))]).is_none());
    }

    #[test]
    fn rejects_zero_or_many_files() {
        let (surface, previews) = surface();
        assert!(surface.select_file(Vec::new()).is_none());
        assert!(surface
            .select_file(vec![
                candidate("a.png", Some("image/png")),
                candidate("b.png", Some("image/png")),
            ])
            .is_none());
        assert_eq!(previews.created(), 0);
    }

    #[test]
    fn selects_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turtle.jpg");
        std::fs::File::create(&path).unwrap().write_all(b"jpeg bytes").unwrap();

        let (surface, _) = surface();
        let image = surface.select_path(&path).unwrap().expect("jpg accepted");
        assert_eq!(image.kind(), ImageKind::Jpeg);
        assert_eq!(image.upload().bytes.as_ref(), b"jpeg bytes");

        let missing = dir.path().join("missing.png");
        assert!(matches!(surface.select_path(&missing), Err(AppError::Io(_))));
    }
}
