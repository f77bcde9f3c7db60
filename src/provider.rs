// Host boundary for picker presentations
//
// The host presentation layer (platform picker UI) stays outside this
// crate. It hands each raw selection to the adapters as an `ItemProvider`
// and reports presentation outcomes on the session it was given.

use crate::models::PickedImage;
use crate::multi_select::MultiSelectPicker;
use crate::single_select::SingleSelectPicker;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Completion callback for an asynchronous payload load
///
/// The host may invoke it from any thread, exactly once. The error string
/// is the host-supplied cause.
pub type LoadCallback = Box<dyn FnOnce(Result<PickedImage, String>) + Send>;

/// One raw selection handle returned by the host picker
///
/// A provider represents a user-chosen item before payload resolution.
pub trait ItemProvider: Send {
    /// Whether the item can produce an image payload at all
    fn can_load_image(&self) -> bool;

    /// Starts the asynchronous payload load; consumes the handle
    fn load_image(self: Box<Self>, done: LoadCallback);
}

/// Presentation seam between the UI layer and the host picker
///
/// The host reads the session's configuration when presenting and later
/// reports `presentation_finished` or `presentation_cancelled` on it.
pub trait PickerHost: Send + Sync {
    fn present_multi_select(&self, session: Arc<MultiSelectPicker>);
    fn present_single_select(&self, session: Arc<SingleSelectPicker>);
}

/// An `ItemProvider` backed by a file the host picker wrote to disk
///
/// Platform pickers that hand back file paths (rather than in-memory
/// payloads) are wrapped in this provider; the payload load reads the file
/// on a background thread.
#[derive(Debug, Clone)]
pub struct PathItem {
    path: PathBuf,
}

impl PathItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ItemProvider for PathItem {
    fn can_load_image(&self) -> bool {
        guess_mime_from_ext(&self.path).is_some()
    }

    fn load_image(self: Box<Self>, done: LoadCallback) {
        std::thread::spawn(move || {
            let mime = guess_mime_from_ext(&self.path).unwrap_or("image/jpeg");
            match std::fs::read(&self.path) {
                Ok(bytes) => {
                    log::debug!("Loaded {} bytes from {}", bytes.len(), self.path.display());
                    done(Ok(PickedImage {
                        bytes,
                        mime_type: mime.to_string(),
                    }));
                }
                Err(e) => {
                    log::warn!("Failed to read {}: {}", self.path.display(), e);
                    done(Err(format!("failed to read {}: {}", self.path.display(), e)));
                }
            }
        });
    }
}

/// Maps a file extension to its image MIME type
fn guess_mime_from_ext(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        Some("png") => Some("image/png"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        Some("bmp") => Some("image/bmp"),
        Some("heic") | Some("heif") => Some("image/heic"),
        _ => None,
    }
}
