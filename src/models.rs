use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content types the multi-select picker offers to the user
///
/// Consumed by the host at presentation time; the adapter itself never
/// inspects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentFilter {
    Images,
    Videos,
    LivePhotos,
    /// Any of the nested filters matches
    AnyOf(Vec<ContentFilter>),
}

impl Default for ContentFilter {
    fn default() -> Self {
        ContentFilter::Images
    }
}

/// Origin the single-select picker reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    PhotoLibrary,
    SavedPhotosAlbum,
    Camera,
}

/// Configuration for a multi-select presentation
///
/// Immutable once the picker is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSelectConfig {
    pub filter: ContentFilter,
    /// Maximum number of selectable items; 0 means unlimited (host convention)
    pub selection_limit: usize,
}

impl Default for MultiSelectConfig {
    fn default() -> Self {
        Self {
            filter: ContentFilter::Images,
            selection_limit: 1,
        }
    }
}

/// Configuration for a single-select presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSelectConfig {
    pub allow_editing: bool,
    pub source: ImageSource,
}

impl Default for SingleSelectConfig {
    fn default() -> Self {
        Self {
            allow_editing: true,
            source: ImageSource::PhotoLibrary,
        }
    }
}

/// A loaded image payload as delivered by the host
///
/// The bytes are passed through untouched; this crate never decodes or
/// transforms them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// One successfully loaded selection
///
/// `index` is the item's position in the original selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedImage {
    pub index: usize,
    pub image: PickedImage,
}

/// Aggregated outcome of a multi-select presentation
///
/// `images` is in completion order, which is not necessarily selection
/// order; use `SelectedImage::index` or `sorted_by_index` when the
/// original ordering matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub request_id: Uuid,
    pub images: Vec<SelectedImage>,
}

impl SelectionResult {
    /// Returns the selected images sorted by their original selection index
    pub fn sorted_by_index(&self) -> Vec<SelectedImage> {
        let mut images = self.images.clone();
        images.sort_by_key(|selected| selected.index);
        images
    }
}

/// Result bag delivered by the single-select host
///
/// Either payload may be absent; `resolve` applies the edited-vs-original
/// preference. There is no fallback image: a bag with neither payload is a
/// host contract violation and resolves to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickedInfo {
    pub original: Option<PickedImage>,
    pub edited: Option<PickedImage>,
}

impl PickedInfo {
    /// Picks the edited payload when editing was requested and the host
    /// provided one, otherwise the original payload.
    pub fn resolve(self, allow_editing: bool) -> Option<PickedImage> {
        if allow_editing {
            if let Some(edited) = self.edited {
                return Some(edited);
            }
        }
        self.original
    }
}
