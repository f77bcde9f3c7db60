//! # Image Picker
//!
//! A declarative wrapper around a host-provided native media picker.
//!
//! This crate adapts an imperative, delegate-callback picker into a small
//! set of closures invoked on completion:
//! - Multi-select presentations with asynchronous per-item payload loads,
//!   aggregated into exactly one terminal event
//! - Single-select presentations with edited-vs-original payload preference
//! - Per-item failure events that never abort the rest of a batch
//! - Optional Dioxus components (picker buttons, thumbnails) behind the
//!   `components` feature
//!
//! ## Platform Separation
//!
//! The picker UI itself (presentation, permissions, user interaction) stays
//! in the host platform layer. The host hands raw selections to a session
//! as [`ItemProvider`]s and reports the presentation outcome; this crate
//! only turns those events into callbacks.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use image_picker::{MultiSelectConfig, MultiSelectPicker, PathItem};
//! use std::sync::Arc;
//!
//! let session = Arc::new(MultiSelectPicker::new(
//!     MultiSelectConfig { selection_limit: 3, ..Default::default() },
//!     || println!("cancelled"),
//!     |result| println!("picked {} images", result.images.len()),
//!     |failure| eprintln!("{}", failure),
//! ));
//!
//! // The host presents the picker, then reports the raw selections:
//! session.presentation_finished(vec![
//!     Box::new(PathItem::new("/storage/pictures/a.jpg")),
//!     Box::new(PathItem::new("/storage/pictures/b.png")),
//! ]);
//! ```

pub mod error;
pub mod models;
pub mod multi_select;
pub mod provider;
pub mod single_select;

#[cfg(feature = "components")]
pub mod components;

pub use error::{PickError, PickFailure};
pub use models::{
    ContentFilter, ImageSource, MultiSelectConfig, PickedImage, PickedInfo, SelectedImage,
    SelectionResult, SingleSelectConfig,
};
pub use multi_select::MultiSelectPicker;
pub use provider::{ItemProvider, LoadCallback, PathItem, PickerHost};
pub use single_select::SingleSelectPicker;

#[cfg(feature = "components")]
pub use components::{
    image_data_url, ImagePickerContext, MultiImagePickerButton, PickedThumbnail,
    SingleImagePickerButton,
};
