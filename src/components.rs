//! Dioxus UI components for the image picker
//!
//! This module provides picker trigger buttons and a thumbnail view for
//! picked images. The actual picker presentation is delegated to a
//! [`PickerHost`] supplied through Dioxus context; the components wire the
//! host's completion callbacks back onto the UI task.

use dioxus::prelude::*;

use crate::error::PickFailure;
use crate::models::{
    ContentFilter, ImageSource, MultiSelectConfig, PickedImage, SelectionResult,
    SingleSelectConfig,
};
use crate::multi_select::MultiSelectPicker;
use crate::provider::PickerHost;
use crate::single_select::SingleSelectPicker;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Context for picker components
///
/// Provide one near the app root so picker buttons can reach the host:
/// `use_context_provider(|| ImagePickerContext::new(host))`.
#[derive(Clone)]
pub struct ImagePickerContext {
    host: Arc<dyn PickerHost>,
}

impl ImagePickerContext {
    pub fn new(host: Arc<dyn PickerHost>) -> Self {
        Self { host }
    }
}

/// Renders a picked image as a data URL for an `img` src
pub fn image_data_url(image: &PickedImage) -> String {
    use base64::{engine::general_purpose, Engine as _};

    format!(
        "data:{};base64,{}",
        image.mime_type,
        general_purpose::STANDARD.encode(&image.bytes)
    )
}

/// Events bridged from host callback threads onto the UI task
enum PickerEvent {
    Cancelled,
    MultiSelected(SelectionResult),
    SingleSelected(PickedImage),
    Failed(PickFailure),
}

/// Button that presents the multi-select picker
///
/// The button disables itself while a presentation is in flight and fires
/// exactly one of `on_cancel`/`on_select` per press, with `on_fail` for
/// individual items that could not be loaded.
#[component]
pub fn MultiImagePickerButton(
    #[props(default)] filter: ContentFilter,
    #[props(default = 1)] selection_limit: usize,
    #[props(default = "🖼️ Choose photos".to_string())] label: String,
    on_cancel: EventHandler<()>,
    on_select: EventHandler<SelectionResult>,
    #[props(default = None)] on_fail: Option<EventHandler<PickFailure>>,
) -> Element {
    let mut picking = use_signal(|| false);
    let context = use_context::<ImagePickerContext>();

    rsx! {
        button {
            class: "btn-secondary",
            disabled: picking(),
            onclick: move |_| {
                if picking() {
                    return;
                }
                picking.set(true);
                let (tx, mut rx) = mpsc::unbounded_channel();
                let cancel_tx = tx.clone();
                let select_tx = tx.clone();
                let fail_tx = tx;
                let session = Arc::new(MultiSelectPicker::new(
                    MultiSelectConfig {
                        filter: filter.clone(),
                        selection_limit,
                    },
                    move || {
                        let _ = cancel_tx.send(PickerEvent::Cancelled);
                    },
                    move |result| {
                        let _ = select_tx.send(PickerEvent::MultiSelected(result));
                    },
                    move |failure| {
                        let _ = fail_tx.send(PickerEvent::Failed(failure));
                    },
                ));
                context.host.present_multi_select(session);
                spawn(async move {
                    while let Some(event) = rx.recv().await {
                        match event {
                            PickerEvent::Failed(failure) => {
                                if let Some(handler) = on_fail {
                                    handler.call(failure);
                                } else {
                                    log::warn!("Image pick failed: {}", failure);
                                }
                            }
                            PickerEvent::Cancelled => {
                                on_cancel.call(());
                                break;
                            }
                            PickerEvent::MultiSelected(result) => {
                                on_select.call(result);
                                break;
                            }
                            PickerEvent::SingleSelected(_) => {}
                        }
                    }
                    picking.set(false);
                });
            },
            if picking() {
                "⏳ Opening picker…"
            } else {
                "{label}"
            }
        }
    }
}

/// Button that presents the single-select picker
#[component]
pub fn SingleImagePickerButton(
    #[props(default = true)] allow_editing: bool,
    #[props(default = ImageSource::PhotoLibrary)] source: ImageSource,
    #[props(default = "📷 Choose photo".to_string())] label: String,
    on_cancel: EventHandler<()>,
    on_select: EventHandler<PickedImage>,
    #[props(default = None)] on_fail: Option<EventHandler<PickFailure>>,
) -> Element {
    let mut picking = use_signal(|| false);
    let context = use_context::<ImagePickerContext>();

    rsx! {
        button {
            class: "btn-secondary",
            disabled: picking(),
            onclick: move |_| {
                if picking() {
                    return;
                }
                picking.set(true);
                let (tx, mut rx) = mpsc::unbounded_channel();
                let cancel_tx = tx.clone();
                let select_tx = tx.clone();
                let fail_tx = tx;
                let session = Arc::new(SingleSelectPicker::new(
                    SingleSelectConfig {
                        allow_editing,
                        source,
                    },
                    move || {
                        let _ = cancel_tx.send(PickerEvent::Cancelled);
                    },
                    move |image| {
                        let _ = select_tx.send(PickerEvent::SingleSelected(image));
                    },
                    move |failure| {
                        let _ = fail_tx.send(PickerEvent::Failed(failure));
                    },
                ));
                context.host.present_single_select(session);
                spawn(async move {
                    while let Some(event) = rx.recv().await {
                        match event {
                            PickerEvent::Failed(failure) => {
                                if let Some(handler) = on_fail {
                                    handler.call(failure);
                                } else {
                                    log::warn!("Image pick failed: {}", failure);
                                }
                            }
                            PickerEvent::Cancelled => {
                                on_cancel.call(());
                                break;
                            }
                            PickerEvent::SingleSelected(image) => {
                                on_select.call(image);
                                break;
                            }
                            PickerEvent::MultiSelected(_) => {}
                        }
                    }
                    picking.set(false);
                });
            },
            if picking() {
                "⏳ Opening picker…"
            } else {
                "{label}"
            }
        }
    }
}

/// Thumbnail view for a picked image
#[component]
pub fn PickedThumbnail(
    image: PickedImage,
    #[props(default = "Photo".to_string())] alt: String,
) -> Element {
    let url = image_data_url(&image);

    rsx! {
        div {
            style: "width: 128px; height: 128px; border-radius: 8px; overflow: hidden; background: #f0f0f0;",
            img {
                src: "{url}",
                alt: "{alt}",
                style: "width: 100%; height: 100%; object-fit: cover;",
            }
        }
    }
}
