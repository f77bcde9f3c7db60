// Single-select picker adapter
//
// Wraps a host picker that returns exactly zero or one item. The host
// delivers one synchronous completion event; no aggregation is needed.

use crate::error::{PickError, PickFailure};
use crate::models::{PickedImage, PickedInfo, SingleSelectConfig};
use std::sync::Mutex;
use uuid::Uuid;

enum SessionState {
    Presented,
    Done,
}

/// Adapter for a picker allowing 0 or 1 selection
///
/// Created once per presentation. The host reports either
/// `presentation_cancelled` or `presentation_finished`; terminal states are
/// absorbing.
pub struct SingleSelectPicker {
    request_id: Uuid,
    config: SingleSelectConfig,
    on_cancel: Box<dyn Fn() + Send + Sync>,
    on_select: Box<dyn Fn(PickedImage) + Send + Sync>,
    on_fail: Box<dyn Fn(PickFailure) + Send + Sync>,
    state: Mutex<SessionState>,
}

impl SingleSelectPicker {
    pub fn new(
        config: SingleSelectConfig,
        on_cancel: impl Fn() + Send + Sync + 'static,
        on_select: impl Fn(PickedImage) + Send + Sync + 'static,
        on_fail: impl Fn(PickFailure) + Send + Sync + 'static,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            config,
            on_cancel: Box::new(on_cancel),
            on_select: Box::new(on_select),
            on_fail: Box::new(on_fail),
            state: Mutex::new(SessionState::Presented),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Presentation-time configuration, read by the host
    pub fn config(&self) -> &SingleSelectConfig {
        &self.config
    }

    /// Host callback: the user dismissed the picker without choosing
    pub fn presentation_cancelled(&self) {
        if !self.take_terminal() {
            return;
        }
        log::debug!("Picker request {} cancelled", self.request_id);
        (self.on_cancel)();
    }

    /// Host callback: the picker finished with a result bag
    ///
    /// Prefers the edited payload when editing was requested, otherwise the
    /// original. A bag with neither payload is a host contract violation:
    /// it is reported as a load failure and the presentation resolves as a
    /// cancellation, never as a default empty image.
    pub fn presentation_finished(&self, info: PickedInfo) {
        if !self.take_terminal() {
            return;
        }
        match info.resolve(self.config.allow_editing) {
            Some(image) => {
                log::debug!(
                    "Picker request {} selected one image ({} bytes)",
                    self.request_id,
                    image.bytes.len()
                );
                (self.on_select)(image);
            }
            None => {
                log::warn!(
                    "Picker request {}: host delivered neither an edited nor an original image",
                    self.request_id
                );
                (self.on_fail)(PickFailure {
                    request_id: self.request_id,
                    index: None,
                    error: PickError::Load(
                        "host delivered neither an edited nor an original image".to_string(),
                    ),
                });
                (self.on_cancel)();
            }
        }
    }

    /// Moves `Presented` to `Done`; false when already terminal.
    fn take_terminal(&self) -> bool {
        if let Ok(mut state) = self.state.lock() {
            if matches!(*state, SessionState::Presented) {
                *state = SessionState::Done;
                return true;
            }
            log::warn!(
                "Picker request {}: event after terminal outcome, ignoring",
                self.request_id
            );
        } else {
            log::error!("Picker request {}: state lock poisoned", self.request_id);
        }
        false
    }
}
