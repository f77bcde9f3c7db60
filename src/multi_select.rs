// Multi-select picker adapter
//
// Bridges a host picker returning zero or more raw selections into exactly
// one aggregated completion event. Per-item payload loads run concurrently
// on host threads and settle unordered; the accumulator is guarded by a
// single mutex so a race can neither double-count an item nor miss the
// completion check.

use crate::error::{PickError, PickFailure};
use crate::models::{MultiSelectConfig, PickedImage, SelectedImage, SelectionResult};
use crate::provider::ItemProvider;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Lifecycle of one multi-select presentation
///
/// Construction is presentation; `Done` is absorbing.
enum BatchState {
    Presented,
    Aggregating {
        pending: usize,
        settled: usize,
        images: Vec<SelectedImage>,
    },
    Done,
}

/// Adapter for a picker allowing 0..N selections
///
/// Created once per presentation. The host reports the raw selections via
/// `presentation_finished`; the adapter answers with exactly one terminal
/// callback (`on_select` or `on_cancel`), possibly preceded by per-item
/// `on_fail` events.
pub struct MultiSelectPicker {
    request_id: Uuid,
    config: MultiSelectConfig,
    on_cancel: Box<dyn Fn() + Send + Sync>,
    on_select: Box<dyn Fn(SelectionResult) + Send + Sync>,
    on_fail: Box<dyn Fn(PickFailure) + Send + Sync>,
    state: Mutex<BatchState>,
}

impl MultiSelectPicker {
    pub fn new(
        config: MultiSelectConfig,
        on_cancel: impl Fn() + Send + Sync + 'static,
        on_select: impl Fn(SelectionResult) + Send + Sync + 'static,
        on_fail: impl Fn(PickFailure) + Send + Sync + 'static,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            config,
            on_cancel: Box::new(on_cancel),
            on_select: Box::new(on_select),
            on_fail: Box::new(on_fail),
            state: Mutex::new(BatchState::Presented),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Presentation-time configuration, read by the host
    pub fn config(&self) -> &MultiSelectConfig {
        &self.config
    }

    /// Host callback: the picker finished with the user's raw selections
    ///
    /// Zero selections cancel immediately. Items that cannot produce an
    /// image fail synchronously and do not count toward pending loads; the
    /// rest are loaded concurrently and aggregated. Repeated calls for the
    /// same presentation are ignored.
    pub fn presentation_finished(self: Arc<Self>, items: Vec<Box<dyn ItemProvider>>) {
        let total = items.len();
        log::debug!(
            "Picker request {} finished with {} raw selections",
            self.request_id,
            total
        );

        if total == 0 {
            if self.finish_early() {
                (self.on_cancel)();
            }
            return;
        }

        let mut unsupported = Vec::new();
        let mut loadable = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            if item.can_load_image() {
                loadable.push((index, item));
            } else {
                unsupported.push(index);
            }
        }

        if !self.begin_aggregation(loadable.len()) {
            return;
        }

        // Unsupported items are rejected before any load starts, so every
        // fail event precedes the terminal event.
        for index in unsupported {
            (self.on_fail)(PickFailure {
                request_id: self.request_id,
                index: Some(index),
                error: PickError::UnsupportedContent(
                    "item cannot provide an image payload".to_string(),
                ),
            });
        }

        if loadable.is_empty() {
            log::debug!(
                "Picker request {}: no loadable items, resolving as cancel",
                self.request_id
            );
            (self.on_cancel)();
            return;
        }

        for (index, item) in loadable {
            let session = Arc::clone(&self);
            item.load_image(Box::new(move |result| {
                session.item_settled(index, result);
            }));
        }
    }

    /// Moves `Presented` straight to `Done` (empty selection). Returns
    /// false when a terminal outcome was already delivered.
    fn finish_early(&self) -> bool {
        if let Ok(mut state) = self.state.lock() {
            if matches!(*state, BatchState::Presented) {
                *state = BatchState::Done;
                return true;
            }
            log::warn!(
                "Picker request {}: presentation finished twice, ignoring",
                self.request_id
            );
        } else {
            log::error!("Picker request {}: state lock poisoned", self.request_id);
        }
        false
    }

    /// Moves `Presented` to `Aggregating`, or to `Done` when nothing is
    /// loadable. Returns false on re-entry.
    fn begin_aggregation(&self, pending: usize) -> bool {
        if let Ok(mut state) = self.state.lock() {
            if matches!(*state, BatchState::Presented) {
                *state = if pending == 0 {
                    BatchState::Done
                } else {
                    BatchState::Aggregating {
                        pending,
                        settled: 0,
                        images: Vec::new(),
                    }
                };
                return true;
            }
            log::warn!(
                "Picker request {}: presentation finished twice, ignoring",
                self.request_id
            );
        } else {
            log::error!("Picker request {}: state lock poisoned", self.request_id);
        }
        false
    }

    /// Records one per-item outcome and fires the terminal callback once
    /// every pending load has settled.
    fn item_settled(&self, index: usize, result: Result<PickedImage, String>) {
        // The fail event goes out before this item's settle is counted, so
        // it cannot trail the terminal event on another thread.
        let loaded = match result {
            Ok(image) => Some(SelectedImage { index, image }),
            Err(cause) => {
                (self.on_fail)(PickFailure {
                    request_id: self.request_id,
                    index: Some(index),
                    error: PickError::Load(cause),
                });
                None
            }
        };

        let completed = if let Ok(mut state) = self.state.lock() {
            match &mut *state {
                BatchState::Aggregating {
                    pending,
                    settled,
                    images,
                } => {
                    if let Some(selected) = loaded {
                        images.push(selected);
                    }
                    *settled += 1;
                    if *settled == *pending {
                        let images = std::mem::take(images);
                        *state = BatchState::Done;
                        Some(images)
                    } else {
                        None
                    }
                }
                _ => {
                    log::warn!(
                        "Picker request {}: item {} settled after terminal event",
                        self.request_id,
                        index
                    );
                    return;
                }
            }
        } else {
            log::error!("Picker request {}: state lock poisoned", self.request_id);
            return;
        };

        if let Some(images) = completed {
            if images.is_empty() {
                log::debug!(
                    "Picker request {}: every load failed, resolving as cancel",
                    self.request_id
                );
                (self.on_cancel)();
            } else {
                log::debug!(
                    "Picker request {}: aggregated {} images",
                    self.request_id,
                    images.len()
                );
                (self.on_select)(SelectionResult {
                    request_id: self.request_id,
                    images,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentFilter;
    use crate::provider::LoadCallback;
    use std::sync::mpsc;
    use std::time::Duration;

    enum Behavior {
        Succeed(u8),
        FailLoad(&'static str),
        Unsupported,
    }

    struct FakeItem {
        behavior: Behavior,
        delay_ms: u64,
    }

    impl FakeItem {
        fn succeed(tag: u8, delay_ms: u64) -> Box<dyn ItemProvider> {
            Box::new(FakeItem {
                behavior: Behavior::Succeed(tag),
                delay_ms,
            })
        }

        fn fail(cause: &'static str, delay_ms: u64) -> Box<dyn ItemProvider> {
            Box::new(FakeItem {
                behavior: Behavior::FailLoad(cause),
                delay_ms,
            })
        }

        fn unsupported() -> Box<dyn ItemProvider> {
            Box::new(FakeItem {
                behavior: Behavior::Unsupported,
                delay_ms: 0,
            })
        }
    }

    impl ItemProvider for FakeItem {
        fn can_load_image(&self) -> bool {
            !matches!(self.behavior, Behavior::Unsupported)
        }

        fn load_image(self: Box<Self>, done: LoadCallback) {
            std::thread::spawn(move || {
                if self.delay_ms > 0 {
                    std::thread::sleep(Duration::from_millis(self.delay_ms));
                }
                match self.behavior {
                    Behavior::Succeed(tag) => done(Ok(PickedImage {
                        bytes: vec![tag],
                        mime_type: "image/jpeg".to_string(),
                    })),
                    Behavior::FailLoad(cause) => done(Err(cause.to_string())),
                    Behavior::Unsupported => done(Err("should not be loaded".to_string())),
                }
            });
        }
    }

    #[derive(Default)]
    struct Recorder {
        cancels: Mutex<usize>,
        selections: Mutex<Vec<SelectionResult>>,
        failures: Mutex<Vec<PickFailure>>,
    }

    /// Builds a session whose callbacks record into `recorder` and signal
    /// `terminal_tx` once on cancel or select.
    fn session(
        recorder: &Arc<Recorder>,
        terminal_tx: &mpsc::Sender<()>,
    ) -> Arc<MultiSelectPicker> {
        let cancel_rec = Arc::clone(recorder);
        let cancel_tx = terminal_tx.clone();
        let select_rec = Arc::clone(recorder);
        let select_tx = terminal_tx.clone();
        let fail_rec = Arc::clone(recorder);
        Arc::new(MultiSelectPicker::new(
            MultiSelectConfig::default(),
            move || {
                *cancel_rec.cancels.lock().unwrap() += 1;
                cancel_tx.send(()).unwrap();
            },
            move |result| {
                select_rec.selections.lock().unwrap().push(result);
                select_tx.send(()).unwrap();
            },
            move |failure| {
                fail_rec.failures.lock().unwrap().push(failure);
            },
        ))
    }

    fn wait_terminal(rx: &mpsc::Receiver<()>) {
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn test_all_items_succeed() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        picker.presentation_finished(vec![
            FakeItem::succeed(0, 20),
            FakeItem::succeed(1, 0),
            FakeItem::succeed(2, 10),
        ]);
        wait_terminal(&rx);

        assert_eq!(*recorder.cancels.lock().unwrap(), 0);
        assert!(recorder.failures.lock().unwrap().is_empty());
        let selections = recorder.selections.lock().unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].images.len(), 3);
        let mut indices: Vec<usize> = selections[0].images.iter().map(|s| s.index).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_selections_cancel() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        picker.presentation_finished(Vec::new());
        wait_terminal(&rx);

        assert_eq!(*recorder.cancels.lock().unwrap(), 1);
        assert!(recorder.selections.lock().unwrap().is_empty());
        assert!(recorder.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn test_all_items_fail() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        picker.presentation_finished(vec![
            FakeItem::fail("load timed out", 10),
            FakeItem::fail("file vanished", 0),
        ]);
        wait_terminal(&rx);

        assert_eq!(*recorder.cancels.lock().unwrap(), 1);
        assert!(recorder.selections.lock().unwrap().is_empty());
        let failures = recorder.failures.lock().unwrap();
        assert_eq!(failures.len(), 2);
        assert!(failures
            .iter()
            .all(|f| matches!(f.error, PickError::Load(_))));
    }

    #[test]
    fn test_mixed_success_and_failure() {
        // selection_limit=3 scenario: item 1 errors, items 0 and 2 succeed
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let cancel_rec = Arc::clone(&recorder);
        let cancel_tx = tx.clone();
        let select_rec = Arc::clone(&recorder);
        let select_tx = tx.clone();
        let fail_rec = Arc::clone(&recorder);
        let picker = Arc::new(MultiSelectPicker::new(
            MultiSelectConfig {
                filter: ContentFilter::Images,
                selection_limit: 3,
            },
            move || {
                *cancel_rec.cancels.lock().unwrap() += 1;
                cancel_tx.send(()).unwrap();
            },
            move |result| {
                select_rec.selections.lock().unwrap().push(result);
                select_tx.send(()).unwrap();
            },
            move |failure| {
                fail_rec.failures.lock().unwrap().push(failure);
            },
        ));

        picker.presentation_finished(vec![
            FakeItem::succeed(0, 15),
            FakeItem::fail("corrupt item", 5),
            FakeItem::succeed(2, 0),
        ]);
        wait_terminal(&rx);

        assert_eq!(*recorder.cancels.lock().unwrap(), 0);
        let failures = recorder.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, Some(1));
        let selections = recorder.selections.lock().unwrap();
        assert_eq!(selections.len(), 1);
        let mut indices: Vec<usize> = selections[0].images.iter().map(|s| s.index).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_unsupported_item_fails_synchronously() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        picker.presentation_finished(vec![FakeItem::unsupported(), FakeItem::succeed(1, 5)]);
        wait_terminal(&rx);

        let failures = recorder.failures.lock().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, Some(0));
        assert!(matches!(
            failures[0].error,
            PickError::UnsupportedContent(_)
        ));
        let selections = recorder.selections.lock().unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].images.len(), 1);
        assert_eq!(selections[0].images[0].index, 1);
        assert_eq!(*recorder.cancels.lock().unwrap(), 0);
    }

    #[test]
    fn test_all_unsupported_resolves_as_cancel() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        picker.presentation_finished(vec![FakeItem::unsupported(), FakeItem::unsupported()]);
        wait_terminal(&rx);

        assert_eq!(recorder.failures.lock().unwrap().len(), 2);
        assert_eq!(*recorder.cancels.lock().unwrap(), 1);
        assert!(recorder.selections.lock().unwrap().is_empty());
    }

    #[test]
    fn test_second_presentation_ignored() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        Arc::clone(&picker).presentation_finished(Vec::new());
        wait_terminal(&rx);
        picker.presentation_finished(vec![FakeItem::succeed(0, 0)]);

        // Give a stray load a chance to run before asserting nothing moved
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(*recorder.cancels.lock().unwrap(), 1);
        assert!(recorder.selections.lock().unwrap().is_empty());
        assert!(recorder.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_settles_deliver_one_terminal() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = mpsc::channel();
        let picker = session(&recorder, &tx);

        let items: Vec<Box<dyn ItemProvider>> = (0..8u8)
            .map(|tag| FakeItem::succeed(tag, (tag as u64 % 4) * 5))
            .collect();
        picker.presentation_finished(items);
        wait_terminal(&rx);

        let selections = recorder.selections.lock().unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].images.len(), 8);
        assert_eq!(*recorder.cancels.lock().unwrap(), 0);
        // No second terminal may arrive
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
