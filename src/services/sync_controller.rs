//! Save workflow for a single processor
//!
//! One attempt walks `Idle -> Validating -> Submitting -> {Succeeded, Rejected}`
//! and then falls back to `Idle`. Nothing is written locally and the store is
//! left alone unless the processor accepted the update.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::{ConsoleError, Result, TransportFailure};
use crate::models::processor::ProcessorConfig;
use crate::models::responses::{ConfigUpdateRequest, ProcessorInfo};
use crate::models::sync::{MSG_ATTEMPT_IN_PROGRESS, MSG_LOCAL_WRITE_FAILED, SyncOutcome, SyncPhase};
use crate::remote::{CancelSignal, ProcessorTransport};
use crate::services::notification_center::NotificationCenter;
use crate::services::processor_store::ProcessorStore;
use crate::storage::{HOST_KEY, KeyValueStorage, PORT_KEY, VIDEO_PATH_KEY};

/// Drives validate -> submit -> persist -> publish for processor entries
pub struct ProcessorSyncController {
    store: Arc<ProcessorStore>,
    storage: Arc<dyn KeyValueStorage>,
    transport: Arc<dyn ProcessorTransport>,
    notifications: NotificationCenter,
    phases: Mutex<HashMap<usize, SyncPhase>>,
}

/// Puts the processor back to `Idle` however the attempt ends, including
/// when the attempt future is dropped mid-flight
struct PhaseGuard<'a> {
    phases: &'a Mutex<HashMap<usize, SyncPhase>>,
    index: usize,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phases
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.index);
    }
}

impl ProcessorSyncController {
    pub fn new(
        store: Arc<ProcessorStore>,
        storage: Arc<dyn KeyValueStorage>,
        transport: Arc<dyn ProcessorTransport>,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            store,
            storage,
            transport,
            notifications,
            phases: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<ProcessorStore> {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Hide the current notification on user request
    pub fn dismiss_notification(&self) {
        self.notifications.dismiss();
    }

    /// Where the attempt for `index` currently stands
    pub fn phase(&self, index: usize) -> SyncPhase {
        self.lock_phases().get(&index).copied().unwrap_or_default()
    }

    /// Save `candidate` as processor `index`.
    ///
    /// `None` means the caller's presence check failed. The only error is
    /// `IndexOutOfRange`; every other failure comes back as an error outcome.
    pub async fn attempt_save(
        &self,
        candidate: Option<ProcessorConfig>,
        index: usize,
    ) -> Result<SyncOutcome> {
        self.attempt_save_with_cancel(candidate, index, CancelSignal::new())
            .await
    }

    /// Same as `attempt_save`, abandoning the remote call once `cancel` fires
    pub async fn attempt_save_with_cancel(
        &self,
        candidate: Option<ProcessorConfig>,
        index: usize,
        cancel: CancelSignal,
    ) -> Result<SyncOutcome> {
        let len = self.store.len();
        if index >= len {
            return Err(ConsoleError::IndexOutOfRange { index, len });
        }

        let Some(_guard) = self.begin_attempt(index) else {
            warn!("Processor {}: save requested while another is in flight", index);
            let outcome = SyncOutcome::error(MSG_ATTEMPT_IN_PROGRESS);
            self.notifications.show(&outcome);
            return Ok(outcome);
        };
        self.notifications.clear();

        let outcome = match candidate.filter(ProcessorConfig::is_complete) {
            None => {
                self.transition(index, SyncPhase::Rejected);
                SyncOutcome::fields_required()
            }
            Some(candidate) => self.submit(candidate, index, &cancel).await?,
        };

        self.notifications.show(&outcome);
        Ok(outcome)
    }

    /// Query the info endpoint of the stored processor at `index`
    pub async fn fetch_info(&self, index: usize) -> Result<ProcessorInfo> {
        let processor = self
            .store
            .get(index)
            .ok_or(ConsoleError::IndexOutOfRange {
                index,
                len: self.store.len(),
            })?;
        Ok(self.transport.fetch_info(&processor).await?)
    }

    fn begin_attempt(&self, index: usize) -> Option<PhaseGuard<'_>> {
        let mut phases = self.lock_phases();
        if phases.get(&index).copied().unwrap_or_default() != SyncPhase::Idle {
            return None;
        }
        phases.insert(index, SyncPhase::Validating);
        debug!("Processor {}: {} -> {}", index, SyncPhase::Idle, SyncPhase::Validating);
        Some(PhaseGuard {
            phases: &self.phases,
            index,
        })
    }

    fn transition(&self, index: usize, next: SyncPhase) {
        let previous = self.lock_phases().insert(index, next).unwrap_or_default();
        debug!("Processor {}: {} -> {}", index, previous, next);
    }

    /// The map only holds plain phase values, so a panic elsewhere cannot
    /// leave it half-updated
    fn lock_phases(&self) -> MutexGuard<'_, HashMap<usize, SyncPhase>> {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn submit(
        &self,
        candidate: ProcessorConfig,
        index: usize,
        cancel: &CancelSignal,
    ) -> Result<SyncOutcome> {
        self.transition(index, SyncPhase::Submitting);
        let request = ConfigUpdateRequest::for_video_path(candidate.video_path.clone());

        // A reply that is already in hand wins over a cancel raised meanwhile
        let result = if cancel.is_cancelled() {
            Err(TransportFailure::Cancelled)
        } else {
            tokio::select! {
                biased;
                result = self.transport.put_config(&candidate, &request) => result,
                _ = cancel.cancelled() => Err(TransportFailure::Cancelled),
            }
        };

        match result {
            Ok(()) => {
                if candidate.persist_locally {
                    if let Err(e) = self.persist(&candidate) {
                        warn!("Processor {}: accepted remotely but not stored: {}", index, e);
                        self.transition(index, SyncPhase::Rejected);
                        return Ok(SyncOutcome::error(vec![
                            MSG_LOCAL_WRITE_FAILED.to_string(),
                            e.to_string(),
                        ]));
                    }
                }
                info!(
                    "Processor {} saved: {}:{} ({})",
                    index, candidate.host, candidate.port, candidate.video_path
                );
                self.store.replace(index, candidate)?;
                self.transition(index, SyncPhase::Succeeded);
                Ok(SyncOutcome::saved())
            }
            Err(TransportFailure::Rejected { status, messages }) => {
                info!("Processor {} rejected configuration (HTTP {})", index, status);
                self.transition(index, SyncPhase::Rejected);
                Ok(SyncOutcome::save_failed(messages))
            }
            Err(failure) => {
                warn!("Processor {}: {}", index, failure);
                self.transition(index, SyncPhase::Rejected);
                Ok(SyncOutcome::save_failed([failure.to_string()]))
            }
        }
    }

    fn persist(&self, candidate: &ProcessorConfig) -> Result<()> {
        self.storage.set_many(&[
            (PORT_KEY, candidate.port.as_str()),
            (HOST_KEY, candidate.host.as_str()),
            (VIDEO_PATH_KEY, candidate.video_path.as_str()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::{NotificationMessage, Severity};
    use crate::models::processor::ProcessorList;
    use crate::models::sync::{MSG_FIELDS_REQUIRED, MSG_SAVE_FAILED};
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Transport answering every PUT with a fixed result
    struct ScriptedTransport {
        result: std::result::Result<(), TransportFailure>,
        delay: Duration,
        calls: AtomicUsize,
        last_request: Mutex<Option<ConfigUpdateRequest>>,
        cancel_on_call: Option<CancelSignal>,
    }

    impl ScriptedTransport {
        fn new(result: std::result::Result<(), TransportFailure>) -> Arc<Self> {
            Arc::new(Self {
                result,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                cancel_on_call: None,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(()),
                delay,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                cancel_on_call: None,
            })
        }

        /// Accepts, but fires `cancel` before handing the reply back
        fn cancelling(cancel: CancelSignal) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                cancel_on_call: Some(cancel),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProcessorTransport for ScriptedTransport {
        async fn put_config(
            &self,
            _processor: &ProcessorConfig,
            request: &ConfigUpdateRequest,
        ) -> std::result::Result<(), TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some(cancel) = &self.cancel_on_call {
                cancel.cancel();
            }
            self.result.clone()
        }

        async fn fetch_info(
            &self,
            _processor: &ProcessorConfig,
        ) -> std::result::Result<ProcessorInfo, TransportFailure> {
            Ok(ProcessorInfo {
                version: "0.7.0".to_string(),
                device: "x86".to_string(),
                has_been_configured: true,
            })
        }
    }

    fn controller_with(
        transport: Arc<ScriptedTransport>,
    ) -> (Arc<ProcessorSyncController>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProcessorStore::initialize(storage.as_ref());
        build_controller(store, storage, transport)
    }

    fn controller_with_two(
        transport: Arc<ScriptedTransport>,
    ) -> (Arc<ProcessorSyncController>, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProcessorStore::from_list(ProcessorList::new(vec![
            ProcessorConfig::new("10.0.0.1", "8300", "/a"),
            ProcessorConfig::new("10.0.0.2", "8300", "/b"),
        ]));
        build_controller(store, storage, transport)
    }

    fn build_controller(
        store: ProcessorStore,
        storage: Arc<MemoryStorage>,
        transport: Arc<ScriptedTransport>,
    ) -> (Arc<ProcessorSyncController>, Arc<MemoryStorage>) {
        let store = Arc::new(store);
        let controller = ProcessorSyncController::new(
            store,
            storage.clone(),
            transport,
            NotificationCenter::new(None),
        );
        (Arc::new(controller), storage)
    }

    fn candidate() -> ProcessorConfig {
        ProcessorConfig::new("1.2.3.4", "9000", "/data").persisted(true)
    }

    #[tokio::test]
    async fn test_missing_candidate_never_reaches_transport() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, storage) = controller_with(transport.clone());

        let outcome = controller.attempt_save(None, 0).await.unwrap();

        assert_eq!(outcome, SyncOutcome::error(MSG_FIELDS_REQUIRED));
        assert_eq!(transport.calls(), 0);
        assert_eq!(storage.write_count(), 0);
        assert_eq!(controller.phase(0), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_incomplete_candidate_is_treated_as_missing() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, _) = controller_with(transport.clone());

        let outcome = controller
            .attempt_save(Some(ProcessorConfig::new("1.2.3.4", "", "/data")), 0)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::fields_required());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_sends_video_path_and_updates_store() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, storage) = controller_with(transport.clone());

        let outcome = controller.attempt_save(Some(candidate()), 0).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(
            transport.last_request.lock().unwrap().clone(),
            Some(ConfigUpdateRequest::for_video_path("/data"))
        );
        assert_eq!(controller.store().get(0), Some(candidate()));
        assert_eq!(storage.get("videoPath").unwrap().as_deref(), Some("/data"));
        assert_eq!(controller.notifications().current().severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_success_without_persist_flag_leaves_storage_alone() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, storage) = controller_with(transport);

        let config = candidate().persisted(false);
        let outcome = controller.attempt_save(Some(config.clone()), 0).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(storage.write_count(), 0);
        assert_eq!(controller.store().get(0), Some(config));
    }

    #[tokio::test]
    async fn test_rejection_lists_server_messages() {
        let transport = ScriptedTransport::new(Err(TransportFailure::Rejected {
            status: 422,
            messages: vec!["a".to_string(), "b".to_string()],
        }));
        let (controller, storage) = controller_with(transport);
        let before = controller.store().snapshot();

        let outcome = controller.attempt_save(Some(candidate()), 0).await.unwrap();

        assert_eq!(
            outcome.message,
            NotificationMessage::Lines(vec![
                MSG_SAVE_FAILED.to_string(),
                "a".to_string(),
                "b".to_string()
            ])
        );
        assert_eq!(storage.write_count(), 0);
        assert_eq!(controller.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_error_outcome() {
        let transport = ScriptedTransport::new(Err(TransportFailure::Timeout));
        let (controller, storage) = controller_with(transport);

        let outcome = controller.attempt_save(Some(candidate()), 0).await.unwrap();

        assert_eq!(outcome.severity, Severity::Error);
        assert_eq!(outcome.message.lines()[0], MSG_SAVE_FAILED);
        assert_eq!(outcome.message.lines().len(), 2);
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_an_error() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, _) = controller_with(transport.clone());

        let err = controller.attempt_save(Some(candidate()), 3).await.unwrap_err();

        assert!(matches!(err, ConsoleError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancel_abandons_in_flight_request() {
        let transport = ScriptedTransport::slow(Duration::from_secs(30));
        let (controller, storage) = controller_with(transport);
        let before = controller.store().snapshot();

        let cancel = CancelSignal::new();
        let attempt = {
            let controller = controller.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                controller
                    .attempt_save_with_cancel(Some(candidate()), 0, cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(controller.phase(0), SyncPhase::Submitting);
        cancel.cancel();

        let outcome = attempt.await.unwrap().unwrap();
        assert_eq!(outcome.severity, Severity::Error);
        assert_eq!(storage.write_count(), 0);
        assert_eq!(controller.store().snapshot(), before);
        assert_eq!(controller.phase(0), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_second_attempt_on_same_processor_is_refused() {
        let transport = ScriptedTransport::slow(Duration::from_millis(200));
        let (controller, _) = controller_with(transport.clone());

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.attempt_save(Some(candidate()), 0).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = controller.attempt_save(Some(candidate()), 0).await.unwrap();
        assert_eq!(second, SyncOutcome::error(MSG_ATTEMPT_IN_PROGRESS));

        assert!(first.await.unwrap().unwrap().is_success());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_reply_received_before_cancel_is_kept() {
        let cancel = CancelSignal::new();
        let transport = ScriptedTransport::cancelling(cancel.clone());
        let (controller, storage) = controller_with(transport.clone());

        let outcome = controller
            .attempt_save_with_cancel(Some(candidate()), 0, cancel.clone())
            .await
            .unwrap();

        assert!(cancel.is_cancelled());
        assert!(outcome.is_success());
        assert_eq!(transport.calls(), 1);
        assert_eq!(controller.store().get(0), Some(candidate()));
        assert_eq!(storage.get("host").unwrap().as_deref(), Some("1.2.3.4"));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_sends_nothing() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, storage) = controller_with(transport.clone());
        let before = controller.store().snapshot();

        let cancel = CancelSignal::new();
        cancel.cancel();
        let outcome = controller
            .attempt_save_with_cancel(Some(candidate()), 0, cancel)
            .await
            .unwrap();

        assert_eq!(outcome.severity, Severity::Error);
        assert_eq!(transport.calls(), 0);
        assert_eq!(storage.write_count(), 0);
        assert_eq!(controller.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_new_attempt_hides_previous_notification() {
        let transport = ScriptedTransport::slow(Duration::from_millis(200));
        let (controller, _) = controller_with(transport);

        controller.attempt_save(None, 0).await.unwrap();
        assert!(controller.notifications().current().visible);

        let attempt = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.attempt_save(Some(candidate()), 0).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(controller.phase(0), SyncPhase::Submitting);
        assert!(!controller.notifications().current().visible);

        assert!(attempt.await.unwrap().unwrap().is_success());
        let shown = controller.notifications().current();
        assert!(shown.visible);
        assert_eq!(shown.severity, Severity::Success);
    }

    #[tokio::test]
    async fn test_dismiss_hides_notification() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, _) = controller_with(transport);

        controller.attempt_save(Some(candidate()), 0).await.unwrap();
        assert!(controller.notifications().current().visible);

        controller.dismiss_notification();
        assert!(!controller.notifications().current().visible);
    }

    #[tokio::test]
    async fn test_different_processors_save_concurrently() {
        let transport = ScriptedTransport::slow(Duration::from_millis(100));
        let (controller, _) = controller_with_two(transport.clone());

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .attempt_save(Some(ProcessorConfig::new("10.0.0.1", "9000", "/x")), 0)
                    .await
            })
        };
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .attempt_save(Some(ProcessorConfig::new("10.0.0.2", "9001", "/y")), 1)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(controller.phase(0), SyncPhase::Submitting);
        assert_eq!(controller.phase(1), SyncPhase::Submitting);

        assert!(first.await.unwrap().unwrap().is_success());
        assert!(second.await.unwrap().unwrap().is_success());
        assert_eq!(transport.calls(), 2);
        assert_eq!(controller.store().get(0).unwrap().port, "9000");
        assert_eq!(controller.store().get(1).unwrap().port, "9001");
    }

    #[tokio::test]
    async fn test_poisoned_phase_lock_does_not_block_saves() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, _) = controller_with(transport.clone());

        std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let _phases = controller.phases.lock().unwrap();
                panic!("poison the phase map");
            });
            assert!(handle.join().is_err());
        });
        assert!(controller.phases.is_poisoned());

        let outcome = controller.attempt_save(Some(candidate()), 0).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(transport.calls(), 1);
        assert_eq!(controller.phase(0), SyncPhase::Idle);
    }

    #[tokio::test]
    async fn test_fetch_info_reads_stored_processor() {
        let transport = ScriptedTransport::new(Ok(()));
        let (controller, _) = controller_with(transport);

        let info = controller.fetch_info(0).await.unwrap();
        assert_eq!(info.device, "x86");
        assert!(controller.fetch_info(1).await.is_err());
    }
}
