//! Notification state with auto-dismiss

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use crate::models::notification::NotificationState;
use crate::models::sync::SyncOutcome;

/// How long a notification stays up unless dismissed earlier
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(4000);

struct CenterInner {
    state: watch::Sender<NotificationState>,
    // Bumped on every show/clear so a stale timer cannot hide a newer notification
    generation: AtomicU64,
    dismiss_after: Option<Duration>,
}

/// Owner of the single notification shown to the user
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    /// `dismiss_after` of `None` keeps notifications up until dismissed
    pub fn new(dismiss_after: Option<Duration>) -> Self {
        let (state, _) = watch::channel(NotificationState::hidden());
        Self {
            inner: Arc::new(CenterInner {
                state,
                generation: AtomicU64::new(0),
                dismiss_after,
            }),
        }
    }

    pub fn current(&self) -> NotificationState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state.subscribe()
    }

    /// Replace whatever is shown with `outcome` and arm the auto-dismiss timer
    pub fn show(&self, outcome: &SyncOutcome) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_replace(NotificationState {
            visible: true,
            severity: outcome.severity,
            message: outcome.message.clone(),
        });

        let Some(delay) = self.inner.dismiss_after else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if inner.generation.load(Ordering::SeqCst) == generation {
                        debug!("Auto-dismissing notification");
                        hide(&inner.state);
                    }
                });
            }
            Err(_) => debug!("No async runtime, notification will not auto-dismiss"),
        }
    }

    /// Explicit user dismissal
    pub fn dismiss(&self) {
        self.clear();
    }

    /// Hide the current notification, e.g. when a new attempt starts
    pub fn clear(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        hide(&self.inner.state);
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Some(DEFAULT_DISMISS_AFTER))
    }
}

fn hide(state: &watch::Sender<NotificationState>) {
    state.send_if_modified(|current| {
        if current.visible {
            current.visible = false;
            true
        } else {
            false
        }
    });
}
