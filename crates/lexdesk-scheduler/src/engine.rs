//! Notification engine — the poll loop that keeps reminders current.
//! One poller per viewing user: fetch, evaluate, replace. No state survives
//! between cycles except the published list.

use std::sync::Arc;

use lexdesk_core::config::NotificationSettings;
use lexdesk_core::error::{LexError, Result};
use lexdesk_core::traits::{CaseDataProvider, Clock, SystemClock};
use lexdesk_core::types::{Session, Task, User};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::notify::NotificationRecord;
use crate::reminders;

/// State shared between the engine handle and its poller task.
struct EngineShared {
    provider: Arc<dyn CaseDataProvider>,
    clock: Arc<dyn Clock>,
    settings: NotificationSettings,
    current: watch::Sender<Vec<NotificationRecord>>,
}

impl EngineShared {
    /// Fetch sessions and tasks together, bounded by the fetch timeout.
    async fn fetch(&self, user: &User) -> Result<(Vec<Session>, Vec<Task>)> {
        let both = async {
            tokio::try_join!(
                self.provider.list_sessions(user),
                self.provider.list_tasks(user)
            )
        };
        tokio::time::timeout(self.settings.fetch_timeout(), both)
            .await
            .map_err(|_| LexError::Timeout(self.settings.fetch_timeout_secs))?
    }

    /// One poll cycle without publishing.
    async fn compute(&self, user: &User) -> Result<Vec<NotificationRecord>> {
        let (sessions, tasks) = self.fetch(user).await?;
        let now = self.clock.now();
        Ok(reminders::evaluate(&sessions, &tasks, now, self.settings.locale))
    }

    /// Replace the published list unless `token` was cancelled.
    /// The check runs under the channel lock, the same lock `cancel_and_clear` takes.
    fn publish(&self, records: Vec<NotificationRecord>, token: &CancellationToken) -> bool {
        let mut applied = false;
        self.current.send_if_modified(|current| {
            if token.is_cancelled() {
                return false;
            }
            applied = true;
            if *current == records {
                return false;
            }
            *current = records;
            true
        });
        applied
    }

    fn cancel_and_clear(&self, token: &CancellationToken) {
        self.current.send_if_modified(|current| {
            token.cancel();
            let had_records = !current.is_empty();
            current.clear();
            had_records
        });
    }

    fn clear(&self) {
        self.current.send_if_modified(|current| {
            let had_records = !current.is_empty();
            current.clear();
            had_records
        });
    }
}

struct Poller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// The reminder engine — owns the published notification list and the poller.
pub struct NotificationEngine {
    shared: Arc<EngineShared>,
    user: Option<User>,
    poller: Option<Poller>,
}

impl NotificationEngine {
    /// Create an engine reading the system clock.
    pub fn new(provider: Arc<dyn CaseDataProvider>, settings: NotificationSettings) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock), settings)
    }

    pub fn with_clock(
        provider: Arc<dyn CaseDataProvider>,
        clock: Arc<dyn Clock>,
        settings: NotificationSettings,
    ) -> Self {
        let (current, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(EngineShared {
                provider,
                clock,
                settings,
                current,
            }),
            user: None,
            poller: None,
        }
    }

    /// Latest published reminders.
    pub fn current_notifications(&self) -> Vec<NotificationRecord> {
        self.shared.current.borrow().clone()
    }

    /// Change feed of the published list. Fires only when the list changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<NotificationRecord>> {
        self.shared.current.subscribe()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.shared.settings
    }

    /// Whether a poller is scheduled.
    pub fn is_running(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|poller| !poller.handle.is_finished())
    }

    /// Run a single cycle for `user` and return the result without publishing.
    /// Client-role users always get an empty set and trigger no fetch.
    pub async fn poll_once(&self, user: &User) -> Result<Vec<NotificationRecord>> {
        if !user.role.receives_reminders() {
            return Ok(Vec::new());
        }
        self.shared.compute(user).await
    }

    /// Switch the viewing user. The previous poller is stopped first; a
    /// non-client user gets a new poller whose first cycle runs immediately.
    /// `None` behaves like [`stop`](Self::stop).
    pub async fn set_user(&mut self, user: Option<User>) {
        self.stop().await;

        let Some(user) = user else {
            return;
        };
        self.user = Some(user.clone());

        if !user.role.receives_reminders() {
            tracing::debug!("🔕 Reminders disabled for {} ({})", user.email, user.role);
            return;
        }

        tracing::info!(
            "⏰ Reminder engine started for {} (check every {}s)",
            user.email,
            self.shared.settings.poll_interval_secs
        );
        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(self.shared.clone(), user, token.clone()));
        self.poller = Some(Poller { token, handle });
    }

    /// Stop polling and clear the published list. Once this returns no cycle
    /// can publish, including one that was mid-fetch.
    pub async fn stop(&mut self) {
        self.user = None;
        match self.poller.take() {
            Some(poller) => {
                self.shared.cancel_and_clear(&poller.token);
                if let Err(e) = poller.handle.await {
                    tracing::warn!("⚠️ Reminder poller ended abnormally: {e}");
                }
                tracing::info!("🛑 Reminder engine stopped");
            }
            None => self.shared.clear(),
        }
    }
}

impl Drop for NotificationEngine {
    fn drop(&mut self) {
        if let Some(poller) = &self.poller {
            poller.token.cancel();
        }
    }
}

/// Poller body: immediate first cycle, then one per interval until cancelled.
async fn poll_loop(shared: Arc<EngineShared>, user: User, token: CancellationToken) {
    let mut ticker = tokio::time::interval(shared.settings.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let outcome = tokio::select! {
                    _ = token.cancelled() => break,
                    outcome = shared.compute(&user) => outcome,
                };
                match outcome {
                    Ok(records) => {
                        let count = records.len();
                        if shared.publish(records, &token) {
                            tracing::debug!("🔔 {} reminder(s) for {}", count, user.email);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Failed to fetch events for reminders: {e}");
                    }
                }
            }
        }
    }

    tracing::debug!("Reminder poller for {} shutting down", user.email);
}
