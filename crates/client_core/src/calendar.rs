//! Calendar view model: a refresh-on-demand snapshot of appointment events
//! plus a single dispatch table routing user gestures to collaborators.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    domain::AppointmentId,
    protocol::{AppointmentEvent, CalendarRange},
};
use tokio::{sync::Mutex, task::JoinHandle, time::Duration};
use tracing::{info, warn};

use crate::{
    notify::{NotificationSurface, Severity},
    service::AppointmentBackend,
};

/// Collaborator shown when a rendered event is selected. The identifier is
/// passed through unmodified.
#[async_trait]
pub trait AppointmentDetailViewer: Send + Sync {
    async fn view(&self, id: AppointmentId);
}

/// Collaborator that opens the booking form pre-filled with the selected
/// date, exactly as selected.
#[async_trait]
pub trait BookingLauncher: Send + Sync {
    async fn open_with_date(&self, date: NaiveDate);
}

pub struct MissingDetailViewer;

#[async_trait]
impl AppointmentDetailViewer for MissingDetailViewer {
    async fn view(&self, id: AppointmentId) {
        warn!(appointment_id = %id, "no detail viewer wired; ignoring event activation");
    }
}

pub struct MissingBookingLauncher;

#[async_trait]
impl BookingLauncher for MissingBookingLauncher {
    async fn open_with_date(&self, date: NaiveDate) {
        warn!(%date, "no booking launcher wired; ignoring date activation");
    }
}

/// User gestures on the rendered calendar, routed through one dispatch
/// table instead of per-element listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarGesture {
    EventActivated(AppointmentId),
    DateActivated(NaiveDate),
}

struct CalendarState {
    events: Vec<AppointmentEvent>,
    next_fetch_seq: u64,
    rendered_fetch_seq: u64,
}

/// Owns the rendered snapshot; no other component mutates it. Each refresh
/// is a full replace guarded by a fetch sequence number so a stale response
/// can never overwrite a newer snapshot.
pub struct CalendarView {
    backend: Arc<dyn AppointmentBackend>,
    notifier: Arc<dyn NotificationSurface>,
    detail_viewer: Arc<dyn AppointmentDetailViewer>,
    booking_launcher: Arc<dyn BookingLauncher>,
    inner: Mutex<CalendarState>,
}

impl CalendarView {
    pub fn new(
        backend: Arc<dyn AppointmentBackend>,
        notifier: Arc<dyn NotificationSurface>,
    ) -> Arc<Self> {
        Self::new_with_collaborators(
            backend,
            notifier,
            Arc::new(MissingDetailViewer),
            Arc::new(MissingBookingLauncher),
        )
    }

    pub fn new_with_collaborators(
        backend: Arc<dyn AppointmentBackend>,
        notifier: Arc<dyn NotificationSurface>,
        detail_viewer: Arc<dyn AppointmentDetailViewer>,
        booking_launcher: Arc<dyn BookingLauncher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            notifier,
            detail_viewer,
            booking_launcher,
            inner: Mutex::new(CalendarState {
                events: Vec::new(),
                next_fetch_seq: 0,
                rendered_fetch_seq: 0,
            }),
        })
    }

    /// Snapshot of the currently rendered events.
    pub async fn events(&self) -> Vec<AppointmentEvent> {
        self.inner.lock().await.events.clone()
    }

    pub async fn refresh(&self) {
        self.refresh_range(None).await;
    }

    /// Re-fetch and fully replace the snapshot. A fetch failure keeps the
    /// previous events visible and reports exactly one error notification.
    pub async fn refresh_range(&self, range: Option<CalendarRange>) {
        let fetch_seq = {
            let mut inner = self.inner.lock().await;
            inner.next_fetch_seq += 1;
            inner.next_fetch_seq
        };

        match self.backend.calendar_events(range).await {
            Ok(events) => {
                let mut inner = self.inner.lock().await;
                if fetch_seq <= inner.rendered_fetch_seq {
                    info!(
                        fetch_seq,
                        rendered_fetch_seq = inner.rendered_fetch_seq,
                        "discarding stale calendar response"
                    );
                    return;
                }
                info!(fetch_seq, count = events.len(), "calendar snapshot replaced");
                inner.rendered_fetch_seq = fetch_seq;
                inner.events = events;
            }
            Err(err) => {
                warn!(fetch_seq, error = %err, "calendar refresh failed; keeping previous snapshot");
                self.notifier
                    .notify(&format!("Could not refresh appointments: {err}"), Severity::Error)
                    .await;
            }
        }
    }

    /// Cancel an appointment and refresh the snapshot on success. The
    /// confirmation prompt is the calling surface's responsibility; the
    /// displayed status is left untouched on failure.
    pub async fn cancel_appointment(&self, id: &AppointmentId) -> bool {
        match self.backend.cancel(id).await {
            Ok(()) => {
                self.notifier
                    .notify("Appointment cancelled successfully", Severity::Success)
                    .await;
                self.refresh().await;
                true
            }
            Err(err) => {
                warn!(appointment_id = %id, error = %err, "appointment cancellation failed");
                self.notifier.notify(&err.to_string(), Severity::Error).await;
                false
            }
        }
    }

    pub async fn dispatch(&self, gesture: CalendarGesture) {
        match gesture {
            CalendarGesture::EventActivated(id) => self.detail_viewer.view(id).await,
            CalendarGesture::DateActivated(date) => {
                self.booking_launcher.open_with_date(date).await
            }
        }
    }
}

/// Periodic calendar refresh on an explicit, cancellable schedule. Dropping
/// the scheduler stops all future refreshes.
pub struct RefreshScheduler {
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    pub fn start(view: Arc<CalendarView>, every: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; the caller has already
            // rendered an initial snapshot.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                view.refresh().await;
            }
        });
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "tests/calendar_tests.rs"]
mod tests;
