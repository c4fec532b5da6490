use super::*;
use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{NaiveTime, TimeZone, Utc};
use shared::{
    domain::{AppointmentStatus, DoctorId},
    error::ActionError,
    protocol::{
        AppointmentDetails, BookAppointmentBody, DoctorSummary, QuickBookingForm,
    },
};
use tokio::sync::oneshot;

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

#[async_trait]
impl NotificationSurface for RecordingNotifier {
    async fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .await
            .push((message.to_string(), severity));
    }
}

fn event(id: &str, status: AppointmentStatus) -> AppointmentEvent {
    AppointmentEvent {
        id: id.into(),
        title: format!("Appointment {id}"),
        start: Utc
            .with_ymd_and_hms(2024, 5, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        end: None,
        status,
    }
}

fn not_wired() -> ActionError {
    ActionError::Network("not wired in this test".to_string())
}

/// Backend stub with a scripted queue of calendar responses. An exhausted
/// queue answers with an empty snapshot.
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Vec<AppointmentEvent>, ActionError>>>,
    fetch_calls: AtomicUsize,
    cancel_response: Result<(), ActionError>,
    cancelled: Mutex<Vec<AppointmentId>>,
}

impl ScriptedBackend {
    fn new(responses: Vec<Result<Vec<AppointmentEvent>, ActionError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            fetch_calls: AtomicUsize::new(0),
            cancel_response: Ok(()),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    fn with_cancel_response(mut self, response: Result<(), ActionError>) -> Self {
        self.cancel_response = response;
        self
    }
}

#[async_trait]
impl AppointmentBackend for ScriptedBackend {
    async fn book(&self, _body: &BookAppointmentBody) -> Result<(), ActionError> {
        Err(not_wired())
    }

    async fn calendar_events(
        &self,
        _range: Option<CalendarRange>,
    ) -> Result<Vec<AppointmentEvent>, ActionError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn cancel(&self, id: &AppointmentId) -> Result<(), ActionError> {
        self.cancelled.lock().await.push(id.clone());
        self.cancel_response.clone()
    }

    async fn create_from_quick_form(&self, _form: &QuickBookingForm) -> Result<(), ActionError> {
        Err(not_wired())
    }

    async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, ActionError> {
        Err(not_wired())
    }

    async fn available_time_slots(
        &self,
        _date: NaiveDate,
        _doctor_id: &DoctorId,
    ) -> Result<Vec<NaiveTime>, ActionError> {
        Err(not_wired())
    }

    async fn appointment_details(
        &self,
        _id: &AppointmentId,
    ) -> Result<AppointmentDetails, ActionError> {
        Err(not_wired())
    }
}

/// Backend whose calendar responses are parked on per-call channels so a
/// test can decide completion order.
struct GatedBackend {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<Vec<AppointmentEvent>, ActionError>>>>,
    started: AtomicUsize,
}

impl GatedBackend {
    fn new(
        gates: Vec<oneshot::Receiver<Result<Vec<AppointmentEvent>, ActionError>>>,
    ) -> Self {
        Self {
            gates: Mutex::new(gates.into()),
            started: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AppointmentBackend for GatedBackend {
    async fn book(&self, _body: &BookAppointmentBody) -> Result<(), ActionError> {
        Err(not_wired())
    }

    async fn calendar_events(
        &self,
        _range: Option<CalendarRange>,
    ) -> Result<Vec<AppointmentEvent>, ActionError> {
        let gate = self.gates.lock().await.pop_front();
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(receiver) => receiver.await.unwrap_or_else(|_| Ok(Vec::new())),
            None => Ok(Vec::new()),
        }
    }

    async fn cancel(&self, _id: &AppointmentId) -> Result<(), ActionError> {
        Err(not_wired())
    }

    async fn create_from_quick_form(&self, _form: &QuickBookingForm) -> Result<(), ActionError> {
        Err(not_wired())
    }

    async fn available_doctors(&self) -> Result<Vec<DoctorSummary>, ActionError> {
        Err(not_wired())
    }

    async fn available_time_slots(
        &self,
        _date: NaiveDate,
        _doctor_id: &DoctorId,
    ) -> Result<Vec<NaiveTime>, ActionError> {
        Err(not_wired())
    }

    async fn appointment_details(
        &self,
        _id: &AppointmentId,
    ) -> Result<AppointmentDetails, ActionError> {
        Err(not_wired())
    }
}

#[tokio::test]
async fn refresh_fully_replaces_the_snapshot() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(vec![
            event("1", AppointmentStatus::Scheduled),
            event("2", AppointmentStatus::Scheduled),
        ]),
        Ok(vec![
            event("1", AppointmentStatus::Scheduled),
            event("2", AppointmentStatus::Scheduled),
        ]),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier.clone());

    view.refresh().await;
    view.refresh().await;

    // Two refreshes never accumulate duplicates.
    assert_eq!(view.events().await.len(), 2);
    assert!(notifier.messages.lock().await.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot_and_notifies_once() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(vec![event("1", AppointmentStatus::Scheduled)]),
        Err(ActionError::Network("connection reset".to_string())),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier.clone());

    view.refresh().await;
    view.refresh().await;

    let events = view.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "1".into());

    let messages = notifier.messages.lock().await.clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Error);
}

#[tokio::test]
async fn cancel_then_refresh_reflects_the_cancellation() {
    let backend = Arc::new(ScriptedBackend::new(vec![
        Ok(vec![event("1", AppointmentStatus::Scheduled)]),
        Ok(vec![event("1", AppointmentStatus::Cancelled)]),
    ]));
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier.clone());

    view.refresh().await;
    let cancelled = view.cancel_appointment(&"1".into()).await;

    assert!(cancelled);
    assert_eq!(backend.cancelled.lock().await.clone(), vec!["1".into()]);
    let events = view.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, AppointmentStatus::Cancelled);

    let messages = notifier.messages.lock().await.clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Success);
}

#[tokio::test]
async fn failed_cancel_leaves_status_and_snapshot_alone() {
    let backend = Arc::new(
        ScriptedBackend::new(vec![Ok(vec![event("1", AppointmentStatus::Scheduled)])])
            .with_cancel_response(Err(ActionError::Backend {
                status: 409,
                message: "appointment already started".to_string(),
            })),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier.clone());

    view.refresh().await;
    let cancelled = view.cancel_appointment(&"1".into()).await;

    assert!(!cancelled);
    // No optimistic mutation and no extra fetch.
    assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(view.events().await[0].status, AppointmentStatus::Scheduled);

    let messages = notifier.messages.lock().await.clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, Severity::Error);
    assert!(messages[0].0.contains("appointment already started"));
}

#[tokio::test]
async fn stale_calendar_response_is_discarded() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let backend = Arc::new(GatedBackend::new(vec![first_rx, second_rx]));
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier.clone());

    let first = {
        let view = Arc::clone(&view);
        tokio::spawn(async move { view.refresh().await })
    };
    while backend.started.load(Ordering::SeqCst) < 1 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let second = {
        let view = Arc::clone(&view);
        tokio::spawn(async move { view.refresh().await })
    };
    while backend.started.load(Ordering::SeqCst) < 2 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // The later-dispatched fetch completes first...
    second_tx
        .send(Ok(vec![event("new", AppointmentStatus::Scheduled)]))
        .expect("complete second fetch");
    second.await.expect("join second");

    // ...and the earlier fetch straggles in afterwards.
    first_tx
        .send(Ok(vec![event("old", AppointmentStatus::Scheduled)]))
        .expect("complete first fetch");
    first.await.expect("join first");

    let events = view.events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, "new".into());
}

struct RecordingViewer {
    seen: Mutex<Vec<AppointmentId>>,
}

#[async_trait]
impl AppointmentDetailViewer for RecordingViewer {
    async fn view(&self, id: AppointmentId) {
        self.seen.lock().await.push(id);
    }
}

struct RecordingLauncher {
    seen: Mutex<Vec<NaiveDate>>,
}

#[async_trait]
impl BookingLauncher for RecordingLauncher {
    async fn open_with_date(&self, date: NaiveDate) {
        self.seen.lock().await.push(date);
    }
}

#[tokio::test]
async fn gestures_route_through_the_dispatch_table_unmodified() {
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let viewer = Arc::new(RecordingViewer {
        seen: Mutex::new(Vec::new()),
    });
    let launcher = Arc::new(RecordingLauncher {
        seen: Mutex::new(Vec::new()),
    });
    let view = CalendarView::new_with_collaborators(
        backend,
        notifier,
        viewer.clone(),
        launcher.clone(),
    );

    view.dispatch(CalendarGesture::EventActivated("abc-123".into()))
        .await;
    let date = NaiveDate::from_ymd_opt(2024, 5, 9).expect("valid date");
    view.dispatch(CalendarGesture::DateActivated(date)).await;

    assert_eq!(viewer.seen.lock().await.clone(), vec!["abc-123".into()]);
    assert_eq!(launcher.seen.lock().await.clone(), vec![date]);
}

#[tokio::test]
async fn scheduler_refreshes_until_cancelled() {
    let backend = Arc::new(ScriptedBackend::new(Vec::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let view = CalendarView::new(backend.clone(), notifier);

    let scheduler = RefreshScheduler::start(Arc::clone(&view), Duration::from_millis(20));
    tokio::time::sleep(Duration::from_millis(90)).await;
    assert!(backend.fetch_calls.load(Ordering::SeqCst) >= 2);

    scheduler.cancel();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let settled = backend.fetch_calls.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), settled);
}
