//! UI-framework-agnostic interaction core for the clinic scheduling app.
//!
//! The browser-side workflow is modeled as plain async components so the
//! logic is testable without a rendering surface: [`booking`] validates and
//! submits bookings, [`service`] performs the typed backend operations,
//! [`calendar`] owns the rendered snapshot and routes gestures, [`notify`]
//! stacks transient messages, and [`chrome`] holds dashboard state.
//! Rendering widgets and persistence live behind the collaborator traits.

pub mod booking;
pub mod calendar;
pub mod chrome;
pub mod notify;
pub mod service;
pub mod slots;

pub use booking::{
    AppointmentRequest, BookingFormController, RawBookingForm, SubmissionState, SubmitOutcome,
};
pub use calendar::{
    AppointmentDetailViewer, BookingLauncher, CalendarGesture, CalendarView,
    MissingBookingLauncher, MissingDetailViewer, RefreshScheduler,
};
pub use chrome::{DropdownMenu, InMemoryPreferenceStore, PreferenceStore, SidebarController};
pub use notify::{
    Notification, NotificationCenter, NotificationEvent, NotificationId, NotificationSurface,
    Severity,
};
pub use service::{AppointmentBackend, AppointmentService, MissingAppointmentBackend};
pub use slots::offered_slots;
