use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{
    offered_slots, AppointmentBackend, AppointmentDetailViewer, AppointmentService,
    BookingFormController, CalendarGesture, CalendarView, MissingBookingLauncher,
    NotificationCenter, NotificationEvent, RawBookingForm, RefreshScheduler, Severity,
    SubmitOutcome,
};
use shared::{
    domain::{AppointmentId, AppointmentType},
    protocol::AppointmentEvent,
};
use tokio::time::Duration;
use tracing::info;

mod config;

#[derive(Parser, Debug)]
#[command(
    name = "clinic-console",
    about = "Terminal front-end for the clinic scheduling API"
)]
struct Args {
    /// Overrides the configured server URL.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Book a new appointment.
    Book {
        #[arg(long)]
        doctor_id: String,
        /// Calendar date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Time of day, HH:MM.
        #[arg(long)]
        time: String,
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        patient_age: String,
        #[arg(long, default_value = "")]
        reason: String,
        /// regular, medical, dental, immunization, checkup, family, or dots.
        #[arg(long, default_value = "")]
        appointment_type: String,
    },
    /// Print the appointment calendar.
    Calendar,
    /// Cancel an appointment.
    Cancel {
        #[arg(long)]
        id: String,
        /// Confirm the cancellation.
        #[arg(long)]
        yes: bool,
    },
    /// Show an appointment's details.
    Details {
        #[arg(long)]
        id: String,
    },
    /// List doctors currently accepting bookings.
    Doctors,
    /// Show the slot starts offered for a consultation type on a date.
    Slots {
        #[arg(long)]
        appointment_type: String,
        /// Calendar date, YYYY-MM-DD.
        #[arg(long)]
        date: String,
    },
    /// Keep the calendar on screen with periodic refresh.
    Watch,
}

/// Prints appointment details when a calendar event is activated.
struct ConsoleDetailViewer {
    service: Arc<dyn AppointmentBackend>,
}

#[async_trait]
impl AppointmentDetailViewer for ConsoleDetailViewer {
    async fn view(&self, id: AppointmentId) {
        match self.service.appointment_details(&id).await {
            Ok(details) => {
                println!("Appointment {id}");
                println!("  Date:   {}", details.date);
                println!("  Time:   {}", details.time.format("%H:%M"));
                println!("  Doctor: Dr. {}", details.doctor_name);
                println!("  Status: {}", details.status);
                println!("  Reason: {}", details.reason);
                if let Some(diagnosis) = &details.diagnosis {
                    println!("  Diagnosis: {diagnosis}");
                }
                if let Some(prescription) = &details.prescription {
                    println!("  Prescription: {prescription}");
                }
            }
            Err(err) => println!("[error] could not load appointment {id}: {err}"),
        }
    }
}

fn spawn_notification_printer(center: &NotificationCenter) {
    let mut events = center.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let NotificationEvent::Shown(notification) = event {
                let tag = match notification.severity {
                    Severity::Info => "info",
                    Severity::Success => "ok",
                    Severity::Error => "error",
                };
                println!("[{tag}] {}", notification.message);
            }
        }
    });
}

fn print_events(events: &[AppointmentEvent]) {
    if events.is_empty() {
        println!("No appointments on the calendar.");
        return;
    }
    for event in events {
        let end = event
            .end
            .map(|end| format!(" - {}", end.format("%H:%M")))
            .unwrap_or_default();
        println!(
            "{}  {}{}  {}  [{}]",
            event.id,
            event.start.format("%Y-%m-%d %H:%M"),
            end,
            event.title,
            event.status,
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let service: Arc<dyn AppointmentBackend> =
        Arc::new(AppointmentService::new(&settings.server_url).map_err(|err| anyhow!("{err}"))?);
    let center = NotificationCenter::new();
    spawn_notification_printer(&center);

    match args.command {
        Command::Book {
            doctor_id,
            date,
            time,
            patient_name,
            patient_age,
            reason,
            appointment_type,
        } => {
            let controller =
                BookingFormController::new(Arc::clone(&service), Arc::new(center.clone()));
            let outcome = controller
                .submit(RawBookingForm {
                    doctor_id,
                    date,
                    time,
                    patient_name,
                    patient_age,
                    reason_for_visit: reason,
                    appointment_type,
                })
                .await;
            if outcome == SubmitOutcome::Booked {
                // The success signal navigates to the appointments view.
                let view = CalendarView::new(Arc::clone(&service), Arc::new(center.clone()));
                view.refresh().await;
                print_events(&view.events().await);
            }
        }
        Command::Calendar => {
            let view = CalendarView::new(Arc::clone(&service), Arc::new(center.clone()));
            view.refresh().await;
            print_events(&view.events().await);
        }
        Command::Cancel { id, yes } => {
            if !yes {
                println!("Re-run with --yes to confirm cancelling appointment {id}.");
            } else {
                let view = CalendarView::new(Arc::clone(&service), Arc::new(center.clone()));
                if view.cancel_appointment(&AppointmentId(id)).await {
                    print_events(&view.events().await);
                }
            }
        }
        Command::Details { id } => {
            let viewer = Arc::new(ConsoleDetailViewer {
                service: Arc::clone(&service),
            });
            let view = CalendarView::new_with_collaborators(
                Arc::clone(&service),
                Arc::new(center.clone()),
                viewer,
                Arc::new(MissingBookingLauncher),
            );
            view.dispatch(CalendarGesture::EventActivated(AppointmentId(id)))
                .await;
        }
        Command::Doctors => match service.available_doctors().await {
            Ok(doctors) => {
                for doctor in doctors {
                    println!("{}  Dr. {} - {}", doctor.id, doctor.name, doctor.specialization);
                }
            }
            Err(err) => println!("[error] {err}"),
        },
        Command::Slots {
            appointment_type,
            date,
        } => {
            let appointment_type = appointment_type
                .parse::<AppointmentType>()
                .map_err(|err| anyhow!(err))?;
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")?;
            let slots = offered_slots(appointment_type, date);
            if slots.is_empty() {
                println!("{appointment_type} is not offered on {date}.");
            } else {
                for slot in slots {
                    println!("{}", slot.format("%H:%M"));
                }
            }
        }
        Command::Watch => {
            let every = Duration::from_secs(settings.refresh_secs.max(1));
            let view = CalendarView::new(Arc::clone(&service), Arc::new(center.clone()));
            view.refresh().await;
            print_events(&view.events().await);

            let scheduler = RefreshScheduler::start(Arc::clone(&view), every);
            let printer = {
                let view = Arc::clone(&view);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(every);
                    ticker.tick().await;
                    loop {
                        ticker.tick().await;
                        // Trail the refresh slightly so the fresh snapshot
                        // is the one printed.
                        tokio::time::sleep(Duration::from_millis(250)).await;
                        print_events(&view.events().await);
                    }
                })
            };

            info!(
                refresh_secs = settings.refresh_secs,
                "watching calendar; press Ctrl-C to stop"
            );
            tokio::signal::ctrl_c().await?;
            scheduler.cancel();
            printer.abort();
        }
    }

    // Let the notification printer drain before exiting.
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
