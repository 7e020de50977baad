use crate::infra::seed_demo_data;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use gymdesk::error::AppError;
use gymdesk::scheduling::{
    Actor, AppointmentDraft, ApprovalService, AvailabilityEngine, BookingError, BookingService,
    InMemoryEntityStore, MemberId, Role, ScheduleDirectory, ServiceId, TrainerId, VenueId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Booking date for the walkthrough (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Start of the demo slot (HH:MM). Defaults to 10:00.
    #[arg(long, value_parser = crate::infra::parse_time)]
    pub(crate) start: Option<NaiveTime>,
}

/// Seeded booking walkthrough: discover a trainer, book, hit a conflict,
/// reschedule around it, and approve as the admin.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let start = args
        .start
        .unwrap_or_else(|| NaiveTime::from_hms_opt(10, 0, 0).expect("static time"));
    let end = start + chrono::Duration::hours(1);

    let store = Arc::new(InMemoryEntityStore::new());
    seed_demo_data(&store);

    let booking = BookingService::new(store.clone());
    let approvals = ApprovalService::new(store.clone());
    let availability = Arc::new(AvailabilityEngine::new(store.clone()));
    let directory = ScheduleDirectory::new(store.clone(), availability.clone());

    let admin = Actor {
        member_id: MemberId(1),
        role: Role::Admin,
    };
    let deniz = Actor {
        member_id: MemberId(2),
        role: Role::Member,
    };
    let ece = Actor {
        member_id: MemberId(3),
        role: Role::Member,
    };

    println!("Gym scheduling walkthrough ({date})");

    println!("\nTrainers free {start}-{end}:");
    for trainer in availability
        .find_available_trainers(date, start, end)
        .map_err(demo_failure)?
    {
        println!("  {} ({}) at venue {}", trainer.name, trainer.specialties, trainer.venue_id.0);
    }

    let draft = AppointmentDraft {
        member_id: MemberId(2),
        trainer_id: TrainerId(1),
        service_id: ServiceId(1),
        venue_id: VenueId(1),
        date,
        start,
        end,
        fee: 0,
        approved: false,
        note: Some("first session".to_string()),
        version: None,
    };

    let record = booking.create(draft.clone(), &deniz).map_err(demo_failure)?;
    println!(
        "\nDeniz booked appointment #{} for {} TRY (pending approval)",
        record.id.0, record.appointment.fee
    );

    println!("\nEce requests the overlapping slot:");
    let mut clash = draft.clone();
    clash.member_id = MemberId(3);
    clash.start = start + chrono::Duration::minutes(30);
    clash.end = end + chrono::Duration::minutes(30);
    match booking.create(clash.clone(), &ece) {
        Err(BookingError::Rejected(report)) => {
            for message in report.messages() {
                println!("  rejected: {message}");
            }
        }
        Ok(record) => println!("  unexpectedly booked #{}", record.id.0),
        Err(err) => return Err(demo_failure(err)),
    }

    clash.start = end;
    clash.end = end + chrono::Duration::hours(1);
    let follow_up = booking.create(clash, &ece).map_err(demo_failure)?;
    println!(
        "  back-to-back slot {}-{} accepted as #{}",
        follow_up.appointment.start, follow_up.appointment.end, follow_up.id.0
    );

    let pending = directory.pending_appointments().map_err(demo_failure)?;
    println!("\nAdmin review queue: {} pending", pending.len());
    let approved = approvals.approve(record.id, &admin).map_err(demo_failure)?;
    println!(
        "  approved #{} for {}",
        approved.id.0,
        approved.appointment.date.format("%Y-%m-%d")
    );

    println!("\nDeniz's schedule:");
    for view in directory.appointments_for(&deniz).map_err(demo_failure)? {
        println!(
            "  {} {}-{} {} with {} [{}]",
            view.date,
            view.start,
            view.end,
            view.service_name.as_deref().unwrap_or("unspecified"),
            view.trainer_name.as_deref().unwrap_or("unspecified"),
            if view.approved { "approved" } else { "pending" },
        );
    }

    Ok(())
}

fn demo_failure(err: impl std::fmt::Display) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}
