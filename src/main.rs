#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use orbitspickup::{
    clock::LocalClock,
    policy::SchedulingPolicy,
    session::{SchedulingSession, SessionEvent},
};

fn main() {
    env_logger::init();
    info!("Initialising");
    let policy = SchedulingPolicy::load(Path::new("./max-advance-days"))
        .expect("Initialisation error");
    run(policy).expect("Abnormal shutdown");
}

// Walks one picker session against the local clock: show the month, pick the
// first bookable day and its first slot, then confirm.
fn run(policy: SchedulingPolicy) -> Result<()> {
    let mut session = SchedulingSession::new(LocalClock, policy);

    let mut calendar = session.calendar();
    if !calendar.iter().any(|day| day.selectable) {
        session.handle_event(SessionEvent::NextMonth)?;
        calendar = session.calendar();
    }
    info!(
        "{}: {} of {} days bookable",
        session.month().title(),
        calendar.iter().filter(|day| day.selectable).count(),
        calendar.len()
    );

    // Today can be selectable with nothing left to offer, so skip to a day with slots
    for day in calendar.iter().filter(|day| day.selectable) {
        session
            .handle_event(SessionEvent::SelectDate(day.date))
            .context("Failed to select first bookable day")?;
        if !session.available_slots().is_empty() {
            break;
        }
    }

    let slots = session.available_slots();
    let Some(first) = slots.first() else {
        info!("No pickup slots available");
        return Ok(());
    };
    info!(
        "{} slots on {:?}, from {} to {}",
        slots.len(),
        session.selection().date(),
        first,
        slots.last().unwrap_or(first)
    );

    session
        .handle_event(SessionEvent::SelectTime(*first))
        .context("Failed to select first slot")?;
    let pickup = session.confirm().context("Failed to confirm pickup")?;
    info!("Earliest pickup: {}", pickup);

    session.handle_event(SessionEvent::Close)?;
    Ok(())
}
