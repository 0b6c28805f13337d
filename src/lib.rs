#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::return_self_not_must_use
)]

//! Pickup scheduling for Orbits Movers bookings: which dates and 15 minute
//! slots can be booked, the picker state tying them together, and the move
//! request built from it.

pub mod calendar;
pub mod clock;
mod eligibility;
mod lead_time;
pub mod move_request;
pub mod policy;
pub mod selection;
pub mod session;
pub mod slots;
