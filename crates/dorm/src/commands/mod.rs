//! Commands module for the dorm CLI
//!
//! Provides figures, bed listings, placements (check, assign, hold, release),
//! staff set-asides and the intent outbox listing.

pub mod beds;
pub mod figures;
pub mod intents;
pub mod placement;
pub mod staff;
