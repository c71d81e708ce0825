//! dorm-core - Occupancy and capacity accounting
//!
//! This crate provides:
//! - Bed lifecycle (available, reserved, occupied) with append-only history
//! - Room and dormitory figures derived from live bed state
//! - The assignment validator
//! - Backend records and write intents

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod bed;
pub mod campus;
pub mod dormitory;
pub mod error;
pub mod ids;
pub mod intent;
pub mod occupant;
pub mod records;
pub mod room;
pub mod room_type;
pub mod validator;

pub use bed::{Bed, BedNumber, BedState, BedStatus, HistoryEntry};
pub use campus::Campus;
pub use dormitory::{Dormitory, DormitoryFigures, Gender};
pub use error::{Error, Result};
pub use ids::{BedId, DormitoryId, OccupantId, RoomId, RoomTypeId};
pub use intent::{Intent, IntentAction};
pub use occupant::{BedLocation, Occupant, OccupantIndex, OccupantKind};
pub use records::{BedRecord, DormitoryRecord, RoomRecord, SnapshotRecord};
pub use room::{OccupantType, Room, RoomFigures};
pub use room_type::RoomType;
pub use validator::validate;
