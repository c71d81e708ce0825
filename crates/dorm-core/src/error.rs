//! Error types for dorm-core

use thiserror::Error;

use crate::bed::BedStatus;
use crate::ids::{BedId, DormitoryId, OccupantId, RoomId};

/// Core error type for occupancy operations.
///
/// Every variant is locally recoverable: the caller corrects its input or
/// re-fetches the snapshot and tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Lifecycle transition not allowed from the bed's current status
    #[error("bed {bed} cannot go from {from} to {to}")]
    InvalidTransition {
        bed: BedId,
        from: BedStatus,
        to: BedStatus,
    },

    /// The occupant already holds a different bed
    #[error("occupant {occupant} already holds bed {held}")]
    OccupantConflict { occupant: OccupantId, held: BedId },

    /// Room is closed for maintenance
    #[error("room {0} is under maintenance")]
    RoomUnderMaintenance(RoomId),

    /// Bed does not belong to the room
    #[error("bed {bed} is not in room {room}")]
    BedNotInRoom { room: RoomId, bed: BedId },

    /// Bed is set aside for staff
    #[error("bed {0} is reserved for staff")]
    BedReservedForStaff(BedId),

    /// Bed is occupied or held for someone else
    #[error("bed {0} is not available")]
    BedUnavailable(BedId),

    /// Room quota already filled
    #[error("room {room} has reached its quota of {quota}")]
    RoomAtQuota { room: RoomId, quota: usize },

    /// Occupant already has a bed elsewhere
    #[error("occupant {occupant} is already assigned to bed {held}")]
    OccupantAlreadyAssigned { occupant: OccupantId, held: BedId },

    /// Dormitory lookup failed
    #[error("unknown dormitory: {0}")]
    UnknownDormitory(DormitoryId),

    /// Room lookup failed
    #[error("unknown room: {0}")]
    UnknownRoom(RoomId),

    /// Bed id or number already used in the room
    #[error("room {room} already has bed {bed}")]
    DuplicateBed { room: RoomId, bed: String },

    /// Backend record violates a model invariant
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Stable code for mapping the error to a user-facing message
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::OccupantConflict { .. } => "occupant_conflict",
            Self::RoomUnderMaintenance(_) => "room_under_maintenance",
            Self::BedNotInRoom { .. } => "bed_not_in_room",
            Self::BedReservedForStaff(_) => "bed_reserved_for_staff",
            Self::BedUnavailable(_) => "bed_unavailable",
            Self::RoomAtQuota { .. } => "room_at_quota",
            Self::OccupantAlreadyAssigned { .. } => "occupant_already_assigned",
            Self::UnknownDormitory(_) => "unknown_dormitory",
            Self::UnknownRoom(_) => "unknown_room",
            Self::DuplicateBed { .. } => "duplicate_bed",
            Self::InvalidRecord(_) => "invalid_record",
        }
    }
}

/// Result type alias for dorm-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_are_snake_case() {
        let err = Error::RoomAtQuota {
            room: RoomId::new("r-1"),
            quota: 1,
        };
        assert_eq!(err.kind(), "room_at_quota");
        assert_eq!(err.to_string(), "room r-1 has reached its quota of 1");
    }
}
