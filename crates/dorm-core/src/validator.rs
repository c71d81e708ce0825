//! Assignment validator
//!
//! Decides whether `(room, bed, occupant)` may be assigned or held. Checks run
//! in a fixed order and the first failure wins:
//!
//! 1. room under maintenance
//! 2. bed not in the room
//! 3. staff-reserved bed, non-staff occupant
//! 4. bed occupied, or reserved for someone else
//! 5. room quota already filled
//! 6. occupant already holds another bed
//!
//! Nothing here mutates state.

use crate::bed::BedState;
use crate::error::{Error, Result};
use crate::ids::BedId;
use crate::occupant::{Occupant, OccupantIndex};
use crate::room::Room;

/// Validate placing `occupant` in `bed` of `room`.
///
/// # Errors
///
/// Returns the first failing check as `RoomUnderMaintenance`, `BedNotInRoom`,
/// `BedReservedForStaff`, `BedUnavailable`, `RoomAtQuota` or
/// `OccupantAlreadyAssigned`.
pub fn validate(
    room: &Room,
    bed: &BedId,
    occupant: &Occupant,
    holdings: &OccupantIndex,
) -> Result<()> {
    if room.is_maintenance {
        return Err(Error::RoomUnderMaintenance(room.id.clone()));
    }

    let target = room.bed(bed).ok_or_else(|| Error::BedNotInRoom {
        room: room.id.clone(),
        bed: bed.clone(),
    })?;

    if target.reserved_for_staff() && !occupant.is_staff() {
        return Err(Error::BedReservedForStaff(bed.clone()));
    }

    let already_counted = match target.state() {
        BedState::Available => false,
        BedState::Reserved { occupant: holder } if *holder == occupant.id => true,
        BedState::Reserved { .. } | BedState::Occupied { .. } => {
            return Err(Error::BedUnavailable(bed.clone()));
        }
    };

    if let Some(quota) = room.quota {
        let held = room.held_count().saturating_sub(usize::from(already_counted));
        if held >= quota {
            return Err(Error::RoomAtQuota {
                room: room.id.clone(),
                quota,
            });
        }
    }

    if let Some(held) = holdings.held_elsewhere(&occupant.id, bed) {
        return Err(Error::OccupantAlreadyAssigned {
            occupant: occupant.id.clone(),
            held: held.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ids::{DormitoryId, OccupantId, RoomId};
    use crate::occupant::BedLocation;
    use crate::room_type::RoomType;

    fn room() -> Result<Room> {
        let standard = RoomType::new("standard", "Standard", 2);
        Room::new("r-1", "101", DormitoryId::new("d-1"), standard.id.clone())
            .furnish(&standard, Utc::now())
    }

    fn first() -> BedId {
        BedId::new("r-1-1")
    }

    fn second() -> BedId {
        BedId::new("r-1-2")
    }

    fn at_quota() -> Error {
        Error::RoomAtQuota {
            room: RoomId::new("r-1"),
            quota: 1,
        }
    }

    #[test]
    fn test_valid_assignment_passes() -> Result<()> {
        validate(&room()?, &first(), &Occupant::student("s-1"), &OccupantIndex::new())
    }

    #[test]
    fn test_maintenance_is_checked_first() -> Result<()> {
        let room = room()?.with_maintenance(true);
        let err = validate(&room, &BedId::new("nope"), &Occupant::student("s-1"), &OccupantIndex::new());
        assert_eq!(err, Err(Error::RoomUnderMaintenance(RoomId::new("r-1"))));
        Ok(())
    }

    #[test]
    fn test_foreign_bed_rejected() -> Result<()> {
        let err = validate(&room()?, &BedId::new("r-9-1"), &Occupant::student("s-1"), &OccupantIndex::new());
        assert!(matches!(err, Err(Error::BedNotInRoom { .. })));
        Ok(())
    }

    #[test]
    fn test_staff_bed_only_for_staff() -> Result<()> {
        let mut room = room()?;
        room.bed_mut(&first())?.set_staff_reserved(true);

        let student = validate(&room, &first(), &Occupant::student("s-1"), &OccupantIndex::new());
        assert_eq!(student, Err(Error::BedReservedForStaff(first())));
        validate(&room, &first(), &Occupant::staff("t-1"), &OccupantIndex::new())
    }

    #[test]
    fn test_reserved_bed_only_for_its_holder() -> Result<()> {
        let mut room = room()?.with_quota(1);
        room.bed_mut(&first())?
            .hold(&OccupantId::new("s-1"), &OccupantIndex::new())?;
        let holdings = OccupantIndex::from_rooms([&room])?;

        let other = validate(&room, &first(), &Occupant::student("s-2"), &holdings);
        assert_eq!(other, Err(Error::BedUnavailable(first())));

        // The holder's own reservation already fills the quota slot it uses.
        validate(&room, &first(), &Occupant::student("s-1"), &holdings)
    }

    #[test]
    fn test_quota_counts_held_beds() -> Result<()> {
        let mut room = room()?.with_quota(1);
        room.bed_mut(&first())?
            .assign(&OccupantId::new("s-1"), &OccupantIndex::new())?;
        let holdings = OccupantIndex::from_rooms([&room])?;

        let err = validate(&room, &BedId::new("r-1-2"), &Occupant::student("s-2"), &holdings);
        assert_eq!(
            err,
            Err(Error::RoomAtQuota {
                room: RoomId::new("r-1"),
                quota: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_occupant_with_another_bed_rejected() -> Result<()> {
        let mut holdings = OccupantIndex::new();
        holdings.insert(
            OccupantId::new("s-1"),
            BedLocation {
                room: RoomId::new("r-7"),
                bed: BedId::new("r-7-1"),
            },
        );
        let err = validate(&room()?, &first(), &Occupant::student("s-1"), &holdings);
        assert_eq!(
            err,
            Err(Error::OccupantAlreadyAssigned {
                occupant: OccupantId::new("s-1"),
                held: BedId::new("r-7-1"),
            })
        );
        Ok(())
    }

    #[test]
    fn test_quota_applies_to_staff_bed() -> Result<()> {
        let mut room = room()?.with_quota(1);
        room.bed_mut(&first())?
            .assign(&OccupantId::new("s-1"), &OccupantIndex::new())?;
        room.bed_mut(&second())?.set_staff_reserved(true);
        let holdings = OccupantIndex::from_rooms([&room])?;

        let err = validate(&room, &second(), &Occupant::staff("t-1"), &holdings);
        assert_eq!(err, Err(at_quota()));
        Ok(())
    }

    #[test]
    fn test_staff_bed_checked_before_availability() -> Result<()> {
        let mut room = room()?;
        room.bed_mut(&first())?
            .assign(&OccupantId::new("t-1"), &OccupantIndex::new())?;
        room.bed_mut(&first())?.set_staff_reserved(true);
        let holdings = OccupantIndex::from_rooms([&room])?;

        let err = validate(&room, &first(), &Occupant::student("s-1"), &holdings);
        assert_eq!(err, Err(Error::BedReservedForStaff(first())));
        Ok(())
    }

    #[test]
    fn test_availability_checked_before_quota() -> Result<()> {
        let mut room = room()?.with_quota(1);
        room.bed_mut(&first())?
            .assign(&OccupantId::new("s-1"), &OccupantIndex::new())?;
        let holdings = OccupantIndex::from_rooms([&room])?;

        let err = validate(&room, &first(), &Occupant::student("s-2"), &holdings);
        assert_eq!(err, Err(Error::BedUnavailable(first())));
        Ok(())
    }

    #[test]
    fn test_quota_checked_before_other_holdings() -> Result<()> {
        let mut room = room()?.with_quota(1);
        room.bed_mut(&first())?
            .assign(&OccupantId::new("s-1"), &OccupantIndex::new())?;
        let mut holdings = OccupantIndex::from_rooms([&room])?;
        holdings.insert(
            OccupantId::new("s-2"),
            BedLocation {
                room: RoomId::new("r-7"),
                bed: BedId::new("r-7-1"),
            },
        );

        let err = validate(&room, &second(), &Occupant::student("s-2"), &holdings);
        assert_eq!(err, Err(at_quota()));
        Ok(())
    }
}
