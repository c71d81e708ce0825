//! In-memory snapshot of every dormitory, room and bed for one session
//!
//! `Campus` is the mutation entry point: each change is validated first, then
//! applied through the bed lifecycle, then mirrored into the occupant index.
//! The returned [`Intent`] is what the backend must apply to match.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::dormitory::Dormitory;
use crate::error::{Error, Result};
use crate::ids::{BedId, DormitoryId, RoomId, RoomTypeId};
use crate::intent::{Intent, IntentAction};
use crate::occupant::{BedLocation, Occupant, OccupantIndex};
use crate::records::{DormitoryRecord, SnapshotRecord};
use crate::room::Room;
use crate::room_type::RoomType;
use crate::validator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Campus {
    room_types: Vec<RoomType>,
    dormitories: Vec<Dormitory>,
    holdings: OccupantIndex,
}

impl Campus {
    /// Build a snapshot and its occupant index.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` when dormitory, room or bed ids repeat,
    /// and `Error::OccupantConflict` when an occupant holds two beds.
    pub fn new(room_types: Vec<RoomType>, dormitories: Vec<Dormitory>) -> Result<Self> {
        ensure_unique("dormitory", dormitories.iter().map(|d| d.id.as_str()))?;
        ensure_unique(
            "room",
            dormitories
                .iter()
                .flat_map(Dormitory::rooms)
                .map(|r| r.id.as_str()),
        )?;
        ensure_unique(
            "bed",
            dormitories
                .iter()
                .flat_map(Dormitory::rooms)
                .flat_map(Room::beds)
                .map(|b| b.id().as_str()),
        )?;

        let holdings = OccupantIndex::from_rooms(dormitories.iter().flat_map(Dormitory::rooms))?;
        Ok(Self {
            room_types,
            dormitories,
            holdings,
        })
    }

    /// # Errors
    ///
    /// Returns the first invalid record, see [`Campus::new`].
    pub fn from_record(record: SnapshotRecord, now: DateTime<Utc>) -> Result<Self> {
        let dormitories = record
            .dormitories
            .into_iter()
            .map(|d| d.into_dormitory(now))
            .collect::<Result<Vec<_>>>()?;
        Self::new(record.room_types, dormitories)
    }

    #[must_use]
    pub fn to_record(&self) -> SnapshotRecord {
        SnapshotRecord {
            room_types: self.room_types.clone(),
            dormitories: self.dormitories.iter().map(DormitoryRecord::from).collect(),
        }
    }

    #[must_use]
    pub fn room_types(&self) -> &[RoomType] {
        &self.room_types
    }

    #[must_use]
    pub fn room_type(&self, id: &RoomTypeId) -> Option<&RoomType> {
        self.room_types.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn dormitories(&self) -> &[Dormitory] {
        &self.dormitories
    }

    /// # Errors
    ///
    /// Returns `Error::UnknownDormitory` if no dormitory has this id.
    pub fn dormitory(&self, id: &DormitoryId) -> Result<&Dormitory> {
        self.dormitories
            .iter()
            .find(|d| &d.id == id)
            .ok_or_else(|| Error::UnknownDormitory(id.clone()))
    }

    /// # Errors
    ///
    /// Returns `Error::UnknownRoom` if no dormitory has this room.
    pub fn room(&self, id: &RoomId) -> Result<&Room> {
        self.dormitories
            .iter()
            .find_map(|d| d.room(id))
            .ok_or_else(|| Error::UnknownRoom(id.clone()))
    }

    #[must_use]
    pub const fn holdings(&self) -> &OccupantIndex {
        &self.holdings
    }

    /// Run the assignment validator without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRoom` or the validator's first failure.
    pub fn validate(&self, room: &RoomId, bed: &BedId, occupant: &Occupant) -> Result<()> {
        validator::validate(self.room(room)?, bed, occupant, &self.holdings)
    }

    /// Validate, then check the occupant into the bed.
    ///
    /// # Errors
    ///
    /// Returns validator failures, or a lifecycle error if the bed cannot move
    /// to `occupied`.
    pub fn assign_at(
        &mut self,
        room: &RoomId,
        bed: &BedId,
        occupant: &Occupant,
        now: DateTime<Utc>,
    ) -> Result<Intent> {
        self.validate(room, bed, occupant)?;
        room_mut(&mut self.dormitories, room)?
            .bed_mut(bed)?
            .assign_at(&occupant.id, &self.holdings, now)?;
        Ok(self.record_holding(IntentAction::Assign, room, bed, occupant))
    }

    /// # Errors
    ///
    /// See [`Campus::assign_at`].
    pub fn assign(&mut self, room: &RoomId, bed: &BedId, occupant: &Occupant) -> Result<Intent> {
        self.assign_at(room, bed, occupant, Utc::now())
    }

    /// Validate, then hold the bed for a pending occupant.
    ///
    /// # Errors
    ///
    /// Returns validator failures, or `Error::InvalidTransition` if the bed is
    /// not available.
    pub fn hold_at(
        &mut self,
        room: &RoomId,
        bed: &BedId,
        occupant: &Occupant,
        now: DateTime<Utc>,
    ) -> Result<Intent> {
        self.validate(room, bed, occupant)?;
        room_mut(&mut self.dormitories, room)?
            .bed_mut(bed)?
            .hold_at(&occupant.id, &self.holdings, now)?;
        Ok(self.record_holding(IntentAction::Hold, room, bed, occupant))
    }

    /// # Errors
    ///
    /// See [`Campus::hold_at`].
    pub fn hold(&mut self, room: &RoomId, bed: &BedId, occupant: &Occupant) -> Result<Intent> {
        self.hold_at(room, bed, occupant, Utc::now())
    }

    /// Free a reserved or occupied bed.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRoom`, `Error::BedNotInRoom`, or
    /// `Error::InvalidTransition` if the bed is already available.
    pub fn release_at(&mut self, room: &RoomId, bed: &BedId, now: DateTime<Utc>) -> Result<Intent> {
        let target = room_mut(&mut self.dormitories, room)?.bed_mut(bed)?;
        let previous = target.occupant().cloned();
        target.release_at(now)?;

        if let Some(occupant) = &previous {
            self.holdings.remove(occupant);
        }
        Ok(Intent::new(
            IntentAction::Release,
            room.clone(),
            bed.clone(),
            previous,
        ))
    }

    /// # Errors
    ///
    /// See [`Campus::release_at`].
    pub fn release(&mut self, room: &RoomId, bed: &BedId) -> Result<Intent> {
        self.release_at(room, bed, Utc::now())
    }

    /// Set or clear the staff set-aside on a bed.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownRoom` or `Error::BedNotInRoom`.
    pub fn set_staff_reserved(&mut self, room: &RoomId, bed: &BedId, flag: bool) -> Result<()> {
        room_mut(&mut self.dormitories, room)?
            .bed_mut(bed)?
            .set_staff_reserved(flag);
        Ok(())
    }

    fn record_holding(
        &mut self,
        action: IntentAction,
        room: &RoomId,
        bed: &BedId,
        occupant: &Occupant,
    ) -> Intent {
        self.holdings.insert(
            occupant.id.clone(),
            BedLocation {
                room: room.clone(),
                bed: bed.clone(),
            },
        );
        Intent::new(action, room.clone(), bed.clone(), Some(occupant.id.clone()))
    }
}

fn room_mut<'a>(dormitories: &'a mut [Dormitory], room: &RoomId) -> Result<&'a mut Room> {
    dormitories
        .iter_mut()
        .find_map(|d| d.room_mut(room))
        .ok_or_else(|| Error::UnknownRoom(room.clone()))
}

fn ensure_unique<'a>(what: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::InvalidRecord(format!("duplicate {what} id: {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bed::BedStatus;
    use crate::ids::OccupantId;

    fn campus() -> Result<Campus> {
        let standard = RoomType::new("standard", "Standard", 2);
        let now = Utc::now();
        let mut dorm = Dormitory::new("d-1", "North Hall");
        for (id, number) in [("r-1", "101"), ("r-2", "102")] {
            dorm.add_room(
                Room::new(id, number, dorm.id.clone(), standard.id.clone()).furnish(&standard, now)?,
            )?;
        }
        Campus::new(vec![standard], vec![dorm])
    }

    #[test]
    fn test_assign_updates_bed_and_index() -> Result<()> {
        let mut campus = campus()?;
        let student = Occupant::student("s-1");
        let intent = campus.assign(&"r-1".into(), &"r-1-1".into(), &student)?;

        assert_eq!(intent.action, IntentAction::Assign);
        assert_eq!(intent.occupant_id, Some(OccupantId::new("s-1")));
        assert_eq!(
            campus.holdings().location_of(&student.id).map(|l| l.bed.clone()),
            Some(BedId::new("r-1-1"))
        );
        assert_eq!(campus.dormitory(&"d-1".into())?.registered(), 1);
        Ok(())
    }

    #[test]
    fn test_second_bed_for_same_occupant_rejected() -> Result<()> {
        let mut campus = campus()?;
        let student = Occupant::student("s-1");
        campus.assign(&"r-1".into(), &"r-1-1".into(), &student)?;

        let err = campus.assign(&"r-2".into(), &"r-2-1".into(), &student);
        assert!(matches!(err, Err(Error::OccupantAlreadyAssigned { .. })));
        Ok(())
    }

    #[test]
    fn test_release_frees_index_entry() -> Result<()> {
        let mut campus = campus()?;
        let student = Occupant::student("s-1");
        campus.hold(&"r-1".into(), &"r-1-2".into(), &student)?;
        let intent = campus.release(&"r-1".into(), &"r-1-2".into())?;

        assert_eq!(intent.occupant_id, Some(student.id.clone()));
        assert!(campus.holdings().is_empty());
        assert_eq!(
            campus.room(&"r-1".into())?.bed(&"r-1-2".into()).map(|b| b.status()),
            Some(BedStatus::Available)
        );
        Ok(())
    }

    #[test]
    fn test_hold_then_assign_same_occupant() -> Result<()> {
        let mut campus = campus()?;
        let student = Occupant::student("s-1");
        campus.hold(&"r-1".into(), &"r-1-1".into(), &student)?;
        campus.assign(&"r-1".into(), &"r-1-1".into(), &student)?;
        assert_eq!(campus.holdings().len(), 1);
        Ok(())
    }

    #[test]
    fn test_unknown_room() -> Result<()> {
        let campus = campus()?;
        assert_eq!(
            campus.validate(&"r-9".into(), &"r-9-1".into(), &Occupant::student("s-1")),
            Err(Error::UnknownRoom("r-9".into()))
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_bed_ids_rejected() -> Result<()> {
        let standard = RoomType::new("standard", "Standard", 1);
        let now = Utc::now();
        let mut north = Dormitory::new("d-1", "North");
        north.add_room(Room::new("r-1", "1", north.id.clone(), standard.id.clone()).furnish(&standard, now)?)?;
        let mut south = Dormitory::new("d-2", "South");
        south.add_room(Room::new("r-1", "1", south.id.clone(), standard.id.clone()).furnish(&standard, now)?)?;

        assert!(matches!(
            Campus::new(vec![standard], vec![north, south]),
            Err(Error::InvalidRecord(_))
        ));
        Ok(())
    }

    #[test]
    fn test_record_round_trip_preserves_state() -> Result<()> {
        let mut campus = campus()?;
        campus.assign(&"r-1".into(), &"r-1-1".into(), &Occupant::student("s-1"))?;
        campus.set_staff_reserved(&"r-2".into(), &"r-2-2".into(), true)?;

        let restored = Campus::from_record(campus.to_record(), Utc::now())?;
        assert_eq!(restored, campus);
        Ok(())
    }
}
