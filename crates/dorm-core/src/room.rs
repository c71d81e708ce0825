//! Room aggregator
//!
//! A room owns its beds. All figures are recomputed from bed state on every
//! call; nothing is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bed::{Bed, BedNumber, BedState, BedStatus};
use crate::error::{Error, Result};
use crate::ids::{BedId, DormitoryId, RoomId, RoomTypeId};
use crate::occupant::Occupant;
use crate::room_type::RoomType;

/// Who the room is let to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupantType {
    #[default]
    Student,
    Guest,
}

/// Per-room figures for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFigures {
    pub capacity: usize,
    pub free_beds: usize,
    pub registered: usize,
    pub staff_reserved: usize,
    pub assignable: usize,
    /// Further beds the quota admits, absent when the room has no quota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_remaining: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    pub floor: i32,
    pub notes: Option<String>,
    pub is_maintenance: bool,
    pub occupant_type: OccupantType,
    /// Cap on assignable beds, independent of the physical bed count
    pub quota: Option<usize>,
    pub room_type: RoomTypeId,
    pub dormitory: DormitoryId,
    beds: Vec<Bed>,
}

impl Room {
    /// Create an empty room
    #[must_use]
    pub fn new(
        id: impl Into<RoomId>,
        number: impl Into<String>,
        dormitory: DormitoryId,
        room_type: RoomTypeId,
    ) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            floor: 0,
            notes: None,
            is_maintenance: false,
            occupant_type: OccupantType::default(),
            quota: None,
            room_type,
            dormitory,
            beds: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_floor(mut self, floor: i32) -> Self {
        self.floor = floor;
        self
    }

    #[must_use]
    pub const fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    #[must_use]
    pub const fn with_maintenance(mut self, is_maintenance: bool) -> Self {
        self.is_maintenance = is_maintenance;
        self
    }

    #[must_use]
    pub const fn with_occupant_type(mut self, occupant_type: OccupantType) -> Self {
        self.occupant_type = occupant_type;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Add one bed per place in `room_type`, numbered from "1".
    ///
    /// Bed ids are `<room id>-<number>`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateBed` if the room already has one of the
    /// generated ids or numbers.
    pub fn furnish(mut self, room_type: &RoomType, now: DateTime<Utc>) -> Result<Self> {
        self.room_type = room_type.id.clone();
        for place in 1..=room_type.capacity {
            let id = BedId::new(format!("{}-{place}", self.id));
            self.add_bed(id, BedNumber::new(place.to_string()), now)?;
        }
        Ok(self)
    }

    /// Add a new available bed.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateBed` if the id or number is already used here.
    pub fn add_bed(&mut self, id: BedId, number: BedNumber, now: DateTime<Utc>) -> Result<()> {
        let bed = Bed::new(id, number, self.id.clone(), now);
        self.adopt(bed)
    }

    /// Take ownership of an existing bed.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateBed` on a repeated id or number, and
    /// `Error::InvalidRecord` if the bed names a different room.
    pub fn adopt(&mut self, bed: Bed) -> Result<()> {
        if bed.room() != &self.id {
            return Err(Error::InvalidRecord(format!(
                "bed {} belongs to room {}, not {}",
                bed.id(),
                bed.room(),
                self.id
            )));
        }
        if let Some(existing) = self
            .beds
            .iter()
            .find(|b| b.id() == bed.id() || b.number() == bed.number())
        {
            return Err(Error::DuplicateBed {
                room: self.id.clone(),
                bed: existing.number().to_string(),
            });
        }
        self.beds.push(bed);
        Ok(())
    }

    /// Remove a bed that nobody holds.
    ///
    /// # Errors
    ///
    /// Returns `Error::BedNotInRoom` for an unknown bed and
    /// `Error::BedUnavailable` if it is reserved or occupied.
    pub fn remove_bed(&mut self, bed: &BedId) -> Result<Bed> {
        let position = self
            .beds
            .iter()
            .position(|b| b.id() == bed)
            .ok_or_else(|| self.not_in_room(bed))?;
        if self.beds[position].status() != BedStatus::Available {
            return Err(Error::BedUnavailable(bed.clone()));
        }
        Ok(self.beds.remove(position))
    }

    #[must_use]
    pub fn beds(&self) -> &[Bed] {
        &self.beds
    }

    #[must_use]
    pub fn bed(&self, bed: &BedId) -> Option<&Bed> {
        self.beds.iter().find(|b| b.id() == bed)
    }

    pub(crate) fn bed_mut(&mut self, bed: &BedId) -> Result<&mut Bed> {
        let missing = self.not_in_room(bed);
        self.beds.iter_mut().find(|b| b.id() == bed).ok_or(missing)
    }

    #[must_use]
    pub fn contains(&self, bed: &BedId) -> bool {
        self.bed(bed).is_some()
    }

    /// Physical bed count
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.beds.len()
    }

    /// Available beds not set aside for staff. Quota does not apply.
    #[must_use]
    pub fn free_beds(&self) -> usize {
        self.student_beds()
            .filter(|b| b.status() == BedStatus::Available)
            .count()
    }

    /// Occupied beds not set aside for staff
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.student_beds()
            .filter(|b| b.status() == BedStatus::Occupied)
            .count()
    }

    /// Reserved or occupied beds not set aside for staff; what counts against quota
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.student_beds()
            .filter(|b| b.status() != BedStatus::Available)
            .count()
    }

    #[must_use]
    pub fn staff_reserved_count(&self) -> usize {
        self.beds.iter().filter(|b| b.reserved_for_staff()).count()
    }

    /// Beds a student may be given, by ascending bed number, cut to the quota.
    ///
    /// The cut is the first `quota` available beds; beds already held are not
    /// subtracted, so a room at its quota still lists beds that placement
    /// rejects with `RoomAtQuota`. See [`Room::quota_remaining`].
    #[must_use]
    pub fn assignable_beds(&self) -> Vec<&Bed> {
        self.assignable(false)
    }

    /// Like [`Room::assignable_beds`], but staff-reserved beds are listed too
    #[must_use]
    pub fn assignable_beds_including_staff(&self) -> Vec<&Bed> {
        self.assignable(true)
    }

    /// The listing `occupant` sees: staff get staff-reserved beds as well
    #[must_use]
    pub fn assignable_beds_for(&self, occupant: &Occupant) -> Vec<&Bed> {
        self.assignable(occupant.is_staff())
    }

    /// Placements the quota still admits, or `None` without a quota
    #[must_use]
    pub fn quota_remaining(&self) -> Option<usize> {
        self.quota.map(|quota| quota.saturating_sub(self.held_count()))
    }

    #[must_use]
    pub fn figures(&self) -> RoomFigures {
        RoomFigures {
            capacity: self.capacity(),
            free_beds: self.free_beds(),
            registered: self.registered_count(),
            staff_reserved: self.staff_reserved_count(),
            assignable: self.assignable_beds().len(),
            quota_remaining: self.quota_remaining(),
        }
    }

    fn assignable(&self, include_staff_beds: bool) -> Vec<&Bed> {
        if self.is_maintenance {
            return Vec::new();
        }
        let mut beds: Vec<&Bed> = self
            .beds
            .iter()
            .filter(|b| *b.state() == BedState::Available)
            .filter(|b| include_staff_beds || !b.reserved_for_staff())
            .collect();
        beds.sort_by(|a, b| a.number().cmp(b.number()));
        if let Some(quota) = self.quota {
            beds.truncate(quota);
        }
        beds
    }

    fn student_beds(&self) -> impl Iterator<Item = &Bed> {
        self.beds.iter().filter(|b| !b.reserved_for_staff())
    }

    fn not_in_room(&self, bed: &BedId) -> Error {
        Error::BedNotInRoom {
            room: self.id.clone(),
            bed: bed.clone(),
        }
    }
}
