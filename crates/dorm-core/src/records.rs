//! Backend records
//!
//! The JSON shapes read from and written back to the backend. Converting a
//! record into the domain checks the bed invariants, so a malformed payload
//! never reaches the lifecycle code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bed::{Bed, BedNumber, BedState, BedStatus, HistoryEntry};
use crate::dormitory::{Dormitory, Gender};
use crate::error::Result;
use crate::ids::{BedId, DormitoryId, OccupantId, RoomId, RoomTypeId};
use crate::room::{OccupantType, Room};
use crate::room_type::RoomType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedRecord {
    pub id: BedId,
    pub number: BedNumber,
    pub status: BedStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant_id: Option<OccupantId>,
    #[serde(default)]
    pub reserved_for_staff: bool,
    /// Missing history is treated as a single open entry starting at load time
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl BedRecord {
    /// Convert into a bed owned by `room`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` when status, occupant and history disagree.
    pub fn into_bed(self, room: &RoomId, now: DateTime<Utc>) -> Result<Bed> {
        let state = BedState::from_parts(self.status, self.occupant_id)?;
        let history = if self.history.is_empty() {
            vec![HistoryEntry::open(&state, now)]
        } else {
            self.history
        };
        Bed::reconstruct(
            self.id,
            self.number,
            room.clone(),
            state,
            self.reserved_for_staff,
            history,
        )
    }
}

impl From<&Bed> for BedRecord {
    fn from(bed: &Bed) -> Self {
        Self {
            id: bed.id().clone(),
            number: bed.number().clone(),
            status: bed.status(),
            occupant_id: bed.occupant().cloned(),
            reserved_for_staff: bed.reserved_for_staff(),
            history: bed.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: RoomId,
    pub number: String,
    #[serde(default)]
    pub floor: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_maintenance: bool,
    #[serde(default)]
    pub occupant_type: OccupantType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<usize>,
    pub room_type_id: RoomTypeId,
    #[serde(default)]
    pub beds: Vec<BedRecord>,
}

impl RoomRecord {
    /// Convert into a room of `dormitory`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` or `Error::DuplicateBed` for bad beds.
    pub fn into_room(self, dormitory: &DormitoryId, now: DateTime<Utc>) -> Result<Room> {
        let mut room = Room::new(self.id, self.number, dormitory.clone(), self.room_type_id)
            .with_floor(self.floor)
            .with_maintenance(self.is_maintenance)
            .with_occupant_type(self.occupant_type);
        room.notes = self.notes;
        room.quota = self.quota;

        for bed in self.beds {
            let bed = bed.into_bed(&room.id, now)?;
            room.adopt(bed)?;
        }
        Ok(room)
    }
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            number: room.number.clone(),
            floor: room.floor,
            notes: room.notes.clone(),
            is_maintenance: room.is_maintenance,
            occupant_type: room.occupant_type,
            quota: room.quota,
            room_type_id: room.room_type.clone(),
            beds: room.beds().iter().map(BedRecord::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DormitoryRecord {
    pub id: DormitoryId,
    pub name: String,
    #[serde(default)]
    pub capacity: usize,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
    #[serde(default)]
    pub rooms: Vec<RoomRecord>,
}

impl DormitoryRecord {
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` or `Error::DuplicateBed` for bad rooms or beds.
    pub fn into_dormitory(self, now: DateTime<Utc>) -> Result<Dormitory> {
        let mut dormitory = Dormitory::new(self.id, self.name)
            .with_capacity(self.capacity)
            .with_gender(self.gender);
        dormitory.admin = self.admin;

        for room in self.rooms {
            let room = room.into_room(&dormitory.id, now)?;
            dormitory.add_room(room)?;
        }
        Ok(dormitory)
    }
}

impl From<&Dormitory> for DormitoryRecord {
    fn from(dormitory: &Dormitory) -> Self {
        Self {
            id: dormitory.id.clone(),
            name: dormitory.name.clone(),
            capacity: dormitory.capacity,
            gender: dormitory.gender,
            admin: dormitory.admin.clone(),
            rooms: dormitory.rooms().iter().map(RoomRecord::from).collect(),
        }
    }
}

/// Everything one request or UI session works on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub dormitories: Vec<DormitoryRecord>,
}
