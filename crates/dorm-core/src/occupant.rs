//! Occupants and the system-wide occupant index

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BedId, OccupantId, RoomId};
use crate::room::Room;

/// What kind of person holds or wants a bed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccupantKind {
    #[default]
    Student,
    Guest,
    Staff,
}

impl std::fmt::Display for OccupantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Guest => write!(f, "guest"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

impl std::str::FromStr for OccupantKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "guest" => Ok(Self::Guest),
            "staff" => Ok(Self::Staff),
            _ => Err(Error::InvalidRecord(format!(
                "unknown occupant kind '{s}', expected student, guest or staff"
            ))),
        }
    }
}

/// A person being placed in a bed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub id: OccupantId,
    pub kind: OccupantKind,
}

impl Occupant {
    #[must_use]
    pub fn new(id: impl Into<OccupantId>, kind: OccupantKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    #[must_use]
    pub fn student(id: impl Into<OccupantId>) -> Self {
        Self::new(id, OccupantKind::Student)
    }

    #[must_use]
    pub fn staff(id: impl Into<OccupantId>) -> Self {
        Self::new(id, OccupantKind::Staff)
    }

    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self.kind, OccupantKind::Staff)
    }
}

/// Where a bed lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedLocation {
    pub room: RoomId,
    pub bed: BedId,
}

/// Which bed each occupant holds (reserved or occupied).
///
/// Only sees the snapshot it was built from; the backend enforces
/// one-occupant-one-bed globally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupantIndex {
    holders: BTreeMap<OccupantId, BedLocation>,
}

impl OccupantIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every held bed in `rooms`.
    ///
    /// # Errors
    ///
    /// Returns `Error::OccupantConflict` if an occupant already holds two beds.
    pub fn from_rooms<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> Result<Self> {
        let mut index = Self::new();
        for room in rooms {
            for bed in room.beds() {
                let Some(occupant) = bed.occupant() else {
                    continue;
                };
                if let Some(existing) = index.location_of(occupant) {
                    return Err(Error::OccupantConflict {
                        occupant: occupant.clone(),
                        held: existing.bed.clone(),
                    });
                }
                index.insert(
                    occupant.clone(),
                    BedLocation {
                        room: room.id.clone(),
                        bed: bed.id().clone(),
                    },
                );
            }
        }
        Ok(index)
    }

    #[must_use]
    pub fn location_of(&self, occupant: &OccupantId) -> Option<&BedLocation> {
        self.holders.get(occupant)
    }

    /// Bed held by `occupant` other than `bed`, if any
    #[must_use]
    pub fn held_elsewhere(&self, occupant: &OccupantId, bed: &BedId) -> Option<&BedId> {
        self.location_of(occupant)
            .map(|location| &location.bed)
            .filter(|held| *held != bed)
    }

    pub fn insert(&mut self, occupant: OccupantId, location: BedLocation) -> Option<BedLocation> {
        self.holders.insert(occupant, location)
    }

    pub fn remove(&mut self, occupant: &OccupantId) -> Option<BedLocation> {
        self.holders.remove(occupant)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OccupantId, &BedLocation)> {
        self.holders.iter()
    }
}
