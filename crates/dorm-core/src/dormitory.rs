//! Dormitory aggregator
//!
//! Dormitory figures are sums over the live rooms. The stored `capacity` is
//! the declared nominal value only and never feeds the computed figures.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{DormitoryId, RoomId};
use crate::room::Room;

/// Gender restriction of a dormitory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Mixed,
    Male,
    Female,
}

/// Dormitory-level figures for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DormitoryFigures {
    pub registered: usize,
    pub free_beds: usize,
    pub rooms_count: usize,
    pub total_capacity: usize,
    pub declared_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dormitory {
    pub id: DormitoryId,
    pub name: String,
    /// Declared nominal capacity
    pub capacity: usize,
    pub gender: Gender,
    pub admin: Option<String>,
    rooms: Vec<Room>,
}

impl Dormitory {
    #[must_use]
    pub fn new(id: impl Into<DormitoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity: 0,
            gender: Gender::default(),
            admin: None,
            rooms: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    #[must_use]
    pub fn with_admin(mut self, admin: impl Into<String>) -> Self {
        self.admin = Some(admin.into());
        self
    }

    /// Add a room, binding it to this dormitory.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` if the room id is already used here.
    pub fn add_room(&mut self, mut room: Room) -> Result<()> {
        if self.room(&room.id).is_some() {
            return Err(Error::InvalidRecord(format!(
                "dormitory {} already has room {}",
                self.id, room.id
            )));
        }
        room.dormitory = self.id.clone();
        self.rooms.push(room);
        Ok(())
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn room(&self, room: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| &r.id == room)
    }

    pub(crate) fn room_mut(&mut self, room: &RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| &r.id == room)
    }

    #[must_use]
    pub fn total_capacity(&self) -> usize {
        self.rooms.iter().map(Room::capacity).sum()
    }

    #[must_use]
    pub fn free_beds(&self) -> usize {
        self.rooms.iter().map(Room::free_beds).sum()
    }

    #[must_use]
    pub fn registered(&self) -> usize {
        self.rooms.iter().map(Room::registered_count).sum()
    }

    #[must_use]
    pub fn rooms_count(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn figures(&self) -> DormitoryFigures {
        DormitoryFigures {
            registered: self.registered(),
            free_beds: self.free_beds(),
            rooms_count: self.rooms_count(),
            total_capacity: self.total_capacity(),
            declared_capacity: self.capacity,
        }
    }
}
