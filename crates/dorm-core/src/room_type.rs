//! Room types: the capacity templates rooms are furnished from

use serde::{Deserialize, Serialize};

use crate::ids::RoomTypeId;

/// A capacity template such as "Standard" (2 beds) or "Lux" (1 bed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: RoomTypeId,
    pub name: String,
    pub capacity: usize,
}

impl RoomType {
    #[must_use]
    pub fn new(id: impl Into<RoomTypeId>, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
        }
    }
}
