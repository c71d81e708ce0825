//! Assignable bed listing for bed-selection controls

use std::fmt;

use dorm_core::{BedId, BedNumber, Campus, RoomId};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone)]
pub struct BedsOptions {
    pub room: RoomId,
    /// List as staff sees it, including staff-reserved beds
    pub staff: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BedChoice {
    pub id: BedId,
    pub number: BedNumber,
    pub reserved_for_staff: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BedsReport {
    pub room: RoomId,
    pub beds: Vec<BedChoice>,
}

/// List assignable beds in ascending bed-number order.
///
/// # Errors
///
/// Returns error if the room does not exist.
pub fn run(options: &BedsOptions, campus: &Campus) -> Result<BedsReport> {
    let room = campus.room(&options.room)?;
    let beds = if options.staff {
        room.assignable_beds_including_staff()
    } else {
        room.assignable_beds()
    };

    Ok(BedsReport {
        room: room.id.clone(),
        beds: beds
            .into_iter()
            .map(|bed| BedChoice {
                id: bed.id().clone(),
                number: bed.number().clone(),
                reserved_for_staff: bed.reserved_for_staff(),
            })
            .collect(),
    })
}

impl fmt::Display for BedsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.beds.is_empty() {
            return write!(f, "No assignable beds in room {}", self.room);
        }
        write!(f, "Assignable beds in room {} ({}):", self.room, self.beds.len())?;
        for bed in &self.beds {
            let staff = if bed.reserved_for_staff { " (staff)" } else { "" };
            write!(f, "\n  {} [{}]{staff}", bed.number, bed.id)?;
        }
        Ok(())
    }
}
