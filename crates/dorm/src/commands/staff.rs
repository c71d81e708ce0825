//! Staff set-aside on individual beds

use std::fmt;

use dorm_core::{BedId, Campus, RoomId};
use serde::Serialize;
use tracing::info;

use crate::Result;

#[derive(Debug, Clone)]
pub struct StaffOptions {
    pub room: RoomId,
    pub bed: BedId,
    pub reserved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffReport {
    pub room: RoomId,
    pub bed: BedId,
    pub reserved_for_staff: bool,
}

/// Set or clear the staff flag. Occupancy and history are untouched.
///
/// # Errors
///
/// Returns error if the room or bed does not exist.
pub fn run(options: &StaffOptions, campus: &mut Campus) -> Result<StaffReport> {
    campus.set_staff_reserved(&options.room, &options.bed, options.reserved)?;
    info!(room = %options.room, bed = %options.bed, reserved = options.reserved, "staff flag set");

    Ok(StaffReport {
        room: options.room.clone(),
        bed: options.bed.clone(),
        reserved_for_staff: options.reserved,
    })
}

impl fmt::Display for StaffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.reserved_for_staff {
            "reserved for staff"
        } else {
            "open to students"
        };
        write!(f, "✓ Bed {} in room {} is {state}", self.bed, self.room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn test_toggle_staff_flag() -> anyhow::Result<()> {
        let mut campus = fixtures::campus()?;
        let mut options = StaffOptions {
            room: "r-102".into(),
            bed: "r-102-1".into(),
            reserved: true,
        };
        run(&options, &mut campus)?;
        assert_eq!(campus.room(&"r-102".into())?.free_beds(), 0);

        options.reserved = false;
        let report = run(&options, &mut campus)?;
        assert_eq!(campus.room(&"r-102".into())?.free_beds(), 1);
        assert!(report.to_string().contains("open to students"));
        Ok(())
    }

    #[test]
    fn test_unknown_bed() -> anyhow::Result<()> {
        let mut campus = fixtures::campus()?;
        let options = StaffOptions {
            room: "r-102".into(),
            bed: "r-101-1".into(),
            reserved: true,
        };
        assert!(run(&options, &mut campus).is_err());
        Ok(())
    }
}
