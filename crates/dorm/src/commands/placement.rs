//! Bed placement: check, assign, hold and release
//!
//! Every placement is validated by the occupancy core before any bed changes.
//! Rejections are logged at warn and returned unchanged so callers can map
//! the error kind to a message.

use std::fmt;

use dorm_core::{BedId, Campus, Intent, Occupant, RoomId};
use serde::Serialize;
use tracing::{info, warn};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Validate only
    Check(Occupant),
    Assign(Occupant),
    Hold(Occupant),
    Release,
}

impl Placement {
    const fn verb(&self) -> &'static str {
        match self {
            Self::Check(_) => "check",
            Self::Assign(_) => "assign",
            Self::Hold(_) => "hold",
            Self::Release => "release",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacementOptions {
    pub room: RoomId,
    pub bed: BedId,
    pub placement: Placement,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacementReport {
    pub action: &'static str,
    pub room: RoomId,
    pub bed: BedId,
    /// `None` for a check; nothing was changed
    pub intent: Option<Intent>,
}

/// Run a placement against `campus`.
///
/// # Errors
///
/// Returns the occupancy error that rejected the placement.
pub fn run(options: &PlacementOptions, campus: &mut Campus) -> Result<PlacementReport> {
    let PlacementOptions { room, bed, placement } = options;

    let outcome = match placement {
        Placement::Check(occupant) => campus.validate(room, bed, occupant).map(|()| None),
        Placement::Assign(occupant) => campus.assign(room, bed, occupant).map(Some),
        Placement::Hold(occupant) => campus.hold(room, bed, occupant).map(Some),
        Placement::Release => campus.release(room, bed).map(Some),
    };

    let intent = outcome.map_err(|e| {
        warn!(
            action = placement.verb(),
            room = %room,
            bed = %bed,
            kind = e.kind(),
            "placement rejected: {e}"
        );
        e
    })?;

    if let Some(intent) = &intent {
        info!(
            action = %intent.action,
            room = %room,
            bed = %bed,
            occupant = intent.occupant_id.as_ref().map(ToString::to_string),
            "placement applied"
        );
    }

    Ok(PlacementReport {
        action: placement.verb(),
        room: room.clone(),
        bed: bed.clone(),
        intent,
    })
}

impl fmt::Display for PlacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.intent {
            None => write!(f, "✓ Bed {} in room {} can be assigned", self.bed, self.room),
            Some(intent) => {
                write!(f, "✓ {} bed {} in room {}", self.action, self.bed, self.room)?;
                if let Some(occupant) = &intent.occupant_id {
                    write!(f, "\n  Occupant: {occupant}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dorm_core::{BedStatus, IntentAction};

    use super::*;
    use crate::commands::fixtures;
    use crate::Error;

    fn options(room: &str, bed: &str, placement: Placement) -> PlacementOptions {
        PlacementOptions {
            room: room.into(),
            bed: bed.into(),
            placement,
        }
    }

    #[test]
    fn test_check_changes_nothing() -> anyhow::Result<()> {
        let mut campus = fixtures::campus()?;
        let before = campus.clone();
        let report = run(
            &options("r-101", "r-101-1", Placement::Check(Occupant::student("s-1"))),
            &mut campus,
        )?;
        assert!(report.intent.is_none());
        assert_eq!(campus, before);
        Ok(())
    }

    #[test]
    fn test_assign_then_release() -> anyhow::Result<()> {
        let mut campus = fixtures::campus()?;
        let assigned = run(
            &options("r-101", "r-101-1", Placement::Assign(Occupant::student("s-1"))),
            &mut campus,
        )?;
        assert_eq!(assigned.intent.map(|i| i.action), Some(IntentAction::Assign));

        let released = run(&options("r-101", "r-101-1", Placement::Release), &mut campus)?;
        assert_eq!(
            released.intent.and_then(|i| i.occupant_id),
            Some(dorm_core::OccupantId::new("s-1"))
        );
        let status = campus
            .room(&"r-101".into())?
            .bed(&"r-101-1".into())
            .map(dorm_core::Bed::status);
        assert_eq!(status, Some(BedStatus::Available));
        Ok(())
    }

    #[test]
    fn test_rejections_keep_their_kind() -> anyhow::Result<()> {
        let mut campus = fixtures::campus()?;
        run(
            &options("r-101", "r-101-1", Placement::Hold(Occupant::student("s-1"))),
            &mut campus,
        )?;

        let quota = run(
            &options("r-101", "r-101-2", Placement::Assign(Occupant::student("s-2"))),
            &mut campus,
        );
        assert!(matches!(
            quota,
            Err(Error::Occupancy(dorm_core::Error::RoomAtQuota { .. }))
        ));

        let maintenance = run(
            &options("r-201", "r-201-1", Placement::Check(Occupant::student("s-3"))),
            &mut campus,
        );
        assert!(matches!(
            maintenance,
            Err(Error::Occupancy(dorm_core::Error::RoomUnderMaintenance(_)))
        ));
        Ok(())
    }
}
