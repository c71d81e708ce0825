//! Capacity and occupancy figures per dormitory and room

use std::fmt;

use dorm_core::{Campus, Dormitory, DormitoryFigures, DormitoryId, Room, RoomFigures, RoomId};
use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct FiguresOptions {
    /// Only this dormitory
    pub dormitory: Option<DormitoryId>,
    /// Include per-room figures
    pub rooms: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomReport {
    pub id: RoomId,
    pub number: String,
    pub floor: i32,
    pub is_maintenance: bool,
    pub quota: Option<usize>,
    #[serde(flatten)]
    pub figures: RoomFigures,
}

#[derive(Debug, Clone, Serialize)]
pub struct DormitoryReport {
    pub id: DormitoryId,
    pub name: String,
    #[serde(flatten)]
    pub figures: DormitoryFigures,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rooms: Vec<RoomReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FiguresReport(pub Vec<DormitoryReport>);

/// Collect figures.
///
/// # Errors
///
/// Returns error if the requested dormitory does not exist.
pub fn run(options: &FiguresOptions, campus: &Campus) -> Result<FiguresReport> {
    let dormitories: Vec<&Dormitory> = match &options.dormitory {
        Some(id) => vec![campus.dormitory(id)?],
        None => campus.dormitories().iter().collect(),
    };

    Ok(FiguresReport(
        dormitories
            .into_iter()
            .map(|dormitory| report(dormitory, options.rooms))
            .collect(),
    ))
}

fn report(dormitory: &Dormitory, with_rooms: bool) -> DormitoryReport {
    let rooms = if with_rooms {
        dormitory.rooms().iter().map(room_report).collect()
    } else {
        Vec::new()
    };
    DormitoryReport {
        id: dormitory.id.clone(),
        name: dormitory.name.clone(),
        figures: dormitory.figures(),
        rooms,
    }
}

fn room_report(room: &Room) -> RoomReport {
    RoomReport {
        id: room.id.clone(),
        number: room.number.clone(),
        floor: room.floor,
        is_maintenance: room.is_maintenance,
        quota: room.quota,
        figures: room.figures(),
    }
}

impl fmt::Display for FiguresReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No dormitories");
        }
        for (i, dorm) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let figures = &dorm.figures;
            write!(
                f,
                "{} ({})\n  registered: {}  free beds: {}  rooms: {}  capacity: {} (declared {})",
                dorm.name,
                dorm.id,
                figures.registered,
                figures.free_beds,
                figures.rooms_count,
                figures.total_capacity,
                figures.declared_capacity
            )?;
            for room in &dorm.rooms {
                let flag = if room.is_maintenance { " [maintenance]" } else { "" };
                write!(
                    f,
                    "\n  room {}{flag}: {}/{} registered, {} free, {} assignable",
                    room.number,
                    room.figures.registered,
                    room.figures.capacity,
                    room.figures.free_beds,
                    room.figures.assignable
                )?;
            }
        }
        Ok(())
    }
}
