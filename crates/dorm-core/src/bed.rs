//! Bed lifecycle
//!
//! A bed moves between `available`, `reserved` (held for a pending occupant)
//! and `occupied`. Every transition closes the open history entry and opens a
//! new one, so the history always has exactly one open entry and it is the
//! last one. The staff flag is orthogonal and never touches history.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BedId, OccupantId, RoomId};
use crate::occupant::OccupantIndex;

/// Bed number as shown on the door, unique within a room.
///
/// Numeric labels order numerically ("2" < "10"); other labels order
/// lexicographically after all numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BedNumber(String);

impl BedNumber {
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }
}

impl Ord for BedNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for BedNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for BedNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BedNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

/// Occupancy status as exchanged with the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedStatus {
    Available,
    Reserved,
    Occupied,
}

impl std::fmt::Display for BedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Reserved => write!(f, "reserved"),
            Self::Occupied => write!(f, "occupied"),
        }
    }
}

/// Bed state with the occupant carried by the variants that have one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BedState {
    Available,
    Reserved { occupant: OccupantId },
    Occupied { occupant: OccupantId },
}

impl BedState {
    #[must_use]
    pub const fn status(&self) -> BedStatus {
        match self {
            Self::Available => BedStatus::Available,
            Self::Reserved { .. } => BedStatus::Reserved,
            Self::Occupied { .. } => BedStatus::Occupied,
        }
    }

    #[must_use]
    pub const fn occupant(&self) -> Option<&OccupantId> {
        match self {
            Self::Available => None,
            Self::Reserved { occupant } | Self::Occupied { occupant } => Some(occupant),
        }
    }

    /// Rebuild a state from its wire parts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` when the occupant does not match the status.
    pub fn from_parts(status: BedStatus, occupant: Option<OccupantId>) -> Result<Self> {
        match (status, occupant) {
            (BedStatus::Available, None) => Ok(Self::Available),
            (BedStatus::Reserved, Some(occupant)) => Ok(Self::Reserved { occupant }),
            (BedStatus::Occupied, Some(occupant)) => Ok(Self::Occupied { occupant }),
            (BedStatus::Available, Some(occupant)) => Err(Error::InvalidRecord(format!(
                "available bed cannot have occupant {occupant}"
            ))),
            (status, None) => Err(Error::InvalidRecord(format!(
                "{status} bed must have an occupant"
            ))),
        }
    }
}

/// One period in a bed's history. `to` is `None` for the current period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub occupant: Option<OccupantId>,
    pub status: BedStatus,
    pub from: DateTime<Utc>,
    pub to: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub(crate) fn open(state: &BedState, from: DateTime<Utc>) -> Self {
        Self {
            occupant: state.occupant().cloned(),
            status: state.status(),
            from,
            to: None,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.to.is_none()
    }
}

/// A single bed, owned by exactly one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bed {
    id: BedId,
    number: BedNumber,
    room: RoomId,
    state: BedState,
    reserved_for_staff: bool,
    history: Vec<HistoryEntry>,
}

impl Bed {
    /// Create an available bed with a single open history entry
    #[must_use]
    pub fn new(id: BedId, number: BedNumber, room: RoomId, now: DateTime<Utc>) -> Self {
        let state = BedState::Available;
        let history = vec![HistoryEntry::open(&state, now)];
        Self {
            id,
            number,
            room,
            state,
            reserved_for_staff: false,
            history,
        }
    }

    /// Reconstruct a bed from persisted data.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRecord` if the history is empty, out of order,
    /// does not end in the only open entry, or disagrees with `state`.
    pub fn reconstruct(
        id: BedId,
        number: BedNumber,
        room: RoomId,
        state: BedState,
        reserved_for_staff: bool,
        history: Vec<HistoryEntry>,
    ) -> Result<Self> {
        let Some((current, closed)) = history.split_last() else {
            return Err(Error::InvalidRecord(format!("bed {id} has no history")));
        };

        if !current.is_open() || closed.iter().any(HistoryEntry::is_open) {
            return Err(Error::InvalidRecord(format!(
                "bed {id} must have exactly one open history entry, and it must be the last"
            )));
        }

        if history.windows(2).any(|pair| pair[0].from > pair[1].from) {
            return Err(Error::InvalidRecord(format!(
                "bed {id} history is not ordered by start time"
            )));
        }

        if current.status != state.status() || current.occupant.as_ref() != state.occupant() {
            return Err(Error::InvalidRecord(format!(
                "bed {id} open history entry does not match its status"
            )));
        }

        Ok(Self {
            id,
            number,
            room,
            state,
            reserved_for_staff,
            history,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &BedId {
        &self.id
    }

    #[must_use]
    pub const fn number(&self) -> &BedNumber {
        &self.number
    }

    #[must_use]
    pub const fn room(&self) -> &RoomId {
        &self.room
    }

    #[must_use]
    pub const fn state(&self) -> &BedState {
        &self.state
    }

    #[must_use]
    pub const fn status(&self) -> BedStatus {
        self.state.status()
    }

    #[must_use]
    pub const fn occupant(&self) -> Option<&OccupantId> {
        self.state.occupant()
    }

    #[must_use]
    pub const fn reserved_for_staff(&self) -> bool {
        self.reserved_for_staff
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The single open history entry
    #[must_use]
    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.history.last().filter(|entry| entry.is_open())
    }

    /// Check the occupant in.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` if the bed is occupied or reserved
    /// for someone else, and `Error::OccupantConflict` if `holdings` shows the
    /// occupant on another bed.
    pub fn assign_at(
        &mut self,
        occupant: &OccupantId,
        holdings: &OccupantIndex,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match &self.state {
            BedState::Available => {}
            BedState::Reserved { occupant: holder } if holder == occupant => {}
            BedState::Reserved { .. } | BedState::Occupied { .. } => {
                return Err(self.invalid_transition(BedStatus::Occupied));
            }
        }
        self.ensure_not_held_elsewhere(occupant, holdings)?;

        self.transition(
            BedState::Occupied {
                occupant: occupant.clone(),
            },
            now,
        );
        Ok(())
    }

    /// [`Bed::assign_at`] using the current time.
    ///
    /// # Errors
    ///
    /// See [`Bed::assign_at`].
    pub fn assign(&mut self, occupant: &OccupantId, holdings: &OccupantIndex) -> Result<()> {
        self.assign_at(occupant, holdings, Utc::now())
    }

    /// Hold an available bed for a pending occupant.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` unless the bed is available, and
    /// `Error::OccupantConflict` if the occupant holds another bed.
    pub fn hold_at(
        &mut self,
        occupant: &OccupantId,
        holdings: &OccupantIndex,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.state != BedState::Available {
            return Err(self.invalid_transition(BedStatus::Reserved));
        }
        self.ensure_not_held_elsewhere(occupant, holdings)?;

        self.transition(
            BedState::Reserved {
                occupant: occupant.clone(),
            },
            now,
        );
        Ok(())
    }

    /// [`Bed::hold_at`] using the current time.
    ///
    /// # Errors
    ///
    /// See [`Bed::hold_at`].
    pub fn hold(&mut self, occupant: &OccupantId, holdings: &OccupantIndex) -> Result<()> {
        self.hold_at(occupant, holdings, Utc::now())
    }

    /// Free an occupied or reserved bed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` if the bed is already available.
    pub fn release_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.state == BedState::Available {
            return Err(self.invalid_transition(BedStatus::Available));
        }
        self.transition(BedState::Available, now);
        Ok(())
    }

    /// [`Bed::release_at`] using the current time.
    ///
    /// # Errors
    ///
    /// See [`Bed::release_at`].
    pub fn release(&mut self) -> Result<()> {
        self.release_at(Utc::now())
    }

    /// Set or clear the staff set-aside. Not a lifecycle transition.
    pub fn set_staff_reserved(&mut self, flag: bool) {
        self.reserved_for_staff = flag;
    }

    fn ensure_not_held_elsewhere(
        &self,
        occupant: &OccupantId,
        holdings: &OccupantIndex,
    ) -> Result<()> {
        holdings
            .held_elsewhere(occupant, &self.id)
            .map_or(Ok(()), |held| {
                Err(Error::OccupantConflict {
                    occupant: occupant.clone(),
                    held: held.clone(),
                })
            })
    }

    fn transition(&mut self, next: BedState, now: DateTime<Utc>) {
        // Clamp so a lagging clock cannot reorder history.
        let at = self.history.last().map_or(now, |current| now.max(current.from));
        if let Some(current) = self.history.last_mut() {
            current.to = Some(at);
        }
        self.history.push(HistoryEntry::open(&next, at));
        self.state = next;
    }

    fn invalid_transition(&self, to: BedStatus) -> Error {
        Error::InvalidTransition {
            bed: self.id.clone(),
            from: self.status(),
            to,
        }
    }
}
