//! Write intents sent to the backend, which applies them transactionally

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::{BedId, OccupantId, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    Assign,
    Hold,
    Release,
}

impl std::fmt::Display for IntentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assign => write!(f, "assign"),
            Self::Hold => write!(f, "hold"),
            Self::Release => write!(f, "release"),
        }
    }
}

impl std::str::FromStr for IntentAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "assign" => Ok(Self::Assign),
            "hold" => Ok(Self::Hold),
            "release" => Ok(Self::Release),
            _ => Err(Error::InvalidRecord(format!("unknown intent action: {s}"))),
        }
    }
}

/// `{room_id, bed_id, occupant_id}` plus the action to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: IntentAction,
    pub room_id: RoomId,
    pub bed_id: BedId,
    pub occupant_id: Option<OccupantId>,
}

impl Intent {
    #[must_use]
    pub const fn new(
        action: IntentAction,
        room_id: RoomId,
        bed_id: BedId,
        occupant_id: Option<OccupantId>,
    ) -> Self {
        Self {
            action,
            room_id,
            bed_id,
            occupant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_wire_format() -> std::result::Result<(), serde_json::Error> {
        let intent = Intent::new(
            IntentAction::Assign,
            RoomId::new("r-1"),
            BedId::new("b-1"),
            Some(OccupantId::new("s-1")),
        );
        let json = serde_json::to_value(&intent)?;
        assert_eq!(
            json,
            serde_json::json!({
                "action": "assign",
                "room_id": "r-1",
                "bed_id": "b-1",
                "occupant_id": "s-1"
            })
        );
        Ok(())
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("hold".parse::<IntentAction>(), Ok(IntentAction::Hold));
        assert!("evict".parse::<IntentAction>().is_err());
    }
}
