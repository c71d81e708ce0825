//! Listing of the intent outbox

use std::fmt;

use serde::Serialize;

use crate::outbox::{Outbox, RecordedIntent};
use crate::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct IntentsReport(pub Vec<RecordedIntent>);

/// # Errors
///
/// Returns error if the outbox cannot be read.
pub async fn run(outbox: &Outbox) -> Result<IntentsReport> {
    Ok(IntentsReport(outbox.list().await?))
}

impl fmt::Display for IntentsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No recorded intents");
        }
        write!(f, "Recorded intents ({}):", self.0.len())?;
        for recorded in &self.0 {
            let intent = &recorded.intent;
            write!(
                f,
                "\n  #{} {} {} room {} bed {}",
                recorded.id,
                recorded.recorded_at.to_rfc3339(),
                intent.action,
                intent.room_id,
                intent.bed_id
            )?;
            if let Some(occupant) = &intent.occupant_id {
                write!(f, " occupant {occupant}")?;
            }
        }
        Ok(())
    }
}
