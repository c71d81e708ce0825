use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use dorm_core::{Occupant, OccupantKind};
use tracing::debug;

use super::required;
use crate::{
    commands::{
        placement::{self, Placement, PlacementOptions},
        staff::{self, StaffOptions},
    },
    config::Config,
    outbox::Outbox,
    output, snapshot,
};

pub async fn handle(verb: &str, matches: &ArgMatches, config: &Config) -> Result<()> {
    let snapshot_path = Path::new(&config.snapshot_path);
    let mut campus = snapshot::load(snapshot_path).await?;

    let placement = match verb {
        "release" => Placement::Release,
        _ => {
            let kind: OccupantKind = required(matches, "kind")?.parse()?;
            let occupant = Occupant::new(required(matches, "occupant")?, kind);
            match verb {
                "check" => Placement::Check(occupant),
                "assign" => Placement::Assign(occupant),
                "hold" => Placement::Hold(occupant),
                other => anyhow::bail!("Unknown placement '{other}'"),
            }
        }
    };
    let options = PlacementOptions {
        room: required(matches, "room")?.into(),
        bed: required(matches, "bed")?.into(),
        placement,
    };

    let report = placement::run(&options, &mut campus)?;

    if let Some(intent) = &report.intent {
        snapshot::save(snapshot_path, &campus).await?;
        let outbox = Outbox::connect(&config.outbox_path).await?;
        let id = outbox.record(intent).await?;
        debug!(id, action = %intent.action, "Intent recorded");
    }

    output::emit(&report, config.json_output)?;
    Ok(())
}

pub async fn handle_staff(matches: &ArgMatches, config: &Config) -> Result<()> {
    let snapshot_path = Path::new(&config.snapshot_path);
    let mut campus = snapshot::load(snapshot_path).await?;

    let options = StaffOptions {
        room: required(matches, "room")?.into(),
        bed: required(matches, "bed")?.into(),
        reserved: !matches.get_flag("off"),
    };
    let report = staff::run(&options, &mut campus)?;
    snapshot::save(snapshot_path, &campus).await?;

    output::emit(&report, config.json_output)?;
    Ok(())
}
