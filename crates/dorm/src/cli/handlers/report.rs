use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;

use super::required;
use crate::{
    commands::{beds, figures},
    config::Config,
    output, snapshot,
};

pub async fn handle_figures(matches: &ArgMatches, config: &Config) -> Result<()> {
    let campus = snapshot::load(Path::new(&config.snapshot_path)).await?;
    let options = figures::FiguresOptions {
        dormitory: matches
            .get_one::<String>("dormitory")
            .map(|id| id.as_str().into()),
        rooms: matches.get_flag("rooms"),
    };
    let report = figures::run(&options, &campus)?;
    output::emit(&report, config.json_output)?;
    Ok(())
}

pub async fn handle_beds(matches: &ArgMatches, config: &Config) -> Result<()> {
    let campus = snapshot::load(Path::new(&config.snapshot_path)).await?;
    let options = beds::BedsOptions {
        room: required(matches, "room")?.into(),
        staff: matches.get_flag("staff"),
    };
    let report = beds::run(&options, &campus)?;
    output::emit(&report, config.json_output)?;
    Ok(())
}
