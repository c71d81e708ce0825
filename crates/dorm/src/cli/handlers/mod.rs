mod intents;
mod placement;
mod report;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::{cli::setup, config};

pub async fn dispatch(matches: &ArgMatches) -> Result<()> {
    let config = setup::apply_flags(config::load_config().await?, matches)?;
    setup::init_tracing(&config)?;

    match matches.subcommand() {
        Some(("figures", sub_m)) => report::handle_figures(sub_m, &config).await,
        Some(("beds", sub_m)) => report::handle_beds(sub_m, &config).await,
        Some((verb @ ("check" | "assign" | "hold" | "release"), sub_m)) => {
            placement::handle(verb, sub_m, &config).await
        }
        Some(("staff-reserve", sub_m)) => placement::handle_staff(sub_m, &config).await,
        Some(("intents", _)) => intents::handle(&config).await,
        _ => anyhow::bail!("Unknown command. Run 'dorm --help' for usage."),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument --{name}"))
}
