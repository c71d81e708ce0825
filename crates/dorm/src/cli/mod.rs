pub mod handlers;
pub mod setup;

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("dorm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dormitory bed assignment and occupancy figures")
        .subcommand_required(true)
        .arg(
            Arg::new("snapshot")
                .long("snapshot")
                .global(true)
                .value_name("PATH")
                .help("Backend snapshot to operate on"),
        )
        .arg(
            Arg::new("outbox")
                .long("outbox")
                .global(true)
                .value_name("PATH")
                .help("SQLite file recording produced intents"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of text"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .value_name("LEVEL")
                .help("trace, debug, info, warn or error"),
        )
        .subcommand(cmd_figures())
        .subcommand(cmd_beds())
        .subcommand(placement_args(
            Command::new("check").about("Check whether a bed may be assigned"),
        ))
        .subcommand(placement_args(
            Command::new("assign").about("Assign a bed to an occupant"),
        ))
        .subcommand(placement_args(
            Command::new("hold").about("Hold a bed for a pending occupant"),
        ))
        .subcommand(cmd_release())
        .subcommand(cmd_staff_reserve())
        .subcommand(Command::new("intents").about("List recorded intents"))
}

fn room_arg() -> Arg {
    Arg::new("room")
        .long("room")
        .required(true)
        .value_name("ROOM_ID")
}

fn bed_arg() -> Arg {
    Arg::new("bed").long("bed").required(true).value_name("BED_ID")
}

fn cmd_figures() -> Command {
    Command::new("figures")
        .about("Show capacity and occupancy figures")
        .arg(
            Arg::new("dormitory")
                .long("dormitory")
                .value_name("DORMITORY_ID")
                .help("Only this dormitory"),
        )
        .arg(
            Arg::new("rooms")
                .long("rooms")
                .action(ArgAction::SetTrue)
                .help("Include per-room figures"),
        )
}

fn cmd_beds() -> Command {
    Command::new("beds")
        .about("List assignable beds in a room")
        .arg(room_arg())
        .arg(
            Arg::new("staff")
                .long("staff")
                .action(ArgAction::SetTrue)
                .help("Include staff-reserved beds"),
        )
}

fn placement_args(command: Command) -> Command {
    command
        .arg(room_arg())
        .arg(bed_arg())
        .arg(
            Arg::new("occupant")
                .long("occupant")
                .required(true)
                .value_name("OCCUPANT_ID"),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .value_parser(["student", "guest", "staff"])
                .default_value("student"),
        )
}

fn cmd_release() -> Command {
    Command::new("release")
        .about("Release a reserved or occupied bed")
        .arg(room_arg())
        .arg(bed_arg())
}

fn cmd_staff_reserve() -> Command {
    Command::new("staff-reserve")
        .about("Set aside a bed for staff")
        .arg(room_arg())
        .arg(bed_arg())
        .arg(
            Arg::new("off")
                .long("off")
                .action(ArgAction::SetTrue)
                .help("Clear the set-aside instead"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_assign_requires_occupant() {
        let result = build_cli().try_get_matches_from(["dorm", "assign", "--room", "r-1", "--bed", "b-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() -> Result<(), clap::Error> {
        let matches = build_cli().try_get_matches_from([
            "dorm", "figures", "--json", "--snapshot", "s.json",
        ])?;
        assert!(matches.get_flag("json"));
        assert_eq!(
            matches.get_one::<String>("snapshot").map(String::as_str),
            Some("s.json")
        );
        Ok(())
    }
}
