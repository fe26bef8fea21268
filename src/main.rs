/* 3rd party libraries */
use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use log::info;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

/* Custom libraries */
use elevator_sim::config::{self, Config, RenderFormat, DEFAULT_CONFIG_PATH};
use elevator_sim::unwrap_or_exit;
use elevator_sim::Building;

fn cli() -> Command<'static> {
    Command::new("elevator_sim")
        .about("Multi-elevator building simulation")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .help("Path to the TOML configuration"),
        )
        .arg(
            Arg::new("floors")
                .long("floors")
                .takes_value(true)
                .help("Number of floors"),
        )
        .arg(
            Arg::new("elevators")
                .long("elevators")
                .takes_value(true)
                .help("Number of elevators"),
        )
        .arg(
            Arg::new("run-secs")
                .long("run-secs")
                .takes_value(true)
                .help("Stop after this many seconds, runs until killed otherwise"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Render telemetry as JSON lines"),
        )
}

// A missing default file is not an error, an explicit path is.
fn read_config(matches: &ArgMatches) -> elevator_sim::Result<Config> {
    match matches.value_of("config") {
        Some(path) => config::load_config(Path::new(path)),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            config::load_config(Path::new(DEFAULT_CONFIG_PATH))
        }
        None => Ok(Config::default()),
    }
}

fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> anyhow::Result<()> {
    if matches.is_present("floors") {
        config.building.floors = matches.value_of_t("floors").context("--floors")?;
    }
    if matches.is_present("elevators") {
        config.building.elevators = matches.value_of_t("elevators").context("--elevators")?;
    }
    if matches.is_present("json") {
        config.renderer.format = RenderFormat::Json;
    }
    config.validate()?;
    Ok(())
}

/* Main */
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();

    // Load the configuration
    let mut config = unwrap_or_exit!(read_config(&matches));
    apply_overrides(&mut config, &matches)?;
    let run_for = match matches.value_of("run-secs") {
        Some(_) => Some(Duration::from_secs(
            matches.value_of_t("run-secs").context("--run-secs")?,
        )),
        None => None,
    };

    // Build and start the simulation
    let mut building = unwrap_or_exit!(Building::from_config(&config));
    building.start(&config)?;

    match run_for {
        Some(duration) => sleep(duration),
        None => loop {
            sleep(Duration::from_secs(1));
        },
    }

    building.stop();
    building.join();
    info!(
        "simulation finished: {:?}",
        building.metrics().snapshot()
    );

    Ok(())
}
