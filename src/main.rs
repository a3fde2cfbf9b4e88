use clap::Parser;

mod command;
mod demote;
mod jstat;
mod locate;
mod logger;
#[cfg(test)]
mod mocksystem;
mod process;
mod realsystem;
mod run;
mod schema;
mod systemapi;
#[cfg(test)]
mod testlog;
mod users;
mod util;

#[cfg(test)]
mod run_test;

// Deadline for pgrep and ps.  jstat runs without one.
const TIMEOUT_SECONDS: u64 = 10;

/// Java statistics monitoring client: log jstat gc, compiler and class statistics for every
/// running JVM as key=value lines
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The environment in which this tool is running (e.g. prod)
    #[arg(short = 'n', long, num_args = 0..=1, default_value = "prod", default_missing_value = "prod")]
    environment: String,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    logger::init(cli.verbose);

    let system = realsystem::RealSystem::new(TIMEOUT_SECONDS);
    let opts = run::RunOptions {
        environment: cli.environment,
    };
    run::collect(&system, &opts, &mut |line| log::info!("{line}"));
}

#[test]
fn test_cli() {
    let cli = Cli::parse_from(["jstatmon"]);
    assert_eq!(cli.environment, "prod");
    assert!(!cli.verbose);
    let cli = Cli::parse_from(["jstatmon", "-n", "qa", "-v"]);
    assert_eq!(cli.environment, "qa");
    assert!(cli.verbose);
    let cli = Cli::parse_from(["jstatmon", "--environment"]);
    assert_eq!(cli.environment, "prod");
}
