use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(about, long_about = None)]
pub struct RampScenarioCli {
    /// The base URL of the service to put load on
    #[clap(short, long)]
    pub connection_string: String,

    /// Load the staged shape from a TOML file instead of the scenario's built-in table.
    ///
    /// The file must contain a `[[stages]]` table where each stage has a `duration` threshold
    /// in cumulative elapsed seconds, a `users` target and a `spawn_rate`.
    #[clap(long)]
    pub shape_file: Option<PathBuf>,

    /// Print the load target at the given elapsed run time in seconds.
    ///
    /// You can specify this flag multiple times to probe several points of the timeline.
    #[clap(long)]
    pub probe: Vec<u64>,

    /// Emit the scenario as JSON for fleet tooling instead of rendering a plan table
    #[clap(long, default_value = "false")]
    pub json: bool,
}
