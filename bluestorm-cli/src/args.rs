//! CLI argument parsing

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bluestorm")]
#[command(version, about = "Bluetooth L2CAP flood stress tool", long_about = None)]
pub struct Cli {
    /// Bluetooth adapter id (the N in hciN); prompted for when omitted
    #[arg(short, long)]
    pub adapter: Option<String>,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
