use std::path::PathBuf;

use clap::Parser;

use crate::conf::{ParseMode, ParserConfig};

#[derive(Parser, Debug)]
#[command(name = "mongolog", version)]
#[command(about = "Convert MongoDB log lines and shell values to extended JSON")]
pub struct Cli {
    /// Input file (stdin when omitted or `-`)
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted or `-`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Grammar to apply: auto, log-line or document
    #[arg(short, long)]
    pub mode: Option<ParseMode>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print each record
    #[arg(long)]
    pub pretty: bool,

    /// Stop at the first line that fails to parse
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Command line values win over file and environment settings.
    pub fn apply(&self, config: &mut ParserConfig) {
        if let Some(input) = &self.input {
            config.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.pretty {
            config.pretty = true;
        }
        if self.fail_fast {
            config.skip_failures = false;
        }
    }
}
