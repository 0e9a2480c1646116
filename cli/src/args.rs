use clap::Args;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::{InputFormat, read_input, unarmor};

/// Input and output options shared by every decode command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to the input file. If not specified, reads from stdin
    pub(crate) file: Option<String>,

    /// Input encoding
    #[arg(long = "input", value_enum, default_value = "auto")]
    pub(crate) input: InputFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub(crate) output: OutputFormat,

    /// Single-line JSON
    #[arg(long)]
    pub(crate) compact: bool,
}

impl CommonArgs {
    /// Input bytes with any PEM armor removed.
    pub(crate) fn read(&self) -> Result<Vec<u8>> {
        let input = read_input(self.file.as_deref())?;
        unarmor(input, self.input)
    }
}
