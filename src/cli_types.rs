use clap::{Args, Subcommand};

/// Options shared by every command that runs perltidy
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Files or directories to process (use '-' for stdin)
    #[arg(required = false)]
    pub paths: Vec<String>,

    /// Output format for issues
    #[arg(long, short = 'o', value_parser = ["text", "full", "concise", "json", "github"], default_value = "text")]
    pub output_format: String,

    /// Filename to use for stdin input (for error messages and language detection)
    #[arg(long, help = "Filename to use when reading from stdin (e.g., script.pl)")]
    pub stdin_filename: Option<String>,

    /// Print issues, but nothing else
    #[arg(short, long, help = "Print issues, but nothing else")]
    pub quiet: bool,

    /// Output issues to stderr instead of stdout
    #[arg(long, help = "Output issues to stderr instead of stdout")]
    pub stderr: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Format only this byte range of a single input, as START..END
    #[arg(long, value_parser = parse_selection)]
    pub selection: Option<std::ops::Range<usize>>,

    /// Exit with code 1 if any file would be reformatted, without writing
    #[arg(long, help = "Exit with code 1 if any formatting changes would be made (for CI)")]
    pub check: bool,

    /// Show a diff of the changes instead of writing files
    #[arg(long, help = "Show diff of what would be changed instead of writing files")]
    pub diff: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum SchemaAction {
    /// Print the JSON schema to stdout
    Print,
    /// Write the schema to tidybridge.schema.json
    Generate,
    /// Check that tidybridge.schema.json is up to date
    Check,
}

/// Parse `START..END` into a byte range.
pub fn parse_selection(value: &str) -> Result<std::ops::Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got '{value}'"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid selection start '{start}': {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("invalid selection end '{end}': {e}"))?;
    if start > end {
        return Err(format!("selection start {start} is after end {end}"));
    }
    Ok(start..end)
}
