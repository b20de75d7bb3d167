//! Argument lists passed to perltidy.

/// Used when no arguments are configured: send diagnostics to stderr so they can be
/// parsed instead of landing in a `.ERR` file.
pub const DEFAULT_ARG: &str = "-se";

/// Appended for selections so perltidy does not add a newline the selection never had.
pub const NO_TRAILING_NEWLINE_ARG: &str = "-natnl";

/// Spellings perltidy accepts for [`NO_TRAILING_NEWLINE_ARG`].
const NO_TRAILING_NEWLINE_SPELLINGS: [&str; 4] = [
    "-natnl",
    "--natnl",
    "-noadd-terminal-newline",
    "--noadd-terminal-newline",
];

/// The configured base argument list.
///
/// Never mutated after construction; every invocation gets its own copy from
/// [`ToolArguments::for_invocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolArguments {
    base: Vec<String>,
}

impl ToolArguments {
    /// Build from the user's argument string, split on whitespace.
    ///
    /// A missing or blank string falls back to [`DEFAULT_ARG`].
    pub fn from_config(configured: Option<&str>) -> Self {
        let base: Vec<String> = configured
            .map(|args| args.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        if base.is_empty() {
            return Self::default();
        }

        if !base.iter().any(|arg| arg == DEFAULT_ARG || arg == "--standard-error-output") {
            log::debug!("configured perltidy arguments do not include {DEFAULT_ARG}; diagnostics may go to a .ERR file");
        }
        Self { base }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.base
    }

    /// The arguments for one run. Selections get [`NO_TRAILING_NEWLINE_ARG`] exactly once.
    pub fn for_invocation(&self, is_selection: bool) -> Vec<String> {
        let mut args = self.base.clone();
        if is_selection
            && !args
                .iter()
                .any(|arg| NO_TRAILING_NEWLINE_SPELLINGS.contains(&arg.as_str()))
        {
            args.push(NO_TRAILING_NEWLINE_ARG.to_string());
        }
        args
    }
}

impl Default for ToolArguments {
    fn default() -> Self {
        Self {
            base: vec![DEFAULT_ARG.to_string()],
        }
    }
}
