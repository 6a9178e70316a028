use clap::{Args, Parser, Subcommand, ValueEnum};
use splinter_core::{NoteTemplate, Placement};
use std::path::PathBuf;
use std::str::FromStr;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Template names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateArg {
    Heading,
    HeadingWithTag,
    FrontMatterReview,
    ReviewSkeleton,
    FrontMatterReferences,
}

impl From<TemplateArg> for NoteTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Heading => NoteTemplate::Heading,
            TemplateArg::HeadingWithTag => NoteTemplate::HeadingWithTag,
            TemplateArg::FrontMatterReview => NoteTemplate::FrontMatterReview,
            TemplateArg::ReviewSkeleton => NoteTemplate::ReviewSkeleton,
            TemplateArg::FrontMatterReferences => NoteTemplate::FrontMatterReferences,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlacementArg {
    Tab,
    Split,
}

impl From<PlacementArg> for Placement {
    fn from(arg: PlacementArg) -> Self {
        match arg {
            PlacementArg::Tab => Placement::Tab,
            PlacementArg::Split => Placement::Split,
        }
    }
}

/// Inclusive, 1-indexed line range (`START:END` or a single `LINE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid line number '{part}'"))
        };

        let (start, end) = match s.split_once(':') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => {
                let line = parse(s)?;
                (line, line)
            }
        };

        if start == 0 {
            return Err("line numbers start at 1".to_string());
        }
        if end < start {
            return Err(format!("end line {end} is before start line {start}"));
        }
        Ok(Self { start, end })
    }
}

#[derive(Parser)]
#[command(name = "splinter")]
#[command(about = "splinter - extract a selection into a new, uniquely named note")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/splinter/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault directory (overrides config file)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a selection into a new note and link to it
    ///
    /// With --source, the selection is a line range of a note in the vault and
    /// is replaced in place. With --stdin, the selection is read from standard
    /// input and the link is printed to standard output.
    Extract(ExtractArgs),

    /// Print the title that a selection would produce
    ///
    /// Exits with status 1 when the selection has no usable title.
    Title {
        /// Selection text (read from stdin if omitted)
        text: Option<String>,
    },

    /// Check whether a selection can be extracted (exit status only)
    Check {
        /// Selection text (read from stdin if omitted)
        text: Option<String>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Vault-relative path of the note containing the selection
    #[arg(long, required_unless_present = "stdin", conflicts_with = "stdin")]
    pub source: Option<String>,

    /// Selected lines of the source note (START:END, 1-indexed, inclusive)
    #[arg(long, requires = "source", required_unless_present = "stdin")]
    pub lines: Option<LineRange>,

    /// Read the selection from stdin and print the replacement link to stdout
    #[arg(long)]
    pub stdin: bool,

    /// Name of the note the stdin selection came from (adds a parent link)
    #[arg(long, requires = "stdin")]
    pub source_name: Option<String>,

    /// Note template (overrides config)
    #[arg(short, long, value_enum)]
    pub template: Option<TemplateArg>,

    /// Where to open the new note (overrides config)
    #[arg(short, long, value_enum)]
    pub placement: Option<PlacementArg>,

    /// Open the new note without focusing it
    #[arg(long)]
    pub no_activate: bool,

    /// Open the new note in your editor
    #[arg(short, long)]
    pub edit: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write an example config file
    Init {
        /// Where to write the file (defaults to the standard location)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_line_range_parsing() {
        assert_eq!("3:5".parse::<LineRange>(), Ok(LineRange { start: 3, end: 5 }));
        assert_eq!("7".parse::<LineRange>(), Ok(LineRange { start: 7, end: 7 }));
        assert!("0:2".parse::<LineRange>().is_err());
        assert!("5:3".parse::<LineRange>().is_err());
        assert!("a:b".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_template_arg_names_match_core() {
        for arg in TemplateArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            let template: NoteTemplate = (*arg).into();
            assert_eq!(name, template.as_str());
        }
    }

    #[test]
    fn test_extract_requires_a_selection_source() {
        assert!(Cli::try_parse_from(["splinter", "extract"]).is_err());
        assert!(Cli::try_parse_from(["splinter", "extract", "--stdin"]).is_ok());
        assert!(
            Cli::try_parse_from(["splinter", "extract", "--source", "a.md", "--lines", "1:2"])
                .is_ok()
        );
        assert!(
            Cli::try_parse_from(["splinter", "extract", "--source", "a.md", "--stdin"]).is_err()
        );
        assert!(Cli::try_parse_from(["splinter", "extract", "--source", "a.md"]).is_err());
    }
}
