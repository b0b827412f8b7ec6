/*!
 * Configuration handling for bundlefs
 */

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use clap_complete::Shell;
use tracing::debug;

use crate::error::Result;
use crate::exclusion::ExclusionSet;
use crate::utils::DEFAULT_IGNORE;
use crate::{bail, ensure};

/// Exclusion config read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "config.txt";

/// Command-line arguments for bundlefs
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "bundlefs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle a directory tree into a single text document, or rebuild it",
    long_about = "Forward mode writes a tree listing followed by every file's contents into one text document. Reverse mode reads such a document and recreates the directories and files it describes.",
    group(ArgGroup::new("mode").args(["forward", "reverse"]).multiple(false))
)]
pub struct Args {
    /// Generate a single bundle document from the root directory
    #[clap(long, visible_alias = "encode")]
    pub forward: bool,

    /// Recreate directories and files from a bundle document
    #[clap(long, visible_alias = "decode")]
    pub reverse: bool,

    /// Root directory to scan (forward) or recreate into (reverse)
    #[clap(short, long, default_value = ".")]
    pub root: String,

    /// Bundle document to write in forward mode
    #[clap(short, long)]
    pub output: Option<String>,

    /// Bundle document to read in reverse mode
    #[clap(short, long)]
    pub input: Option<String>,

    /// Exclusion config: one pattern per line, `#` starts a comment [default: config.txt]
    #[clap(short, long)]
    pub config: Option<String>,

    /// Comma-separated list of extra patterns to exclude
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Also exclude common VCS, dependency and build directories
    #[clap(long)]
    pub default_ignores: bool,

    /// Strip comments from recognized source files
    #[clap(long)]
    pub strip_comments: bool,

    /// Drop empty and whitespace-only lines
    #[clap(long)]
    pub strip_blank_lines: bool,

    /// Hide the progress bar and summary table
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Direction of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Directory tree to bundle document
    Forward,
    /// Bundle document to directory tree
    Reverse,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Selected mode
    pub mode: Mode,

    /// Directory read in forward mode, written in reverse mode
    pub root: PathBuf,

    /// Bundle document written in forward mode
    pub output_file: PathBuf,

    /// Bundle document read in reverse mode
    pub input_file: PathBuf,

    /// Exclusion config path
    pub config_file: PathBuf,

    /// Whether the exclusion config was named on the command line
    pub config_file_explicit: bool,

    /// Extra exclusion patterns
    pub ignore_patterns: Vec<String>,

    /// Append the built-in ignore list
    pub default_ignores: bool,

    /// Strip comments from recognized source files
    pub strip_comments: bool,

    /// Drop blank lines
    pub strip_blank_lines: bool,

    /// Hide progress and report output
    pub quiet: bool,
}

impl Config {
    /// Forward-mode configuration with every option off
    pub fn forward(root: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Forward,
            root: root.into(),
            output_file: output_file.into(),
            input_file: PathBuf::new(),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            config_file_explicit: false,
            ignore_patterns: Vec::new(),
            default_ignores: false,
            strip_comments: false,
            strip_blank_lines: false,
            quiet: true,
        }
    }

    /// Reverse-mode configuration
    pub fn reverse(input_file: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Reverse,
            input_file: input_file.into(),
            ..Self::forward(root, PathBuf::new())
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let mode = match (args.forward, args.reverse) {
            (true, false) => Mode::Forward,
            (false, true) => Mode::Reverse,
            _ => bail!(
                MissingArgument,
                "one of --forward or --reverse is required"
            ),
        };

        let output_file = match (mode, args.output) {
            (Mode::Forward, None) => {
                bail!(MissingArgument, "--output is required for forward mode")
            }
            (_, output) => output.map(PathBuf::from).unwrap_or_default(),
        };

        let input_file = match (mode, args.input) {
            (Mode::Reverse, None) => {
                bail!(MissingArgument, "--input is required for reverse mode")
            }
            (_, input) => input.map(PathBuf::from).unwrap_or_default(),
        };

        let config_file_explicit = args.config.is_some();
        let config_file = PathBuf::from(
            args.config
                .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
        );

        Ok(Self {
            mode,
            root: PathBuf::from(args.root),
            output_file,
            input_file,
            config_file,
            config_file_explicit,
            ignore_patterns: args.ignore,
            default_ignores: args.default_ignores,
            strip_comments: args.strip_comments,
            strip_blank_lines: args.strip_blank_lines,
            quiet: args.quiet,
        })
    }

    /// Validate the configuration before any work starts
    pub fn validate(&self) -> Result<()> {
        match self.mode {
            Mode::Forward => {
                ensure!(
                    self.root.exists(),
                    PathNotFound,
                    "root directory {}",
                    self.root.display()
                );
                ensure!(
                    self.root.is_dir(),
                    Config,
                    "root {} is not a directory",
                    self.root.display()
                );

                if let Some(parent) = self.output_file.parent() {
                    ensure!(
                        parent == Path::new("") || parent.is_dir(),
                        PathNotFound,
                        "output directory {}",
                        parent.display()
                    );
                }
                ensure!(
                    !self.output_file.is_dir(),
                    InvalidArgument,
                    "output {} is a directory",
                    self.output_file.display()
                );

                if self.config_file_explicit {
                    ensure!(
                        self.config_file.is_file(),
                        PathNotFound,
                        "exclusion config {}",
                        self.config_file.display()
                    );
                }
            }
            Mode::Reverse => {
                ensure!(
                    self.input_file.is_file(),
                    PathNotFound,
                    "input file {}",
                    self.input_file.display()
                );
                ensure!(
                    !self.root.is_file(),
                    Config,
                    "target root {} is a file",
                    self.root.display()
                );
            }
        }

        Ok(())
    }

    /// Exclusion set built from the config file, `--ignore` and the default list
    pub fn load_exclusions(&self) -> Result<ExclusionSet> {
        let mut set = if self.config_file.is_file() {
            ExclusionSet::load(&self.config_file)?
        } else {
            debug!(
                "No exclusion config at {}, starting with no patterns",
                self.config_file.display()
            );
            ExclusionSet::new()
        };

        set.extend(self.ignore_patterns.iter().cloned());
        if self.default_ignores {
            set.extend(DEFAULT_IGNORE.iter().copied());
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;
    use std::fs;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("bundlefs").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_forward_args() {
        let config =
            Config::from_args(parse(&["--forward", "-r", "proj", "-o", "out.txt"])).unwrap();
        assert_eq!(config.mode, Mode::Forward);
        assert_eq!(config.root, PathBuf::from("proj"));
        assert_eq!(config.output_file, PathBuf::from("out.txt"));
        assert_eq!(config.config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!config.config_file_explicit);
    }

    #[test]
    fn test_encode_alias_and_ignore_list() {
        let config = Config::from_args(parse(&[
            "--encode",
            "-o",
            "out.txt",
            "--ignore",
            "*.log,target",
            "--strip-comments",
        ]))
        .unwrap();
        assert_eq!(config.mode, Mode::Forward);
        assert_eq!(config.ignore_patterns, vec!["*.log", "target"]);
        assert!(config.strip_comments);
        assert!(!config.strip_blank_lines);
    }

    #[test]
    fn test_modes_are_mutually_exclusive() {
        let res = Args::try_parse_from(["bundlefs", "--forward", "--reverse", "-o", "x"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_missing_mode_is_reported() {
        let err = Config::from_args(parse(&["-o", "out.txt"])).unwrap_err();
        assert!(matches!(err, BundleError::MissingArgument(_)));
    }

    #[test]
    fn test_forward_requires_output() {
        let err = Config::from_args(parse(&["--forward"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing argument: --output is required for forward mode"
        );
    }

    #[test]
    fn test_reverse_requires_input() {
        let err = Config::from_args(parse(&["--reverse", "-r", "dest"])).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_validate_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let config = Config::forward(&file, dir.path().join("out.txt"));
        assert!(matches!(config.validate(), Err(BundleError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_missing_output_dir() {
        let dir = tempdir().unwrap();
        let config = Config::forward(dir.path(), dir.path().join("nope").join("out.txt"));
        assert!(matches!(
            config.validate(),
            Err(BundleError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let mut config = Config::forward(dir.path(), dir.path().join("out.txt"));
        config.config_file = dir.path().join("missing.txt");
        config.config_file_explicit = true;
        assert!(config.validate().is_err());

        config.config_file_explicit = false;
        assert!(config.validate().is_ok());
        assert!(config.load_exclusions().unwrap().is_empty());
    }

    #[test]
    fn test_load_exclusions_merges_sources() {
        let dir = tempdir().unwrap();
        let cfg = dir.path().join("config.txt");
        fs::write(&cfg, "*.log\n").unwrap();

        let mut config = Config::forward(dir.path(), dir.path().join("out.txt"));
        config.config_file = cfg;
        config.ignore_patterns = vec!["dist".into()];
        config.default_ignores = true;

        let set = config.load_exclusions().unwrap();
        assert_eq!(&set.patterns()[..2], &["*.log".to_string(), "dist".to_string()]);
        assert!(set.is_excluded(".git"));
        assert!(set.is_excluded("node_modules"));
    }

    #[test]
    fn test_validate_reverse() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bundle.txt");

        let config = Config::reverse(&input, dir.path().join("out"));
        assert!(config.validate().is_err());

        fs::write(&input, "").unwrap();
        assert!(config.validate().is_ok());
    }
}
