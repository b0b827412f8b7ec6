/*!
 * bundlefs - Bundle a directory tree into a single text document and back
 *
 * Forward mode walks a directory, renders a tree listing and concatenates
 * every file between header and footer markers. Reverse mode parses such a
 * document and recreates the files it describes.
 */

pub mod config;
pub mod error;
pub mod exclusion;
pub mod format;
pub mod reader;
pub mod report;
pub mod scanner;
pub mod transform;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config, Mode};
pub use error::{BundleError, Result};
pub use exclusion::ExclusionSet;
pub use reader::{decode_file, parse_bundle, ParsedBundle, Reconstructor};
pub use report::{BundleReport, FileReportInfo, RebuildReport, ReportFormat, Reporter};
pub use scanner::Scanner;
pub use types::{DirectoryNode, FileContent, FileNode, FileRecord};
pub use utils::{count_files, format_file_size};
pub use writer::{render_tree, BundleWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
