//! Command-line interface definitions.
//!
//! All CLI arguments are defined here using the clap derive API. The binary
//! is a thin shell: parsing happens here, semantics live in the library
//! modules, so other callers (for example a packaging pipeline) can link
//! the library directly.
//!
//! # Example
//!
//! ```bash
//! # Replace duplicates under a tree with relative symbolic links (default)
//! dupelink ./publish
//!
//! # Use hard links instead
//! dupelink ./publish --hard
//!
//! # Widen the extension filter and verify content before linking
//! dupelink ./publish --ext dll --ext exe --ext pdb --verify
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Replace duplicate files in a directory tree with links.
///
/// dupelink scans a directory tree for files with byte-identical content
/// (filtered by extension), keeps one master copy per content class, and
/// replaces every other copy with a hard or symbolic link to it.
#[derive(Debug, Parser)]
#[command(name = "dupelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory tree to deduplicate
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Replace duplicates with hard links instead of symbolic links
    ///
    /// Hard links require every duplicate to live on the same filesystem
    /// volume as its master.
    #[arg(long)]
    pub hard: bool,

    /// File extension to consider (repeatable; default: dll, exe)
    ///
    /// Comparison is case-insensitive and a leading dot is ignored, so
    /// `--ext .DLL` and `--ext dll` are equivalent.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Compare duplicate and master byte-for-byte before replacing
    ///
    /// Guards against fingerprint collisions at the cost of re-reading
    /// both files.
    #[arg(long)]
    pub verify: bool,

    /// Increase verbosity (-v for debug, -vv for trace)
    ///
    /// Also enables the per-group listing of masters and created links.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}
