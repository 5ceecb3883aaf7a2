//! refile - sort files into category folders by extension
//!
//! This library classifies files by extension against a configurable
//! category mapping and relocates them into per-category subdirectories.
//! Alongside the organizer it provides tree flattening, empty-directory
//! pruning, extension-filtered bulk delete/copy, and a read-only directory
//! survey.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod relocate;
pub mod survey;
pub mod sweep;

pub use classifier::{CategoryIndex, FALLBACK_CATEGORY};
pub use config::{CategoryConfig, CategoryRule, CompiledIgnore, ConfigError, IgnoreRules};
pub use organizer::{BatchReport, Reorganizer, flatten};
pub use relocate::{RelocateError, RelocateMode, RelocateResult, Relocation};
pub use survey::{ExtensionStats, Survey};
pub use sweep::{
    PruneReport, SweepReport, copy_by_extension, delete_by_extension, prune_empty_dirs,
};

pub use cli::{Cli, run};
