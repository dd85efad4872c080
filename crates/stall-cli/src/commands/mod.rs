//! CLI command implementations

pub mod check;
pub mod explain;
pub mod fix;
pub mod init;

pub use check::CheckArgs;
pub use explain::ExplainArgs;
pub use fix::FixArgs;
pub use init::InitArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze JavaScript/TypeScript files for async-hygiene issues
    Check(CheckArgs),

    /// Rename async functions so they carry the Async suffix
    Fix(FixArgs),

    /// Initialize Stall configuration in current directory
    Init(InitArgs),

    /// Show detailed explanation for a specific rule
    Explain(ExplainArgs),
}
