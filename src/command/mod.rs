//! External command execution
//!
//! The multi-connection downloader is an external binary. This module models
//! running it as a capability: [`CommandRunner`] takes a [`CommandLine`] and a
//! metric tag and returns the captured output and exit status.
//!
//! - [`ProcessCommandRunner`]: spawns the program with `tokio::process`
//!
//! ## Usage
//!
//! ```no_run
//! use package_fetch::command::{CommandLine, CommandRunner, ProcessCommandRunner};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = ProcessCommandRunner::default();
//! let output = runner
//!     .run(&CommandLine::new("aria2c").arg("--version"), "version.check")
//!     .await?;
//! println!("success: {}", output.success());
//! # Ok(())
//! # }
//! ```

mod process;
mod traits;

pub use process::ProcessCommandRunner;
pub use traits::{CommandLine, CommandOutput, CommandRunner};
