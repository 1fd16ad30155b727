//! Transfer through the external multi-connection downloader

use super::{Destination, PackageDownloader};
use crate::command::CommandLine;
use crate::error::{Error, Result};
use crate::utils::redact_url;

impl PackageDownloader {
    /// Command line for the external downloader
    ///
    /// Overwrites an existing file, splits the transfer across the configured
    /// number of connections, and writes to `dir/file_name`.
    fn multi_connection_command(&self, destination: &Destination) -> CommandLine {
        let connections = self.config.connections;
        CommandLine::new(self.config.downloader_executable.as_str())
            .arg("--allow-overwrite")
            .arg(format!("-x{connections}"))
            .arg(format!("-s{connections}"))
            .arg("-d")
            .os_arg(&destination.dir)
            .arg("-o")
            .arg(destination.file_name.as_str())
            .arg(destination.url.as_str())
    }

    /// Run the external downloader; returns the size of the written file
    ///
    /// A non-zero exit is fatal and not retried here, the tool retries internally.
    pub(super) async fn download_multi_connection(
        &self,
        destination: &Destination,
        warm_up: bool,
        metric: &'static str,
    ) -> Result<u64> {
        let command = self.multi_connection_command(destination);
        let output = self.command_runner.run(&command, metric).await?;

        if !output.success() {
            // The URL may carry a signature; only its redacted form goes in the error
            return Err(Error::ExternalTool {
                url: redact_url(&destination.url),
                command: command.program,
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code: output.exit_code,
            });
        }

        let bytes = tokio::fs::metadata(destination.path()).await?.len();
        tracing::info!(bytes, warm_up, "bytes downloaded");
        Ok(bytes)
    }
}
