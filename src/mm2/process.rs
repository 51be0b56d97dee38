//! Daemon process lifecycle: launch, health-wait, output draining, and
//! graceful-then-forced shutdown.

use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{info, trace, warn};

use crate::core::config::DaemonConfig;
use crate::core::{Error, Result};
use crate::mm2::client::Mm2Client;

/// A supervised daemon child process.
#[derive(Debug)]
pub struct Mm2Process {
    child: Child,
    drain: Option<JoinHandle<()>>,
    stop_timeout: Duration,
}

impl Mm2Process {
    /// Spawn the daemon binary in its working directory. Startup is
    /// confirmed by waiting `startup_wait_secs`: the child still running
    /// when the wait times out counts as a successful launch, while an
    /// early exit is an error.
    pub async fn launch(config: &DaemonConfig) -> Result<Self> {
        let mut child = Command::new(&config.binary)
            .current_dir(&config.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::Daemon(format!(
                    "failed to spawn {}: {e}",
                    config.binary.display()
                ))
            })?;

        // the daemon logs continuously; drain and discard for its lifetime
        let drain = child.stdout.take().map(|stdout| {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    trace!(target: "mm2", "{line}");
                }
            })
        });

        let startup_wait = Duration::from_secs(config.startup_wait_secs);
        match tokio::time::timeout(startup_wait, child.wait()).await {
            Ok(Ok(status)) => {
                return Err(Error::Daemon(format!(
                    "daemon exited during startup: {status}"
                )));
            }
            Ok(Err(e)) => return Err(Error::Daemon(format!("wait failed: {e}"))),
            Err(_) => info!("daemon launched"),
        }

        Ok(Self {
            child,
            drain,
            stop_timeout: Duration::from_secs(config.stop_timeout_secs),
        })
    }

    /// Graceful shutdown: ask the daemon to stop over RPC, wait up to the
    /// configured timeout, then kill the process outright.
    pub async fn shutdown(mut self, client: &Mm2Client) -> Result<()> {
        if let Err(e) = client.rpc_stop().await {
            warn!(error = %e, "stop request failed, killing process");
        }

        match tokio::time::timeout(self.stop_timeout, self.child.wait()).await {
            Ok(Ok(status)) => info!(%status, "daemon stopped"),
            Ok(Err(e)) => return Err(Error::Daemon(format!("wait failed: {e}"))),
            Err(_) => {
                warn!("daemon did not stop in time, killing");
                self.child
                    .kill()
                    .await
                    .map_err(|e| Error::Daemon(format!("kill failed: {e}")))?;
            }
        }

        if let Some(drain) = self.drain.take() {
            drain.abort();
        }
        Ok(())
    }
}
