use anyhow::{anyhow, Result};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, warn};

/// Hands `url` to the platform opener without waiting for it; the child is
/// reaped on a helper thread.
pub fn open_url(url: &str) -> Result<()> {
    let mut cmd = opener_command()?;
    cmd.arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let mut child = cmd
        .spawn()
        .map_err(|err| anyhow!("failed to launch opener: {err}"))?;
    debug!(%url, pid = child.id(), "opener launched");

    let url = url.to_string();
    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => {
            warn!(%url, %status, "open command failed");
        }
        Ok(_) => {}
        Err(err) => warn!(%url, error = %err, "failed to wait for opener"),
    });

    Ok(())
}

fn opener_command() -> Result<Command> {
    if cfg!(target_os = "macos") {
        Ok(Command::new("open"))
    } else if cfg!(target_os = "linux") {
        Ok(Command::new("xdg-open"))
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        Ok(cmd)
    } else {
        Err(anyhow!("opening URLs is not supported on this OS"))
    }
}
