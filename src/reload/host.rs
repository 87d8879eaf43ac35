//! Reload effects for the native listener.

use std::process::Command;

use super::error::ReloadError;
use super::notifier::PageHost;

/// Runs a shell command whenever a reload is requested.
///
/// `QUIRE_RELOAD_FORCE=1` is set in the command's environment for forced
/// reloads, so scripts can pass a cache-busting flag along.
#[derive(Debug, Clone)]
pub struct CommandHost {
    command: String,
}

impl CommandHost {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", &self.command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", &self.command]);
            cmd
        }
    }
}

impl PageHost for CommandHost {
    fn reload(&mut self, force: bool) -> Result<(), ReloadError> {
        crate::debug!("reload"; "running `{}`", self.command);
        let status = self
            .shell()
            .env("QUIRE_RELOAD_FORCE", if force { "1" } else { "0" })
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(ReloadError::Host(format!(
                "`{}` exited with {}",
                self.command, status
            )))
        }
    }
}

/// Only reports the reload; for watching the loop from a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogHost;

impl PageHost for LogHost {
    fn reload(&mut self, force: bool) -> Result<(), ReloadError> {
        let mode = if force { "forced" } else { "cached" };
        crate::log!("reload"; "page reload requested ({})", mode);
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_command_host_success() {
        let mut host = CommandHost::new("test \"$QUIRE_RELOAD_FORCE\" = 1");
        assert!(host.reload(true).is_ok());
    }

    #[test]
    fn test_command_host_failure() {
        let mut host = CommandHost::new("exit 3");
        let err = host.reload(true).unwrap_err();
        assert!(matches!(err, ReloadError::Host(msg) if msg.contains("exit 3")));
    }

    #[test]
    fn test_command_host_force_flag() {
        let mut host = CommandHost::new("test \"$QUIRE_RELOAD_FORCE\" = 0");
        assert!(host.reload(false).is_ok());
    }

    #[test]
    fn test_log_host() {
        assert!(LogHost.reload(true).is_ok());
    }
}
