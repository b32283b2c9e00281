use crate::signals;
use crate::types::{NixContext, ShellError};
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::sys::termios::{tcgetattr, tcsetattr, SetArg, Termios};
use nix::unistd::{getpgrp, getpid, setpgid, tcgetpgrp, tcsetpgrp, Pid};
use std::io;

/// Access to the controlling terminal. Everything that reads or moves
/// terminal ownership goes through this trait.
pub trait Terminal {
    /// False when input is not a terminal; every other method is then a no-op.
    fn is_interactive(&self) -> bool;
    fn foreground_group(&self) -> Result<Option<Pid>, ShellError>;
    fn set_foreground_group(&self, pgid: Pid) -> Result<(), ShellError>;
    /// Puts back the modes the interpreter saved at startup.
    fn restore_modes(&self) -> Result<(), ShellError>;
}

/// The terminal on standard input, owned by an interactive interpreter.
pub struct ControllingTerminal {
    modes: Termios,
}

impl ControllingTerminal {
    /// Waits until the interpreter is in the foreground, moves it into its
    /// own process group and takes the terminal.
    pub fn acquire() -> Result<(Self, Pid), ShellError> {
        loop {
            let pgrp = getpgrp();
            if tcgetpgrp(io::stdin()).context("tcgetpgrp")? == pgrp {
                break;
            }
            killpg(pgrp, Signal::SIGTTIN).context("killpg")?;
        }

        signals::ignore_interactive_signals()?;

        let pid = getpid();
        match setpgid(pid, pid) {
            // A session leader already leads its own group.
            Ok(()) | Err(Errno::EPERM) => {}
            Err(e) => return Err(ShellError::NixError(e, "setpgid".to_string())),
        }
        let shell_pgid = getpgrp();
        tcsetpgrp(io::stdin(), shell_pgid).context("tcsetpgrp")?;
        let modes = tcgetattr(io::stdin()).context("tcgetattr")?;

        log::debug!("interactive shell in process group {}", shell_pgid);
        Ok((ControllingTerminal { modes }, shell_pgid))
    }
}

impl Terminal for ControllingTerminal {
    fn is_interactive(&self) -> bool {
        true
    }

    fn foreground_group(&self) -> Result<Option<Pid>, ShellError> {
        tcgetpgrp(io::stdin()).context("tcgetpgrp").map(Some)
    }

    fn set_foreground_group(&self, pgid: Pid) -> Result<(), ShellError> {
        log::trace!("terminal -> process group {}", pgid);
        tcsetpgrp(io::stdin(), pgid).context("tcsetpgrp")
    }

    fn restore_modes(&self) -> Result<(), ShellError> {
        tcsetattr(io::stdin(), SetArg::TCSADRAIN, &self.modes).context("tcsetattr")
    }
}

/// Stand-in used when input is a pipe or a file.
pub struct DetachedTerminal;

impl Terminal for DetachedTerminal {
    fn is_interactive(&self) -> bool {
        false
    }

    fn foreground_group(&self) -> Result<Option<Pid>, ShellError> {
        Ok(None)
    }

    fn set_foreground_group(&self, _: Pid) -> Result<(), ShellError> {
        Ok(())
    }

    fn restore_modes(&self) -> Result<(), ShellError> {
        Ok(())
    }
}
