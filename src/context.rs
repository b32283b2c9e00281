use crate::config::Config;
use crate::terminal::{ControllingTerminal, DetachedTerminal, Terminal};
use crate::types::ShellError;
use nix::unistd::{getpgrp, Pid};

/// Interpreter-wide state shared by every component that spawns or waits.
pub struct ShellContext {
    pub config: Config,
    pub terminal: Box<dyn Terminal>,
    /// Group the terminal goes back to when a foreground job is done.
    pub shell_pgid: Pid,
}

impl ShellContext {
    pub fn init(config: Config) -> Result<Self, ShellError> {
        if config.interactive {
            let (terminal, shell_pgid) = ControllingTerminal::acquire()?;
            return Ok(ShellContext {
                config,
                terminal: Box::new(terminal),
                shell_pgid,
            });
        }
        Ok(Self::detached(config))
    }

    /// Context that never touches the terminal.
    pub fn detached(config: Config) -> Self {
        Self::with_terminal(config, Box::new(DetachedTerminal), getpgrp())
    }

    pub fn with_terminal(config: Config, terminal: Box<dyn Terminal>, shell_pgid: Pid) -> Self {
        ShellContext {
            config,
            terminal,
            shell_pgid,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.terminal.is_interactive()
    }
}
