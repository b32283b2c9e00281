use crate::context::ShellContext;
use crate::signals::SignalMaskGuard;
use crate::terminal::Terminal;
use crate::types::{NixContext, ShellError, EXIT_SIGNAL_BASE};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, getpid, setpgid, ForkResult, Pid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberState {
    Running,
    Exited(i32),
    Signaled(Signal),
    Stopped,
    /// Reaped by someone else or otherwise lost to `waitpid`.
    Vanished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub pid: Pid,
    pub state: MemberState,
}

/// The processes of one pipeline, all in one process group named after the
/// first of them.
#[derive(Debug, Default)]
pub struct Job {
    pgid: Option<Pid>,
    members: Vec<Member>,
    #[cfg(test)]
    fork_limit: Option<usize>,
}

impl Job {
    pub fn new() -> Self {
        Self::default()
    }

    /// A job whose fork fails once it holds `limit` members.
    #[cfg(test)]
    pub(crate) fn with_fork_limit(limit: usize) -> Self {
        Job {
            fork_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn pgid(&self) -> Option<Pid> {
        self.pgid
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Forks one more member. Both sides move the child into the job's group,
    /// so the group exists whichever of them runs first; an interactive child
    /// also claims the terminal for it before anything can read from it.
    pub fn launch(&mut self, ctx: &ShellContext) -> Result<ForkResult, ShellError> {
        #[cfg(test)]
        if self.fork_limit == Some(self.members.len()) {
            return Err(ShellError::NixError(Errno::EAGAIN, "fork".to_string()));
        }

        // SAFETY: the child only adjusts its own process state before it
        // execs or exits.
        let result = unsafe { fork() }.context("fork")?;
        match result {
            ForkResult::Parent { child } => {
                let pgid = *self.pgid.get_or_insert(child);
                match setpgid(child, pgid) {
                    // EACCES: the child already exec'd, after joining on its own.
                    Ok(()) | Err(Errno::EACCES) => {}
                    Err(e) => log::debug!("setpgid({}, {}) failed: {}", child, pgid, e),
                }
                self.members.push(Member {
                    pid: child,
                    state: MemberState::Running,
                });
            }
            ForkResult::Child => {
                let pgid = self.pgid.unwrap_or_else(getpid);
                let _ = setpgid(Pid::from_raw(0), pgid);
                let _ = transfer_terminal(ctx.terminal.as_ref(), pgid);
            }
        }
        Ok(result)
    }

    /// Hands the terminal to this job.
    pub fn foreground(&self, ctx: &ShellContext) -> Result<(), ShellError> {
        match self.pgid {
            Some(pgid) => transfer_terminal(ctx.terminal.as_ref(), pgid),
            None => Ok(()),
        }
    }

    /// Takes the terminal back for the interpreter and restores its modes.
    pub fn background(&self, ctx: &ShellContext) -> Result<(), ShellError> {
        transfer_terminal(ctx.terminal.as_ref(), ctx.shell_pgid)?;
        if ctx.is_interactive() {
            ctx.terminal.restore_modes()?;
        }
        Ok(())
    }

    /// Blocks until every member has exited, been killed or stopped, and
    /// returns the status of the last member. Stopped members are reported and
    /// then left alone: they are never reaped or signalled, and stay stopped
    /// until something else resumes or kills them.
    pub fn wait_all(&mut self) -> i32 {
        for member in &mut self.members {
            if member.state == MemberState::Running {
                member.state = wait_member(member.pid);
                log::debug!("pid {} -> {:?}", member.pid, member.state);
            }
        }

        if self.is_stopped() {
            if let Some(pgid) = self.pgid {
                eprintln!("[{}] stopped", pgid);
            }
        }
        self.status()
    }

    pub fn is_stopped(&self) -> bool {
        self.members.iter().any(|m| m.state == MemberState::Stopped)
    }

    pub fn status(&self) -> i32 {
        match self.members.last().map(|m| m.state) {
            Some(MemberState::Exited(code)) => code,
            Some(MemberState::Signaled(sig)) => EXIT_SIGNAL_BASE + sig as i32,
            Some(MemberState::Stopped) => EXIT_SIGNAL_BASE + Signal::SIGTSTP as i32,
            Some(MemberState::Running) | Some(MemberState::Vanished) | None => 1,
        }
    }
}

fn wait_member(pid: Pid) -> MemberState {
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return MemberState::Exited(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => return MemberState::Signaled(sig),
            Ok(WaitStatus::Stopped(..)) => return MemberState::Stopped,
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(e) => {
                log::warn!("waitpid({}) failed: {}", pid, e);
                return MemberState::Vanished;
            }
        }
    }
}

/// Moves terminal ownership to `pgid` with SIGTTOU blocked, so a caller in a
/// background group is not stopped by the move. No-op when not interactive.
pub fn transfer_terminal(terminal: &dyn Terminal, pgid: Pid) -> Result<(), ShellError> {
    if !terminal.is_interactive() {
        return Ok(());
    }
    let _mask = SignalMaskGuard::block(&[Signal::SIGTTOU])?;
    terminal.set_foreground_group(pgid)
}
