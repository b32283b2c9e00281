use crate::types::{NixContext, ShellError};
use nix::sys::signal::{pthread_sigmask, signal, SigHandler, SigSet, SigmaskHow, Signal};

/// Signals the interpreter shields itself from while it owns the terminal.
const INTERPRETER_IGNORED: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

/// Job-control signals a spawned program must see with their default action.
const CHILD_DEFAULTS: [Signal; 5] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

/// Blocks a set of signals for the calling thread until dropped, then puts
/// the previous mask back.
#[must_use = "the signals are unblocked again as soon as the guard is dropped"]
pub struct SignalMaskGuard {
    previous: SigSet,
}

impl SignalMaskGuard {
    pub fn block(signals: &[Signal]) -> Result<Self, ShellError> {
        let mut set = SigSet::empty();
        for &sig in signals {
            set.add(sig);
        }
        let mut previous = SigSet::empty();
        pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&set), Some(&mut previous))
            .context("pthread_sigmask")?;
        Ok(SignalMaskGuard { previous })
    }
}

impl Drop for SignalMaskGuard {
    fn drop(&mut self) {
        if let Err(e) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&self.previous), None) {
            log::warn!("failed to restore signal mask: {}", e);
        }
    }
}

pub fn ignore_interactive_signals() -> Result<(), ShellError> {
    for sig in INTERPRETER_IGNORED {
        // SAFETY: SigIgn installs no handler code.
        unsafe { signal(sig, SigHandler::SigIgn) }.context("signal")?;
    }
    Ok(())
}

/// Runs in a freshly forked child, before exec. Failures are ignored.
pub fn reset_for_child() {
    for sig in CHILD_DEFAULTS {
        // SAFETY: SigDfl installs no handler code.
        let _ = unsafe { signal(sig, SigHandler::SigDfl) };
    }
}
