use crate::ast::{Redirect, RedirectMode, Segment};
use crate::builtins::{self, Builtin, Outcome};
use crate::config::Config;
use crate::context::ShellContext;
use crate::job::Job;
use crate::signals;
use crate::types::{ShellError, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND, EXIT_REDIRECT_FAILED};
use crate::utils::search_candidates;
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::unistd::{close, dup2, execv, ForkResult, Pid};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::mem::ManuallyDrop;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;

/// Pipe ends that replace a child's stdin/stdout before its own redirections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wiring {
    pub stdin: Option<RawFd>,
    pub stdout: Option<RawFd>,
}

/// Everything a child needs, converted to C strings before the fork.
pub struct ExecPlan<'a> {
    segment: &'a Segment,
    argv: Vec<CString>,
    candidates: Vec<CString>,
    builtin: Option<&'static Builtin>,
}

impl<'a> ExecPlan<'a> {
    pub fn new(segment: &'a Segment, config: &Config) -> Result<Self, ShellError> {
        let nul_error = |_: std::ffi::NulError| {
            ShellError::InvalidSyntax("argument contains a NUL byte".to_string())
        };

        let argv = segment
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()).map_err(nul_error))
            .collect::<Result<Vec<_>, _>>()?;
        let builtin = builtins::lookup(segment.program());
        let candidates = match builtin {
            Some(_) => Vec::new(),
            None => search_candidates(segment.program(), &config.search_path)
                .into_iter()
                .map(|path| CString::new(path.as_os_str().as_bytes()).map_err(nul_error))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(ExecPlan {
            segment,
            argv,
            candidates,
            builtin,
        })
    }

    pub fn program(&self) -> &str {
        self.segment.program()
    }
}

/// Forks one pipeline member. The parent gets the child's pid back; the child
/// never returns from here.
pub fn launch(
    ctx: &ShellContext,
    job: &mut Job,
    plan: &ExecPlan,
    wiring: Wiring,
    pipes: &[Option<(OwnedFd, OwnedFd)>],
) -> Result<Pid, ShellError> {
    // Anything still buffered would otherwise be written twice.
    io::stdout().flush()?;

    match job.launch(ctx)? {
        ForkResult::Parent { child } => {
            log::debug!("spawned `{}` as pid {}", plan.program(), child);
            Ok(child)
        }
        ForkResult::Child => run_child(ctx, plan, wiring, pipes),
    }
}

fn run_child(
    ctx: &ShellContext,
    plan: &ExecPlan,
    wiring: Wiring,
    pipes: &[Option<(OwnedFd, OwnedFd)>],
) -> ! {
    signals::reset_for_child();

    if let Err(e) = apply_wiring(wiring) {
        report(&format!("fgsh: {}: {}", plan.program(), e.desc()));
        exit_child(EXIT_CANNOT_EXECUTE);
    }
    for fd in stale_pipe_fds(wiring, pipes) {
        let _ = close(fd);
    }
    for redirect in &plan.segment.redirects {
        if let Err(e) = apply_redirect(redirect) {
            report(&format!("fgsh: {}: {}", redirect.path.display(), e));
            exit_child(EXIT_REDIRECT_FAILED);
        }
    }

    if let Some(builtin) = plan.builtin {
        let mut stdout = io::stdout();
        let status = match (builtin.run)(plan.segment.args(), &ctx.config, &mut stdout) {
            Ok(Outcome::Continue(code)) | Ok(Outcome::Exit(code)) => code,
            Err(e) => {
                report(&format!("fgsh: {}", e));
                e.status()
            }
        };
        let _ = stdout.flush();
        exit_child(status);
    }

    exec_candidates(plan)
}

// A pipe end can itself be fd 0 or 1 when the interpreter started with that
// stream closed, so both ends are first lifted above stderr: neither dup2 may
// clobber the other's source.
fn apply_wiring(wiring: Wiring) -> nix::Result<()> {
    let stdin = wiring.stdin.map(lift_above_stdio).transpose()?;
    let stdout = wiring.stdout.map(lift_above_stdio).transpose()?;
    if let Some(fd) = stdin {
        dup2(fd, libc::STDIN_FILENO)?;
    }
    if let Some(fd) = stdout {
        dup2(fd, libc::STDOUT_FILENO)?;
    }
    Ok(())
}

fn lift_above_stdio(fd: RawFd) -> nix::Result<RawFd> {
    if fd > libc::STDERR_FILENO {
        return Ok(fd);
    }
    fcntl(fd, FcntlArg::F_DUPFD_CLOEXEC(libc::STDERR_FILENO + 1))
}

/// Pipe descriptors a child must close once its wiring is in place. A pipe
/// fd that shares its number with a stream the wiring just replaced is that
/// stream now, and stays open.
fn stale_pipe_fds(wiring: Wiring, pipes: &[Option<(OwnedFd, OwnedFd)>]) -> Vec<RawFd> {
    let replaced = |fd: RawFd| {
        (fd == libc::STDIN_FILENO && wiring.stdin.is_some())
            || (fd == libc::STDOUT_FILENO && wiring.stdout.is_some())
    };
    pipes
        .iter()
        .flatten()
        .flat_map(|(read, write)| [read.as_raw_fd(), write.as_raw_fd()])
        .filter(|&fd| !replaced(fd))
        .collect()
}

/// Opens a redirection target the way its operator asks: `<` for reading,
/// `>` for appending, creating the file if needed.
pub fn open_redirect(redirect: &Redirect) -> io::Result<File> {
    match redirect.mode {
        RedirectMode::Read => OpenOptions::new().read(true).open(&redirect.path),
        RedirectMode::AppendCreate => OpenOptions::new()
            .append(true)
            .create(true)
            .open(&redirect.path),
    }
}

fn apply_redirect(redirect: &Redirect) -> io::Result<()> {
    let file = open_redirect(redirect)?;
    let target = redirect.stream.fd();
    if file.as_raw_fd() == target {
        // Opened straight onto the closed stream; keep it open across exec.
        fcntl(file.into_raw_fd(), FcntlArg::F_SETFD(FdFlag::empty()))?;
        return Ok(());
    }
    dup2(file.as_raw_fd(), target)?;
    Ok(())
}

// Tries every candidate in order. ENOENT means "keep looking"; any other
// failure is remembered so a program that exists but cannot run is not
// reported as missing.
fn exec_candidates(plan: &ExecPlan) -> ! {
    let mut failure = None;
    for candidate in &plan.candidates {
        match execv(candidate, &plan.argv) {
            Err(Errno::ENOENT) | Err(Errno::ENOTDIR) => {}
            Err(e) => failure = Some(e),
            Ok(never) => match never {},
        }
    }

    match failure {
        Some(e) => {
            report(&format!("fgsh: {}: {}", plan.program(), e.desc()));
            exit_child(EXIT_CANNOT_EXECUTE)
        }
        None => {
            report(&format!("fgsh: {}: command not found", plan.program()));
            exit_child(EXIT_NOT_FOUND)
        }
    }
}

// Writes straight to fd 2; the std handle's lock may be held by a thread that
// does not exist in the child.
fn report(msg: &str) {
    // SAFETY: fd 2 stays open; ManuallyDrop keeps it from being closed here.
    let mut stderr = ManuallyDrop::new(unsafe { File::from_raw_fd(libc::STDERR_FILENO) });
    let _ = stderr.write_all(format!("{}\n", msg).as_bytes());
}

fn exit_child(status: i32) -> ! {
    // SAFETY: _exit skips the parent's atexit handlers and buffered output.
    unsafe { libc::_exit(status) }
}
