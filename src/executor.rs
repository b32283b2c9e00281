use crate::ast::{Pipeline, Segment, Stream};
use crate::builtins::{self, Builtin, Outcome};
use crate::context::ShellContext;
use crate::job::Job;
use crate::launcher::{self, ExecPlan, Wiring};
use crate::parser::parse;
use crate::tokenizer::tokenize;
use crate::types::{ExecuteResult, NixContext, ShellError};
use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd};

pub struct Executor {
    ctx: ShellContext,
}

impl Executor {
    pub fn new(ctx: ShellContext) -> Self {
        Executor { ctx }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Runs one input line: a lone built-in in-process, anything else as a
    /// foreground job.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Ok(Outcome::Continue(0));
        }
        let pipeline = parse(&tokens)?;

        if let [segment] = pipeline.segments.as_slice() {
            if let Some(builtin) = builtins::lookup(segment.program()) {
                return self.run_builtin(builtin, segment);
            }
        }

        self.execute(&pipeline).map(Outcome::Continue)
    }

    /// Runs a built-in inside the interpreter so `cd` and `exit` take effect.
    /// Every redirection target is opened first, in order; if one fails the
    /// built-in does not run. Output goes to the last `>` target, if any.
    fn run_builtin(&mut self, builtin: &Builtin, segment: &Segment) -> Result<Outcome, ShellError> {
        let mut output = None;
        for redirect in &segment.redirects {
            let file = launcher::open_redirect(redirect).map_err(|source| ShellError::Redirect {
                path: redirect.path.display().to_string(),
                source,
            })?;
            if redirect.stream == Stream::Stdout {
                output = Some(file);
            }
        }

        match output {
            Some(mut file) => (builtin.run)(segment.args(), &self.ctx.config, &mut file),
            None => {
                let mut stdout = io::stdout().lock();
                let outcome = (builtin.run)(segment.args(), &self.ctx.config, &mut stdout);
                stdout.flush()?;
                outcome
            }
        }
    }

    /// Spawns the pipeline as one job, gives it the terminal, waits for it and
    /// takes the terminal back.
    pub fn execute(&mut self, pipeline: &Pipeline) -> ExecuteResult {
        self.execute_job(pipeline, &mut Job::new())
    }

    /// Like `execute`, with the job supplied by the caller. The terminal is
    /// reclaimed on every path that spawned at least one process, and every
    /// spawned member has been waited for when this returns.
    pub fn execute_job(&mut self, pipeline: &Pipeline, job: &mut Job) -> ExecuteResult {
        let spawned = spawn_pipeline(&self.ctx, pipeline, job);
        if job.is_empty() {
            return spawned.map(|_| 0);
        }

        if let Err(e) = job.foreground(&self.ctx) {
            // The group may already be gone if every member exited.
            log::debug!("foreground handoff failed: {}", e);
        }
        let status = job.wait_all();
        job.background(&self.ctx)?;

        spawned?;
        Ok(status)
    }
}

/// Creates every pipe first, then forks one member per segment into `job`.
/// On failure `job` still holds whatever was spawned, so the caller can wait
/// for it.
pub fn spawn_pipeline(ctx: &ShellContext, pipeline: &Pipeline, job: &mut Job) -> Result<(), ShellError> {
    let plans = pipeline
        .segments
        .iter()
        .map(|segment| ExecPlan::new(segment, &ctx.config))
        .collect::<Result<Vec<_>, _>>()?;

    let count = plans.len();
    let mut pipes = (1..count)
        .map(|_| pipe2(OFlag::O_CLOEXEC).context("pipe").map(Some))
        .collect::<Result<Vec<Option<(OwnedFd, OwnedFd)>>, _>>()?;

    for (i, plan) in plans.iter().enumerate() {
        let wiring = Wiring {
            stdin: i
                .checked_sub(1)
                .and_then(|prev| pipes[prev].as_ref())
                .map(|(read, _)| read.as_raw_fd()),
            stdout: pipes
                .get(i)
                .and_then(Option::as_ref)
                .map(|(_, write)| write.as_raw_fd()),
        };
        launcher::launch(ctx, job, plan, wiring, &pipes)?;

        // Both ends of the pipe into this member now belong to children.
        if i > 0 {
            pipes[i - 1] = None;
        }
    }
    Ok(())
}
