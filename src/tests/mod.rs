mod parser_tests;
mod tokenizer_tests;

use crate::builtins::Outcome;
use crate::config::Config;
use crate::context::ShellContext;
use crate::executor::Executor;

fn executor() -> Executor {
    Executor::new(ShellContext::detached(Config::from_env()))
}

/// Runs one line and returns the status it left behind.
fn run(executor: &mut Executor, line: &str) -> Result<i32, String> {
    match executor.run_line(line).map_err(|e| e.to_string())? {
        Outcome::Continue(status) => Ok(status),
        Outcome::Exit(code) => Err(format!("unexpected exit({})", code)),
    }
}
