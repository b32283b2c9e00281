use anyhow::Context;
use fgsh::builtins::Outcome;
use fgsh::config::{Config, LOG_ENV};
use fgsh::context::ShellContext;
use fgsh::executor::Executor;
use fgsh::input::LineReader;
use std::process::exit;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn")).init();

    let config = Config::from_env();
    let interactive = config.interactive;
    let ctx = ShellContext::init(config.clone()).context("cannot take control of the terminal")?;
    let mut executor = Executor::new(ctx);
    let mut input = LineReader::new(&config).context("cannot read input")?;

    let mut line_num = 0;
    let mut last_status = 0;
    loop {
        let prompt = if interactive { format!("{}: ", line_num) } else { String::new() };
        let Some(line) = input.next_line(&prompt)? else {
            break;
        };

        match executor.run_line(&line) {
            Ok(Outcome::Continue(status)) => last_status = status,
            Ok(Outcome::Exit(code)) => exit(code),
            Err(e) => {
                eprintln!("fgsh: {}", e);
                last_status = e.status();
            }
        }
        log::debug!("line {} finished with status {}", line_num, last_status);
        line_num += 1;
    }

    Ok(())
}
