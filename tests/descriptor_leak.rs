#![cfg(target_os = "linux")]

use fgsh::builtins::Outcome;
use fgsh::config::Config;
use fgsh::context::ShellContext;
use fgsh::executor::Executor;
use std::fs;

fn open_fds() -> usize {
    fs::read_dir("/proc/self/fd").unwrap().count()
}

// Kept alone in its own test binary so no other test opens descriptors while
// this one counts them.
#[test]
fn test_pipelines_do_not_leak_descriptors() {
    let mut executor = Executor::new(ShellContext::detached(Config::from_env()));

    // Warm up anything the first run opens lazily.
    executor.run_line("echo warmup | cat > /dev/null").unwrap();
    let before = open_fds();

    for _ in 0..25 {
        let outcome = executor
            .run_line("echo hi | cat | tr a-z A-Z | wc -c > /dev/null")
            .unwrap();
        assert_eq!(outcome, Outcome::Continue(0));
        executor.run_line("cat < /nonexistent_fgsh | cat > /dev/null").unwrap();
    }

    assert_eq!(open_fds(), before);
}
