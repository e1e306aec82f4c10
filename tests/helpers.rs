use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::sync::Notify;

pub type Lines<T> = Arc<Mutex<tokio::io::Lines<BufReader<T>>>>;

/// Returns a local port that is free at the time of the call.
#[allow(dead_code)] // Not dead code, used in tests.
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("A local port should be available.")
        .local_addr()
        .expect("The listener should have an address.")
        .port()
}

/// Runs `cargo run -- <args>` with the given environment and captures its output.
#[allow(dead_code)] // Not dead code, used in tests.
pub fn run_command(
    args: &[&str],
    env_vars: &[(&str, &str)],
) -> (
    tokio::process::Child,
    Lines<tokio::process::ChildStdout>,
    Lines<tokio::process::ChildStderr>,
) {
    let mut child = Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .envs(env_vars.to_owned())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("The command should spawn a child process.");

    let stdout = child
        .stdout
        .take()
        .expect("Stdout output should be captured.");
    let stderr = child
        .stderr
        .take()
        .expect("Stderr output should be captured.");

    (
        child,
        Arc::new(Mutex::new(BufReader::new(stdout).lines())),
        Arc::new(Mutex::new(BufReader::new(stderr).lines())),
    )
}

/// Waits for the command to finish and checks its exit code.
#[allow(dead_code)] // Not dead code, used in tests.
pub async fn assert_exit_code(mut child: tokio::process::Child, expected: i32) {
    let status = child.wait().await.expect("The command should exit.");
    assert_eq!(
        Some(expected),
        status.code(),
        "The command should exit with code {}.",
        expected
    );
}

/// A `healthcheck server start` child process.
#[allow(dead_code)] // Not dead code, used in tests.
pub struct TestServer {
    pub process: tokio::process::Child,
    pub stderr: Lines<tokio::process::ChildStderr>,
}

#[allow(dead_code)] // Not dead code, used in tests.
impl TestServer {
    /// Starts the server and waits until it logs "Server started.".
    pub async fn start(env_vars: &[(&str, &str)]) -> Self {
        let mut env_vars = env_vars.to_owned();
        env_vars.push(("RUST_LOG", "info"));
        let (process, _stdout, stderr) = run_command(&["server", "start"], &env_vars);

        let notify = Arc::new(Notify::new());
        let notify_clone = notify.clone();
        let lines_clone = Arc::clone(&stderr);
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines_clone.lock().await.next_line().await {
                if line.contains("Server started.") {
                    notify_clone.notify_one();
                    break;
                }
            }
        });
        notify.notified().await;

        TestServer { process, stderr }
    }

    /// Sends SIGINT and waits for a graceful shutdown.
    pub async fn stop(&mut self) {
        let pid = Pid::from_raw(
            self.process
                .id()
                .expect("The server process should be running and have a process ID.")
                as i32,
        );
        kill(pid, Signal::SIGINT).expect("The SIGINT signal should be sent.");

        let status = self
            .process
            .wait()
            .await
            .expect("The server process should exit.");
        assert!(status.success(), "Server did not shut down gracefully");
    }
}

#[allow(dead_code)] // Not dead code, used in tests.
pub async fn check_log_output_regex<T>(lines: Lines<T>, regex_expected_lines: Vec<&str>)
where
    T: tokio::io::AsyncRead + Unpin,
{
    let mut captured_lines = Vec::new();
    while let Ok(Some(line)) = lines.lock().await.next_line().await {
        captured_lines.push(line);
    }

    for expected_line in regex_expected_lines {
        let re = regex::Regex::new(expected_line).expect("Failed to compile regex");
        let found = captured_lines.iter().any(|line| re.is_match(line.as_ref()));
        assert!(found, "The output contains the line '{}'.", expected_line);
    }
}

#[allow(dead_code)] // Not dead code, used in tests.
pub async fn check_log_output<T>(lines: Lines<T>, expected_lines: Vec<&str>)
where
    T: tokio::io::AsyncRead + Unpin,
{
    let mut captured_lines = Vec::new();
    while let Ok(Some(line)) = lines.lock().await.next_line().await {
        captured_lines.push(line);
    }

    for expected_line in expected_lines {
        let found = captured_lines.iter().any(|line| line == expected_line);
        assert!(found, "The output contains the line '{}'.", expected_line);
    }
}
