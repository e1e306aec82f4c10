mod helpers;

use helpers::*;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::sleep;

/// Runs `healthcheck server status` and checks the reported state and exit code.
async fn assert_status(env_vars: &[(&str, &str)], expected_line: &str, expected_code: i32) {
    let (status_command, stdout, _stderr) = run_command(&["server", "status"], env_vars);
    assert_exit_code(status_command, expected_code).await;
    check_log_output_regex(stdout, vec![expected_line]).await;
}

async fn set_manual(env_vars: &[(&str, &str)], state: &str) {
    let (command, _stdout, _stderr) = run_command(&["server", state], env_vars);
    assert_exit_code(command, 0).await;
}

#[tokio::test]
#[serial]
async fn test_status() {
    let port = free_port().to_string();
    let env_vars = [
        ("HEALTHCHECK_SERVER_PORT", port.as_str()),
        ("HEALTHCHECK_FILECHECK_FILES", ""),
    ];

    // Without a running server the status cannot be retrieved.
    let (status_command, _stdout, stderr) = run_command(&["server", "status"], &env_vars);
    assert_exit_code(status_command, 1).await;
    check_log_output_regex(stderr, vec!["Failed to get status: Request error"]).await;

    // Start the server. Without checks it should be healthy.
    let mut server = TestServer::start(&env_vars).await;
    assert_status(&env_vars, "^healthy$", 0).await;

    // Manually take the server down, then bring it back up.
    set_manual(&env_vars, "down").await;
    assert_status(
        &env_vars,
        "^unhealthy: manual_http_status: manually marked down$",
        1,
    )
    .await;
    set_manual(&env_vars, "up").await;
    assert_status(&env_vars, "^healthy$", 0).await;

    server.stop().await;
}

#[tokio::test]
#[serial]
async fn test_file_goes_missing() {
    // Create a test file and configure the server to check it every second.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Test").unwrap();
    let file_path = file.path().to_str().unwrap().to_string();
    let port = free_port().to_string();
    let env_vars = [
        ("HEALTHCHECK_SERVER_PORT", port.as_str()),
        ("HEALTHCHECK_FILECHECK_FILES", file_path.as_str()),
        ("HEALTHCHECK_FILECHECK_INTERVAL", "1"),
        ("HEALTHCHECK_FILECHECK_THRESHOLD", "1"),
    ];

    let mut server = TestServer::start(&env_vars).await;

    sleep(Duration::from_secs(2)).await;
    assert_status(&env_vars, "^healthy$", 0).await;

    // Delete the file. The server should become unhealthy.
    file.close().unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_status(
        &env_vars,
        "^unhealthy: FileCheck: Failed to access .*: No such file or directory",
        1,
    )
    .await;

    server.stop().await;
}
