mod helpers;

use helpers::*;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_stop_server_by_sending_sigint() {
    let port = free_port().to_string();
    let env_vars = [
        ("HEALTHCHECK_SERVER_ADDRESS", "127.0.0.1"),
        ("HEALTHCHECK_SERVER_PORT", port.as_str()),
        ("HEALTHCHECK_FILECHECK_FILES", ""),
    ];

    // Server is up once it logged that it started. Terminate it with SIGINT.
    let mut server = TestServer::start(&env_vars).await;
    server.stop().await;

    // Check that the log output contains the expected log messages related to the server shutdown.
    let regex_expected_lines = vec![
        ".*INFO.*Received SIGINT, shutting down.*",
        ".*INFO.*Server stopped.*",
    ];
    check_log_output_regex(server.stderr.clone(), regex_expected_lines).await;
}
