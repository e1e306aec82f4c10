use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "healthcheck")]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the configured checks once and reports the result.
    Check,
    /// Commands related to the web server.
    Server {
        #[command(subcommand)]
        command: Option<ServerCommands>,
    },
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help = true)]
pub enum ServerCommands {
    /// Starts monitoring and serves the health endpoint.
    Start,
    /// Returns the health status of the running server.
    Status,
    /// Manually marks the running server as unhealthy.
    Down,
    /// Clears a manual down.
    Up,
}
