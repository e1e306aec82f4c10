use crate::checks::Check;
use crate::config::Config;
use crate::error::CheckError;
use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Fails unless a TCP connection can be opened to every configured address
/// within the timeout.
pub struct TcpCheck {
    timeout: Duration,
    addresses: Vec<String>,
}

impl TcpCheck {
    pub fn new(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.checks.tcp_check.timeout),
            addresses: config.checks.tcp_check.addresses.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.addresses.is_empty()
    }
}

#[async_trait]
impl Check for TcpCheck {
    async fn check(&self) -> Result<(), CheckError> {
        debug!("Running TCP checks");

        for address in &self.addresses {
            match timeout(self.timeout, TcpStream::connect(address.as_str())).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    return Err(format!("Connection to {} failed: {}", address, e).into());
                }
                Err(_) => {
                    return Err(format!("Connection to {} timed out", address).into());
                }
            }
        }
        Ok(())
    }
}
