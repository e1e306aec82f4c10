use crate::checks::Check;
use crate::config::Config;
use crate::error::CheckError;
use async_trait::async_trait;
use log::debug;
use std::fs;

/// Fails unless every configured file exists and is not empty.
pub struct FileCheck {
    files: Vec<String>,
}

impl FileCheck {
    pub fn new(config: &Config) -> Self {
        Self::with_files(config.checks.file_check.files.clone())
    }

    pub fn with_files(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn is_enabled(&self) -> bool {
        !self.files.is_empty()
    }
}

#[async_trait]
impl Check for FileCheck {
    async fn check(&self) -> Result<(), CheckError> {
        debug!("Running file checks");

        for file in &self.files {
            let metadata =
                fs::metadata(file).map_err(|e| format!("Failed to access {}: {}", file, e))?;
            if metadata.len() == 0 {
                return Err(format!("File {} is empty", file).into());
            }
        }
        Ok(())
    }
}
