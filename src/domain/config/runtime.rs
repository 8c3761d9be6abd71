// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime assembly configuration (`trainjob-runtime.toml`)
//!
//! ```toml
//! [script]
//! volume_name = "remote-script"
//! mount_dir = "/app"
//! trainer_container = "node"
//! ```

use crate::infrastructure::constants::*;
use crate::shared::error::{Result, RuntimeError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::Path;

// ============================================================================
// Main runtime configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub script: ScriptInjectionConfig,
}

impl RuntimeConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path).map_err(|e| {
            RuntimeError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let conf: Self = toml::from_str(&content)?;
        conf.validate()?;
        Ok(conf)
    }

    pub fn validate(&self) -> Result<()> {
        self.script.validate()
    }
}

// ============================================================================
// Script injection
// ============================================================================

/// Names owned by the script injection builder.
///
/// Two builders with different records can run in the same pass without
/// colliding, since every slot they upsert is named here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptInjectionConfig {
    /// ConfigMap data key holding the script
    pub script_key: String,
    pub volume_name: String,
    pub mount_dir: String,
    pub script_file_name: String,
    pub script_path_env: String,
    pub runner_env: String,
    pub trainer_container: String,
    /// Appended to the job name to form the ConfigMap name
    pub artifact_suffix: String,
}

impl Default for ScriptInjectionConfig {
    fn default() -> Self {
        Self {
            script_key: SCRIPT_KEY.to_string(),
            volume_name: SCRIPT_VOLUME_NAME.to_string(),
            mount_dir: SCRIPT_MOUNT_DIR.to_string(),
            script_file_name: SCRIPT_FILE_NAME.to_string(),
            script_path_env: ENV_SCRIPT_PATH.to_string(),
            runner_env: ENV_RUNNER.to_string(),
            trainer_container: TRAINER_CONTAINER_NAME.to_string(),
            artifact_suffix: SCRIPT_CONFIGMAP_SUFFIX.to_string(),
        }
    }
}

impl ScriptInjectionConfig {
    /// Absolute path of the script inside every container.
    pub fn script_file_path(&self) -> String {
        format!(
            "{}/{}",
            self.mount_dir.trim_end_matches('/'),
            self.script_file_name
        )
    }

    pub fn artifact_name(&self, job_name: &str) -> String {
        format!("{}{}", job_name, self.artifact_suffix)
    }

    pub fn validate(&self) -> Result<()> {
        let dns_label = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")
            .map_err(|e| RuntimeError::ConfigError(e.to_string()))?;
        let dns_suffix = Regex::new(r"^[-a-z0-9]*[a-z0-9]$")
            .map_err(|e| RuntimeError::ConfigError(e.to_string()))?;
        let env_name = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")
            .map_err(|e| RuntimeError::ConfigError(e.to_string()))?;

        if !dns_label.is_match(&self.volume_name) || self.volume_name.len() > 63 {
            return Err(RuntimeError::ConfigError(format!(
                "script.volume_name '{}' is not a valid DNS-1123 label",
                self.volume_name
            )));
        }

        if !dns_suffix.is_match(&self.artifact_suffix) {
            return Err(RuntimeError::ConfigError(format!(
                "script.artifact_suffix '{}' must contain only lowercase alphanumerics and '-'",
                self.artifact_suffix
            )));
        }

        for (field, value) in [
            ("script.script_path_env", &self.script_path_env),
            ("script.runner_env", &self.runner_env),
        ] {
            if !env_name.is_match(value) {
                return Err(RuntimeError::ConfigError(format!(
                    "{} '{}' is not a valid environment variable name",
                    field, value
                )));
            }
        }

        if !self.mount_dir.starts_with('/') {
            return Err(RuntimeError::ConfigError(format!(
                "script.mount_dir '{}' must be an absolute path",
                self.mount_dir
            )));
        }

        if self.script_key.is_empty() || self.script_file_name.is_empty() {
            return Err(RuntimeError::ConfigError(
                "script.script_key and script.script_file_name must not be empty".to_string(),
            ));
        }

        if self.script_file_name.contains('/') {
            return Err(RuntimeError::ConfigError(format!(
                "script.script_file_name '{}' must be a plain file name",
                self.script_file_name
            )));
        }

        if self.trainer_container.is_empty() {
            return Err(RuntimeError::ConfigError(
                "script.trainer_container must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let conf = RuntimeConfig::default();
        assert!(conf.validate().is_ok());
        assert_eq!(conf.script.script_file_path(), "/app/script.py");
        assert_eq!(conf.script.artifact_name("job-a"), "job-a-remote-script");
    }

    #[test]
    fn test_script_file_path_trims_trailing_slash() {
        let conf = ScriptInjectionConfig {
            mount_dir: "/opt/scripts/".to_string(),
            ..Default::default()
        };
        assert_eq!(conf.script_file_path(), "/opt/scripts/script.py");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let conf: RuntimeConfig = toml::from_str(
            r#"
[script]
volume_name = "user-script"
"#,
        )
        .unwrap();

        assert_eq!(conf.script.volume_name, "user-script");
        assert_eq!(conf.script.mount_dir, SCRIPT_MOUNT_DIR);
        assert_eq!(conf.script.runner_env, ENV_RUNNER);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let bad_volume = ScriptInjectionConfig {
            volume_name: "Remote_Script".to_string(),
            ..Default::default()
        };
        assert!(bad_volume.validate().is_err());

        let bad_env = ScriptInjectionConfig {
            script_path_env: "SCRIPT-PATH".to_string(),
            ..Default::default()
        };
        assert!(bad_env.validate().is_err());

        let relative_mount = ScriptInjectionConfig {
            mount_dir: "app".to_string(),
            ..Default::default()
        };
        assert!(relative_mount.validate().is_err());

        let nested_file = ScriptInjectionConfig {
            script_file_name: "bin/script.py".to_string(),
            ..Default::default()
        };
        assert!(nested_file.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[script]\nmount_dir = \"/workspace\"").unwrap();

        let conf = RuntimeConfig::from_file(file.path()).unwrap();
        assert_eq!(conf.script.script_file_path(), "/workspace/script.py");
    }

    #[test]
    fn test_from_file_rejects_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[script]\nrunner_env = \"1RUNNER\"").unwrap();

        let err = RuntimeConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigError(_)));
    }
}
