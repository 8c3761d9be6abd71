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

use crate::domain::config::RuntimeConfig;
use std::collections::HashMap;
use tracing::warn;

const PREFIX: &str = "runtime.";

/// Applies `-D key=value` overrides on top of the loaded configuration.
///
/// Keys outside the `runtime.` namespace are left for other consumers; unknown
/// `runtime.*` keys are reported and skipped.
pub fn apply_to_runtime_config(configs: &HashMap<String, String>, conf: &mut RuntimeConfig) {
    let mut keys: Vec<&String> = configs.keys().collect();
    keys.sort();

    for key in keys {
        let value = &configs[key];
        let script = &mut conf.script;

        match key.as_str() {
            "runtime.script.key" => script.script_key = value.clone(),
            "runtime.script.volume-name" => script.volume_name = value.clone(),
            "runtime.script.mount-dir" => script.mount_dir = value.clone(),
            "runtime.script.file-name" => script.script_file_name = value.clone(),
            "runtime.script.path-env" => script.script_path_env = value.clone(),
            "runtime.script.runner-env" => script.runner_env = value.clone(),
            "runtime.script.trainer-container" => script.trainer_container = value.clone(),
            "runtime.script.artifact-suffix" => script.artifact_suffix = value.clone(),
            other if other.starts_with(PREFIX) => {
                warn!(key = other, "Ignoring unknown runtime property");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_script_overrides() {
        let mut conf = RuntimeConfig::default();
        apply_to_runtime_config(
            &props(&[
                ("runtime.script.mount-dir", "/workspace"),
                ("runtime.script.trainer-container", "trainer"),
                ("runtime.script.volume-name", "job-script"),
            ]),
            &mut conf,
        );

        assert_eq!(conf.script.mount_dir, "/workspace");
        assert_eq!(conf.script.trainer_container, "trainer");
        assert_eq!(conf.script.volume_name, "job-script");
        assert_eq!(conf.script.script_key, "script.py");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut conf = RuntimeConfig::default();
        apply_to_runtime_config(
            &props(&[("runtime.script.colour", "blue"), ("other.key", "x")]),
            &mut conf,
        );

        assert_eq!(conf, RuntimeConfig::default());
    }
}
