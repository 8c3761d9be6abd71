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

//! Environment variables injected by the script builder
//!
//! Every container learns where the script is mounted; only the trainer
//! container is additionally switched into runner mode.

use crate::domain::config::ScriptInjectionConfig;
use crate::infrastructure::constants::ENV_RUNNER_ENABLED;
use k8s_openapi::api::core::v1::EnvVar;

pub struct EnvironmentBuilder<'a> {
    config: &'a ScriptInjectionConfig,
}

impl<'a> EnvironmentBuilder<'a> {
    pub fn new(config: &'a ScriptInjectionConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, container_name: &str) -> Vec<EnvVar> {
        let mut env_vars = Vec::new();
        env_vars.extend(self.build_base_env_vars());
        env_vars.extend(self.build_role_env_vars(container_name));
        env_vars
    }

    fn build_base_env_vars(&self) -> Vec<EnvVar> {
        vec![EnvVar {
            name: self.config.script_path_env.clone(),
            value: Some(self.config.script_file_path()),
            ..Default::default()
        }]
    }

    fn build_role_env_vars(&self, container_name: &str) -> Vec<EnvVar> {
        if container_name != self.config.trainer_container {
            return Vec::new();
        }

        vec![EnvVar {
            name: self.config.runner_env.clone(),
            value: Some(ENV_RUNNER_ENABLED.to_string()),
            ..Default::default()
        }]
    }
}
