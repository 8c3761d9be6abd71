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

//! Script injection builder
//!
//! Takes the inline script from `trainer.command[2]` (as in
//! `["python", "-c", "<script>"]`), publishes it as a ConfigMap and mounts that
//! ConfigMap into every container of every pod set.

use super::env::EnvironmentBuilder;
use super::traits::{BuildContext, ComponentBuilder};
use crate::domain::config::ScriptInjectionConfig;
use crate::domain::runtime::{Artifact, RuntimeInfo};
use crate::domain::trainjob::TrainJob;
use crate::infrastructure::constants::{BUILDER_NAME_REMOTE, SCRIPT_COMMAND_INDEX};
use crate::infrastructure::kubernetes::resources::configmap::ScriptConfigMapBuilder;
use crate::infrastructure::kubernetes::resources::pod::merger::{
    upsert_all, upsert_volume_mounts, upsert_volumes,
};
use crate::shared::error::{Result, RuntimeError};
use k8s_openapi::api::core::v1::{ConfigMapVolumeSource, Volume, VolumeMount};
use kube::ResourceExt;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ScriptInjectionBuilder {
    config: ScriptInjectionConfig,
}

impl ScriptInjectionBuilder {
    pub fn new(config: ScriptInjectionConfig) -> Self {
        Self { config }
    }

    fn extract_script<'c>(&self, job: &TrainJob, command: &'c [String]) -> Result<&'c str> {
        command
            .get(SCRIPT_COMMAND_INDEX)
            .map(String::as_str)
            .ok_or_else(|| {
                debug!(
                    job = %job.name_any(),
                    len = command.len(),
                    "Trainer command too short for script injection"
                );
                RuntimeError::MalformedCommand {
                    builder: self.name().to_string(),
                    command: command.to_vec(),
                }
            })
    }

    fn build_volume(&self, configmap_name: &str) -> Volume {
        Volume {
            name: self.config.volume_name.clone(),
            config_map: Some(ConfigMapVolumeSource {
                name: configmap_name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn build_volume_mount(&self) -> VolumeMount {
        VolumeMount {
            name: self.config.volume_name.clone(),
            mount_path: self.config.mount_dir.clone(),
            ..Default::default()
        }
    }
}

impl ComponentBuilder for ScriptInjectionBuilder {
    fn name(&self) -> &str {
        BUILDER_NAME_REMOTE
    }

    fn build(
        &self,
        ctx: &BuildContext,
        info: Option<&mut RuntimeInfo>,
        job: Option<&TrainJob>,
    ) -> Result<Vec<Artifact>> {
        let (Some(info), Some(job)) = (info, job) else {
            return Ok(Vec::new());
        };
        let Some(trainer) = job.trainer() else {
            return Ok(Vec::new());
        };

        let script = self.extract_script(job, &trainer.command)?;
        ctx.check_cancelled(self.name())?;

        let configmap_builder = ScriptConfigMapBuilder::new(&self.config, job);
        let configmap_name = configmap_builder.name();
        let configmap = configmap_builder.build(script);

        let volume = self.build_volume(&configmap_name);
        let mount = self.build_volume_mount();
        let env_builder = EnvironmentBuilder::new(&self.config);

        for pod_set in info.template_spec.pod_sets.iter_mut() {
            upsert_volumes(&mut pod_set.volumes, volume.clone());

            for container in pod_set.containers.iter_mut() {
                upsert_volume_mounts(&mut container.volume_mounts, mount.clone());
                upsert_all(&mut container.env, env_builder.build(&container.name));
            }

            debug!(
                pod_set = %pod_set.name,
                containers = pod_set.containers.len(),
                volume = %self.config.volume_name,
                "Injected script volume"
            );
        }

        info!(
            job = %job.name_any(),
            configmap = %configmap_name,
            pod_sets = info.template_spec.pod_sets.len(),
            "Script injected into runtime template"
        );

        Ok(vec![Artifact::ConfigMap(configmap)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::runtime::{ContainerTemplate, PodSet};
    use crate::domain::trainjob::{RuntimeRef, TrainJobSpec, Trainer};
    use k8s_openapi::api::core::v1::EnvVar;
    use tokio_util::sync::CancellationToken;

    fn job_with_command(command: &[&str]) -> TrainJob {
        let mut job = TrainJob::new(
            "job-a",
            TrainJobSpec {
                runtime_ref: RuntimeRef {
                    name: "remote-runtime".to_string(),
                    ..Default::default()
                },
                trainer: Some(Trainer::with_command(command.iter().copied())),
            },
        );
        job.metadata.namespace = Some("ns".to_string());
        job
    }

    fn info_with_containers(names: &[&str]) -> RuntimeInfo {
        let pod_set = names
            .iter()
            .fold(PodSet::new("node"), |ps, name| {
                ps.with_container(ContainerTemplate::new(*name))
            });
        RuntimeInfo::new(vec![pod_set])
    }

    #[test]
    fn test_name() {
        assert_eq!(ScriptInjectionBuilder::default().name(), "remote");
    }

    #[test]
    fn test_absent_inputs_are_noop() {
        let builder = ScriptInjectionBuilder::default();
        let ctx = BuildContext::new();
        let job = job_with_command(&["python", "-c", "print(1)"]);
        let mut info = info_with_containers(&["node"]);
        let original = info.clone();

        assert!(builder.build(&ctx, None, Some(&job)).unwrap().is_empty());
        assert!(builder.build(&ctx, Some(&mut info), None).unwrap().is_empty());
        assert_eq!(info, original);

        let mut no_trainer = job.clone();
        no_trainer.spec.trainer = None;
        assert!(builder
            .build(&ctx, Some(&mut info), Some(&no_trainer))
            .unwrap()
            .is_empty());
        assert_eq!(info, original);
    }

    #[test]
    fn test_short_command_fails_without_mutation() {
        let builder = ScriptInjectionBuilder::default();
        let ctx = BuildContext::new();

        for command in [vec![], vec!["python"], vec!["python", "-c"]] {
            let job = job_with_command(&command);
            let mut info = info_with_containers(&["node"]);
            let original = info.clone();

            let err = builder
                .build(&ctx, Some(&mut info), Some(&job))
                .unwrap_err();
            match err {
                RuntimeError::MalformedCommand { builder, command: got } => {
                    assert_eq!(builder, "remote");
                    assert_eq!(got, command);
                }
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(info, original);
        }
    }

    #[test]
    fn test_long_command_uses_third_element() {
        let builder = ScriptInjectionBuilder::default();
        let job = job_with_command(&["python", "-c", "print(2)", "--extra"]);
        let mut info = info_with_containers(&["node"]);

        let artifacts = builder
            .build(&BuildContext::new(), Some(&mut info), Some(&job))
            .unwrap();
        let data = artifacts[0].as_config_map().unwrap().data.clone().unwrap();
        assert_eq!(data["script.py"], "print(2)");
    }

    #[test]
    fn test_cancelled_context_leaves_template_untouched() {
        let builder = ScriptInjectionBuilder::default();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = BuildContext::with_cancellation(token);
        let job = job_with_command(&["python", "-c", "print(1)"]);
        let mut info = info_with_containers(&["node"]);
        let original = info.clone();

        let err = builder
            .build(&ctx, Some(&mut info), Some(&job))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Cancelled(_)));
        assert_eq!(info, original);
    }

    #[test]
    fn test_preserves_entries_owned_by_others() {
        let builder = ScriptInjectionBuilder::default();
        let job = job_with_command(&["python", "-c", "print(1)"]);
        let mut info = info_with_containers(&["node"]);
        {
            let pod_set = &mut info.template_spec.pod_sets[0];
            pod_set.volumes.push(Volume {
                name: "dataset".to_string(),
                ..Default::default()
            });
            pod_set.containers[0].env.push(EnvVar {
                name: "EPOCHS".to_string(),
                value: Some("10".to_string()),
                ..Default::default()
            });
        }

        builder
            .build(&BuildContext::new(), Some(&mut info), Some(&job))
            .unwrap();

        let pod_set = &info.template_spec.pod_sets[0];
        assert_eq!(pod_set.volumes[0].name, "dataset");
        assert_eq!(pod_set.volumes[1].name, "remote-script");
        let container = &pod_set.containers[0];
        assert_eq!(container.env[0].name, "EPOCHS");
        assert!(container.env_var("SCRIPT_PATH").is_some());
        assert!(container.env_var("RUNNER").is_some());
    }

    #[test]
    fn test_custom_config_names() {
        let builder = ScriptInjectionBuilder::new(ScriptInjectionConfig {
            volume_name: "user-code".to_string(),
            mount_dir: "/workspace".to_string(),
            trainer_container: "trainer".to_string(),
            ..Default::default()
        });
        let job = job_with_command(&["python", "-c", "print(1)"]);
        let mut info = info_with_containers(&["trainer", "node"]);

        builder
            .build(&BuildContext::new(), Some(&mut info), Some(&job))
            .unwrap();

        let pod_set = &info.template_spec.pod_sets[0];
        assert!(pod_set.volume("user-code").is_some());

        let trainer = pod_set.container("trainer").unwrap();
        assert_eq!(
            trainer.volume_mount("user-code").unwrap().mount_path,
            "/workspace"
        );
        assert_eq!(
            trainer.env_var("SCRIPT_PATH").unwrap().value.as_deref(),
            Some("/workspace/script.py")
        );
        assert!(trainer.env_var("RUNNER").is_some());
        assert!(pod_set.container("node").unwrap().env_var("RUNNER").is_none());
    }
}
