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

use crate::domain::runtime::{ContainerTemplate, PodSet, RuntimeInfo};
use crate::infrastructure::kubernetes::resources::pod::merger::upsert_optional;
use crate::shared::error::{Result, RuntimeError};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pod sets of a training runtime as written on disk.
///
/// ```yaml
/// podSets:
///   - name: node
///     count: 2
///     template:
///       spec:
///         containers:
///           - name: node
///             image: python:3.11
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeTemplate {
    #[serde(default)]
    pub pod_sets: Vec<PodSetTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSetTemplate {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(default)]
    pub template: PodTemplateSpec,
}

impl RuntimeTemplate {
    /// Extracts the mutable view handed to component builders.
    pub fn to_runtime_info(&self) -> Result<RuntimeInfo> {
        let mut seen = HashSet::new();
        let mut pod_sets = Vec::with_capacity(self.pod_sets.len());

        for pod_set in &self.pod_sets {
            if !seen.insert(pod_set.name.as_str()) {
                return Err(RuntimeError::ValidationError(format!(
                    "Duplicate pod set name '{}' in runtime template",
                    pod_set.name
                )));
            }
            pod_sets.push(pod_set.to_pod_set()?);
        }

        Ok(RuntimeInfo::new(pod_sets))
    }

    /// Writes the assembled pod sets back onto the matching pod templates.
    ///
    /// Entries are upserted by name, so volumes, mounts and env vars that exist
    /// only in the template are kept.
    pub fn apply_runtime_info(&mut self, info: &RuntimeInfo) -> Result<()> {
        for pod_set in &info.template_spec.pod_sets {
            let target = self
                .pod_sets
                .iter_mut()
                .find(|ps| ps.name == pod_set.name)
                .ok_or_else(|| {
                    RuntimeError::ValidationError(format!(
                        "Pod set '{}' does not exist in runtime template",
                        pod_set.name
                    ))
                })?;
            target.apply_pod_set(pod_set)?;
        }
        Ok(())
    }

    pub fn pod_set(&self, name: &str) -> Option<&PodSetTemplate> {
        self.pod_sets.iter().find(|ps| ps.name == name)
    }
}

impl PodSetTemplate {
    fn pod_spec(&self) -> Option<&PodSpec> {
        self.template.spec.as_ref()
    }

    fn to_pod_set(&self) -> Result<PodSet> {
        let mut pod_set = PodSet {
            name: self.name.clone(),
            count: self.count,
            ..Default::default()
        };

        let Some(spec) = self.pod_spec() else {
            return Ok(pod_set);
        };

        pod_set.volumes = spec.volumes.clone().unwrap_or_default();

        let mut seen = HashSet::new();
        for container in &spec.containers {
            if !seen.insert(container.name.as_str()) {
                return Err(RuntimeError::ValidationError(format!(
                    "Duplicate container name '{}' in pod set '{}'",
                    container.name, self.name
                )));
            }
            pod_set.containers.push(ContainerTemplate {
                name: container.name.clone(),
                volume_mounts: container.volume_mounts.clone().unwrap_or_default(),
                env: container.env.clone().unwrap_or_default(),
            });
        }

        Ok(pod_set)
    }

    fn apply_pod_set(&mut self, pod_set: &PodSet) -> Result<()> {
        let spec = self.template.spec.get_or_insert_with(PodSpec::default);

        for volume in &pod_set.volumes {
            upsert_optional(&mut spec.volumes, volume.clone());
        }

        for container_template in &pod_set.containers {
            let container = spec
                .containers
                .iter_mut()
                .find(|c| c.name == container_template.name)
                .ok_or_else(|| {
                    RuntimeError::ValidationError(format!(
                        "Container '{}' does not exist in pod set '{}'",
                        container_template.name, pod_set.name
                    ))
                })?;

            for mount in &container_template.volume_mounts {
                upsert_optional(&mut container.volume_mounts, mount.clone());
            }
            for env_var in &container_template.env {
                upsert_optional(&mut container.env, env_var.clone());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{EnvVar, Volume};

    const TEMPLATE: &str = r#"
podSets:
  - name: node
    count: 2
    template:
      spec:
        volumes:
          - name: dataset
            emptyDir: {}
        containers:
          - name: node
            image: python:3.11
            env:
              - name: EPOCHS
                value: "10"
          - name: sidecar
            image: busybox
"#;

    fn template() -> RuntimeTemplate {
        serde_yaml::from_str(TEMPLATE).unwrap()
    }

    #[test]
    fn test_to_runtime_info() {
        let info = template().to_runtime_info().unwrap();

        let pod_set = info.pod_set("node").unwrap();
        assert_eq!(pod_set.count, Some(2));
        assert_eq!(pod_set.volumes.len(), 1);
        assert_eq!(pod_set.containers.len(), 2);
        assert!(pod_set.container("node").unwrap().env_var("EPOCHS").is_some());
        assert!(pod_set.container("sidecar").unwrap().env.is_empty());
    }

    #[test]
    fn test_duplicate_container_rejected() {
        let mut template = template();
        let spec = template.pod_sets[0].template.spec.as_mut().unwrap();
        let duplicate = spec.containers[0].clone();
        spec.containers.push(duplicate);

        assert!(matches!(
            template.to_runtime_info(),
            Err(RuntimeError::ValidationError(_))
        ));
    }

    #[test]
    fn test_duplicate_pod_set_rejected() {
        let mut template = template();
        let duplicate = template.pod_sets[0].clone();
        template.pod_sets.push(duplicate);

        assert!(template.to_runtime_info().is_err());
    }

    #[test]
    fn test_apply_runtime_info_round_trip_keeps_template_fields() {
        let mut template = template();
        let mut info = template.to_runtime_info().unwrap();

        let pod_set = &mut info.template_spec.pod_sets[0];
        pod_set.volumes.push(Volume {
            name: "scratch".to_string(),
            ..Default::default()
        });
        pod_set.containers[1].env.push(EnvVar {
            name: "MODE".to_string(),
            value: Some("sidecar".to_string()),
            ..Default::default()
        });

        template.apply_runtime_info(&info).unwrap();
        template.apply_runtime_info(&info).unwrap();

        let spec = template.pod_sets[0].template.spec.as_ref().unwrap();
        let volumes: Vec<&str> = spec
            .volumes
            .as_ref()
            .unwrap()
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(volumes, vec!["dataset", "scratch"]);
        assert_eq!(spec.containers[0].image.as_deref(), Some("python:3.11"));
        assert_eq!(spec.containers[1].env.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_apply_unknown_pod_set_fails() {
        let mut template = template();
        let info = RuntimeInfo::new(vec![PodSet::new("launcher")]);

        assert!(template.apply_runtime_info(&info).is_err());
    }
}
