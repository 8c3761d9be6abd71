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

//! Mutable pod template shared by component builders during one assembly pass.

use k8s_openapi::api::core::v1::{EnvVar, Volume, VolumeMount};

/// Everything a component builder may read or write for one job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeInfo {
    pub template_spec: TemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateSpec {
    pub pod_sets: Vec<PodSet>,
}

/// A group of identical pods. Volumes are shared by all containers of the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodSet {
    pub name: String,
    pub count: Option<i32>,
    pub volumes: Vec<Volume>,
    /// Unique by name within the pod set.
    pub containers: Vec<ContainerTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerTemplate {
    pub name: String,
    pub volume_mounts: Vec<VolumeMount>,
    pub env: Vec<EnvVar>,
}

impl RuntimeInfo {
    pub fn new(pod_sets: Vec<PodSet>) -> Self {
        Self {
            template_spec: TemplateSpec { pod_sets },
        }
    }

    pub fn pod_set(&self, name: &str) -> Option<&PodSet> {
        self.template_spec.pod_sets.iter().find(|ps| ps.name == name)
    }
}

impl PodSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_count(mut self, count: i32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_container(mut self, container: ContainerTemplate) -> Self {
        self.containers.push(container);
        self
    }

    pub fn container(&self, name: &str) -> Option<&ContainerTemplate> {
        self.containers.iter().find(|c| c.name == name)
    }

    pub fn volume(&self, name: &str) -> Option<&Volume> {
        self.volumes.iter().find(|v| v.name == name)
    }
}

impl ContainerTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn env_var(&self, name: &str) -> Option<&EnvVar> {
        self.env.iter().find(|e| e.name == name)
    }

    pub fn volume_mount(&self, name: &str) -> Option<&VolumeMount> {
        self.volume_mounts.iter().find(|m| m.name == name)
    }
}
