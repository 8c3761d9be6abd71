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

use k8s_openapi::api::core::v1::ConfigMap;
use serde::Serialize;

/// A declarative object produced by a component builder.
///
/// Artifacts are not part of the pod template; the caller submits them to the
/// cluster alongside the assembled workload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Artifact {
    ConfigMap(ConfigMap),
}

impl Artifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::ConfigMap(_) => "ConfigMap",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Artifact::ConfigMap(cm) => cm.metadata.name.as_deref(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            Artifact::ConfigMap(cm) => cm.metadata.namespace.as_deref(),
        }
    }

    pub fn as_config_map(&self) -> Option<&ConfigMap> {
        match self {
            Artifact::ConfigMap(cm) => Some(cm),
        }
    }
}

impl From<ConfigMap> for Artifact {
    fn from(cm: ConfigMap) -> Self {
        Artifact::ConfigMap(cm)
    }
}
