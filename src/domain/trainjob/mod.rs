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

//! TrainJob custom resource
//!
//! Only the fields read during runtime assembly are modelled here; the full
//! TrainJob schema and its admission validation live with the trainer controller.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[kube(
    group = "trainer.kubeflow.org",
    version = "v1alpha1",
    kind = "TrainJob",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TrainJobSpec {
    pub runtime_ref: RuntimeRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer: Option<Trainer>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_nodes: Option<i32>,
}

impl TrainJob {
    /// Namespace of the job, `default` when unset.
    pub fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }

    pub fn trainer(&self) -> Option<&Trainer> {
        self.spec.trainer.as_ref()
    }
}

impl Trainer {
    pub fn with_command<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_job_yaml() {
        let yaml = r#"
apiVersion: trainer.kubeflow.org/v1alpha1
kind: TrainJob
metadata:
  name: job-a
  namespace: ns
spec:
  runtimeRef:
    name: remote-runtime
  trainer:
    image: python:3.11
    command: ["python", "-c", "print(1)"]
    numNodes: 2
"#;
        let job: TrainJob = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(job.name_any(), "job-a");
        assert_eq!(job.namespace_or_default(), "ns");
        assert_eq!(job.spec.runtime_ref.name, "remote-runtime");

        let trainer = job.trainer().unwrap();
        assert_eq!(trainer.command, vec!["python", "-c", "print(1)"]);
        assert_eq!(trainer.num_nodes, Some(2));
    }

    #[test]
    fn test_trainer_is_optional() {
        let yaml = r#"
apiVersion: trainer.kubeflow.org/v1alpha1
kind: TrainJob
metadata:
  name: job-b
spec:
  runtimeRef:
    name: remote-runtime
"#;
        let job: TrainJob = serde_yaml::from_str(yaml).unwrap();

        assert!(job.trainer().is_none());
        assert_eq!(job.namespace_or_default(), "default");
    }
}
