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

use crate::domain::config::ScriptInjectionConfig;
use crate::domain::trainjob::TrainJob;
use crate::infrastructure::constants::*;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Builds the ConfigMap that carries a job's inline script.
///
/// Name, labels and owner reference depend only on the job identity, so
/// rebuilding for the same job yields an identical object.
pub struct ScriptConfigMapBuilder<'a> {
    config: &'a ScriptInjectionConfig,
    job_name: String,
    namespace: String,
    job_uid: Option<String>,
}

impl<'a> ScriptConfigMapBuilder<'a> {
    pub fn new(config: &'a ScriptInjectionConfig, job: &TrainJob) -> Self {
        Self {
            config,
            job_name: job.name_any(),
            namespace: job.namespace_or_default(),
            job_uid: job.uid(),
        }
    }

    pub fn name(&self) -> String {
        self.config.artifact_name(&self.job_name)
    }

    pub fn build(&self, script: &str) -> ConfigMap {
        let metadata = ObjectMeta {
            name: Some(self.name()),
            namespace: Some(self.namespace.clone()),
            labels: Some(self.get_labels()),
            owner_references: self.build_owner_references(),
            ..Default::default()
        };

        let mut data = BTreeMap::new();
        data.insert(self.config.script_key.clone(), script.to_string());

        ConfigMap {
            metadata,
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn get_labels(&self) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        labels.insert(
            LABEL_MANAGED_BY.to_string(),
            LABEL_MANAGED_BY_VALUE.to_string(),
        );
        labels.insert(LABEL_TRAINJOB_NAME.to_string(), self.job_name.clone());
        labels.insert(
            LABEL_COMPONENT.to_string(),
            COMPONENT_REMOTE_SCRIPT.to_string(),
        );
        labels
    }

    // The script is garbage collected together with its TrainJob.
    fn build_owner_references(&self) -> Option<Vec<OwnerReference>> {
        let uid = self.job_uid.clone()?;
        Some(vec![OwnerReference {
            api_version: TRAINJOB_API_VERSION.to_string(),
            kind: TRAINJOB_KIND.to_string(),
            name: self.job_name.clone(),
            uid,
            controller: Some(true),
            block_owner_deletion: Some(true),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trainjob::{RuntimeRef, TrainJobSpec, Trainer};

    fn job(uid: Option<&str>) -> TrainJob {
        let mut job = TrainJob::new(
            "job-a",
            TrainJobSpec {
                runtime_ref: RuntimeRef {
                    name: "remote".to_string(),
                    ..Default::default()
                },
                trainer: Some(Trainer::with_command(["python", "-c", "print(1)"])),
            },
        );
        job.metadata.namespace = Some("ns".to_string());
        job.metadata.uid = uid.map(str::to_string);
        job
    }

    #[test]
    fn test_build_script_configmap() {
        let config = ScriptInjectionConfig::default();
        let job = job(None);
        let cm = ScriptConfigMapBuilder::new(&config, &job).build("print(1)");

        assert_eq!(cm.metadata.name.as_deref(), Some("job-a-remote-script"));
        assert_eq!(cm.metadata.namespace.as_deref(), Some("ns"));
        assert!(cm.metadata.owner_references.is_none());

        let data = cm.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("script.py").map(String::as_str), Some("print(1)"));

        let labels = cm.metadata.labels.unwrap();
        assert_eq!(labels.get(LABEL_TRAINJOB_NAME).map(String::as_str), Some("job-a"));
    }

    #[test]
    fn test_owner_reference_when_uid_known() {
        let config = ScriptInjectionConfig::default();
        let job = job(Some("1234-abcd"));
        let cm = ScriptConfigMapBuilder::new(&config, &job).build("print(1)");

        let owners = cm.metadata.owner_references.unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].kind, "TrainJob");
        assert_eq!(owners[0].name, "job-a");
        assert_eq!(owners[0].uid, "1234-abcd");
    }
}
