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

use crate::domain::trainjob::TrainJob;
use crate::infrastructure::kubernetes::resources::pod::template::RuntimeTemplate;
use crate::shared::error::RuntimeError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub fn load_runtime_template(file_path: &str) -> Result<RuntimeTemplate, RuntimeError> {
    let path = resolve_manifest_path(file_path)?;
    let template: RuntimeTemplate = read_yaml(&path, "runtime template")?;

    if template.pod_sets.is_empty() {
        return Err(RuntimeError::ConfigError(format!(
            "Runtime template file {} does not declare any podSets",
            path.display()
        )));
    }

    // Surface duplicate pod set / container names at load time
    template.to_runtime_info().map_err(|e| {
        RuntimeError::ValidationError(format!(
            "Invalid runtime template {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(template)
}

pub fn load_train_job(file_path: &str) -> Result<TrainJob, RuntimeError> {
    let path = resolve_manifest_path(file_path)?;
    let job: TrainJob = read_yaml(&path, "TrainJob")?;

    if job.metadata.name.as_deref().map_or(true, str::is_empty) {
        return Err(RuntimeError::ValidationError(format!(
            "TrainJob manifest {} is missing metadata.name",
            path.display()
        )));
    }

    Ok(job)
}

fn read_yaml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, RuntimeError> {
    if !path.exists() {
        return Err(RuntimeError::ConfigError(format!(
            "{} file does not exist: {}",
            what,
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RuntimeError::ConfigError(format!(
            "Failed to read {} file {}: {}",
            what,
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content).map_err(|e| {
        RuntimeError::ConfigError(format!(
            "Failed to parse {} file {}: {}",
            what,
            path.display(),
            e
        ))
    })
}

pub fn resolve_manifest_path(path: &str) -> Result<PathBuf, RuntimeError> {
    let path = PathBuf::from(path);

    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()
            .map_err(|e| RuntimeError::ConfigError(format!("Cannot get current directory: {}", e)))?
            .join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::ResourceExt;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_runtime_template() {
        let file = write_temp(
            r#"
podSets:
  - name: node
    template:
      spec:
        containers:
          - name: node
"#,
        );
        let template = load_runtime_template(file.path().to_str().unwrap()).unwrap();
        assert_eq!(template.pod_sets.len(), 1);
    }

    #[test]
    fn test_load_runtime_template_without_pod_sets() {
        let file = write_temp("podSets: []\n");
        let err = load_runtime_template(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, RuntimeError::ConfigError(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_train_job("/nonexistent/trainjob.yaml").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_train_job() {
        let file = write_temp(
            r#"
apiVersion: trainer.kubeflow.org/v1alpha1
kind: TrainJob
metadata:
  name: job-a
  namespace: ns
spec:
  runtimeRef:
    name: remote-runtime
  trainer:
    command: ["python", "-c", "print(1)"]
"#,
        );
        let job = load_train_job(file.path().to_str().unwrap()).unwrap();
        assert_eq!(job.name_any(), "job-a");
    }
}
