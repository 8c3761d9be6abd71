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

use crate::domain::runtime::Artifact;
use crate::infrastructure::constants::{APPLY_MAX_RETRIES, APPLY_RETRY_MIN_DELAY, FIELD_MANAGER};
use crate::shared::error::RuntimeError;
use backon::{ExponentialBuilder, Retryable};
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use tracing::{debug, info, warn};

/// What happened to one artifact during [`TrainerKubeClient::delete_artifacts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The artifact was already gone.
    Absent,
}

#[async_trait::async_trait]
pub trait TrainerKubeClient: Send + Sync {
    async fn apply_configmap(&self, configmap: &ConfigMap) -> Result<(), RuntimeError>;

    async fn get_configmap(&self, name: &str) -> Result<ConfigMap, RuntimeError>;

    /// Fails with [`RuntimeError::NotFound`] when the ConfigMap does not exist.
    async fn delete_configmap(&self, name: &str) -> Result<(), RuntimeError>;

    /// Submits builder artifacts, retrying transient API failures.
    async fn apply_artifacts(&self, artifacts: &[Artifact]) -> Result<(), RuntimeError> {
        for artifact in artifacts {
            match artifact {
                Artifact::ConfigMap(cm) => {
                    let backoff = ExponentialBuilder::default()
                        .with_min_delay(APPLY_RETRY_MIN_DELAY)
                        .with_max_times(APPLY_MAX_RETRIES);
                    (|| async { self.apply_configmap(cm).await })
                        .retry(&backoff)
                        .sleep(tokio::time::sleep)
                        .when(|e: &RuntimeError| e.is_transient())
                        .notify(|e: &RuntimeError, delay| {
                            warn!(
                                configmap = artifact.name().unwrap_or_default(),
                                error = %e,
                                ?delay,
                                "Retrying artifact apply"
                            );
                        })
                        .await?;
                }
            }
            info!(
                kind = artifact.kind(),
                name = artifact.name().unwrap_or_default(),
                namespace = artifact.namespace().unwrap_or_default(),
                "Applied artifact"
            );
        }
        Ok(())
    }

    /// Deletes builder artifacts in order.
    ///
    /// An artifact that no longer exists is reported as [`DeleteOutcome::Absent`];
    /// any other failure aborts the remaining deletions.
    async fn delete_artifacts(
        &self,
        artifacts: &[Artifact],
    ) -> Result<Vec<DeleteOutcome>, RuntimeError> {
        let mut outcomes = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let name = artifact.name().unwrap_or_default();
            let result = match artifact {
                Artifact::ConfigMap(_) => self.delete_configmap(name).await,
            };
            let outcome = match result {
                Ok(()) => DeleteOutcome::Deleted,
                Err(RuntimeError::NotFound { .. }) => {
                    debug!(kind = artifact.kind(), name, "Artifact already absent");
                    DeleteOutcome::Absent
                }
                Err(e) => return Err(e),
            };
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

pub struct TrainerKubeClientImpl {
    client: Client,
    namespace: String,
}

impl TrainerKubeClientImpl {
    pub async fn new(namespace: String) -> Result<Self, RuntimeError> {
        let client = Client::try_default().await.map_err(|e| {
            RuntimeError::config_error(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    pub async fn new_with_config(
        namespace: String,
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, RuntimeError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path).map_err(|e| {
                RuntimeError::config_error(format!("Failed to load kubeconfig: {}", e))
            })?
        } else {
            Kubeconfig::read().map_err(|e| {
                RuntimeError::config_error(format!("Failed to load kubeconfig: {}", e))
            })?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                RuntimeError::config_error(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            RuntimeError::config_error(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client, namespace })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // Artifacts carry their own namespace; fall back to the client's.
    fn configmap_api(&self, configmap: Option<&ConfigMap>) -> Api<ConfigMap> {
        let namespace = configmap
            .and_then(|cm| cm.metadata.namespace.as_deref())
            .unwrap_or(&self.namespace);
        Api::namespaced(self.client.clone(), namespace)
    }

    fn map_not_found(&self, err: kube::Error, resource_type: &str, name: &str) -> RuntimeError {
        match err {
            kube::Error::Api(ae) if ae.code == 404 => {
                RuntimeError::not_found(resource_type, name, &self.namespace)
            }
            other => other.into(),
        }
    }
}

#[async_trait::async_trait]
impl TrainerKubeClient for TrainerKubeClientImpl {
    async fn apply_configmap(&self, configmap: &ConfigMap) -> Result<(), RuntimeError> {
        let api = self.configmap_api(Some(configmap));
        let name = configmap
            .metadata
            .name
            .as_ref()
            .ok_or_else(|| RuntimeError::validation_error("ConfigMap name is required"))?;

        match api.get(name).await {
            Ok(_) => {
                let patch_params = kube::api::PatchParams::apply(FIELD_MANAGER).force();
                let patch = serde_json::to_value(configmap)?;
                api.patch(name, &patch_params, &kube::api::Patch::Apply(patch))
                    .await?;
            }
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                let pp = kube::api::PostParams::default();
                api.create(&pp, configmap).await?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn get_configmap(&self, name: &str) -> Result<ConfigMap, RuntimeError> {
        let api = self.configmap_api(None);
        api.get(name)
            .await
            .map_err(|e| self.map_not_found(e, "ConfigMap", name))
    }

    async fn delete_configmap(&self, name: &str) -> Result<(), RuntimeError> {
        let api = self.configmap_api(None);
        let dp = kube::api::DeleteParams::default();

        api.delete(name, &dp)
            .await
            .map_err(|e| self.map_not_found(e, "ConfigMap", name))?;
        Ok(())
    }
}
