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

use crate::cli::display::table::ArtifactStatus;
use crate::cli::display::TableRenderer;
use crate::domain::config::{apply_to_runtime_config, RuntimeConfig};
use crate::domain::runtime::{Artifact, AssemblyOutput, RuntimeAssembler};
use crate::domain::trainjob::TrainJob;
use crate::infrastructure::constants::CONF_FILE_ENV;
use crate::infrastructure::kubernetes::client::{
    DeleteOutcome, TrainerKubeClient, TrainerKubeClientImpl,
};
use crate::infrastructure::kubernetes::resources::pod::{
    load_runtime_template, load_train_job, BuildContext, RuntimeTemplate,
};
use crate::shared::error::RuntimeError;
use clap::{Args, Parser};
use kube::ResourceExt;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Inputs shared by every command that runs an assembly pass
#[derive(Args, Debug, Clone)]
pub struct AssemblyArgs {
    /// TrainJob manifest (YAML)
    #[arg(long, short = 'j', value_name = "PATH")]
    pub job: String,

    /// Runtime template with the pod sets of the training runtime (YAML)
    #[arg(long, short = 't', value_name = "PATH")]
    pub template: String,

    /// Path to runtime configuration file (trainjob-runtime.toml)
    /// If not provided, TRAINJOB_RUNTIME_CONF is used, then built-in defaults
    #[arg(long, value_name = "PATH")]
    pub config_file: Option<String>,

    /// Dynamic configuration properties to override any settings (-D key=value)
    ///
    /// Script: runtime.script.key, runtime.script.volume-name, runtime.script.mount-dir,
    /// runtime.script.file-name, runtime.script.path-env, runtime.script.runner-env,
    /// runtime.script.trainer-container, runtime.script.artifact-suffix
    ///
    /// Example: -Druntime.script.mount-dir=/workspace
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

/// Result of one assembly pass, ready to be printed or applied
pub struct AssembledRuntime {
    pub job: TrainJob,
    pub template: RuntimeTemplate,
    pub output: AssemblyOutput,
}

impl AssemblyArgs {
    pub fn load_config(&self) -> anyhow::Result<RuntimeConfig> {
        let mut conf = if let Some(ref config_path) = self.config_file {
            RuntimeConfig::from_file(config_path)?
        } else if let Ok(env_path) = std::env::var(CONF_FILE_ENV) {
            RuntimeConfig::from_file(&env_path)?
        } else {
            debug!("No configuration file specified, using default settings");
            RuntimeConfig::default()
        };

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_runtime_config(&dynamic_configs, &mut conf);
        }

        conf.validate()?;
        Ok(conf)
    }

    pub fn assemble(&self, ctx: &BuildContext) -> anyhow::Result<AssembledRuntime> {
        let conf = self.load_config()?;
        let job = load_train_job(&self.job)?;
        let mut template = load_runtime_template(&self.template)?;

        let assembler = RuntimeAssembler::with_default_builders(&conf)?;
        let mut runtime_info = template.to_runtime_info()?;
        let output = assembler.assemble(ctx, &mut runtime_info, &job)?;
        template.apply_runtime_info(&runtime_info)?;

        Ok(AssembledRuntime {
            job,
            template,
            output,
        })
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    #[command(flatten)]
    pub assembly: AssemblyArgs,

    /// Print a summary of builders and artifacts to stderr
    #[arg(long)]
    pub summary: bool,
}

impl RenderCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let ctx = BuildContext::with_cancellation(cancel_on_ctrl_c());
        let assembled = self.assembly.assemble(&ctx)?;

        print!(
            "{}",
            render_manifests(&assembled.output.artifacts, &assembled.template)?
        );

        if self.summary {
            eprintln!("{}", render_summary(&assembled));
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct ApplyCommand {
    #[command(flatten)]
    pub assembly: AssemblyArgs,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    #[arg(long)]
    pub context: Option<String>,
}

impl ApplyCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let token = cancel_on_ctrl_c();
        let ctx = BuildContext::with_cancellation(token.clone());
        let assembled = self.assembly.assemble(&ctx)?;

        let client = TrainerKubeClientImpl::new_with_config(
            assembled.job.namespace_or_default(),
            self.kubeconfig.clone(),
            self.context.clone(),
        )
        .await?;

        tokio::select! {
            result = client.apply_artifacts(&assembled.output.artifacts) => result?,
            _ = token.cancelled() => {
                return Err(RuntimeError::Cancelled("apply".to_string()).into());
            }
        }

        info!(
            job = %assembled.job.name_any(),
            artifacts = assembled.output.artifacts.len(),
            "Runtime artifacts applied"
        );
        println!("{}", render_summary(&assembled));
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct StatusCommand {
    #[command(flatten)]
    pub assembly: AssemblyArgs,

    #[arg(long)]
    pub kubeconfig: Option<String>,

    #[arg(long)]
    pub context: Option<String>,
}

impl StatusCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let assembled = self.assembly.assemble(&BuildContext::new())?;
        let client = TrainerKubeClientImpl::new_with_config(
            assembled.job.namespace_or_default(),
            self.kubeconfig.clone(),
            self.context.clone(),
        )
        .await?;

        let mut statuses = Vec::new();
        for artifact in &assembled.output.artifacts {
            let name = artifact.name().unwrap_or_default().to_string();
            let exists = match artifact {
                Artifact::ConfigMap(_) => match client.get_configmap(&name).await {
                    Ok(_) => true,
                    Err(RuntimeError::NotFound { .. }) => false,
                    Err(e) => return Err(e.into()),
                },
            };
            statuses.push(ArtifactStatus {
                kind: artifact.kind().to_string(),
                name,
                namespace: client.namespace().to_string(),
                exists,
            });
        }

        println!("{}", TableRenderer::new().render_artifact_status(&statuses));
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    #[command(flatten)]
    pub assembly: AssemblyArgs,

    #[arg(long)]
    pub kubeconfig: Option<String>,

    #[arg(long)]
    pub context: Option<String>,
}

impl DeleteCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let assembled = self.assembly.assemble(&BuildContext::new())?;
        let client = TrainerKubeClientImpl::new_with_config(
            assembled.job.namespace_or_default(),
            self.kubeconfig.clone(),
            self.context.clone(),
        )
        .await?;

        let artifacts = &assembled.output.artifacts;
        let outcomes = client
            .delete_artifacts(artifacts)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete artifacts: {}", e))?;

        for (artifact, outcome) in artifacts.iter().zip(outcomes) {
            let name = artifact.name().unwrap_or_default();
            match outcome {
                DeleteOutcome::Deleted => println!("Deleted {} {}", artifact.kind(), name),
                DeleteOutcome::Absent => println!("Skipped {} {}: not found", artifact.kind(), name),
            }
        }
        Ok(())
    }
}

/// Renders artifacts followed by the assembled runtime template as a YAML stream.
pub fn render_manifests(
    artifacts: &[Artifact],
    template: &RuntimeTemplate,
) -> Result<String, RuntimeError> {
    let mut output = String::new();
    for artifact in artifacts {
        output.push_str("---\n");
        output.push_str(&serde_yaml::to_string(artifact)?);
    }
    output.push_str("---\n");
    output.push_str(&serde_yaml::to_string(template)?);
    Ok(output)
}

fn render_summary(assembled: &AssembledRuntime) -> String {
    TableRenderer::new().render_assembly_summary(
        &assembled.job.name_any(),
        &assembled.job.namespace_or_default(),
        &assembled.output.reports,
        &assembled.output.artifacts,
    )
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

/// Parse dynamic configuration properties from -D key=value format
fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            ));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in config: '{}'", config));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}
