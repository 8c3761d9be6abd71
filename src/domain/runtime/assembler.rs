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

use crate::domain::config::RuntimeConfig;
use crate::domain::runtime::{Artifact, RuntimeInfo};
use crate::domain::trainjob::TrainJob;
use crate::infrastructure::kubernetes::resources::pod::builders::{
    BuildContext, ComponentBuilder, ScriptInjectionBuilder,
};
use crate::shared::error::{Result, RuntimeError};
use kube::ResourceExt;
use tracing::{debug, info, warn};

/// Ordered registry of component builders for one runtime.
///
/// Builders run one after another in registration order against the same
/// [`RuntimeInfo`]. A pass owns its `RuntimeInfo` exclusively; concurrent passes
/// must each use their own.
#[derive(Default)]
pub struct RuntimeAssembler {
    builders: Vec<Box<dyn ComponentBuilder>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyOutput {
    pub artifacts: Vec<Artifact>,
    pub reports: Vec<BuilderReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderReport {
    pub builder: String,
    pub artifacts: usize,
}

impl RuntimeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the builders shipped with this crate.
    pub fn with_default_builders(config: &RuntimeConfig) -> Result<Self> {
        let mut assembler = Self::new();
        assembler.register(ScriptInjectionBuilder::new(config.script.clone()))?;
        Ok(assembler)
    }

    pub fn register<B>(&mut self, builder: B) -> Result<()>
    where
        B: ComponentBuilder + 'static,
    {
        if self.builders.iter().any(|b| b.name() == builder.name()) {
            return Err(RuntimeError::DuplicateBuilder(builder.name().to_string()));
        }
        debug!(builder = builder.name(), "Registered component builder");
        self.builders.push(Box::new(builder));
        Ok(())
    }

    pub fn builder_names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Runs every builder for `job` and collects their artifacts.
    ///
    /// Stops at the first failing builder. Mutations applied by builders that
    /// already ran stay in `info`; each builder is idempotent, so re-running the
    /// whole pass on the same `info` is safe.
    pub fn assemble(
        &self,
        ctx: &BuildContext,
        info: &mut RuntimeInfo,
        job: &TrainJob,
    ) -> Result<AssemblyOutput> {
        let job_name = job.name_any();
        info!(
            job = %job_name,
            builders = self.builders.len(),
            pod_sets = info.template_spec.pod_sets.len(),
            "Assembling runtime template"
        );

        let mut output = AssemblyOutput::default();

        for builder in &self.builders {
            ctx.check_cancelled(builder.name())?;

            let artifacts = builder
                .build(ctx, Some(&mut *info), Some(job))
                .map_err(|e| {
                    warn!(
                        job = %job_name,
                        builder = builder.name(),
                        error = %e,
                        "Component builder failed"
                    );
                    RuntimeError::builder_failed(builder.name(), e)
                })?;

            debug!(
                job = %job_name,
                builder = builder.name(),
                artifacts = artifacts.len(),
                "Component builder finished"
            );

            output.reports.push(BuilderReport {
                builder: builder.name().to_string(),
                artifacts: artifacts.len(),
            });
            output.artifacts.extend(artifacts);
        }

        Ok(output)
    }
}
