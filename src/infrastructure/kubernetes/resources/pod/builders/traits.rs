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

use crate::domain::runtime::{Artifact, RuntimeInfo};
use crate::domain::trainjob::TrainJob;
use crate::shared::error::{Result, RuntimeError};
use tokio_util::sync::CancellationToken;

/// Per-pass context handed to every component builder.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    cancellation: CancellationToken,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn check_cancelled(&self, stage: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(RuntimeError::Cancelled(stage.to_string()));
        }
        Ok(())
    }
}

/// A pluggable step that augments the runtime pod template of a job.
///
/// Implementations hold no per-job state. `build` may mutate `info` only through
/// the upsert functions in [`crate::infrastructure::kubernetes::resources::pod::merger`]
/// and must not perform I/O; returned artifacts are submitted by the caller.
///
/// A missing `info`, a missing `job`, or a job without a trainer is not an error:
/// the builder returns no artifacts and leaves everything untouched.
pub trait ComponentBuilder: Send + Sync {
    /// Stable identifier used for registration and ordering.
    fn name(&self) -> &str;

    fn build(
        &self,
        ctx: &BuildContext,
        info: Option<&mut RuntimeInfo>,
        job: Option<&TrainJob>,
    ) -> Result<Vec<Artifact>>;
}
