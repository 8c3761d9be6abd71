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

use std::time::Duration;

/// Component builder names
pub const BUILDER_NAME_REMOTE: &str = "remote";

/// Script ConfigMap
pub const SCRIPT_KEY: &str = "script.py";
pub const SCRIPT_CONFIGMAP_SUFFIX: &str = "-remote-script";

/// Index of the inline script in trainer.command, e.g. ["python", "-c", "<script>"]
pub const SCRIPT_COMMAND_INDEX: usize = 2;

/// Volume and VolumeMount
pub const SCRIPT_VOLUME_NAME: &str = "remote-script";
pub const SCRIPT_MOUNT_DIR: &str = "/app";
pub const SCRIPT_FILE_NAME: &str = "script.py";

/// Environment variables
pub const ENV_SCRIPT_PATH: &str = "SCRIPT_PATH";
pub const ENV_RUNNER: &str = "RUNNER";
pub const ENV_RUNNER_ENABLED: &str = "true";

/// Container names
pub const TRAINER_CONTAINER_NAME: &str = "node";

/// TrainJob API
pub const TRAINJOB_API_VERSION: &str = "trainer.kubeflow.org/v1alpha1";
pub const TRAINJOB_KIND: &str = "TrainJob";

/// Resource labels
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const LABEL_MANAGED_BY_VALUE: &str = "trainjob-runtime";
pub const LABEL_TRAINJOB_NAME: &str = "trainer.kubeflow.org/trainjob-name";
pub const LABEL_COMPONENT: &str = "trainer.kubeflow.org/component";
pub const COMPONENT_REMOTE_SCRIPT: &str = "remote-script";

/// Server-side apply field manager
pub const FIELD_MANAGER: &str = "trainjob-runtime";

/// Config file lookup
pub const CONF_FILE_ENV: &str = "TRAINJOB_RUNTIME_CONF";

/// Retry of cluster writes
pub const APPLY_MAX_RETRIES: usize = 3;
pub const APPLY_RETRY_MIN_DELAY: Duration = Duration::from_millis(200);
