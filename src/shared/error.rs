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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The API server answered with a failure status.
    #[error("Kubernetes API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    /// The request never got a status back (connection, TLS, timeout).
    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{builder}: expected trainer.command[2] to contain the script, got: {command:?}")]
    MalformedCommand {
        builder: String,
        command: Vec<String>,
    },

    #[error("Assembly cancelled: {0}")]
    Cancelled(String),

    #[error("Component builder '{0}' is already registered")]
    DuplicateBuilder(String),

    #[error("Component builder '{builder}' failed: {source}")]
    BuilderFailed {
        builder: String,
        #[source]
        source: Box<RuntimeError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for RuntimeError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) => RuntimeError::ApiError {
                code: ae.code,
                message: ae.message,
            },
            other => RuntimeError::KubeError(other.to_string()),
        }
    }
}

impl RuntimeError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn validation_error(context: impl Into<String>) -> Self {
        Self::ValidationError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn builder_failed(builder: impl Into<String>, source: RuntimeError) -> Self {
        Self::BuilderFailed {
            builder: builder.into(),
            source: Box::new(source),
        }
    }

    /// Whether a retry of the same request could succeed.
    ///
    /// Throttling, server-side failures and transport errors qualify. Other API
    /// statuses (403, 404, 422, ...) are final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ApiError { code, .. } => *code == 429 || *code >= 500,
            Self::KubeError(_) => true,
            _ => false,
        }
    }
}
