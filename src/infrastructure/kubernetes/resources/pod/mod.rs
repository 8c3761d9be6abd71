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

//! Pod template assembly: builders, merging and runtime templates

pub mod builders;
pub mod merger;
pub mod template;
pub mod template_utils;

pub use self::builders::{BuildContext, ComponentBuilder, EnvironmentBuilder, ScriptInjectionBuilder};
pub use self::merger::{
    upsert, upsert_all, upsert_optional, upsert_volume_mounts, upsert_volumes, Named,
};
pub use self::template::{PodSetTemplate, RuntimeTemplate};
pub use self::template_utils::{load_runtime_template, load_train_job};
