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

//! Upsert-by-name merging for pod template fragments.
//!
//! Every component builder writes into shared pod sets and containers only through
//! these functions. A builder upserts the names it owns and never touches entries
//! written by anyone else, so builders compose without knowing about each other.

use k8s_openapi::api::core::v1::{EnvVar, Volume, VolumeMount};

/// An item whose identity within its sequence is its name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Volume {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for VolumeMount {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for EnvVar {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Replaces the item with the same name in place, or appends it.
///
/// The replaced item is overwritten wholesale; fields are not merged.
pub fn upsert<T: Named>(items: &mut Vec<T>, item: T) {
    match items
        .iter()
        .position(|existing| existing.name() == item.name())
    {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

/// Like [`upsert`] for the `Option<Vec<_>>` sequences of Kubernetes objects.
pub fn upsert_optional<T: Named>(items: &mut Option<Vec<T>>, item: T) {
    upsert(items.get_or_insert_with(Vec::new), item);
}

/// Upserts each item in order; a name repeated in `new_items` keeps its last value.
pub fn upsert_all<T: Named>(items: &mut Vec<T>, new_items: impl IntoIterator<Item = T>) {
    for item in new_items {
        upsert(items, item);
    }
}

pub fn upsert_volumes(volumes: &mut Vec<Volume>, volume: Volume) {
    upsert(volumes, volume);
}

pub fn upsert_volume_mounts(mounts: &mut Vec<VolumeMount>, mount: VolumeMount) {
    upsert(mounts, mount);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str, value: &str) -> EnvVar {
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn names(items: &[EnvVar]) -> Vec<&str> {
        items.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_upsert_appends_new_name() {
        let mut items = vec![env("A", "1"), env("B", "2")];
        upsert(&mut items, env("C", "3"));

        assert_eq!(items.len(), 3);
        assert_eq!(items.last(), Some(&env("C", "3")));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut items = vec![env("A", "1"), env("B", "2"), env("C", "3")];
        upsert(&mut items, env("B", "changed"));

        assert_eq!(items, vec![env("A", "1"), env("B", "changed"), env("C", "3")]);
    }

    #[test]
    fn test_upsert_replaces_whole_payload() {
        let mut items = vec![EnvVar {
            name: "A".to_string(),
            value: None,
            value_from: Some(Default::default()),
        }];
        upsert(&mut items, env("A", "plain"));

        assert_eq!(items, vec![env("A", "plain")]);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut once = vec![env("A", "1")];
        upsert(&mut once, env("B", "2"));

        let mut twice = once.clone();
        upsert(&mut twice, env("B", "2"));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_upsert_distinct_names_keep_call_order() {
        let mut left = Vec::new();
        upsert(&mut left, env("X", "1"));
        upsert(&mut left, env("Y", "2"));

        let mut right = Vec::new();
        upsert(&mut right, env("Y", "2"));
        upsert(&mut right, env("X", "1"));

        assert_eq!(names(&left), vec!["X", "Y"]);
        assert_eq!(names(&right), vec!["Y", "X"]);
        assert!(left.iter().all(|e| right.contains(e)));
    }

    #[test]
    fn test_upsert_optional_initializes_missing_list() {
        let mut mounts: Option<Vec<VolumeMount>> = None;
        upsert_optional(
            &mut mounts,
            VolumeMount {
                name: "data".to_string(),
                mount_path: "/data".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(mounts.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_upsert_all_deduplicates_input() {
        let mut items = vec![env("A", "1")];
        upsert_all(&mut items, vec![env("A", "2"), env("B", "1"), env("B", "3")]);

        assert_eq!(items, vec![env("A", "2"), env("B", "3")]);
    }
}
