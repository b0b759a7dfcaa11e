//! Clip selection state

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::ClipId;

/// How a `select` call combines with the current selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectMode {
    Replace,
    Add,
    Toggle,
}

/// Set of selected clip ids. Only holds ids of clips present in the timeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: BTreeSet<ClipId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `ids` with set semantics; ids rejected by `exists` are skipped
    pub(crate) fn apply<'a, I, F>(&mut self, ids: I, mode: SelectMode, exists: F)
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&str) -> bool,
    {
        let known = ids.into_iter().filter(|id| exists(id));
        match mode {
            SelectMode::Replace => {
                self.ids = known.map(str::to_string).collect();
            }
            SelectMode::Add => {
                self.ids.extend(known.map(str::to_string));
            }
            SelectMode::Toggle => {
                for id in known {
                    if !self.ids.remove(id) {
                        self.ids.insert(id.to_string());
                    }
                }
            }
        }
    }

    /// Swaps `old` for `replacements` if `old` was selected
    pub(crate) fn replace(&mut self, old: &str, replacements: &[&str]) {
        if self.ids.remove(old) {
            self.ids.extend(replacements.iter().map(|id| id.to_string()));
        }
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipId> {
        self.ids.iter()
    }
}
