//! Action-binding sources: logical action name → ordered binding paths

use std::collections::HashMap;

/// Source of the physical binding paths for a logical action
pub trait ActionBindings {
    /// Paths in priority order; empty when the action is unknown
    fn binding_paths(&self, action: &str) -> &[String];
}

#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    actions: HashMap<String, Vec<String>>,
}

impl ActionMap {
    pub fn new(actions: HashMap<String, Vec<String>>) -> Self {
        Self { actions }
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
    {
        let actions = pairs
            .into_iter()
            .map(|(action, paths)| {
                (
                    action.to_string(),
                    paths.into_iter().map(str::to_string).collect(),
                )
            })
            .collect();
        Self { actions }
    }
}

impl ActionBindings for ActionMap {
    fn binding_paths(&self, action: &str) -> &[String] {
        self.actions
            .get(action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
