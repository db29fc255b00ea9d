use std::collections::HashMap;

use log::{debug, trace};

use crate::settings::{MatchPolicy, TreeStateSettings};
use crate::view::HierarchicalView;

/// Text key used to match a node across two tree instances.
pub type NodeLabel = String;

/// Path of node labels from the root to the target node.
pub type TreePath = Vec<String>;

/// Point-in-time snapshot of expanded and selected nodes, keyed by label.
///
/// Each level mirrors one sibling group of the captured tree. Siblings that
/// share a label collide and the last one visited wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeState {
    expanded: HashMap<NodeLabel, TreeState>,
    selected: HashMap<NodeLabel, TreeState>,
}

/// Counts of what a restore actually applied to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub expanded: usize,
    pub selected: usize,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the view using label matching.
    pub fn capture<V>(view: &V) -> Self
    where
        V: HierarchicalView + ?Sized,
    {
        Self::capture_with(view, &TreeStateSettings::default())
    }

    /// Snapshot the expanded and selected nodes reachable through expanded
    /// ancestors. Collapsed subtrees are not visited.
    pub fn capture_with<V>(view: &V, settings: &TreeStateSettings) -> Self
    where
        V: HierarchicalView + ?Sized,
    {
        let mut state = Self::default();
        if view.has_model() {
            let root = view.root_node();
            state.capture_children(view, &root, settings.match_policy());
        }
        state
    }

    fn capture_children<V>(
        &mut self,
        view: &V,
        parent: &V::Node,
        policy: MatchPolicy,
    ) where
        V: HierarchicalView + ?Sized,
    {
        for index in 0..view.child_count(parent) {
            let node = view.child_at(parent, index);
            let key = policy.key_of(view, &node);

            if view.is_expanded(&node) {
                debug!("tree state: capturing expanded node {key:?}");
                let mut child = TreeState::default();
                child.capture_children(view, &node, policy);
                self.expanded.insert(key.clone(), child);
            }

            if view.is_selected(&node) {
                debug!("tree state: capturing selected node {key:?}");
                self.selected.insert(key, TreeState::default());
            }
        }
    }

    /// Reset the view to this state using label matching.
    pub fn restore<V>(&self, view: &mut V) -> RestoreSummary
    where
        V: HierarchicalView + ?Sized,
    {
        self.restore_with(view, &TreeStateSettings::default())
    }

    /// Clear all expansion and selection on the view, then replay this state.
    ///
    /// Entries with no matching node are skipped; nodes with no entry stay
    /// collapsed and unselected.
    pub fn restore_with<V>(
        &self,
        view: &mut V,
        settings: &TreeStateSettings,
    ) -> RestoreSummary
    where
        V: HierarchicalView + ?Sized,
    {
        view.clear_selection();
        view.collapse_all();

        let mut summary = RestoreSummary::default();
        if view.has_model() && !self.is_empty() {
            let root = view.root_node();
            self.restore_subtree(view, &root, settings, &mut summary);
        }
        summary
    }

    fn restore_subtree<V>(
        &self,
        view: &mut V,
        node: &V::Node,
        settings: &TreeStateSettings,
        summary: &mut RestoreSummary,
    ) where
        V: HierarchicalView + ?Sized,
    {
        if view.is_valid(node) {
            view.set_expanded(node, true);
            summary.expanded += 1;
        }

        let policy = settings.match_policy();
        for index in 0..view.child_count(node) {
            let child = view.child_at(node, index);
            let key = policy.key_of(view, &child);

            if let Some(child_state) = self.expanded.get(&key) {
                debug!("tree state: restoring expanded node {key:?}");
                child_state.restore_subtree(view, &child, settings, summary);
            }

            if self.selected.contains_key(&key) {
                debug!("tree state: restoring selected node {key:?}");
                view.select(&child);
                if settings.scroll_to_selection() {
                    view.scroll_to(&child);
                }
                summary.selected += 1;
            } else if !self.expanded.contains_key(&key) {
                trace!("tree state: no entry for node {key:?}");
            }
        }
    }

    /// Whether nothing was expanded or selected at capture time.
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty() && self.selected.is_empty()
    }

    pub fn expanded_children(&self) -> &HashMap<NodeLabel, TreeState> {
        &self.expanded
    }

    pub fn selected_children(&self) -> &HashMap<NodeLabel, TreeState> {
        &self.selected
    }

    /// State captured below the expanded child with `label`.
    pub fn expanded_child(&self, label: &str) -> Option<&TreeState> {
        self.expanded.get(label)
    }

    pub fn is_expanded(&self, label: &str) -> bool {
        self.expanded.contains_key(label)
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.selected.contains_key(label)
    }

    /// Label paths of every expanded entry, sorted.
    pub fn expanded_paths(&self) -> Vec<TreePath> {
        let (mut expanded, _) = self.collect_paths();
        expanded.sort();
        expanded
    }

    /// Label paths of every selected entry, sorted.
    pub fn selected_paths(&self) -> Vec<TreePath> {
        let (_, mut selected) = self.collect_paths();
        selected.sort();
        selected
    }

    fn collect_paths(&self) -> (Vec<TreePath>, Vec<TreePath>) {
        let mut expanded = Vec::new();
        let mut selected = Vec::new();
        let mut prefix = Vec::new();
        self.push_paths(&mut prefix, &mut expanded, &mut selected);
        (expanded, selected)
    }

    fn push_paths(
        &self,
        prefix: &mut Vec<String>,
        expanded: &mut Vec<TreePath>,
        selected: &mut Vec<TreePath>,
    ) {
        for label in self.selected.keys() {
            prefix.push(label.clone());
            selected.push(prefix.clone());
            prefix.pop();
        }

        for (label, child) in &self.expanded {
            prefix.push(label.clone());
            expanded.push(prefix.clone());
            child.push_paths(prefix, expanded, selected);
            prefix.pop();
        }
    }
}
