use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::state::TreePath;
use crate::view::HierarchicalView;

/// Nested description of one model item and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemNode>,
}

impl ItemNode {
    pub fn leaf(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            key: None,
            children: Vec::new(),
        }
    }

    pub fn branch(label: &str, children: Vec<ItemNode>) -> Self {
        Self {
            label: label.to_owned(),
            key: None,
            children,
        }
    }

    /// Attach a stable key that survives label changes.
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_owned());
        self
    }
}

#[derive(Debug, Clone)]
struct Item {
    label: String,
    key: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Immutable in-memory item model.
///
/// Items are stored flat; parent/child links are indices into that storage.
#[derive(Debug, Clone, Default)]
pub struct ItemModel {
    items: Vec<Item>,
    roots: Vec<usize>,
}

impl ItemModel {
    pub fn new(nodes: Vec<ItemNode>) -> Self {
        let mut model = Self::default();
        for node in nodes {
            let id = model.push(node, None);
            model.roots.push(id);
        }
        model
    }

    fn push(&mut self, node: ItemNode, parent: Option<usize>) -> usize {
        let id = self.items.len();
        self.items.push(Item {
            label: node.label,
            key: node.key,
            parent,
            children: Vec::with_capacity(node.children.len()),
        });

        for child in node.children {
            let child_id = self.push(child, Some(id));
            self.items[id].children.push(child_id);
        }

        id
    }

    /// Total number of items below the root.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn children_of(&self, index: ItemIndex) -> &[usize] {
        match index.0 {
            Some(id) => self
                .items
                .get(id)
                .map(|item| item.children.as_slice())
                .unwrap_or_default(),
            None => &self.roots,
        }
    }
}

impl From<Vec<ItemNode>> for ItemModel {
    fn from(nodes: Vec<ItemNode>) -> Self {
        Self::new(nodes)
    }
}

/// Handle to an item of an [`ItemModel`].
///
/// The root handle is invalid, the same way out-of-range lookups are; asking
/// an invalid handle for its children yields the top-level items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ItemIndex(Option<usize>);

impl ItemIndex {
    pub const fn root() -> Self {
        Self(None)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_none()
    }
}

/// One materialized row of an [`ItemView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    /// Zero-based depth (`0` for top-level rows).
    pub depth: usize,
    pub index: ItemIndex,
    pub label: String,
    pub path: TreePath,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_selected: bool,
}

/// In-memory hierarchical view holding expansion and selection for a model.
///
/// Binding a new model drops all view state, the way a real widget does on a
/// model reset.
#[derive(Debug, Default)]
pub struct ItemView {
    model: Option<ItemModel>,
    expanded: HashSet<usize>,
    selected: BTreeSet<usize>,
    scroll_target: Option<usize>,
}

impl ItemView {
    /// Create a view with no model bound.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(model: ItemModel) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    pub fn model(&self) -> Option<&ItemModel> {
        self.model.as_ref()
    }

    /// Bind `model`, resetting view state. Returns the previous model.
    pub fn set_model(&mut self, model: ItemModel) -> Option<ItemModel> {
        self.reset();
        self.model.replace(model)
    }

    /// Unbind the current model, resetting view state.
    pub fn take_model(&mut self) -> Option<ItemModel> {
        self.reset();
        self.model.take()
    }

    fn reset(&mut self) {
        self.expanded.clear();
        self.selected.clear();
        self.scroll_target = None;
    }

    fn item(&self, index: &ItemIndex) -> Option<&Item> {
        let id = index.0?;
        self.model.as_ref()?.items.get(id)
    }

    fn valid_id(&self, index: &ItemIndex) -> Option<usize> {
        self.item(index).and(index.0)
    }

    /// Resolve a label path to an index. The first sibling with a matching
    /// label is taken at every level.
    pub fn index_of(&self, path: &[String]) -> Option<ItemIndex> {
        let model = self.model.as_ref()?;
        let mut current = ItemIndex::root();
        for label in path {
            let id = model
                .children_of(current)
                .iter()
                .copied()
                .find(|id| model.items[*id].label == *label)?;
            current = ItemIndex(Some(id));
        }

        if current.is_root() { None } else { Some(current) }
    }

    /// Resolve a path of row positions to an index.
    pub fn index_at(&self, rows: &[usize]) -> Option<ItemIndex> {
        let model = self.model.as_ref()?;
        let mut current = ItemIndex::root();
        for row in rows {
            let id = *model.children_of(current).get(*row)?;
            current = ItemIndex(Some(id));
        }

        if current.is_root() { None } else { Some(current) }
    }

    /// Expand the node at `path` together with all of its ancestors.
    ///
    /// Returns `false` when the path does not resolve.
    pub fn expand_path(&mut self, path: &[String]) -> bool {
        let Some(index) = self.index_of(path) else {
            return false;
        };

        let mut cursor = index.0;
        while let Some(id) = cursor {
            self.expanded.insert(id);
            cursor =
                self.model.as_ref().and_then(|model| model.items[id].parent);
        }
        true
    }

    /// Add the node at `path` to the selection.
    pub fn select_path(&mut self, path: &[String]) -> bool {
        match self.index_of(path) {
            Some(index) => {
                self.select(&index);
                true
            },
            None => false,
        }
    }

    /// Label paths of all expanded nodes, sorted.
    pub fn expanded_paths(&self) -> Vec<TreePath> {
        let mut paths: Vec<TreePath> =
            self.expanded.iter().map(|id| self.path_of(*id)).collect();
        paths.sort();
        paths
    }

    /// Label paths of all selected nodes, sorted.
    pub fn selected_paths(&self) -> Vec<TreePath> {
        let mut paths: Vec<TreePath> =
            self.selected.iter().map(|id| self.path_of(*id)).collect();
        paths.sort();
        paths
    }

    /// Label path of the node last scrolled into view.
    pub fn scroll_target(&self) -> Option<TreePath> {
        self.scroll_target.map(|id| self.path_of(id))
    }

    fn path_of(&self, id: usize) -> TreePath {
        let Some(model) = self.model.as_ref() else {
            return TreePath::new();
        };

        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let item = &model.items[current];
            path.push(item.label.clone());
            cursor = item.parent;
        }
        path.reverse();
        path
    }

    /// Depth-first list of rows currently materialized by the view.
    ///
    /// Children are included only when their parent is expanded.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let Some(model) = self.model.as_ref() else {
            return rows;
        };

        let mut path = Vec::new();
        for id in &model.roots {
            self.push_row(model, *id, 0, &mut path, &mut rows);
        }
        rows
    }

    fn push_row(
        &self,
        model: &ItemModel,
        id: usize,
        depth: usize,
        path: &mut Vec<String>,
        rows: &mut Vec<VisibleRow>,
    ) {
        let item = &model.items[id];
        let is_expanded = self.expanded.contains(&id);
        path.push(item.label.clone());
        rows.push(VisibleRow {
            depth,
            index: ItemIndex(Some(id)),
            label: item.label.clone(),
            path: path.clone(),
            has_children: !item.children.is_empty(),
            is_expanded,
            is_selected: self.selected.contains(&id),
        });

        if is_expanded {
            for child in &item.children {
                self.push_row(model, *child, depth + 1, path, rows);
            }
        }

        path.pop();
    }
}

impl HierarchicalView for ItemView {
    type Node = ItemIndex;

    fn has_model(&self) -> bool {
        self.model.is_some()
    }

    fn root_node(&self) -> ItemIndex {
        ItemIndex::root()
    }

    fn child_count(&self, node: &ItemIndex) -> usize {
        self.model
            .as_ref()
            .map(|model| model.children_of(*node).len())
            .unwrap_or(0)
    }

    fn child_at(&self, node: &ItemIndex, index: usize) -> ItemIndex {
        self.model
            .as_ref()
            .and_then(|model| model.children_of(*node).get(index).copied())
            .map(|id| ItemIndex(Some(id)))
            .unwrap_or_default()
    }

    fn label(&self, node: &ItemIndex) -> String {
        self.item(node)
            .map(|item| item.label.clone())
            .unwrap_or_default()
    }

    fn stable_key(&self, node: &ItemIndex) -> Option<String> {
        self.item(node).and_then(|item| item.key.clone())
    }

    fn is_valid(&self, node: &ItemIndex) -> bool {
        self.item(node).is_some()
    }

    fn is_expanded(&self, node: &ItemIndex) -> bool {
        node.0.is_some_and(|id| self.expanded.contains(&id))
    }

    fn set_expanded(&mut self, node: &ItemIndex, expanded: bool) {
        let Some(id) = self.valid_id(node) else {
            return;
        };

        if expanded {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
    }

    fn is_selected(&self, node: &ItemIndex) -> bool {
        node.0.is_some_and(|id| self.selected.contains(&id))
    }

    fn select(&mut self, node: &ItemIndex) {
        if let Some(id) = self.valid_id(node) {
            self.selected.insert(id);
        }
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    fn scroll_to(&mut self, node: &ItemIndex) {
        if let Some(id) = self.valid_id(node) {
            self.scroll_target = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> TreePath {
        parts.iter().map(|part| (*part).to_owned()).collect()
    }

    fn labels(rows: &[VisibleRow]) -> Vec<String> {
        rows.iter().map(|row| row.label.clone()).collect()
    }

    fn sample_view() -> ItemView {
        ItemView::with_model(ItemModel::new(vec![
            ItemNode::branch(
                "a",
                vec![ItemNode::branch("b", vec![ItemNode::leaf("c")])],
            ),
            ItemNode::leaf("d"),
        ]))
    }

    #[test]
    fn given_nested_nodes_when_model_built_then_all_items_are_stored() {
        let view = sample_view();

        assert_eq!(view.model().map(ItemModel::len), Some(4));
        assert_eq!(view.child_count(&ItemIndex::root()), 2);
    }

    #[test]
    fn given_collapsed_tree_when_flattened_then_only_top_level_is_visible() {
        let view = sample_view();

        let rows = view.visible_rows();

        assert_eq!(labels(&rows), vec!["a", "d"]);
        assert!(rows[0].has_children);
        assert!(!rows[0].is_expanded);
    }

    #[test]
    fn given_expanded_path_when_flattened_then_rows_follow_depth_first_order()
    {
        let mut view = sample_view();
        assert!(view.expand_path(&path(&["a", "b"])));

        let rows = view.visible_rows();

        assert_eq!(labels(&rows), vec!["a", "b", "c", "d"]);
        assert_eq!(rows[2].depth, 2);
        assert_eq!(rows[2].path, path(&["a", "b", "c"]));
        for row in rows {
            assert_eq!(row.path.len(), row.depth + 1);
        }
    }

    #[test]
    fn given_unknown_path_when_resolved_then_none_is_returned() {
        let mut view = sample_view();

        assert_eq!(view.index_of(&path(&["a", "missing"])), None);
        assert_eq!(view.index_of(&[]), None);
        assert!(!view.expand_path(&path(&["zzz"])));
        assert!(!view.select_path(&path(&["zzz"])));
    }

    #[test]
    fn given_out_of_range_child_when_requested_then_root_index_is_returned() {
        let view = sample_view();

        let index = view.child_at(&ItemIndex::root(), 10);

        assert!(index.is_root());
        assert!(!view.is_valid(&index));
        assert_eq!(view.label(&index), "");
    }

    #[test]
    fn given_root_index_when_flags_set_then_they_are_ignored() {
        let mut view = sample_view();
        let root = view.root_node();

        view.set_expanded(&root, true);
        view.select(&root);
        view.scroll_to(&root);

        assert!(!view.is_expanded(&root));
        assert!(!view.is_selected(&root));
        assert_eq!(view.scroll_target(), None);
    }

    #[test]
    fn given_new_model_when_bound_then_view_state_is_reset() {
        let mut view = sample_view();
        view.expand_path(&path(&["a"]));
        view.select_path(&path(&["d"]));

        let previous =
            view.set_model(ItemModel::new(vec![ItemNode::leaf("x")]));

        assert!(previous.is_some());
        assert!(view.expanded_paths().is_empty());
        assert!(view.selected_paths().is_empty());
        assert_eq!(labels(&view.visible_rows()), vec!["x"]);
    }

    #[test]
    fn given_unbound_view_when_queried_then_it_behaves_as_empty() {
        let view = ItemView::new();

        assert!(!view.has_model());
        assert_eq!(view.child_count(&ItemIndex::root()), 0);
        assert!(view.visible_rows().is_empty());
    }

    #[test]
    fn given_json_fixture_when_deserialized_then_keys_and_children_are_read() {
        let json = r#"[
            {"label": "root", "key": "r", "children": [{"label": "leaf"}]}
        ]"#;

        let nodes: Vec<ItemNode> =
            serde_json::from_str(json).expect("valid fixture");

        assert_eq!(
            nodes,
            vec![
                ItemNode::branch("root", vec![ItemNode::leaf("leaf")])
                    .with_key("r")
            ]
        );
    }
}
