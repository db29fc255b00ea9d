/// Capability interface over a hierarchical view bound to a data model.
///
/// Concrete UI bindings implement this trait as an adapter; [`TreeState`]
/// only ever talks to a view through it.
///
/// Node handles are opaque and only meaningful for the view+model pair that
/// produced them. They are not expected to survive a model rebuild.
///
/// [`TreeState`]: crate::TreeState
pub trait HierarchicalView {
    /// Opaque handle to one node of the current model.
    type Node: Clone;

    /// Whether the view is bound to a model at all.
    fn has_model(&self) -> bool {
        true
    }

    /// Handle of the view root. The root itself is never expanded or selected.
    fn root_node(&self) -> Self::Node;

    /// Number of children under `node`.
    fn child_count(&self, node: &Self::Node) -> usize;

    /// Child of `node` at `index`, in model order.
    fn child_at(&self, node: &Self::Node, index: usize) -> Self::Node;

    /// Display text of the node's primary column.
    fn label(&self, node: &Self::Node) -> String;

    /// Optional identity that stays stable across model rebuilds.
    ///
    /// Only consulted with [`MatchPolicy::StableKey`].
    ///
    /// [`MatchPolicy::StableKey`]: crate::MatchPolicy::StableKey
    fn stable_key(&self, _node: &Self::Node) -> Option<String> {
        None
    }

    /// Whether the handle points at a real (non-root) node.
    fn is_valid(&self, node: &Self::Node) -> bool;

    fn is_expanded(&self, node: &Self::Node) -> bool;

    fn set_expanded(&mut self, node: &Self::Node, expanded: bool);

    fn is_selected(&self, node: &Self::Node) -> bool;

    /// Add `node` to the current selection.
    fn select(&mut self, node: &Self::Node);

    fn clear_selection(&mut self);

    fn collapse_all(&mut self);

    /// Ensure `node` is scrolled into the visible area.
    fn scroll_to(&mut self, node: &Self::Node);
}
