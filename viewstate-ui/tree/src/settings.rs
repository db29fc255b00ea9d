use crate::state::NodeLabel;
use crate::view::HierarchicalView;

/// How nodes of two different tree instances are matched to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Match by display label (the baseline behaviour).
    #[default]
    Label,
    /// Match by [`HierarchicalView::stable_key`], falling back to the label
    /// for nodes without a key.
    ///
    /// Keys and fallback labels are compared as plain text: a key equal to
    /// an unkeyed sibling's label refers to both nodes.
    StableKey,
}

impl MatchPolicy {
    pub(crate) fn key_of<V>(self, view: &V, node: &V::Node) -> NodeLabel
    where
        V: HierarchicalView + ?Sized,
    {
        match self {
            MatchPolicy::Label => view.label(node),
            MatchPolicy::StableKey => view
                .stable_key(node)
                .unwrap_or_else(|| view.label(node)),
        }
    }
}

/// Options shared by capture and restore.
///
/// A state must be restored with the same [`MatchPolicy`] it was captured
/// with, otherwise keys will not line up.
#[derive(Debug, Clone)]
pub struct TreeStateSettings {
    match_policy: MatchPolicy,
    scroll_to_selection: bool,
}

impl Default for TreeStateSettings {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::Label,
            scroll_to_selection: true,
        }
    }
}

impl TreeStateSettings {
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Whether restore scrolls every reselected node into view.
    pub fn with_scroll_to_selection(mut self, enabled: bool) -> Self {
        self.scroll_to_selection = enabled;
        self
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    pub fn scroll_to_selection(&self) -> bool {
        self.scroll_to_selection
    }
}
