//! Expand/select state snapshots for hierarchical views.
//!
//! A [`TreeState`] is captured from a live view, held while the underlying
//! model is destroyed and rebuilt, and replayed onto the new view afterwards.
//! The two trees never share node objects, so nodes are matched by label
//! (or by an optional stable key, see [`MatchPolicy`]).
//!
//! This crate is split into two layers:
//! - the capability trait [`HierarchicalView`] plus [`TreeState`], which are
//!   UI-agnostic;
//! - [`ItemModel`] / [`ItemView`], an in-memory view adapter useful for
//!   headless front-ends and tests.
//!
//! # Quick Example
//!
//! ```
//! use viewstate_ui_tree::{ItemModel, ItemNode, ItemView, TreeState};
//!
//! let build = || {
//!     ItemModel::new(vec![
//!         ItemNode::branch("src", vec![ItemNode::leaf("main.rs")]),
//!         ItemNode::leaf("Cargo.toml"),
//!     ])
//! };
//!
//! let mut view = ItemView::with_model(build());
//! view.expand_path(&["src".to_owned()]);
//! view.select_path(&["src".to_owned(), "main.rs".to_owned()]);
//!
//! let state = TreeState::capture(&view);
//! view.set_model(build());
//! state.restore(&mut view);
//!
//! assert_eq!(view.expanded_paths(), vec![vec!["src".to_owned()]]);
//! ```
//!
//! Known limitations:
//! - selection inside a collapsed branch is not captured;
//! - siblings with the same label collide and the last one wins;
//! - with [`MatchPolicy::StableKey`], keys and the labels of unkeyed
//!   siblings share one namespace, so a key equal to a sibling's label
//!   matches both nodes.

mod item;
mod settings;
mod state;
mod view;

pub use item::{ItemIndex, ItemModel, ItemNode, ItemView, VisibleRow};
pub use settings::{MatchPolicy, TreeStateSettings};
pub use state::{NodeLabel, RestoreSummary, TreePath, TreeState};
pub use view::HierarchicalView;
