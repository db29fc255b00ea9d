use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use viewstate_ui_tree::{
    ItemModel, ItemNode, MatchPolicy, TreePath, TreeStateSettings,
};

use crate::errors::DemoError;

const BUILTIN_FIXTURE: &str = include_str!("../fixtures/rebuild.json");

/// Tree before and after a rebuild, plus the view state to start from.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Fixture {
    before: Vec<ItemNode>,
    /// Rebuilt tree; the `before` tree is reused when absent.
    #[serde(default)]
    after: Option<Vec<ItemNode>>,
    #[serde(default)]
    pub(crate) expanded: Vec<TreePath>,
    #[serde(default)]
    pub(crate) selected: Vec<TreePath>,
    #[serde(default)]
    match_stable_keys: bool,
}

impl Fixture {
    pub(crate) fn load(path: &Path) -> Result<Self, DemoError> {
        let raw =
            fs::read_to_string(path).map_err(|source| DemoError::ReadFixture {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&raw, path)
    }

    pub(crate) fn builtin() -> Result<Self, DemoError> {
        Self::parse(BUILTIN_FIXTURE, Path::new("<builtin>"))
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, DemoError> {
        serde_json::from_str(raw).map_err(|source| DemoError::ParseFixture {
            path: PathBuf::from(path),
            source,
        })
    }

    pub(crate) fn before_model(&self) -> ItemModel {
        ItemModel::new(self.before.clone())
    }

    pub(crate) fn after_model(&self) -> ItemModel {
        let nodes = self.after.clone().unwrap_or_else(|| self.before.clone());
        ItemModel::new(nodes)
    }

    /// Upper bound on the lines a cycle report prints: one header per tree
    /// plus at most one row per item.
    pub(crate) fn report_line_bound(&self) -> usize {
        self.before_model().len() + self.after_model().len() + 2
    }

    pub(crate) fn settings(&self) -> TreeStateSettings {
        let policy = if self.match_stable_keys {
            MatchPolicy::StableKey
        } else {
            MatchPolicy::Label
        };
        TreeStateSettings::default().with_match_policy(policy)
    }
}
