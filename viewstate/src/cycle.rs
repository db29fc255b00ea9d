use std::io::{self, Write};

use log::{debug, warn};
use viewstate_ui_tree::{ItemView, RestoreSummary, TreeState};

use crate::errors::DemoError;
use crate::fixture::Fixture;

/// Apply the fixture's view state, rebuild the model and restore.
///
/// Both the pre-rebuild and post-rebuild trees are written to `out`.
pub(crate) fn run(
    fixture: &Fixture,
    out: &mut impl Write,
) -> Result<RestoreSummary, DemoError> {
    let settings = fixture.settings();
    let mut view = ItemView::with_model(fixture.before_model());

    for path in &fixture.expanded {
        if !view.expand_path(path) {
            warn!("fixture: expanded path {path:?} does not exist");
        }
    }
    for path in &fixture.selected {
        if !view.select_path(path) {
            warn!("fixture: selected path {path:?} does not exist");
        }
    }

    writeln!(out, "before rebuild:")?;
    write_rows(out, &view)?;

    let state = TreeState::capture_with(&view, &settings);
    debug!(
        "captured {} expanded and {} selected paths",
        state.expanded_paths().len(),
        state.selected_paths().len()
    );

    view.set_model(fixture.after_model());
    let summary = state.restore_with(&mut view, &settings);

    writeln!(out, "after rebuild:")?;
    write_rows(out, &view)?;
    Ok(summary)
}

fn write_rows(out: &mut impl Write, view: &ItemView) -> io::Result<()> {
    for row in view.visible_rows() {
        let marker = match (row.has_children, row.is_expanded) {
            (true, true) => '-',
            (true, false) => '+',
            (false, _) => ' ',
        };
        let selected = if row.is_selected { " *" } else { "" };
        writeln!(
            out,
            "{:indent$}{marker} {}{selected}",
            "",
            row.label,
            indent = row.depth * 2
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_builtin_fixture_when_run_then_state_survives_relabel() {
        let fixture = Fixture::builtin().expect("builtin fixture parses");
        let mut out = Vec::new();

        let summary = run(&fixture, &mut out).expect("cycle succeeds");

        let report = String::from_utf8(out).expect("utf-8 report");
        let after = report
            .split("after rebuild:\n")
            .nth(1)
            .expect("after section");
        assert_eq!(
            after,
            concat!(
                "- Sessions\n",
                "  - local (3)\n",
                "      bash\n",
                "      htop *\n",
                "      vim\n",
                "  + ssh\n",
                "+ Bookmarks\n",
                "  Settings *\n",
            )
        );
        assert_eq!(
            summary,
            RestoreSummary {
                expanded: 2,
                selected: 2
            }
        );
    }
}
