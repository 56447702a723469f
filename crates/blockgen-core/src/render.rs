//! Per-series label rendering.

use crate::labels::{Label, Labels};
use crate::template::{render, Vars};
use tracing::debug;

/// Render every label value of `labels` against `vars`.
///
/// Fail-open: a value that does not parse or does not evaluate keeps its
/// literal text. Order is preserved.
pub fn render_labels(labels: &Labels, vars: &Vars) -> Labels {
    labels
        .iter()
        .map(|label| Label::new(label.name.clone(), render_value(label, vars)))
        .collect()
}

fn render_value(label: &Label, vars: &Vars) -> String {
    match render(&label.value, vars) {
        Ok(rendered) => rendered,
        Err(e) => {
            debug!(label = %label.name, error = %e, "label template fell back to literal value");
            label.value.clone()
        }
    }
}
