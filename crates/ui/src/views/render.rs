use dioxus::prelude::*;

/// Build the tree once and serialise it.
pub(crate) fn render_dom(mut dom: VirtualDom) -> String {
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; color: #1f2937; }
.stat-card { display: inline-block; padding: 1rem; margin: 0 1rem 1rem 0; border: 1px solid #e5e7eb; }
.risk-low { color: #16a34a; }
.risk-mild { color: #ca8a04; }
.risk-moderate { color: #ea580c; }
.risk-other { color: #dc2626; }
.step-done { color: #16a34a; }
.step-current { font-weight: bold; }
";

/// Wrap a rendered fragment into a standalone page.
#[must_use]
pub fn render_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head><body>{body}</body></html>\n"
    )
}
