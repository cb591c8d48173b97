use std::fmt::Write;

use crate::models::faculty::{FacultyDetail, FacultyListItem};
use crate::search::{SearchQuery, SearchSession};

const NOT_AVAILABLE: &str = "N/A";

pub fn render_filters(query: &SearchQuery) -> Option<String> {
    let filters = query.active_filters();
    if filters.is_empty() {
        return None;
    }

    let badges: Vec<String> = filters
        .into_iter()
        .map(|(label, text)| format!("[{}: {}]", label, text))
        .collect();
    Some(format!("Active filters: {}", badges.join(" ")))
}

pub fn render_results(results: &[FacultyListItem]) -> String {
    let mut out = format!("Showing {} faculty\n", results.len());
    for item in results {
        let _ = writeln!(out, "  {:>5}  {}", item.id, item.display_name);
    }
    out
}

pub fn render_detail(detail: &FacultyDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", detail.display_name);
    let _ = writeln!(out, "Personal Webpage:");
    let _ = writeln!(out, "  {}", non_empty(detail.link.as_deref()));
    let _ = writeln!(out, "Research Interests:");
    let _ = writeln!(out, "  {}", non_empty(detail.interests_text.as_deref()));
    out
}

/// Full screen for the interactive client: filters, list, status and open detail.
pub fn render_session(session: &SearchSession) -> String {
    let mut out = String::new();
    if let Some(filters) = render_filters(session.query()) {
        let _ = writeln!(out, "{}", filters);
    }
    out.push_str(&render_results(session.results()));

    if session.is_loading() {
        let _ = writeln!(out, "Loading...");
    } else if session.results().is_empty() && !session.query().active_filters().is_empty() {
        let _ = writeln!(out, "No faculty found. Try adjusting your search criteria.");
    }

    if let Some(detail) = session.selected() {
        out.push('\n');
        out.push_str(&render_detail(detail));
    }
    out
}

fn non_empty(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => NOT_AVAILABLE,
    }
}
