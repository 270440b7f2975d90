//! Grouped rendering of regulatory items into a Markdown digest and its
//! line-oriented HTML counterpart.

use std::cmp::Ordering;

use crate::models::{RegulatoryItem, format_date};

mod html;

pub use html::{escape_html, markdown_to_html};

pub const EMPTY_DIGEST_MARKER: &str = "_No new entries in period._";
pub const NATIONWIDE_LABEL: &str = "DE (nationwide)";
pub const SOURCE_UNAVAILABLE: &str = "Source n/a";

/// Markdown and HTML renderings of the same digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDigest {
    pub markdown: String,
    pub html: String,
}

#[must_use]
pub fn render_digest(items: &[RegulatoryItem], days: u32) -> RenderedDigest {
    let markdown = render_markdown(items, days);
    let html = markdown_to_html(&markdown);
    RenderedDigest { markdown, html }
}

#[must_use]
pub fn digest_heading(days: u32) -> String {
    format!("# Funding & Tariff Radar – Digest (last {days} days)")
}

/// Orders by category, then region (absent first), then newest first.
/// The sort is stable, so full ties keep their input order.
pub fn sort_for_digest(items: &mut [&RegulatoryItem]) {
    items.sort_by(|a, b| compare_for_digest(a, b));
}

fn compare_for_digest(a: &RegulatoryItem, b: &RegulatoryItem) -> Ordering {
    a.category
        .as_str()
        .cmp(b.category.as_str())
        .then_with(|| {
            a.region
                .map(|region| region.code())
                .cmp(&b.region.map(|region| region.code()))
        })
        .then_with(|| b.recorded_at.cmp(&a.recorded_at))
}

#[must_use]
pub fn render_markdown(items: &[RegulatoryItem], days: u32) -> String {
    let mut lines = vec![digest_heading(days), String::new()];
    if items.is_empty() {
        lines.push(EMPTY_DIGEST_MARKER.to_string());
        return lines.join("\n");
    }

    let mut sorted: Vec<&RegulatoryItem> = items.iter().collect();
    sort_for_digest(&mut sorted);

    let mut last_category = None;
    let mut last_region = None;
    for item in sorted {
        if last_category != Some(item.category) {
            lines.push(format!("## {}", item.category));
            last_category = Some(item.category);
            last_region = None;
        }
        // `Some(None)` marks "absent region already headed" so the first row
        // of a category always gets a region heading.
        if last_region != Some(item.region) {
            let label = item
                .region
                .map_or_else(|| NATIONWIDE_LABEL.to_string(), |region| region.code().to_string());
            lines.push(format!("### Region: {label}"));
            last_region = Some(item.region);
        }
        lines.push(render_entry(item));
        lines.push(String::new());
    }
    lines.join("\n")
}

fn render_entry(item: &RegulatoryItem) -> String {
    let valid_from = item
        .effective_date
        .map(|date| format!(" (valid from {})", format_date(&date)))
        .unwrap_or_default();
    let source = match (&item.source_url, &item.source_org) {
        (Some(url), _) => format!("[Source]({url})"),
        (None, Some(org)) => org.clone(),
        (None, None) => SOURCE_UNAVAILABLE.to_string(),
    };

    let mut parts = vec![
        format!(
            "- **{}**{valid_from} — _{}_",
            item.title, item.change_type
        ),
        indent(&item.summary),
        format!("  {source}"),
    ];
    if let Some(notes) = &item.impact_notes {
        parts.push(format!("  **Impact:** {notes}"));
    }
    if !item.tags.is_empty() {
        parts.push(format!("  _Tags:_ {}", item.tags.join(", ")));
    }
    parts.join("  \n")
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
