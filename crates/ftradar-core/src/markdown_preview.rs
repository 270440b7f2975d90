use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const ALLOWED_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Full CommonMark rendering of digest Markdown for the dashboard preview.
///
/// Raw HTML in item summaries is shown as text and link targets outside
/// http(s)/mailto or relative paths are replaced by `#`.
#[must_use]
pub fn render_preview_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(sanitize_event);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    format!("<article class=\"digest-preview\">\n{output}</article>")
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: allowed_or(dest_url, "#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: allowed_or(dest_url, ""),
            title,
            id,
        }),
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    }
}

fn allowed_or<'a>(dest_url: CowStr<'a>, fallback: &'static str) -> CowStr<'a> {
    if is_allowed_destination(&dest_url) {
        dest_url
    } else {
        CowStr::Borrowed(fallback)
    }
}

fn is_allowed_destination(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    if lower.is_empty() || lower.starts_with('#') {
        return true;
    }
    if lower.starts_with("//") {
        return false;
    }
    if ALLOWED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return true;
    }
    !lower.contains(':')
}
