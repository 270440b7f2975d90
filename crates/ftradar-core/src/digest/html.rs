/// Line-by-line conversion of digest Markdown into minimal HTML.
///
/// Headings map to `<h1>`..`<h3>`, bullets to `<li>`, everything else to `<p>`.
/// Text is escaped, `**` toggles bold and word-boundary `_` toggles italics.
/// Exactly one output line is produced per input line.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    markdown
        .lines()
        .map(convert_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn convert_line(line: &str) -> String {
    let line = line.trim_end();
    if let Some(rest) = line.strip_prefix("### ") {
        format!("<h3>{}</h3>", render_inline(rest))
    } else if let Some(rest) = line.strip_prefix("## ") {
        format!("<h2>{}</h2>", render_inline(rest))
    } else if let Some(rest) = line.strip_prefix("# ") {
        format!("<h1>{}</h1>", render_inline(rest))
    } else if let Some(rest) = line.strip_prefix("- ") {
        format!("<li>{}</li>", render_inline(rest))
    } else {
        format!("<p>{}</p>", render_inline(line.trim_start()))
    }
}

fn render_inline(text: &str) -> String {
    let chars: Vec<char> = escape_html(text).chars().collect();
    let mut out = String::with_capacity(chars.len() + 16);
    let mut bold = false;
    let mut italic = false;

    let mut index = 0;
    while index < chars.len() {
        let current = chars[index];
        if current == '*' && chars.get(index + 1) == Some(&'*') {
            out.push_str(if bold { "</b>" } else { "<b>" });
            bold = !bold;
            index += 2;
            continue;
        }
        if current == '_' {
            let prev = index.checked_sub(1).map(|at| chars[at]);
            let next = chars.get(index + 1).copied();
            let prev_is_word = prev.is_some_and(char::is_alphanumeric);
            let next_is_word = next.is_some_and(char::is_alphanumeric);
            if !italic && !prev_is_word && next.is_some_and(|c| !c.is_whitespace()) {
                out.push_str("<i>");
                italic = true;
                index += 1;
                continue;
            }
            if italic && !next_is_word && prev.is_some_and(|c| !c.is_whitespace()) {
                out.push_str("</i>");
                italic = false;
                index += 1;
                continue;
            }
        }
        out.push(current);
        index += 1;
    }

    if italic {
        out.push_str("</i>");
    }
    if bold {
        out.push_str("</b>");
    }
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
