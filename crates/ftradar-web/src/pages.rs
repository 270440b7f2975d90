use std::fmt::Write as _;

use ftradar_core::digest::escape_html;
use ftradar_core::models::{Category, RegulatoryItem, format_date, format_timestamp};
use ftradar_core::pricing::PricingTiers;
use ftradar_core::subsidy::{Jurisdiction, ProgramCatalog, ProjectParams, SubsidyEstimate};

use crate::dto::{RadarFilter, project_query_string};

pub(crate) const APP_NAME: &str = "Funding & Tariff Radar";

pub(crate) const DISCLAIMER: &str = "Legal notice: the content is curated to the best of our knowledge but does not replace legal or tax advice. No guarantee of completeness or accuracy.";

pub(crate) const RADAR_CSS: &str = r":root {
  --brand-primary: #00ffff;
  --brand-accent: #ff0033;
  --brand-bg: #0a0a0a;
  --brand-muted: #888c8f;
  --brand-fg: #ffffff;
}
body { background: var(--brand-bg); color: var(--brand-fg); font-family: system-ui, sans-serif; margin: 0; }
header { display: flex; gap: 1.5rem; align-items: center; padding: 0.75rem 1.5rem; border-bottom: 1px solid var(--brand-muted); }
header a { color: var(--brand-primary); text-decoration: none; }
header a.active { font-weight: 700; border-bottom: 2px solid var(--brand-accent); }
header form { margin-left: auto; }
main { padding: 1rem 1.5rem; }
.radar-title { font-size: 26px; font-weight: 700; margin-bottom: 0.2rem; }
.radar-sub, .caption { color: var(--brand-muted); }
.info { border: 1px solid var(--brand-primary); padding: 0.5rem 1rem; border-radius: 8px; }
.error { border: 1px solid var(--brand-accent); padding: 0.5rem 1rem; border-radius: 8px; }
.metric { font-size: 20px; font-weight: 700; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--brand-muted); padding: 0.3rem 0.5rem; text-align: left; vertical-align: top; }
.price-grid { display: flex; gap: 1rem; flex-wrap: wrap; }
.price-card { border: 1px solid var(--brand-muted); border-radius: 14px; padding: 1rem; min-width: 14rem; }
.price-title { font-size: 20px; font-weight: 700; color: var(--brand-primary); }
.price-money { font-size: 28px; font-weight: 800; }
.digest-preview { border-top: 1px solid var(--brand-muted); margin-top: 1.5rem; }
footer { padding: 1rem 1.5rem; color: var(--brand-muted); border-top: 1px solid var(--brand-muted); }
a { color: var(--brand-primary); }
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nav {
    Radar,
    Pricing,
    Subsidies,
}

pub(crate) fn layout(title: &str, active: Option<Nav>, body: &str, show_logout: bool) -> String {
    let link = |nav: Nav, href: &str, label: &str| {
        let class = if active == Some(nav) { " class=\"active\"" } else { "" };
        format!("<a href=\"{href}\"{class}>{label}</a>")
    };
    let logout = if show_logout {
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\">Logout</button></form>"
    } else {
        ""
    };
    let nav = if active.is_some() {
        format!(
            "<header><strong>{}</strong>{}{}{}{logout}</header>",
            escape_html(APP_NAME),
            link(Nav::Radar, "/radar", "Radar"),
            link(Nav::Pricing, "/pricing", "Pricing"),
            link(Nav::Subsidies, "/subsidies", "Subsidies"),
        )
    } else {
        String::new()
    };
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} · {}</title>\n<link rel=\"stylesheet\" href=\"/assets/radar.css\">\n</head>\n<body>\n{nav}\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        escape_html(APP_NAME)
    )
}

pub(crate) fn login_page(error: Option<&str>, code_configured: bool) -> String {
    let mut body = format!(
        "<div class=\"radar-title\">{}</div>\n<div class=\"radar-sub\">Please enter the access code.</div>\n",
        escape_html(APP_NAME)
    );
    if !code_configured {
        body.push_str("<p class=\"error\">No access code is configured for this dashboard.</p>\n");
    }
    if let Some(message) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape_html(message));
    }
    body.push_str(
        "<form method=\"post\" action=\"/login\">\n<label>Access code <input type=\"password\" name=\"code\" autocomplete=\"current-password\"></label>\n<button type=\"submit\">Login</button>\n</form>",
    );
    layout("Login", None, &body, false)
}

pub(crate) fn radar_page(
    filter: &RadarFilter,
    items: &[RegulatoryItem],
    preview_html: &str,
    show_logout: bool,
) -> String {
    let mut body = format!(
        "<div class=\"radar-title\">Change radar · last {} days</div>\n<p class=\"caption\">Curated information without warranty. Check the sources.</p>\n",
        filter.days
    );
    body.push_str(&radar_filter_form(filter));

    if items.is_empty() {
        body.push_str("<p class=\"info\">No entries for the selected period or filters.</p>\n");
    } else {
        let _ = writeln!(body, "<p class=\"metric\">Entries: {}</p>", items.len());
        body.push_str("<table>\n<thead><tr><th>Recorded</th><th>Valid from</th><th>Category</th><th>Region</th><th>Title</th><th>Change</th><th>Source</th></tr></thead>\n<tbody>\n");
        for item in items {
            body.push_str(&item_row(item));
        }
        body.push_str("</tbody>\n</table>\n");
        let _ = writeln!(
            body,
            "<p><a href=\"/radar/export.csv?{}\">Export CSV</a></p>",
            escape_html(&filter.query_string())
        );
        body.push_str(preview_html);
        body.push('\n');
    }

    let _ = write!(body, "<footer>{}</footer>", escape_html(DISCLAIMER));
    layout("Radar", Some(Nav::Radar), &body, show_logout)
}

fn radar_filter_form(filter: &RadarFilter) -> String {
    let categories: Vec<&str> = filter.categories.iter().map(Category::as_str).collect();
    let regions: Vec<&str> = filter.regions.iter().map(|region| region.code()).collect();
    format!(
        "<form method=\"get\" action=\"/radar\">\n<label>Days <input type=\"number\" name=\"days\" min=\"1\" max=\"{}\" value=\"{}\"></label>\n<label>Categories <input type=\"text\" name=\"category\" placeholder=\"EEG,KfW\" value=\"{}\"></label>\n<label>Regions <input type=\"text\" name=\"region\" placeholder=\"DE,BY\" value=\"{}\"></label>\n<label>Search <input type=\"search\" name=\"q\" value=\"{}\"></label>\n<button type=\"submit\">Filter</button>\n</form>\n",
        ftradar_core::config::MAX_DASHBOARD_DAYS,
        filter.days,
        escape_html(&categories.join(",")),
        escape_html(&regions.join(",")),
        escape_html(filter.text.as_deref().unwrap_or_default()),
    )
}

fn item_row(item: &RegulatoryItem) -> String {
    let source = match (&item.source_url, &item.source_org) {
        (Some(url), org) => format!(
            "<a href=\"{}\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(safe_href(url)),
            escape_html(org.as_deref().unwrap_or("Source"))
        ),
        (None, Some(org)) => escape_html(org),
        (None, None) => "-".to_string(),
    };
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{source}</td></tr>\n",
        format_timestamp(&item.recorded_at),
        item.effective_date
            .map_or_else(|| "-".to_string(), |date| format_date(&date)),
        item.category.as_str(),
        item.region.map_or("-", |region| region.code()),
        escape_html(&item.title),
        item.change_type.as_str(),
    )
}

fn safe_href(url: &str) -> &str {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.trim()
    } else {
        "#"
    }
}

pub(crate) fn pricing_page(tiers: &PricingTiers, show_logout: bool) -> String {
    let mut body = String::from("<div class=\"radar-title\">Pricing &amp; licences</div>\n");
    if tiers.tiers.is_empty() {
        body.push_str("<p class=\"info\">No pricing tiers configured.</p>\n");
    } else {
        body.push_str("<div class=\"price-grid\">\n");
        for tier in &tiers.tiers {
            let _ = write!(
                body,
                "<div class=\"price-card\"><div class=\"price-title\">{}</div><div class=\"price-money\">{}</div>",
                escape_html(&tier.name),
                escape_html(&tier.monthly_price_label())
            );
            if tier.is_net_price() {
                body.push_str("<div class=\"caption\">plus VAT</div>");
            }
            body.push_str("<ul>");
            for feature in &tier.features {
                let _ = write!(body, "<li>{}</li>", escape_html(feature));
            }
            body.push_str("</ul></div>\n");
        }
        body.push_str("</div>\n");
    }
    body.push_str(
        "<p class=\"info\">Prices apply to early customers; terms may vary with scope.</p>",
    );
    layout("Pricing", Some(Nav::Pricing), &body, show_logout)
}

pub(crate) fn subsidies_page(
    catalog: &ProgramCatalog,
    params: &ProjectParams,
    estimates: &[SubsidyEstimate],
    show_logout: bool,
) -> String {
    let mut body = String::from(
        "<div class=\"radar-title\">Funding engine · possible funding options</div>\n<p class=\"caption\">Illustrative, not legally binding. Always check the original sources.</p>\n",
    );
    body.push_str(&subsidy_form(catalog, params));

    if estimates.is_empty() {
        body.push_str("<p class=\"info\">No programs found. Adjust the filters.</p>\n");
    } else {
        body.push_str("<table>\n<thead><tr><th>Program</th><th>Agency</th><th>Instrument</th><th>Technologies</th><th>Rate</th><th>Grant (est.)</th><th>Loan payment/month (est.)</th><th>Monthly benefit (heuristic)</th><th>Source</th></tr></thead>\n<tbody>\n");
        for estimate in estimates {
            let row = estimate.display_row();
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}\" rel=\"noopener noreferrer\">Source</a></td></tr>",
                escape_html(&row.program),
                escape_html(&row.agency),
                row.instrument,
                escape_html(&row.technologies),
                row.grant_rate,
                row.grant_amount,
                row.monthly_loan_payment,
                row.monthly_benefit,
                escape_html(safe_href(&row.source)),
            );
        }
        body.push_str("</tbody>\n</table>\n");
        let _ = writeln!(
            body,
            "<p><a href=\"/subsidies/export.csv?{}\">Export CSV</a></p>",
            escape_html(&project_query_string(params))
        );
    }
    layout("Subsidies", Some(Nav::Subsidies), &body, show_logout)
}

fn subsidy_form(catalog: &ProgramCatalog, params: &ProjectParams) -> String {
    let mut form = String::from("<form method=\"get\" action=\"/subsidies\">\n<label>Jurisdiction <select name=\"jurisdiction\">");
    for option in catalog.jurisdiction_options() {
        let selected = if option == params.jurisdiction { " selected" } else { "" };
        let label = match option {
            Jurisdiction::All => "All".to_string(),
            Jurisdiction::Region(region) => format!("{} ({})", region.name(), region.code()),
        };
        let _ = write!(
            form,
            "<option value=\"{}\"{selected}>{}</option>",
            option.code(),
            escape_html(&label)
        );
    }
    form.push_str("</select></label>\n<fieldset><legend>Sectors</legend>");
    for sector in catalog.sector_options() {
        form.push_str(&checkbox("sector", &sector, params.sectors.contains(&sector)));
    }
    form.push_str("</fieldset>\n<fieldset><legend>Technologies</legend>");
    for tech in catalog.technology_options() {
        form.push_str(&checkbox("tech", &tech, params.technologies.contains(&tech)));
    }
    let _ = write!(
        form,
        "</fieldset>\n<label>Investment (EUR) <input type=\"number\" name=\"investment\" min=\"0\" step=\"1000\" value=\"{}\"></label>\n<label>Year <input type=\"number\" name=\"year\" min=\"{}\" max=\"{}\" value=\"{}\"></label>\n<button type=\"submit\">Calculate</button>\n</form>\n",
        params.investment,
        ftradar_core::subsidy::MIN_TARGET_YEAR,
        ftradar_core::subsidy::MAX_TARGET_YEAR,
        params.target_year,
    );
    form
}

fn checkbox(name: &str, value: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        "<label><input type=\"checkbox\" name=\"{name}\" value=\"{value}\"{checked}> {value}</label>",
        value = escape_html(value)
    )
}
