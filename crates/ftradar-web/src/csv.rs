use std::borrow::Cow;

use ftradar_core::models::{ItemRecord, RegulatoryItem};
use ftradar_core::subsidy::SubsidyEstimate;

const ITEM_HEADER: [&str; 11] = [
    "recorded_at",
    "effective_date",
    "category",
    "region",
    "title",
    "summary",
    "source_url",
    "source_org",
    "change_type",
    "impact_notes",
    "tags",
];

const ESTIMATE_HEADER: [&str; 10] = [
    "program_id",
    "program",
    "agency",
    "instrument",
    "technologies",
    "grant_rate",
    "grant_estimate",
    "loan_payment_per_month",
    "monthly_benefit",
    "source",
];

pub(crate) fn items_csv(items: &[RegulatoryItem]) -> String {
    let mut out = String::new();
    push_row(&mut out, &ITEM_HEADER);
    for item in items {
        let record = ItemRecord::from(item);
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        push_row(
            &mut out,
            &[
                &record.recorded_at,
                &optional(&record.effective_date),
                &record.category,
                &optional(&record.region),
                &record.title,
                &record.summary,
                &optional(&record.source_url),
                &optional(&record.source_org),
                &record.change_type,
                &optional(&record.impact_notes),
                &optional(&record.tags),
            ],
        );
    }
    out
}

pub(crate) fn estimates_csv(estimates: &[SubsidyEstimate]) -> String {
    let mut out = String::new();
    push_row(&mut out, &ESTIMATE_HEADER);
    for estimate in estimates {
        let row = estimate.display_row();
        push_row(
            &mut out,
            &[
                &estimate.program_id,
                &row.program,
                &row.agency,
                &row.instrument,
                &row.technologies,
                &row.grant_rate,
                &row.grant_amount,
                &row.monthly_loan_payment,
                &row.monthly_benefit,
                &row.source,
            ],
        );
    }
    out
}

fn push_row(out: &mut String, fields: &[&str]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote(field));
    }
    out.push('\n');
}

fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
