use std::io::{self, Write};

use anyhow::Result;
use ftradar_core::models::{RegulatoryItem, format_date, format_timestamp};
use ftradar_core::subsidy::SubsidyEstimate;

const ABSENT: &str = "-";
const LIST_SEPARATOR: &str = " | ";

pub(super) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// `id | recorded_at | effective_date | category | region | title | change_type`
pub(super) fn list_line(item: &RegulatoryItem) -> String {
    let effective_date = item
        .effective_date
        .map_or_else(|| ABSENT.to_string(), |date| format_date(&date));
    let region = item.region.map_or(ABSENT, |region| region.code());
    let recorded_at = format_timestamp(&item.recorded_at);
    let fields: [&str; 7] = [
        &item.id,
        &recorded_at,
        &effective_date,
        item.category.as_str(),
        region,
        &item.title,
        item.change_type.as_str(),
    ];
    fields.join(LIST_SEPARATOR)
}

pub(super) fn subsidy_table(estimates: &[SubsidyEstimate]) -> Vec<String> {
    let mut lines = vec![
        [
            "Program",
            "Agency",
            "Instrument",
            "Technologies",
            "Rate",
            "Grant (est.)",
            "Loan payment/month (est.)",
            "Monthly benefit (heuristic)",
            "Source",
        ]
        .join(LIST_SEPARATOR),
    ];
    for estimate in estimates {
        let row = estimate.display_row();
        lines.push(
            [
                row.program,
                row.agency,
                row.instrument,
                row.technologies,
                row.grant_rate,
                row.grant_amount,
                row.monthly_loan_payment,
                row.monthly_benefit,
                row.source,
            ]
            .join(LIST_SEPARATOR),
        );
    }
    lines
}
