//! Funding section builder.

use crate::constants::{
    FUNDING_AMOUNT_TITLE, FUNDING_END_DATE_TITLE, FUNDING_SOURCE_PROJECT_ID_TITLE,
    FUNDING_SOURCE_TITLE, FUNDING_START_DATE_TITLE, INVESTMENT_ACTION_CATEGORY_TITLE,
};
use crate::repository::FundingSourceRow;
use eml::{Funding, Section};
use eml_types::calendar_date;

/// Builds the `funding` section, or `None` when there are no funding rows.
///
/// Each row replaces the section built from the previous one, so only the last row is
/// rendered.
// TODO: accumulate one `Funding Source` section per row once partners accept repeated sections.
pub fn build_funding(rows: &[FundingSourceRow]) -> Option<Funding> {
    let mut funding = None;
    for row in rows {
        funding = Some(Funding {
            section: funding_source_section(row),
        });
    }

    if rows.len() > 1 {
        tracing::debug!(
            rows = rows.len(),
            "funding section reflects only the last funding source"
        );
    }

    funding
}

fn funding_source_section(row: &FundingSourceRow) -> Section {
    let details = vec![
        Section::new(
            FUNDING_SOURCE_PROJECT_ID_TITLE,
            row.funding_source_project_id.clone(),
        ),
        Section::new(FUNDING_AMOUNT_TITLE, Some(row.funding_amount.to_string())),
        Section::new(
            FUNDING_START_DATE_TITLE,
            Some(calendar_date(&row.start_date).to_string()),
        ),
        Section::new(
            FUNDING_END_DATE_TITLE,
            Some(calendar_date(&row.end_date).to_string()),
        ),
    ];

    Section::new(FUNDING_SOURCE_TITLE, Some(row.funding_source_name.clone())).with_sections(vec![
        Section::new(
            INVESTMENT_ACTION_CATEGORY_TITLE,
            Some(row.investment_action_category_name.clone()),
        )
        .with_sections(details),
    ])
}
