//! Demand summaries computed with polars lazy group-bys.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use polars::prelude::{DataFrame, IntoLazy, PolarsResult, SortMultipleOptions, col};
use serde::Serialize;

use dispense_model::ProjectedVisit;
use dispense_model::columns::forecast;

pub const TOTAL_QUANTITY: &str = "Total Quantity Needed";
pub const QUANTITY_NEEDED: &str = "Quantity Needed";
pub const PATIENTS: &str = "Number of Patients";
pub const VISITS: &str = "Number of Visits";

/// First and last projected visit dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn of(visits: &[ProjectedVisit]) -> Option<Self> {
        let first = visits.iter().map(|v| v.visit_date).min()?;
        let last = visits.iter().map(|v| v.visit_date).max()?;
        Some(Self { first, last })
    }
}

/// The three summary tables written next to the demand table.
#[derive(Debug, Clone)]
pub struct DemandSummaries {
    pub by_drug: DataFrame,
    pub by_month: DataFrame,
    pub by_country: DataFrame,
}

pub fn summarize(demand: &DataFrame) -> PolarsResult<DemandSummaries> {
    Ok(DemandSummaries {
        by_drug: summarize_by_drug(demand)?,
        by_month: summarize_by_month(demand)?,
        by_country: summarize_by_country(demand)?,
    })
}

/// Total quantity, distinct patients and visit rows per drug.
pub fn summarize_by_drug(demand: &DataFrame) -> PolarsResult<DataFrame> {
    demand
        .clone()
        .lazy()
        .group_by([col(forecast::DRUG)])
        .agg([
            col(forecast::QUANTITY).sum().alias(TOTAL_QUANTITY),
            col(forecast::SUBJECT_NUMBER).n_unique().alias(PATIENTS),
            col(forecast::VISIT_DATE).count().alias(VISITS),
        ])
        .sort([forecast::DRUG], SortMultipleOptions::default())
        .collect()
}

/// Quantity and distinct patients per calendar month and drug.
pub fn summarize_by_month(demand: &DataFrame) -> PolarsResult<DataFrame> {
    demand
        .clone()
        .lazy()
        .group_by([col(forecast::MONTH), col(forecast::DRUG)])
        .agg([
            col(forecast::QUANTITY).sum().alias(QUANTITY_NEEDED),
            col(forecast::SUBJECT_NUMBER).n_unique().alias(PATIENTS),
        ])
        .sort(
            [forecast::MONTH, forecast::DRUG],
            SortMultipleOptions::default(),
        )
        .collect()
}

/// Visit rows and distinct patients per country.
pub fn summarize_by_country(demand: &DataFrame) -> PolarsResult<DataFrame> {
    demand
        .clone()
        .lazy()
        .group_by([col(forecast::COUNTRY)])
        .agg([
            col(forecast::VISIT_DATE).count().alias(VISITS),
            col(forecast::SUBJECT_NUMBER).n_unique().alias(PATIENTS),
        ])
        .sort([forecast::COUNTRY], SortMultipleOptions::default())
        .collect()
}

pub fn unique_patients(visits: &[ProjectedVisit]) -> usize {
    visits
        .iter()
        .map(|v| v.subject_number.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}
