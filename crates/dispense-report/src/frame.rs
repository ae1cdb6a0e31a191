//! The forecast as a polars frame.

use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};

use dispense_model::ProjectedVisit;
use dispense_model::columns::forecast;

/// Build the demand frame with one row per projected visit.
///
/// Dates are stored as ISO text so lexical order is chronological. A derived
/// [`forecast::MONTH`] column (`YYYY-MM`) feeds the monthly summary.
pub fn demand_frame(visits: &[ProjectedVisit]) -> PolarsResult<DataFrame> {
    let depots: Vec<Option<&str>> = visits.iter().map(|v| v.depot.as_deref()).collect();
    let quantities: Vec<f64> = visits.iter().map(|v| v.quantity).collect();
    let dates: Vec<String> = visits
        .iter()
        .map(|v| v.visit_date.format("%Y-%m-%d").to_string())
        .collect();
    let months: Vec<String> = visits
        .iter()
        .map(|v| v.visit_date.format("%Y-%m").to_string())
        .collect();
    let cycles: Vec<u32> = visits.iter().map(|v| v.cycle).collect();
    let days: Vec<u32> = visits.iter().map(|v| v.day).collect();

    DataFrame::new(vec![
        Series::new(forecast::PROTOCOL.into(), text(visits, |v| v.protocol.as_str())).into(),
        Series::new(forecast::SUBJECT_NUMBER.into(), text(visits, |v| v.subject_number.as_str())).into(),
        Series::new(forecast::SITE_ID.into(), text(visits, |v| v.site_id.as_str())).into(),
        Series::new(forecast::DEPOT.into(), depots).into(),
        Series::new(forecast::COUNTRY.into(), text(visits, |v| v.country.as_str())).into(),
        Series::new(forecast::STATUS.into(), text(visits, |v| v.status.as_str())).into(),
        Series::new(forecast::TREATMENT.into(), text(visits, |v| v.randomized_treatment.as_str())).into(),
        Series::new(forecast::TPC.into(), text(visits, |v| v.tpc.as_str())).into(),
        Series::new(forecast::DRUG.into(), text(visits, |v| v.drug.as_str())).into(),
        Series::new(forecast::QUANTITY.into(), quantities).into(),
        Series::new(forecast::VISIT_DATE.into(), dates).into(),
        Series::new(forecast::VISIT_LABEL.into(), text(visits, |v| v.visit_label.as_str())).into(),
        Series::new(forecast::CYCLE.into(), cycles).into(),
        Series::new(forecast::CYCLE_DAY.into(), days).into(),
        Series::new(forecast::MONTH.into(), months).into(),
    ])
}

fn text<'a>(
    visits: &'a [ProjectedVisit],
    get: impl Fn(&'a ProjectedVisit) -> &'a str,
) -> Vec<&'a str> {
    visits.iter().map(get).collect()
}
