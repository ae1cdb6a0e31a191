//! Projected dispensing visits, the output unit of a forecast run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::patient::Tpc;

/// One dispensing event for one drug on one projected visit date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedVisit {
    #[serde(rename = "Study Protocol")]
    pub protocol: String,
    #[serde(rename = "Subject Number")]
    pub subject_number: String,
    #[serde(rename = "Site ID")]
    pub site_id: String,
    #[serde(rename = "Depot")]
    pub depot: Option<String>,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Subject Status")]
    pub status: String,
    #[serde(rename = "Randomized Treatment")]
    pub randomized_treatment: String,
    #[serde(rename = "TPC")]
    pub tpc: Tpc,
    #[serde(rename = "Dispensing Drug")]
    pub drug: String,
    #[serde(rename = "Dispensing Quantity")]
    pub quantity: f64,
    #[serde(rename = "Projected Visit Date")]
    pub visit_date: NaiveDate,
    #[serde(rename = "Projected Visit Number")]
    pub visit_label: String,
    #[serde(rename = "Projected Study Cycle")]
    pub cycle: u32,
    #[serde(rename = "Projected Study Cycle Day")]
    pub day: u32,
}

/// Key for the output uniqueness invariant: (subject number, date, drug).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitKey<'a> {
    pub subject_number: &'a str,
    pub visit_date: NaiveDate,
    pub drug: &'a str,
}

impl ProjectedVisit {
    pub fn key(&self) -> VisitKey<'_> {
        VisitKey {
            subject_number: &self.subject_number,
            visit_date: self.visit_date,
            drug: &self.drug,
        }
    }
}

/// Render a visit label for a cycle/day pair.
pub fn visit_label(crossover: bool, cycle: u32, day: u32) -> String {
    if crossover {
        format!("Crossover Cycle {cycle} Day {day}")
    } else {
        format!("Cycle {cycle} Day {day}")
    }
}
