//! Dispensing rules (treatment-plan rows) and their validated cadence.

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, ModelError};
use crate::patient::Tpc;

/// One treatment-plan row mapping a matching key to a drug stream.
///
/// Values are kept as read from the source table; [`DispensingRule::validate`]
/// turns the raw visit days and cycle length into a [`Cadence`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispensingRule {
    pub protocol: String,
    pub randomized_treatment: String,
    pub status: String,
    pub tpc: Tpc,
    pub drug: String,
    pub additional_drug: Option<String>,
    pub visit_days: Vec<i64>,
    pub quantity: f64,
    pub cycle_length_days: i64,
}

impl DispensingRule {
    /// Drugs dispensed by this rule, primary first. Blank names are skipped.
    pub fn drugs(&self) -> Vec<&str> {
        std::iter::once(self.drug.as_str())
            .chain(self.additional_drug.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn cadence(&self) -> Result<Cadence, CadenceError> {
        Cadence::new(&self.visit_days, self.cycle_length_days)
    }

    /// Check everything projection relies on and return the cadence.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCadence`] for unusable visit days or cycle
    /// length, [`ModelError::InvalidQuantity`] for a non-positive quantity and
    /// [`ModelError::MissingDrug`] when both drug columns are blank.
    pub fn validate(&self) -> Result<Cadence, ModelError> {
        let cadence = self.cadence()?;
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(ModelError::InvalidQuantity(self.quantity));
        }
        if self.drugs().is_empty() {
            return Err(ModelError::MissingDrug);
        }
        Ok(cadence)
    }
}

/// Visit days within a cycle plus the cycle length.
///
/// Invariants: at least one visit day, days strictly increasing and within
/// `1..=cycle_length`, cycle length positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cadence {
    visit_days: Vec<u32>,
    cycle_length: u32,
}

impl Cadence {
    /// Build a cadence from raw values. Days may arrive unsorted.
    pub fn new(visit_days: &[i64], cycle_length: i64) -> Result<Self, CadenceError> {
        let cycle_length = u32::try_from(cycle_length)
            .ok()
            .filter(|len| *len > 0)
            .ok_or(CadenceError::NonPositiveCycleLength(cycle_length))?;
        if visit_days.is_empty() {
            return Err(CadenceError::NoVisitDays);
        }
        let mut days = Vec::with_capacity(visit_days.len());
        for &raw in visit_days {
            let day = u32::try_from(raw)
                .ok()
                .filter(|day| *day > 0)
                .ok_or(CadenceError::NonPositiveVisitDay(raw))?;
            if day > cycle_length {
                return Err(CadenceError::VisitDayBeyondCycle { day, cycle_length });
            }
            days.push(day);
        }
        days.sort_unstable();
        if let Some(pair) = days.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CadenceError::DuplicateVisitDay(pair[0]));
        }
        Ok(Self {
            visit_days: days,
            cycle_length,
        })
    }

    pub fn visit_days(&self) -> &[u32] {
        &self.visit_days
    }

    /// The anchor day of every cycle.
    pub fn first_day(&self) -> u32 {
        self.visit_days[0]
    }

    pub fn cycle_length(&self) -> u32 {
        self.cycle_length
    }
}
