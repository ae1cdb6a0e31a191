//! Treatment-plan matching.
//!
//! A patient is turned into a [`MatchKey`], an ordered list of equality
//! predicates over rule fields. Every catalog rule that satisfies all
//! predicates applies; several rules sharing a key express combination
//! therapy.
//!
//! Crossover patients use a different key: their treatment label is not
//! compared, and the rule's TPC must equal the patient's *original* TPC.
//! Together with the crossover status this selects the drug the patient
//! crossed over to rather than the control-arm drug.

use serde::Serialize;
use tracing::debug;

use dispense_model::{DispensingRule, ForecastOptions, PatientRecord, StatusMatching};

use crate::catalog::{CatalogEntry, RuleCatalog};

/// Rule column a predicate compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Protocol,
    Treatment,
    Status,
    Tpc,
}

impl RuleField {
    fn value(self, rule: &DispensingRule) -> &str {
        match self {
            Self::Protocol => &rule.protocol,
            Self::Treatment => &rule.randomized_treatment,
            Self::Status => &rule.status,
            Self::Tpc => rule.tpc.as_str(),
        }
    }
}

/// Normalized matching key built from a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey<'p> {
    Standard {
        protocol: &'p str,
        treatment: &'p str,
        status: &'p str,
        tpc: &'p str,
    },
    Crossover {
        protocol: &'p str,
        status: &'p str,
        original_tpc: &'p str,
    },
    /// Standard key with the status dropped.
    Relaxed {
        protocol: &'p str,
        treatment: &'p str,
        tpc: &'p str,
    },
}

impl<'p> MatchKey<'p> {
    pub fn for_patient(patient: &'p PatientRecord, options: &ForecastOptions) -> Self {
        if options.is_crossover_status(&patient.status) {
            Self::Crossover {
                protocol: &patient.protocol,
                status: &patient.status,
                original_tpc: patient.tpc.as_str(),
            }
        } else {
            Self::Standard {
                protocol: &patient.protocol,
                treatment: &patient.randomized_treatment,
                status: &patient.status,
                tpc: patient.tpc.as_str(),
            }
        }
    }

    /// Key tried when this one matches nothing. Only standard keys relax.
    pub fn relaxed(&self) -> Option<Self> {
        match *self {
            Self::Standard {
                protocol,
                treatment,
                tpc,
                ..
            } => Some(Self::Relaxed {
                protocol,
                treatment,
                tpc,
            }),
            Self::Crossover { .. } | Self::Relaxed { .. } => None,
        }
    }

    /// Equality predicates in evaluation order.
    pub fn predicates(&self) -> Vec<(RuleField, &'p str)> {
        match *self {
            Self::Standard {
                protocol,
                treatment,
                status,
                tpc,
            } => vec![
                (RuleField::Protocol, protocol),
                (RuleField::Treatment, treatment),
                (RuleField::Status, status),
                (RuleField::Tpc, tpc),
            ],
            Self::Crossover {
                protocol,
                status,
                original_tpc,
            } => vec![
                (RuleField::Protocol, protocol),
                (RuleField::Status, status),
                (RuleField::Tpc, original_tpc),
            ],
            Self::Relaxed {
                protocol,
                treatment,
                tpc,
            } => vec![
                (RuleField::Protocol, protocol),
                (RuleField::Treatment, treatment),
                (RuleField::Tpc, tpc),
            ],
        }
    }

    pub fn accepts(&self, rule: &DispensingRule) -> bool {
        self.predicates()
            .iter()
            .all(|(field, expected)| field.value(rule) == *expected)
    }

    pub fn route(&self) -> MatchRoute {
        match self {
            Self::Standard { .. } => MatchRoute::Standard,
            Self::Crossover { .. } => MatchRoute::Crossover,
            Self::Relaxed { .. } => MatchRoute::RelaxedStatus,
        }
    }
}

/// Which key produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRoute {
    Standard,
    Crossover,
    RelaxedStatus,
}

/// Rules selected for one patient, in catalog order.
#[derive(Debug, Clone)]
pub struct RuleMatch<'c, 'r> {
    pub route: MatchRoute,
    pub rules: Vec<&'c CatalogEntry<'r>>,
}

impl RuleMatch<'_, '_> {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// All catalog rules accepted by `key`, in catalog order.
pub fn select<'c, 'r>(key: &MatchKey<'_>, catalog: &'c RuleCatalog<'r>) -> Vec<&'c CatalogEntry<'r>> {
    catalog
        .entries()
        .iter()
        .filter(|entry| key.accepts(entry.rule))
        .collect()
}

/// Select the dispensing rules that apply to `patient`.
///
/// An empty result means the patient cannot be projected; callers count it
/// as unmatched.
pub fn match_rules<'c, 'r>(
    patient: &PatientRecord,
    catalog: &'c RuleCatalog<'r>,
    options: &ForecastOptions,
) -> RuleMatch<'c, 'r> {
    let key = MatchKey::for_patient(patient, options);
    let rules = select(&key, catalog);
    if rules.is_empty() && options.status_matching == StatusMatching::RelaxOnMiss {
        if let Some(relaxed) = key.relaxed() {
            let fallback = select(&relaxed, catalog);
            if !fallback.is_empty() {
                debug!(
                    rules = fallback.len(),
                    "matched after dropping the status predicate"
                );
                return RuleMatch {
                    route: relaxed.route(),
                    rules: fallback,
                };
            }
        }
    }
    RuleMatch {
        route: key.route(),
        rules,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dispense_model::Tpc;

    use super::*;

    const PROTOCOL: &str = "GS-US-592-6173";
    const SG_ARM: &str = "Sacituzumab Govitecan plus Pembrolizumab";
    const TPC_ARM: &str = "Treatment of Physician's Choice plus Pembrolizumab";

    fn rule(treatment: &str, status: &str, tpc: &str, drug: &str) -> DispensingRule {
        DispensingRule {
            protocol: PROTOCOL.to_string(),
            randomized_treatment: treatment.to_string(),
            status: status.to_string(),
            tpc: Tpc::new(tpc),
            drug: drug.to_string(),
            additional_drug: None,
            visit_days: vec![1, 8],
            quantity: 1.0,
            cycle_length_days: 21,
        }
    }

    fn patient(treatment: &str, status: &str, tpc: &str) -> PatientRecord {
        PatientRecord {
            protocol: PROTOCOL.to_string(),
            site_id: "10663".to_string(),
            country: "Japan".to_string(),
            depot: None,
            subject_number: "10663-106".to_string(),
            randomized_on: None,
            status: status.to_string(),
            randomized_treatment: treatment.to_string(),
            tpc: Tpc::new(tpc),
            last_visit_label: "Cycle 1 Day 1".to_string(),
            last_visit_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    fn rules() -> Vec<DispensingRule> {
        vec![
            rule(SG_ARM, "Randomized", "n/a", "Sacituzumab Govitecan"),
            rule(SG_ARM, "Randomized", "n/a", "Pembrolizumab"),
            rule(TPC_ARM, "Randomized", "Nab-Paclitaxel 100 mg/m2", "Nab-Paclitaxel"),
            rule(TPC_ARM, "Randomized", "Paclitaxel 90 mg/m2", "Paclitaxel"),
            rule(
                "Crossover",
                "Crossover Approved",
                "Nab-Paclitaxel 100 mg/m2",
                "Sacituzumab Govitecan",
            ),
        ]
    }

    fn drugs(matched: &RuleMatch<'_, '_>) -> Vec<String> {
        matched
            .rules
            .iter()
            .map(|entry| entry.rule.drug.clone())
            .collect()
    }

    #[test]
    fn standard_key_returns_every_combination_rule() {
        let rules = rules();
        let catalog = RuleCatalog::new(&rules);
        let matched = match_rules(
            &patient(SG_ARM, "Randomized", "N/A"),
            &catalog,
            &ForecastOptions::default(),
        );
        assert_eq!(matched.route, MatchRoute::Standard);
        assert_eq!(drugs(&matched), vec!["Sacituzumab Govitecan", "Pembrolizumab"]);
    }

    #[test]
    fn tpc_discriminates_control_arm_drug() {
        let rules = rules();
        let catalog = RuleCatalog::new(&rules);
        let matched = match_rules(
            &patient(TPC_ARM, "Randomized", "Paclitaxel 90 mg/m2"),
            &catalog,
            &ForecastOptions::default(),
        );
        assert_eq!(drugs(&matched), vec!["Paclitaxel"]);
    }

    #[test]
    fn crossover_ignores_treatment_and_uses_original_tpc() {
        let rules = rules();
        let catalog = RuleCatalog::new(&rules);
        let matched = match_rules(
            &patient(TPC_ARM, "Crossover Approved", "Nab-Paclitaxel 100 mg/m2"),
            &catalog,
            &ForecastOptions::default(),
        );
        assert_eq!(matched.route, MatchRoute::Crossover);
        assert_eq!(drugs(&matched), vec!["Sacituzumab Govitecan"]);
    }

    #[test]
    fn crossover_with_other_tpc_does_not_match() {
        let rules = rules();
        let catalog = RuleCatalog::new(&rules);
        let matched = match_rules(
            &patient(TPC_ARM, "Crossover Approved", "Paclitaxel 90 mg/m2"),
            &catalog,
            &ForecastOptions::default().with_status_matching(StatusMatching::RelaxOnMiss),
        );
        assert!(matched.is_empty());
        assert_eq!(matched.route, MatchRoute::Crossover);
    }

    #[test]
    fn strict_matching_requires_status() {
        let rules = rules();
        let catalog = RuleCatalog::new(&rules);
        let subject = patient(SG_ARM, "On Treatment", "n/a");

        let strict = match_rules(&subject, &catalog, &ForecastOptions::default());
        assert!(strict.is_empty());

        let relaxed = match_rules(
            &subject,
            &catalog,
            &ForecastOptions::default().with_status_matching(StatusMatching::RelaxOnMiss),
        );
        assert_eq!(relaxed.route, MatchRoute::RelaxedStatus);
        assert_eq!(drugs(&relaxed), vec!["Sacituzumab Govitecan", "Pembrolizumab"]);
    }

    #[test]
    fn crossover_key_predicates_skip_treatment() {
        let subject = patient(TPC_ARM, "Crossover Approved", "Nab-Paclitaxel 100 mg/m2");
        let key = MatchKey::for_patient(&subject, &ForecastOptions::default());
        let fields: Vec<RuleField> = key.predicates().iter().map(|(field, _)| *field).collect();
        assert_eq!(
            fields,
            vec![RuleField::Protocol, RuleField::Status, RuleField::Tpc]
        );
        assert_eq!(key.relaxed(), None);
    }
}
