//! Validated view of the dispensing-rule table.

use serde::Serialize;
use tracing::warn;

use dispense_model::{Cadence, DispensingRule};

/// A rule that passed validation, with its cadence.
#[derive(Debug, Clone)]
pub struct CatalogEntry<'a> {
    /// Position of the rule in the source table (0-based).
    pub index: usize,
    pub rule: &'a DispensingRule,
    pub cadence: Cadence,
}

/// A rule excluded from matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRule {
    pub index: usize,
    pub protocol: String,
    pub randomized_treatment: String,
    pub status: String,
    pub drug: String,
    pub reason: String,
}

/// Rules usable for matching, in source order, plus the rejected ones.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog<'a> {
    entries: Vec<CatalogEntry<'a>>,
    rejected: Vec<RejectedRule>,
}

impl<'a> RuleCatalog<'a> {
    /// Validate every rule. Rules with an unusable cadence, quantity or drug
    /// are logged and excluded; they can never be matched or projected.
    pub fn new(rules: &'a [DispensingRule]) -> Self {
        let mut catalog = Self::default();
        for (index, rule) in rules.iter().enumerate() {
            match rule.validate() {
                Ok(cadence) => catalog.entries.push(CatalogEntry {
                    index,
                    rule,
                    cadence,
                }),
                Err(error) => {
                    warn!(
                        rule_index = index,
                        protocol = %rule.protocol,
                        status = %rule.status,
                        %error,
                        "excluding dispensing rule"
                    );
                    catalog.rejected.push(RejectedRule {
                        index,
                        protocol: rule.protocol.clone(),
                        randomized_treatment: rule.randomized_treatment.clone(),
                        status: rule.status.clone(),
                        drug: rule.drugs().join(" + "),
                        reason: error.to_string(),
                    });
                }
            }
        }
        catalog
    }

    pub fn entries(&self) -> &[CatalogEntry<'a>] {
        &self.entries
    }

    pub fn rejected(&self) -> &[RejectedRule] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
