//! Column headers of the subject, rule and forecast tables.

pub mod subject {
    pub const PROTOCOL: &str = "Study Protocol";
    pub const SITE_ID: &str = "Site ID";
    pub const COUNTRY: &str = "Country";
    pub const DEPOT: &str = "Depot";
    pub const SUBJECT_NUMBER: &str = "Subject Number";
    pub const DATE_RANDOMIZED: &str = "Date Randomized";
    pub const STATUS: &str = "Subject Status";
    pub const TREATMENT: &str = "Randomized Treatment";
    pub const TPC: &str = "TPC";
    pub const LAST_VISIT_LABEL: &str = "Last Study Visit Recorded";
    pub const LAST_VISIT_DATE: &str = "Last Study Visit Date";

    pub const REQUIRED: &[&str] = &[
        PROTOCOL,
        SITE_ID,
        SUBJECT_NUMBER,
        STATUS,
        TREATMENT,
        TPC,
        LAST_VISIT_LABEL,
        LAST_VISIT_DATE,
    ];
}

pub mod rule {
    pub const PROTOCOL: &str = "Study Protocol";
    pub const TREATMENT: &str = "Randomized Treatment";
    pub const STATUS: &str = "Subject Status";
    pub const TPC: &str = "TPC";
    pub const DRUG: &str = "Study Drug Dispensed";
    pub const ADDITIONAL_DRUG: &str = "Additional Study Drug Dispensed";
    pub const VISIT_DAYS: &str = "Visit Days";
    pub const QUANTITY: &str = "Dispensing Quantity";
    pub const FREQUENCY: &str = "Dispensing Frequency (Days)";

    pub const REQUIRED: &[&str] = &[
        PROTOCOL, TREATMENT, STATUS, TPC, DRUG, VISIT_DAYS, QUANTITY, FREQUENCY,
    ];
}

pub mod forecast {
    pub const PROTOCOL: &str = "Study Protocol";
    pub const SUBJECT_NUMBER: &str = "Subject Number";
    pub const SITE_ID: &str = "Site ID";
    pub const DEPOT: &str = "Depot";
    pub const COUNTRY: &str = "Country";
    pub const STATUS: &str = "Subject Status";
    pub const TREATMENT: &str = "Randomized Treatment";
    pub const TPC: &str = "TPC";
    pub const DRUG: &str = "Dispensing Drug";
    pub const QUANTITY: &str = "Dispensing Quantity";
    pub const VISIT_DATE: &str = "Projected Visit Date";
    pub const VISIT_LABEL: &str = "Projected Visit Number";
    pub const CYCLE: &str = "Projected Study Cycle";
    pub const CYCLE_DAY: &str = "Projected Study Cycle Day";

    /// Demand-table headers in output order.
    pub const HEADERS: &[&str] = &[
        PROTOCOL,
        SUBJECT_NUMBER,
        SITE_ID,
        DEPOT,
        COUNTRY,
        STATUS,
        TREATMENT,
        TPC,
        DRUG,
        QUANTITY,
        VISIT_DATE,
        VISIT_LABEL,
        CYCLE,
        CYCLE_DAY,
    ];

    /// Derived `YYYY-MM` bucket used by the monthly summary.
    pub const MONTH: &str = "Month";
}
