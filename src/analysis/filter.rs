//! Carrier selection and filtering.

use crate::models::ShipmentRecord;

/// The set of carriers the dashboard is restricted to.
///
/// Order is preserved for display; duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierSelection {
    carriers: Vec<String>,
}

impl CarrierSelection {
    /// Select every carrier present in `records`.
    pub fn all(records: &[ShipmentRecord]) -> Self {
        Self {
            carriers: distinct_carriers(records),
        }
    }

    /// Select exactly the given carriers.
    pub fn only<I, S>(carriers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<String> = Vec::new();
        for carrier in carriers {
            let carrier = carrier.as_ref().trim();
            if !carrier.is_empty() && !selected.iter().any(|c| c == carrier) {
                selected.push(carrier.to_string());
            }
        }
        Self { carriers: selected }
    }

    /// Select nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, carrier: &str) -> bool {
        self.carriers.iter().any(|c| c == carrier)
    }

    pub fn carriers(&self) -> &[String] {
        &self.carriers
    }
}

/// Distinct carriers in order of first appearance.
pub fn distinct_carriers(records: &[ShipmentRecord]) -> Vec<String> {
    let mut carriers: Vec<String> = Vec::new();
    for record in records {
        if !carriers.contains(&record.carrier) {
            carriers.push(record.carrier.clone());
        }
    }
    carriers
}

/// Keep the records whose carrier is selected. Never copies a record.
pub fn filter_by_carrier<'a, I>(
    records: I,
    selection: &CarrierSelection,
) -> Vec<&'a ShipmentRecord>
where
    I: IntoIterator<Item = &'a ShipmentRecord>,
{
    records
        .into_iter()
        .filter(|r| selection.contains(&r.carrier))
        .collect()
}
