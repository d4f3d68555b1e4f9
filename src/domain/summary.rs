// Dataset summary domain model and aggregation
use super::equipment::EquipmentRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregates {
    pub total_count: usize,
    pub average_flowrate: f64,
    pub average_pressure: f64,
    pub average_temperature: f64,
    pub type_distribution: BTreeMap<String, usize>,
}

/// Fold records into counts, rounded averages and the type histogram
pub fn aggregate(records: &[EquipmentRecord]) -> Aggregates {
    let total_count = records.len();
    if total_count == 0 {
        return Aggregates::default();
    }

    let mut flowrate = 0.0;
    let mut pressure = 0.0;
    let mut temperature = 0.0;
    let mut type_distribution = BTreeMap::new();

    for record in records {
        flowrate += record.flowrate;
        pressure += record.pressure;
        temperature += record.temperature;
        *type_distribution
            .entry(record.equipment_type.clone())
            .or_insert(0) += 1;
    }

    let count = total_count as f64;
    Aggregates {
        total_count,
        average_flowrate: round2(flowrate / count),
        average_pressure: round2(pressure / count),
        average_temperature: round2(temperature / count),
        type_distribution,
    }
}

/// Round to 2 decimals. Non-finite values (an overflowing sum) become 0.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.is_finite() { rounded } else { value }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
    pub average_flowrate: f64,
    pub average_pressure: f64,
    pub average_temperature: f64,
    pub type_distribution: BTreeMap<String, usize>,
    pub records: Vec<EquipmentRecord>,
}

impl DatasetSummary {
    pub fn new(
        id: String,
        file_name: String,
        uploaded_at: DateTime<Utc>,
        records: Vec<EquipmentRecord>,
    ) -> Self {
        let aggregates = aggregate(&records);
        Self::from_parts(id, file_name, uploaded_at, aggregates, records)
    }

    /// Build from aggregates computed elsewhere (e.g. by an upstream backend)
    pub fn from_parts(
        id: String,
        file_name: String,
        uploaded_at: DateTime<Utc>,
        aggregates: Aggregates,
        records: Vec<EquipmentRecord>,
    ) -> Self {
        Self {
            id,
            file_name,
            uploaded_at,
            total_count: aggregates.total_count,
            average_flowrate: aggregates.average_flowrate,
            average_pressure: aggregates.average_pressure,
            average_temperature: aggregates.average_temperature,
            type_distribution: aggregates.type_distribution,
            records,
        }
    }

    /// Summarize freshly normalized records with a new id and the current time
    pub fn summarize(file_name: impl Into<String>, records: Vec<EquipmentRecord>) -> Self {
        Self::new(
            uuid::Uuid::new_v4().simple().to_string(),
            file_name.into(),
            Utc::now(),
            records,
        )
    }

    pub fn type_count(&self) -> usize {
        self.type_distribution.len()
    }

    /// Share of a type label in percent. An empty dataset is treated as a total of 1.
    pub fn type_percentage(&self, label: &str) -> f64 {
        let count = self.type_distribution.get(label).copied().unwrap_or(0);
        let total = self.total_count.max(1);
        count as f64 / total as f64 * 100.0
    }
}
