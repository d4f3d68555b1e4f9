// Mapper between the canonical domain models and the JSON wire payload
use crate::domain::equipment::{new_record_id, EquipmentRecord};
use crate::domain::summary::{Aggregates, DatasetSummary};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

const DEFAULT_FILE_NAME: &str = "dataset.csv";

/// Dataset as exchanged over HTTP and persisted in `history.json`.
///
/// Serializes with the backend field names. Deserialization also accepts the
/// camelCase names some clients send, and missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPayload {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "fileName", alias = "file", default)]
    pub file_name: Option<String>,
    #[serde(rename = "uploadDate", alias = "uploaded_at", default)]
    pub upload_date: Option<String>,
    #[serde(alias = "totalCount", default)]
    pub total_equipment: usize,
    #[serde(alias = "averageFlowrate", default)]
    pub avg_flowrate: f64,
    #[serde(alias = "averagePressure", default)]
    pub avg_pressure: f64,
    #[serde(alias = "averageTemperature", default)]
    pub avg_temperature: f64,
    #[serde(alias = "typeDistribution", default)]
    pub type_distribution: BTreeMap<String, usize>,
    #[serde(alias = "rows", alias = "records", default)]
    pub data: Vec<RecordPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "name", default)]
    pub equipment_name: String,
    #[serde(rename = "type", default)]
    pub equipment_type: String,
    #[serde(default)]
    pub flowrate: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub temperature: f64,
}

pub fn summary_to_payload(summary: &DatasetSummary) -> DatasetPayload {
    DatasetPayload {
        id: summary.id.clone(),
        file_name: Some(summary.file_name.clone()),
        upload_date: Some(summary.uploaded_at.to_rfc3339()),
        total_equipment: summary.total_count,
        avg_flowrate: summary.average_flowrate,
        avg_pressure: summary.average_pressure,
        avg_temperature: summary.average_temperature,
        type_distribution: summary.type_distribution.clone(),
        data: summary.records.iter().map(record_to_payload).collect(),
    }
}

pub fn record_to_payload(record: &EquipmentRecord) -> RecordPayload {
    RecordPayload {
        id: Some(record.id.clone()),
        equipment_name: record.name.clone(),
        equipment_type: record.equipment_type.clone(),
        flowrate: record.flowrate,
        pressure: record.pressure,
        temperature: record.temperature,
    }
}

/// Trusts the aggregates carried by the payload; records pass through as given
pub fn summary_from_payload(payload: DatasetPayload) -> DatasetSummary {
    let file_name = payload
        .file_name
        .as_deref()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string();

    let uploaded_at = payload
        .upload_date
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    let aggregates = Aggregates {
        total_count: payload.total_equipment,
        average_flowrate: payload.avg_flowrate,
        average_pressure: payload.avg_pressure,
        average_temperature: payload.avg_temperature,
        type_distribution: payload.type_distribution,
    };

    let records = payload.data.into_iter().map(record_from_payload).collect();
    DatasetSummary::from_parts(payload.id, file_name, uploaded_at, aggregates, records)
}

fn record_from_payload(payload: RecordPayload) -> EquipmentRecord {
    EquipmentRecord::new(
        payload.id.unwrap_or_else(new_record_id),
        payload.equipment_name,
        payload.equipment_type,
        payload.flowrate,
        payload.pressure,
        payload.temperature,
    )
}

// RFC 3339, or a naive ISO timestamp taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
