// Equipment record domain model and row normalization
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One CSV row keyed by header name
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: String,
    pub name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRecord {
    pub fn new(
        id: String,
        name: String,
        equipment_type: String,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Self {
        Self {
            id,
            name,
            equipment_type,
            flowrate,
            pressure,
            temperature,
        }
    }
}

/// Header spellings accepted for each logical field, in priority order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AliasTable {
    #[serde(default = "default_name_aliases")]
    pub name: Vec<String>,
    #[serde(default = "default_type_aliases")]
    pub equipment_type: Vec<String>,
    #[serde(default = "default_flowrate_aliases")]
    pub flowrate: Vec<String>,
    #[serde(default = "default_pressure_aliases")]
    pub pressure: Vec<String>,
    #[serde(default = "default_temperature_aliases")]
    pub temperature: Vec<String>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self {
            name: default_name_aliases(),
            equipment_type: default_type_aliases(),
            flowrate: default_flowrate_aliases(),
            pressure: default_pressure_aliases(),
            temperature: default_temperature_aliases(),
        }
    }
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|a| a.to_string()).collect()
}

fn default_name_aliases() -> Vec<String> {
    owned(&["Equipment Name", "equipment_name", "EquipmentName"])
}

fn default_type_aliases() -> Vec<String> {
    owned(&["Type", "type", "Equipment Type"])
}

fn default_flowrate_aliases() -> Vec<String> {
    owned(&["Flowrate", "flowrate", "Flow Rate"])
}

fn default_pressure_aliases() -> Vec<String> {
    owned(&["Pressure", "pressure"])
}

fn default_temperature_aliases() -> Vec<String> {
    owned(&["Temperature", "temperature", "Temp"])
}

impl AliasTable {
    /// First alias present in the row with a non-empty value
    fn resolve<'a>(row: &'a RawRow, aliases: &[String]) -> Option<&'a str> {
        aliases
            .iter()
            .filter_map(|alias| row.get(alias))
            .map(String::as_str)
            .find(|value| !value.is_empty())
    }

    fn resolve_text(row: &RawRow, aliases: &[String]) -> String {
        Self::resolve(row, aliases).unwrap_or_default().to_string()
    }

    fn resolve_number(row: &RawRow, aliases: &[String]) -> f64 {
        Self::resolve(row, aliases).map(coerce_number).unwrap_or(0.0)
    }
}

/// Lenient numeric coercion. Reads the longest leading number, so unit
/// suffixes like `"80 m3/h"` still count; anything else, or a non-finite
/// value, becomes 0.
pub fn coerce_number(raw: &str) -> f64 {
    match numeric_prefix(raw.trim()).parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

// [+-] digits [. digits] [(e|E) [+-] digits], with at least one mantissa digit
fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer = digits_from(end);
    end += integer;

    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }
    if integer + fraction == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }

    &text[..end]
}

/// Normalize one raw row. Returns `None` when the row has no equipment name.
pub fn normalize_row(row: &RawRow, aliases: &AliasTable, id: String) -> Option<EquipmentRecord> {
    let name = AliasTable::resolve_text(row, &aliases.name);
    if name.is_empty() {
        return None;
    }

    Some(EquipmentRecord::new(
        id,
        name,
        AliasTable::resolve_text(row, &aliases.equipment_type),
        AliasTable::resolve_number(row, &aliases.flowrate),
        AliasTable::resolve_number(row, &aliases.pressure),
        AliasTable::resolve_number(row, &aliases.temperature),
    ))
}

/// Normalize rows in order, dropping the ones without a name
pub fn normalize_rows(rows: &[RawRow], aliases: &AliasTable) -> Vec<EquipmentRecord> {
    rows.iter()
        .filter_map(|row| normalize_row(row, aliases, new_record_id()))
        .collect()
}

pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_canonical_headers() {
        let raw = row(&[
            ("Equipment Name", "Pump1"),
            ("Type", "Pump"),
            ("Flowrate", "80"),
            ("Pressure", "4.2"),
            ("Temperature", "30"),
        ]);

        let record = normalize_row(&raw, &AliasTable::default(), "r1".to_string()).unwrap();
        assert_eq!(record.name, "Pump1");
        assert_eq!(record.equipment_type, "Pump");
        assert_eq!(record.flowrate, 80.0);
        assert_eq!(record.pressure, 4.2);
        assert_eq!(record.temperature, 30.0);
    }

    #[test]
    fn test_normalize_alias_headers() {
        let raw = row(&[
            ("equipment_name", "HX-2"),
            ("Equipment Type", "Exchanger"),
            ("Flow Rate", "12.5"),
            ("pressure", "3"),
            ("Temp", "95"),
        ]);

        let record = normalize_row(&raw, &AliasTable::default(), "r1".to_string()).unwrap();
        assert_eq!(record.name, "HX-2");
        assert_eq!(record.equipment_type, "Exchanger");
        assert_eq!(record.flowrate, 12.5);
        assert_eq!(record.pressure, 3.0);
        assert_eq!(record.temperature, 95.0);
    }

    #[test]
    fn test_empty_alias_falls_through_to_next() {
        let raw = row(&[("Equipment Name", ""), ("EquipmentName", "Valve-9")]);
        let record = normalize_row(&raw, &AliasTable::default(), "r1".to_string()).unwrap();
        assert_eq!(record.name, "Valve-9");
    }

    #[test]
    fn test_missing_name_is_skipped() {
        let raw = row(&[("Equipment Name", ""), ("Type", "Valve"), ("Flowrate", "10")]);
        assert!(normalize_row(&raw, &AliasTable::default(), "r1".to_string()).is_none());

        let raw = row(&[("Type", "Valve")]);
        assert!(normalize_row(&raw, &AliasTable::default(), "r2".to_string()).is_none());
    }

    #[test]
    fn test_bad_numbers_default_to_zero() {
        let raw = row(&[
            ("Equipment Name", "Reactor"),
            ("Flowrate", "fast"),
            ("Pressure", "NaN"),
        ]);

        let record = normalize_row(&raw, &AliasTable::default(), "r1".to_string()).unwrap();
        assert_eq!(record.flowrate, 0.0);
        assert_eq!(record.pressure, 0.0);
        assert_eq!(record.temperature, 0.0);
        assert_eq!(record.equipment_type, "");
    }

    #[test]
    fn test_coerce_number_trims() {
        assert_eq!(coerce_number(" 4.25 "), 4.25);
        assert_eq!(coerce_number("-3"), -3.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
    }

    #[test]
    fn test_coerce_number_reads_leading_number() {
        assert_eq!(coerce_number("80 m3/h"), 80.0);
        assert_eq!(coerce_number("4.2bar"), 4.2);
        assert_eq!(coerce_number("1e3x"), 1000.0);
        assert_eq!(coerce_number("2.5e"), 2.5);
        assert_eq!(coerce_number(".5 MPa"), 0.5);
        assert_eq!(coerce_number("7."), 7.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("-"), 0.0);
        assert_eq!(coerce_number("1e999"), 0.0);
    }

    #[test]
    fn test_unit_suffixed_cells() {
        let raw = row(&[
            ("Equipment Name", "Pump-7"),
            ("Flowrate", "80 m3/h"),
            ("Pressure", "4.2bar"),
            ("Temperature", "95 C"),
        ]);

        let record = normalize_row(&raw, &AliasTable::default(), "r1".to_string()).unwrap();
        assert_eq!(record.flowrate, 80.0);
        assert_eq!(record.pressure, 4.2);
        assert_eq!(record.temperature, 95.0);
    }

    #[test]
    fn test_normalize_rows_preserves_order_and_unique_ids() {
        let rows = vec![
            row(&[("Equipment Name", "A")]),
            row(&[("Equipment Name", "")]),
            row(&[("Equipment Name", "B")]),
            row(&[("Equipment Name", "C")]),
        ];

        let records = normalize_rows(&rows, &AliasTable::default());
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_ne!(records[0].id, records[1].id);
        assert_ne!(records[1].id, records[2].id);
    }
}
