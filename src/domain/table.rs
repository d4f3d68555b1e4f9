// Records table: search filter and stable sort
use super::equipment::EquipmentRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[serde(alias = "equipmentName")]
    Name,
    #[serde(alias = "equipment_type")]
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub sort_field: SortField,
    pub direction: SortDirection,
    pub search: String,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            sort_field: SortField::Name,
            direction: SortDirection::Asc,
            search: String::new(),
        }
    }
}

impl TableView {
    pub fn new(sort_field: SortField, direction: SortDirection, search: impl Into<String>) -> Self {
        Self {
            sort_field,
            direction,
            search: search.into(),
        }
    }

    /// Header click: the active field flips direction, another field starts ascending
    pub fn click(&mut self, field: SortField) {
        if self.sort_field == field {
            self.direction = self.direction.toggled();
        } else {
            self.sort_field = field;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn matches(&self, record: &EquipmentRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let query = self.search.to_lowercase();
        record.name.to_lowercase().contains(&query)
            || record.equipment_type.to_lowercase().contains(&query)
    }

    /// Filter first, then sort. The sort is stable.
    pub fn apply<'a>(&self, records: &'a [EquipmentRecord]) -> Vec<&'a EquipmentRecord> {
        let mut rows: Vec<&EquipmentRecord> = records.iter().filter(|r| self.matches(r)).collect();
        rows.sort_by(|a, b| {
            let ordering = compare_by(self.sort_field, a, b);
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        rows
    }
}

fn compare_by(field: SortField, a: &EquipmentRecord, b: &EquipmentRecord) -> Ordering {
    match field {
        SortField::Name => collate(&a.name, &b.name),
        SortField::Type => collate(&a.equipment_type, &b.equipment_type),
        SortField::Flowrate => a.flowrate.total_cmp(&b.flowrate),
        SortField::Pressure => a.pressure.total_cmp(&b.pressure),
        SortField::Temperature => a.temperature.total_cmp(&b.temperature),
    }
}

/// Case-insensitive ordering with lowercase before uppercase on ties
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
