// Dashboard domain model
use super::chart::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub dataset_id: String,
    pub title: String,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(dataset_id: String, title: String, tiles: Vec<TileData>, charts: Vec<ChartData>) -> Self {
        Self {
            dataset_id,
            title,
            tiles,
            charts,
        }
    }

    #[cfg(test)]
    pub fn chart(&self, id: &str) -> Option<&ChartData> {
        self.charts.iter().find(|c| c.id == id)
    }
}
