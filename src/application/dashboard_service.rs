// Dashboard service - Use case for building stat tiles and chart datasets
use crate::domain::chart::{ChartData, ChartKind, ChartPoint, SeriesData, TileData};
use crate::domain::dashboard::Dashboard;
use crate::domain::equipment::EquipmentRecord;
use crate::domain::summary::DatasetSummary;

const TOP_EQUIPMENT: usize = 10;
const TREND_POINTS: usize = 15;
const LABEL_CHARS: usize = 15;

const COLOR_PRIMARY: &str = "#2563eb";
const COLOR_ACCENT: &str = "#f97316";
const COLOR_SUCCESS: &str = "#16a34a";
const PALETTE: [&str; 8] = [
    "#2563eb", "#f97316", "#16a34a", "#9333ea", "#dc2626", "#0891b2", "#ca8a04", "#db2777",
];

#[derive(Debug, Clone, Default)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    pub fn get_dashboard(&self, summary: &DatasetSummary) -> Dashboard {
        let title = format!("{} ({} equipment)", summary.file_name, summary.total_count);
        Dashboard::new(
            summary.id.clone(),
            title,
            self.build_tiles(summary),
            self.build_charts(summary),
        )
    }

    fn build_tiles(&self, summary: &DatasetSummary) -> Vec<TileData> {
        vec![
            TileData::new(
                "total".to_string(),
                "Total Equipment".to_string(),
                String::new(),
                summary.total_count as f64,
                0,
            )
            .with_subtext(format!("{} equipment types", summary.type_count())),
            TileData::new(
                "flowrate".to_string(),
                "Avg. Flowrate".to_string(),
                "m³/h".to_string(),
                summary.average_flowrate,
                2,
            ),
            TileData::new(
                "pressure".to_string(),
                "Avg. Pressure".to_string(),
                "bar".to_string(),
                summary.average_pressure,
                2,
            ),
            TileData::new(
                "temperature".to_string(),
                "Avg. Temperature".to_string(),
                "°C".to_string(),
                summary.average_temperature,
                2,
            ),
        ]
    }

    fn build_charts(&self, summary: &DatasetSummary) -> Vec<ChartData> {
        vec![
            self.type_distribution_chart(summary),
            self.parameters_chart(&summary.records),
            self.flow_trend_chart(&summary.records),
        ]
    }

    fn type_distribution_chart(&self, summary: &DatasetSummary) -> ChartData {
        let points = summary
            .type_distribution
            .iter()
            .map(|(label, count)| ChartPoint::new(label.clone(), *count as f64))
            .collect();

        let colors = PALETTE
            .iter()
            .cycle()
            .take(summary.type_count())
            .copied()
            .collect::<Vec<_>>()
            .join(",");

        ChartData::new(
            "type-distribution".to_string(),
            "Equipment Type Distribution".to_string(),
            None,
            ChartKind::Pie,
            vec![SeriesData::new(
                "count".to_string(),
                "Count".to_string(),
                Some(colors),
                points,
            )],
        )
    }

    fn parameters_chart(&self, records: &[EquipmentRecord]) -> ChartData {
        let rows: Vec<(String, &EquipmentRecord)> = records
            .iter()
            .take(TOP_EQUIPMENT)
            .map(|r| (truncate_label(&r.name), r))
            .collect();

        ChartData::new(
            "parameters".to_string(),
            "Equipment Parameters".to_string(),
            None,
            ChartKind::Bar,
            vec![
                series("flowrate", "Flowrate (m³/h)", COLOR_PRIMARY, &rows, |r| r.flowrate),
                series("pressure", "Pressure (bar)", COLOR_ACCENT, &rows, |r| r.pressure),
                series("temperature", "Temperature (°C)", COLOR_SUCCESS, &rows, |r| r.temperature),
            ],
        )
    }

    fn flow_trend_chart(&self, records: &[EquipmentRecord]) -> ChartData {
        let mut sorted: Vec<&EquipmentRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.flowrate.total_cmp(&b.flowrate));

        let rows: Vec<(String, &EquipmentRecord)> = sorted
            .into_iter()
            .take(TREND_POINTS)
            .enumerate()
            .map(|(i, r)| (format!("#{}", i + 1), r))
            .collect();

        ChartData::new(
            "flow-trend".to_string(),
            "Flowrate vs Pressure".to_string(),
            None,
            ChartKind::Line,
            vec![
                series("flowrate", "Flowrate", COLOR_PRIMARY, &rows, |r| r.flowrate),
                series("pressure", "Pressure", COLOR_ACCENT, &rows, |r| r.pressure),
            ],
        )
    }
}

fn series<F>(id: &str, name: &str, color: &str, rows: &[(String, &EquipmentRecord)], value: F) -> SeriesData
where
    F: Fn(&EquipmentRecord) -> f64,
{
    let points = rows
        .iter()
        .map(|(label, record)| ChartPoint::new(label.clone(), value(*record)))
        .collect();
    SeriesData::new(id.to_string(), name.to_string(), Some(color.to_string()), points)
}

fn truncate_label(name: &str) -> String {
    name.chars().take(LABEL_CHARS).collect()
}
