/// Visualization module: interactive collaboration-network report.
///
/// Produces a self-contained HTML page with:
/// - A force-directed musician → artist network (ECharts)
/// - Genre / style / role / custom-column filters
/// - Top-musician and session-musician tables
///
/// All rendering is done client-side by network_chart.js. This module
/// assembles the report data, serializes it to JSON and emits the HTML shell.
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::{AnalysisConfig, SessionPolicy};
use crate::error::NetworkError;
use crate::facets::FacetIndex;
use crate::graph::{CollaborationGraph, NetworkData};
use crate::relations::RelationTable;
use crate::stats::{self, CollaborationSummary, MusicianStat};

const CHART_JS: &str = include_str!("network_chart.js");
const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

// ── Report data ─────────────────────────────────────────────────────────────

/// Settings echoed into the page so the tables can explain their thresholds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSettings {
    pub session: SessionPolicy,
    pub top_musicians_limit: usize,
    pub search_results_limit: usize,
}

/// Everything computed in one run, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReport {
    pub generated_at: DateTime<Utc>,
    pub network: NetworkData,
    pub musician_stats: Vec<MusicianStat>,
    pub session_musicians: Vec<MusicianStat>,
    pub custom_filter_data: FacetIndex,
    pub summary: CollaborationSummary,
    pub skipped_entries: usize,
    pub settings: ReportSettings,
}

impl NetworkReport {
    pub fn build(catalog: &Catalog, relations: &RelationTable, config: &AnalysisConfig) -> Self {
        let graph = CollaborationGraph::build(catalog, relations, config);
        let facets = FacetIndex::build(&graph, catalog, config);
        let network = graph.to_network_data(&facets, &config.colors);

        let musician_stats = stats::musician_stats(catalog, relations);
        let session_musicians = stats::session_musicians(&musician_stats, &config.session);
        let summary = CollaborationSummary::from_relations(relations);

        info!(
            nodes = network.nodes.len(),
            links = network.links.len(),
            musicians = musician_stats.len(),
            session_musicians = session_musicians.len(),
            "network report assembled"
        );

        Self {
            generated_at: Utc::now(),
            network,
            musician_stats,
            session_musicians,
            custom_filter_data: facets,
            summary,
            skipped_entries: relations.skipped().len(),
            settings: ReportSettings {
                session: config.session,
                top_musicians_limit: config.top_musicians_limit,
                search_results_limit: config.search_results_limit,
            },
        }
    }

    pub fn top_musicians(&self) -> &[MusicianStat] {
        stats::top_musicians(&self.musician_stats, self.settings.top_musicians_limit)
    }
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: generates a self-contained HTML string.
pub fn generate_report_html(report: &NetworkReport) -> Result<String, NetworkError> {
    let report_json = script_safe_json(report)?;
    let title = "Musician Collaboration Network";

    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <script src="{echarts}"></script>
  <style>
    body {{ font-family: sans-serif; margin: 0; color: #212529; background: #f8f9fa; }}
    header {{ padding: 12px 16px; background: #fff; border-bottom: 1px solid #dee2e6; }}
    header h1 {{ font-size: 18px; margin: 0 0 4px 0; }}
    header .meta {{ font-size: 12px; color: #868e96; }}
    .tabs {{ display: flex; gap: 4px; padding: 8px 16px 0 16px; }}
    .tabs button {{ border: 1px solid #dee2e6; border-bottom: none; background: #e9ecef; padding: 6px 12px; cursor: pointer; }}
    .tabs button.active {{ background: #fff; font-weight: 600; }}
    .panel {{ display: none; background: #fff; margin: 0 16px 16px 16px; border: 1px solid #dee2e6; padding: 12px; }}
    .panel.active {{ display: block; }}
    .filters {{ display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 8px; font-size: 12px; }}
    .filters label {{ display: flex; flex-direction: column; gap: 2px; }}
    .filters select {{ min-width: 160px; height: 90px; }}
    #network-chart {{ width: 100%; height: 720px; }}
    table {{ border-collapse: collapse; width: 100%; font-size: 13px; }}
    th, td {{ border-bottom: 1px solid #dee2e6; padding: 4px 8px; text-align: left; }}
    th {{ background: #f1f3f5; }}
  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <div class="meta" id="summary"></div>
  </header>
  <div class="tabs">
    <button class="active" data-panel="network-panel">Network</button>
    <button data-panel="top-panel">Top Musicians</button>
    <button data-panel="session-panel">Session Musicians</button>
  </div>
  <div class="panel active" id="network-panel">
    <div class="filters" id="filters"></div>
    <div id="network-chart"></div>
  </div>
  <div class="panel" id="top-panel">
    <input id="musician-search" type="search" placeholder="Search musicians">
    <table id="top-table"></table>
  </div>
  <div class="panel" id="session-panel">
    <table id="session-table"></table>
  </div>
  <script>
const REPORT = {report_json};
{chart_js}
NetworkChart.create(REPORT);
  </script>
</body>
</html>
"##,
        title = title,
        echarts = ECHARTS_CDN,
        report_json = report_json,
        chart_js = CHART_JS,
    );

    Ok(html)
}

/// Write the report page to `path`.
pub fn write_report_html(
    report: &NetworkReport,
    path: impl AsRef<std::path::Path>,
) -> Result<(), NetworkError> {
    let html = generate_report_html(report)?;
    std::fs::write(path.as_ref(), html)?;
    Ok(())
}

/// JSON that can be embedded inside a `<script>` element.
fn script_safe_json<T: Serialize>(value: &T) -> Result<String, NetworkError> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}
