use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// API response types (mirror routes.rs shapes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OptionsResponse {
    pub overview_companies: Vec<String>,
    pub overview_years: Option<YearBounds>,
    pub multiple_types: Vec<String>,
    pub comparison_companies: Vec<String>,
    pub comparison_years: Option<YearBounds>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverviewFilter {
    pub company: Option<String>,
    pub year: Option<i32>,
    pub multiple_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ComparisonFilter {
    pub companies: Vec<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageResponse<F> {
    pub filter: F,
    pub views: BTreeMap<String, ViewResponse>,
    pub recomputed: Vec<String>,
}

impl<F: Default> Default for PageResponse<F> {
    fn default() -> Self {
        Self {
            filter: F::default(),
            views: BTreeMap::new(),
            recomputed: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewResponse {
    Sankey(SankeyResponse),
    Trend(TrendResponse),
    Radar(RadarResponse),
    Range(RangeResponse),
    Placeholder(PlaceholderResponse),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceholderResponse {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SankeyEdgeResponse {
    pub source: usize,
    pub target: usize,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SankeyResponse {
    pub title: String,
    pub topology: String,
    pub nodes: Vec<String>,
    pub edges: Vec<SankeyEdgeResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendPointResponse {
    pub date: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceLineResponse {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrendResponse {
    pub title: String,
    pub y_axis_title: String,
    pub company: String,
    pub points: Vec<TrendPointResponse>,
    pub reference_lines: Vec<ReferenceLineResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadarPolygonResponse {
    pub company: String,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RadarResponse {
    pub title: String,
    pub polygons: Vec<RadarPolygonResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeSegmentResponse {
    pub kind: String,
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeBarResponse {
    pub company: String,
    pub segments: Vec<RangeSegmentResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeResponse {
    pub title: String,
    pub bars: Vec<RangeBarResponse>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct HealthResponse {
    pub financial_facts: u64,
    pub multiples: u64,
    pub key_ratios: u64,
    pub valuation_ranges: u64,
    pub coercion_warning: bool,
    pub recomputations: u64,
    pub recompute_failures: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[allow(dead_code)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// Selection requests (mirror the server's selection events)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum OverviewSelection {
    Company(String),
    Year(i32),
    MultipleType(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum ComparisonSelection {
    Companies(Vec<String>),
    Year(i32),
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    Comparison,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub page: Page,
    pub options: OptionsResponse,
    pub overview: PageResponse<OverviewFilter>,
    pub comparison: PageResponse<ComparisonFilter>,
    pub health: HealthResponse,
    pub latency: LatencyResponse,
    /// Cursor into `options.comparison_companies` for the toggle key.
    pub company_cursor: usize,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            page: Page::Overview,
            options: OptionsResponse::default(),
            overview: PageResponse::default(),
            comparison: PageResponse::default(),
            health: HealthResponse::default(),
            latency: LatencyResponse::default(),
            company_cursor: 0,
            base_url,
        }
    }

    pub fn toggle_page(&mut self) {
        self.page = match self.page {
            Page::Overview => Page::Comparison,
            Page::Comparison => Page::Overview,
        };
    }

    pub async fn refresh(&mut self, client: &reqwest::Client) {
        let options_url = format!("{}/options", self.base_url);
        let overview_url = format!("{}/pages/overview", self.base_url);
        let comparison_url = format!("{}/pages/comparison", self.base_url);
        let health_url = format!("{}/health", self.base_url);
        let latency_url = format!("{}/stats/latency", self.base_url);

        let (options_res, overview_res, comparison_res, health_res, latency_res) = tokio::join!(
            client.get(&options_url).send(),
            client.get(&overview_url).send(),
            client.get(&comparison_url).send(),
            client.get(&health_url).send(),
            client.get(&latency_url).send(),
        );

        let (options_resp, overview_resp, comparison_resp) =
            match (options_res, overview_res, comparison_res) {
                (Ok(o), Ok(v), Ok(c)) => (o, v, c),
                (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                    self.status = ConnectionStatus::Error(format!("{e}"));
                    return;
                }
            };

        let (options, overview, comparison) = tokio::join!(
            options_resp.json::<OptionsResponse>(),
            overview_resp.json::<PageResponse<OverviewFilter>>(),
            comparison_resp.json::<PageResponse<ComparisonFilter>>(),
        );

        match (options, overview, comparison) {
            (Ok(o), Ok(v), Ok(c)) => {
                self.options = o;
                self.overview = v;
                self.comparison = c;
                self.status = ConnectionStatus::Connected;

                if let Ok(h) = health_res {
                    if let Ok(health) = h.json::<HealthResponse>().await {
                        self.health = health;
                    }
                }
                if let Ok(l) = latency_res {
                    if let Ok(latency) = l.json::<LatencyResponse>().await {
                        self.latency = latency;
                    }
                }
            }
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                self.status = ConnectionStatus::Error(format!("parse error: {e}"));
            }
        }
    }

    pub async fn select_overview(&mut self, client: &reqwest::Client, selection: OverviewSelection) {
        let url = format!("{}/pages/overview/selection", self.base_url);
        match post_json::<_, PageResponse<OverviewFilter>>(client, &url, &selection).await {
            Ok(page) => self.overview = page,
            Err(e) => self.status = ConnectionStatus::Error(e),
        }
    }

    pub async fn select_comparison(
        &mut self,
        client: &reqwest::Client,
        selection: ComparisonSelection,
    ) {
        let url = format!("{}/pages/comparison/selection", self.base_url);
        match post_json::<_, PageResponse<ComparisonFilter>>(client, &url, &selection).await {
            Ok(page) => self.comparison = page,
            Err(e) => self.status = ConnectionStatus::Error(e),
        }
    }

    // --- selection stepping ---

    pub fn next_company(&self) -> Option<OverviewSelection> {
        cycle(&self.options.overview_companies, self.overview.filter.company.as_deref())
            .map(OverviewSelection::Company)
    }

    pub fn next_multiple_type(&self) -> Option<OverviewSelection> {
        cycle(&self.options.multiple_types, self.overview.filter.multiple_type.as_deref())
            .map(OverviewSelection::MultipleType)
    }

    pub fn step_overview_year(&self, delta: i32) -> Option<OverviewSelection> {
        step_year(self.options.overview_years, self.overview.filter.year, delta)
            .map(OverviewSelection::Year)
    }

    pub fn step_comparison_year(&self, delta: i32) -> Option<ComparisonSelection> {
        step_year(self.options.comparison_years, self.comparison.filter.year, delta)
            .map(ComparisonSelection::Year)
    }

    pub fn move_company_cursor(&mut self, delta: isize) {
        let len = self.options.comparison_companies.len();
        if len == 0 {
            return;
        }
        self.company_cursor = (self.company_cursor as isize + delta).rem_euclid(len as isize) as usize;
    }

    /// Adds or removes the company under the cursor, keeping option order.
    pub fn toggle_cursor_company(&self) -> Option<ComparisonSelection> {
        let target = self.options.comparison_companies.get(self.company_cursor)?;
        let selected = &self.comparison.filter.companies;
        let companies = self
            .options
            .comparison_companies
            .iter()
            .filter(|c| (*c == target) != selected.contains(c))
            .cloned()
            .collect();
        Some(ComparisonSelection::Companies(companies))
    }
}

async fn post_json<B: Serialize, R: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<R, String> {
    let resp = client.post(url).json(body).send().await.map_err(|e| e.to_string())?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(format!("{status}: {text}"));
    }
    resp.json::<R>().await.map_err(|e| format!("parse error: {e}"))
}

/// The option after `current`, wrapping around. None when there is nothing
/// different to pick.
fn cycle(options: &[String], current: Option<&str>) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let next = match current.and_then(|c| options.iter().position(|o| o == c)) {
        Some(i) => (i + 1) % options.len(),
        None => 0,
    };
    let picked = &options[next];
    (current != Some(picked.as_str())).then(|| picked.clone())
}

fn step_year(bounds: Option<YearBounds>, current: Option<i32>, delta: i32) -> Option<i32> {
    let bounds = bounds?;
    let year = current.unwrap_or(bounds.max) + delta;
    let year = year.clamp(bounds.min, bounds.max);
    (Some(year) != current).then_some(year)
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn format_value(v: Option<f64>) -> String {
    v.map_or("—".to_string(), |v| format!("{:.2}", v))
}

pub fn format_ms(ms: Option<f64>) -> String {
    ms.map_or("—".to_string(), |v| format!("{:.2}ms", v))
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cycle_wraps_and_skips_noop() {
        let options = names(&["Spirit", "JetBlue"]);
        assert_eq!(cycle(&options, Some("Spirit")).as_deref(), Some("JetBlue"));
        assert_eq!(cycle(&options, Some("JetBlue")).as_deref(), Some("Spirit"));
        assert_eq!(cycle(&options, None).as_deref(), Some("Spirit"));
        assert_eq!(cycle(&names(&["Spirit"]), Some("Spirit")), None);
    }

    #[test]
    fn year_steps_stay_in_bounds() {
        let bounds = Some(YearBounds { min: 2020, max: 2023 });
        assert_eq!(step_year(bounds, Some(2022), 1), Some(2023));
        assert_eq!(step_year(bounds, Some(2023), 1), None);
        assert_eq!(step_year(bounds, Some(2020), -1), None);
        assert_eq!(step_year(None, Some(2020), 1), None);
    }

    #[test]
    fn toggle_keeps_option_order() {
        let mut app = AppState::new(String::new());
        app.options.comparison_companies = names(&["Spirit", "JetBlue", "Hawaiian"]);
        app.comparison.filter.companies = names(&["Hawaiian"]);
        app.company_cursor = 0;
        let Some(ComparisonSelection::Companies(companies)) = app.toggle_cursor_company() else {
            panic!("expected a companies selection");
        };
        assert_eq!(companies, names(&["Spirit", "Hawaiian"]));

        app.comparison.filter.companies = companies;
        app.company_cursor = 2;
        let Some(ComparisonSelection::Companies(companies)) = app.toggle_cursor_company() else {
            panic!("expected a companies selection");
        };
        assert_eq!(companies, names(&["Spirit"]));
    }

    #[test]
    fn placeholder_view_deserializes() {
        let json = r#"{"type":"placeholder","kind":"no_data","message":"No data available for year 2015"}"#;
        let ViewResponse::Placeholder(p) = serde_json::from_str(json).unwrap() else {
            panic!("expected placeholder");
        };
        assert_eq!(p.kind, "no_data");
    }
}
