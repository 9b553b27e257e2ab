//! Region map data for the dashboard: city outlines, translations, the river
//! level feed and the display rules applied to it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use riverdash_core::{RegionDisplayModel, RiverLevel};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CRATE_NAME: &str = "riverdash-map";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| CatalogError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// One administrative region drawn as an SVG polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionShape {
    pub name: String,
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
}

/// Map canvas of a city and its regions in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityMap {
    pub city_id: String,
    pub width: u32,
    pub height: u32,
    pub regions: Vec<RegionShape>,
}

impl CityMap {
    pub fn region(&self, name: &str) -> Option<&RegionShape> {
        self.regions.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCatalog {
    pub cities: Vec<CityMap>,
}

impl CityCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let catalog: Self = read_yaml(path.as_ref())?;
        debug!(cities = catalog.cities.len(), "city catalog loaded");
        Ok(catalog)
    }

    pub fn city(&self, city_id: &str) -> Option<&CityMap> {
        self.cities.iter().find(|c| c.city_id == city_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Ko, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" => Ok(Language::Ko),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language {other:?}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dashboard labels from the `article` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Title,
    ObservedAt,
    AverageRatio,
    NoData,
    CurrentLevel,
    PlannedFloodLevel,
    LevelRatio,
}

impl Label {
    pub fn key(self) -> &'static str {
        match self {
            Label::Title => "ARTICLE_MAIN_TITLE",
            Label::ObservedAt => "ARTICLE_MAIN_OBSERVED_AT",
            Label::AverageRatio => "ARTICLE_MAIN_GRAPH_INFO_TITLE_1",
            Label::NoData => "ARTICLE_MAIN_GRAPH_INFO_TITLE_2",
            Label::CurrentLevel => "ARTICLE_MAIN_GRAPH_INFO_TITLE_3",
            Label::PlannedFloodLevel => "ARTICLE_MAIN_GRAPH_INFO_TITLE_4",
            Label::LevelRatio => "ARTICLE_MAIN_GRAPH_INFO_TITLE_5",
        }
    }
}

type Namespaces = HashMap<String, HashMap<String, String>>;

/// Per-language string tables, one YAML file per language.
///
/// Lookups fall back to Korean, then to the untranslated name.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    by_language: HashMap<Language, Namespaces>,
}

impl Translations {
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let mut translations = Self::default();
        for language in Language::ALL {
            let path = dir.join(format!("{}.yaml", language.code()));
            if language != Language::Ko && !path.exists() {
                continue;
            }
            translations
                .by_language
                .insert(language, read_yaml(&path)?);
        }
        Ok(translations)
    }

    pub fn lookup(&self, language: Language, namespace: &str, key: &str) -> Option<&str> {
        let find = |lang: Language| {
            self.by_language
                .get(&lang)
                .and_then(|ns| ns.get(namespace))
                .and_then(|table| table.get(key))
                .map(String::as_str)
        };
        find(language).or_else(|| find(Language::Ko))
    }

    pub fn label(&self, language: Language, label: Label) -> String {
        self.lookup(language, "article", label.key())
            .unwrap_or(label.key())
            .to_string()
    }

    pub fn region_name(&self, language: Language, region: &str) -> String {
        self.lookup(language, "region", &format!("REGION_{region}"))
            .unwrap_or(region)
            .to_string()
    }

    pub fn river_name(&self, language: Language, river: &str) -> String {
        self.lookup(language, "region", &format!("REGION_RIVER_{river}"))
            .unwrap_or(river)
            .to_string()
    }
}

/// Latest per-region river readings as served by the read API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiverLevelSnapshot {
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub regions: Vec<RegionRiverLevels>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRiverLevels {
    pub region: String,
    #[serde(default)]
    pub rivers: Vec<RiverReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverReading {
    pub river_name: String,
    pub gauge_name: String,
    pub current_level: f64,
    pub planflood_level: f64,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("river level request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing river level snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait RiverLevelFeed: Send + Sync {
    async fn latest(&self) -> Result<RiverLevelSnapshot, FeedError>;
}

/// Fetches the snapshot from the read API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRiverLevelFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpRiverLevelFeed {
    pub fn new(
        url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RiverLevelFeed for HttpRiverLevelFeed {
    async fn latest(&self) -> Result<RiverLevelSnapshot, FeedError> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }
        Ok(resp.json::<RiverLevelSnapshot>().await?)
    }
}

/// Reads the snapshot from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileRiverLevelFeed {
    path: PathBuf,
}

impl FileRiverLevelFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RiverLevelFeed for FileRiverLevelFeed {
    async fn latest(&self) -> Result<RiverLevelSnapshot, FeedError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticRiverLevelFeed {
    snapshot: RiverLevelSnapshot,
}

impl StaticRiverLevelFeed {
    pub fn new(snapshot: RiverLevelSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl RiverLevelFeed for StaticRiverLevelFeed {
    async fn latest(&self) -> Result<RiverLevelSnapshot, FeedError> {
        Ok(self.snapshot.clone())
    }
}

/// Which side of the cursor the region popover opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopoverAnchor {
    RightOfCursor,
    LeftOfCursor,
}

impl PopoverAnchor {
    /// Left half of the container opens to the right, right half to the left.
    pub fn for_cursor(cursor_x: f64, container_width: f64) -> Self {
        if cursor_x <= container_width / 2.0 {
            PopoverAnchor::RightOfCursor
        } else {
            PopoverAnchor::LeftOfCursor
        }
    }

    pub fn transform(self) -> &'static str {
        match self {
            PopoverAnchor::RightOfCursor => "translate(15px, -50%)",
            PopoverAnchor::LeftOfCursor => "translate(calc(-100% - 15px), -50%)",
        }
    }
}

pub fn format_ratio(ratio: Option<f64>, no_data_label: &str) -> String {
    match ratio {
        Some(ratio) => format!("{:.2} %", ratio * 100.0),
        None => no_data_label.to_string(),
    }
}

pub fn format_level(level: f64) -> String {
    format!("{level} m")
}

/// Fill band of a region on the choropleth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatioBand {
    NoData,
    Normal,
    Watch,
    Warning,
    Danger,
}

impl RatioBand {
    pub const ALL: [RatioBand; 5] = [
        RatioBand::NoData,
        RatioBand::Normal,
        RatioBand::Watch,
        RatioBand::Warning,
        RatioBand::Danger,
    ];

    pub fn for_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            None => RatioBand::NoData,
            Some(r) if r < 0.5 => RatioBand::Normal,
            Some(r) if r < 0.7 => RatioBand::Watch,
            Some(r) if r < 0.9 => RatioBand::Warning,
            Some(_) => RatioBand::Danger,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            RatioBand::NoData => "no-data",
            RatioBand::Normal => "normal",
            RatioBand::Watch => "watch",
            RatioBand::Warning => "warning",
            RatioBand::Danger => "danger",
        }
    }

    /// Legend text for the band's ratio range; `None` for [`RatioBand::NoData`].
    pub fn range_text(self) -> Option<&'static str> {
        match self {
            RatioBand::NoData => None,
            RatioBand::Normal => Some("< 50 %"),
            RatioBand::Watch => Some("50 - 70 %"),
            RatioBand::Warning => Some("70 - 90 %"),
            RatioBand::Danger => Some(">= 90 %"),
        }
    }
}

/// One display model per region of `city`, in map order.
///
/// Regions missing from the snapshot come back without rivers; snapshot
/// entries for regions the city does not have are dropped.
pub fn build_region_models(
    city: &CityMap,
    snapshot: &RiverLevelSnapshot,
) -> Vec<RegionDisplayModel> {
    let mut rivers_by_region: HashMap<&str, Vec<RiverLevel>> = HashMap::new();
    for entry in &snapshot.regions {
        if city.region(&entry.region).is_none() {
            debug!(city = %city.city_id, region = %entry.region, "snapshot region not on map");
            continue;
        }
        rivers_by_region
            .entry(entry.region.as_str())
            .or_default()
            .extend(entry.rivers.iter().map(|r| {
                RiverLevel::new(&r.river_name, &r.gauge_name, r.current_level, r.planflood_level)
            }));
    }

    city.regions
        .iter()
        .map(|shape| {
            let rivers = rivers_by_region.remove(shape.name.as_str()).unwrap_or_default();
            RegionDisplayModel::new(&shape.name, rivers)
        })
        .collect()
}
