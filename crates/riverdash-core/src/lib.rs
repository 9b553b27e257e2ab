//! Core domain model for the river-level dashboard.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

pub const CRATE_NAME: &str = "riverdash-core";

/// One river-observation station as registered by the crawler.
///
/// Serialized with the crawler's field names (`obscd`, `obsnm`, ...), which are
/// also the column names of `riverlevel_gauge_tb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeRecord {
    #[serde(rename = "obscd")]
    pub station_code: String,
    #[serde(rename = "obsnm")]
    pub station_name: String,
    #[serde(rename = "mngorg")]
    pub managing_org: String,
    pub flood_warning: bool,
    #[serde(rename = "addr", default)]
    pub address: Option<String>,
    #[serde(rename = "lon", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "gdt", default)]
    pub ground_datum: Option<f64>,
    #[serde(rename = "planflood_level", default)]
    pub planned_flood_level: Option<f64>,
}

/// Updatable gauge attributes. The station code is the key and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GaugeField {
    StationName,
    ManagingOrg,
    FloodWarning,
    Address,
    Longitude,
    Latitude,
    GroundDatum,
    PlannedFloodLevel,
}

impl GaugeField {
    pub const ALL: [GaugeField; 8] = [
        GaugeField::StationName,
        GaugeField::ManagingOrg,
        GaugeField::FloodWarning,
        GaugeField::Address,
        GaugeField::Longitude,
        GaugeField::Latitude,
        GaugeField::GroundDatum,
        GaugeField::PlannedFloodLevel,
    ];

    pub fn column(self) -> &'static str {
        match self {
            GaugeField::StationName => "obsnm",
            GaugeField::ManagingOrg => "mngorg",
            GaugeField::FloodWarning => "flood_warning",
            GaugeField::Address => "addr",
            GaugeField::Longitude => "lon",
            GaugeField::Latitude => "lat",
            GaugeField::GroundDatum => "gdt",
            GaugeField::PlannedFloodLevel => "planflood_level",
        }
    }
}

impl fmt::Display for GaugeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Partial gauge keyed by station code.
///
/// Used both for incoming update requests (absent attribute = not reported) and
/// for the sparse change set written to the store. Nullable attributes are
/// tri-state: absent (`None`), explicit null (`Some(None)`), or a value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GaugePatch {
    #[serde(rename = "obscd")]
    pub station_code: String,
    #[serde(rename = "obsnm", default, skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(rename = "mngorg", default, skip_serializing_if = "Option::is_none")]
    pub managing_org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flood_warning: Option<bool>,
    #[serde(
        rename = "addr",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<Option<String>>,
    #[serde(
        rename = "lon",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<Option<f64>>,
    #[serde(
        rename = "lat",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<Option<f64>>,
    #[serde(
        rename = "gdt",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub ground_datum: Option<Option<f64>>,
    #[serde(
        rename = "planflood_level",
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned_flood_level: Option<Option<f64>>,
}

// A present-but-null field must stay distinguishable from an absent one.
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn changed<T: PartialEq + Clone>(incoming: &Option<T>, current: &T) -> Option<T> {
    incoming.as_ref().filter(|value| *value != current).cloned()
}

impl GaugePatch {
    pub fn keyed(station_code: impl Into<String>) -> Self {
        Self {
            station_code: station_code.into(),
            ..Self::default()
        }
    }

    /// True when the patch carries no attribute besides the key.
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    pub fn changed_fields(&self) -> Vec<GaugeField> {
        GaugeField::ALL
            .into_iter()
            .filter(|field| self.carries(*field))
            .collect()
    }

    fn carries(&self, field: GaugeField) -> bool {
        match field {
            GaugeField::StationName => self.station_name.is_some(),
            GaugeField::ManagingOrg => self.managing_org.is_some(),
            GaugeField::FloodWarning => self.flood_warning.is_some(),
            GaugeField::Address => self.address.is_some(),
            GaugeField::Longitude => self.longitude.is_some(),
            GaugeField::Latitude => self.latitude.is_some(),
            GaugeField::GroundDatum => self.ground_datum.is_some(),
            GaugeField::PlannedFloodLevel => self.planned_flood_level.is_some(),
        }
    }

    /// Sparse patch holding only the reported attributes that differ from
    /// `current`, or `None` when nothing differs.
    pub fn diff_against(&self, current: &GaugeRecord) -> Option<GaugePatch> {
        let diff = GaugePatch {
            station_code: self.station_code.clone(),
            station_name: changed(&self.station_name, &current.station_name),
            managing_org: changed(&self.managing_org, &current.managing_org),
            flood_warning: changed(&self.flood_warning, &current.flood_warning),
            address: changed(&self.address, &current.address),
            longitude: changed(&self.longitude, &current.longitude),
            latitude: changed(&self.latitude, &current.latitude),
            ground_datum: changed(&self.ground_datum, &current.ground_datum),
            planned_flood_level: changed(&self.planned_flood_level, &current.planned_flood_level),
        };
        (!diff.is_empty()).then_some(diff)
    }

    pub fn apply_to(&self, record: &mut GaugeRecord) {
        if let Some(value) = &self.station_name {
            record.station_name = value.clone();
        }
        if let Some(value) = &self.managing_org {
            record.managing_org = value.clone();
        }
        if let Some(value) = self.flood_warning {
            record.flood_warning = value;
        }
        if let Some(value) = &self.address {
            record.address = value.clone();
        }
        if let Some(value) = self.longitude {
            record.longitude = value;
        }
        if let Some(value) = self.latitude {
            record.latitude = value;
        }
        if let Some(value) = self.ground_datum {
            record.ground_datum = value;
        }
        if let Some(value) = self.planned_flood_level {
            record.planned_flood_level = value;
        }
    }
}

/// Request envelope shared by every crawler endpoint: `{ "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Success,
}

/// Outcome of one reconciler batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub status: BatchStatus,
    pub requested: usize,
    pub processed: usize,
}

impl BatchSummary {
    pub fn success(requested: usize, processed: usize) -> Self {
        Self {
            status: BatchStatus::Success,
            requested,
            processed,
        }
    }
}

/// Timestamped water-level observation reported by the crawler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationReading {
    #[serde(rename = "obscd")]
    pub station_code: String,
    /// Observation time as `YYYYMMDDHHmm` local time.
    #[serde(rename = "ymdhm")]
    pub observed_at: String,
    #[serde(rename = "wl", default)]
    pub water_level: Option<f64>,
    #[serde(rename = "fw", default)]
    pub flow: Option<f64>,
}

impl ObservationReading {
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.observed_at, "%Y%m%d%H%M").ok()
    }
}

/// Water level / planned-flood level ratio, `None` without a positive planned level.
pub fn level_ratio(current_level: f64, planned_flood_level: f64) -> Option<f64> {
    (planned_flood_level > 0.0 && current_level.is_finite())
        .then(|| current_level / planned_flood_level)
}

/// One river as shown in a region popover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverLevel {
    pub river_name: String,
    #[serde(rename = "rivergaugeName")]
    pub gauge_name: String,
    pub current_level: f64,
    #[serde(rename = "planfloodLevel")]
    pub planned_flood_level: f64,
    #[serde(rename = "riverLevelRatio")]
    pub ratio: Option<f64>,
}

impl RiverLevel {
    pub fn new(
        river_name: impl Into<String>,
        gauge_name: impl Into<String>,
        current_level: f64,
        planned_flood_level: f64,
    ) -> Self {
        Self {
            river_name: river_name.into(),
            gauge_name: gauge_name.into(),
            current_level,
            planned_flood_level,
            ratio: level_ratio(current_level, planned_flood_level),
        }
    }
}

/// Administrative region with its rivers, rebuilt on every data refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDisplayModel {
    #[serde(rename = "guName")]
    pub name: String,
    #[serde(rename = "riverLevel")]
    pub rivers: Vec<RiverLevel>,
    #[serde(rename = "averageRiverLevelRatio")]
    pub average_ratio: Option<f64>,
}

impl RegionDisplayModel {
    pub fn new(name: impl Into<String>, rivers: Vec<RiverLevel>) -> Self {
        let average_ratio = average_ratio(&rivers);
        Self {
            name: name.into(),
            rivers,
            average_ratio,
        }
    }
}

/// Mean of the rivers' known ratios; `None` when no river has one.
pub fn average_ratio(rivers: &[RiverLevel]) -> Option<f64> {
    let ratios = rivers.iter().filter_map(|r| r.ratio).collect::<Vec<_>>();
    if ratios.is_empty() {
        return None;
    }
    Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
}
