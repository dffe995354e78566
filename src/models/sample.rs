use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    COL_DISTRICT, COL_LATITUDE, COL_LONGITUDE, COL_STATION_ID, COL_STATION_NAME, COL_TIMESTAMP,
    DEFAULT_DISTRICT,
};
use crate::utils::{format_date, parse_number};

/// One CSV row as delivered by the source: header name to raw cell text.
pub type RawRow = HashMap<String, String>;

/// Metals with a regulatory limit, named by their CSV column symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metal {
    Pb,
    Cd,
    Cr,
    Ni,
    As,
    Fe,
    Mn,
    Cu,
    Zn,
    Hg,
    Se,
    U,
}

impl Metal {
    pub const ALL: [Metal; 12] = [
        Metal::Pb,
        Metal::Cd,
        Metal::Cr,
        Metal::Ni,
        Metal::As,
        Metal::Fe,
        Metal::Mn,
        Metal::Cu,
        Metal::Zn,
        Metal::Hg,
        Metal::Se,
        Metal::U,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Pb => "Pb",
            Metal::Cd => "Cd",
            Metal::Cr => "Cr",
            Metal::Ni => "Ni",
            Metal::As => "As",
            Metal::Fe => "Fe",
            Metal::Mn => "Mn",
            Metal::Cu => "Cu",
            Metal::Zn => "Zn",
            Metal::Hg => "Hg",
            Metal::Se => "Se",
            Metal::U => "U",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.symbol() == symbol)
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A numeric column tracked for daily trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    Metal(Metal),
    Turbidity,
    DissolvedOxygen,
    Ph,
    Temperature,
    Conductivity,
}

/// Every trend-tracked column, in scan order.
pub const TREND_PARAMETERS: [Parameter; 17] = [
    Parameter::Metal(Metal::Pb),
    Parameter::Metal(Metal::Cd),
    Parameter::Metal(Metal::Cr),
    Parameter::Metal(Metal::Ni),
    Parameter::Metal(Metal::As),
    Parameter::Metal(Metal::Fe),
    Parameter::Metal(Metal::Mn),
    Parameter::Metal(Metal::Cu),
    Parameter::Metal(Metal::Zn),
    Parameter::Metal(Metal::Hg),
    Parameter::Metal(Metal::Se),
    Parameter::Metal(Metal::U),
    Parameter::Turbidity,
    Parameter::DissolvedOxygen,
    Parameter::Ph,
    Parameter::Temperature,
    Parameter::Conductivity,
];

impl Parameter {
    /// CSV column name, also used as the `dailyAvgParams` key.
    pub fn column(&self) -> &'static str {
        match self {
            Parameter::Metal(metal) => metal.symbol(),
            Parameter::Turbidity => "turbidity",
            Parameter::DissolvedOxygen => "DO",
            Parameter::Ph => "pH",
            Parameter::Temperature => "temperature",
            Parameter::Conductivity => "conductivity",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        TREND_PARAMETERS.into_iter().find(|p| p.column() == column)
    }

    pub fn metal(&self) -> Option<Metal> {
        match self {
            Parameter::Metal(metal) => Some(*metal),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A validated sample: identification fields plus parsed trend readings.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub station_id: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub district: Option<String>,
    pub timestamp: String,
    /// Canonical `YYYY-MM-DD` key, empty when the timestamp did not parse
    pub day: String,
    readings: Vec<(Parameter, f64)>,
}

impl SampleRow {
    /// Build a sample from a raw row. Rows without parseable coordinates are rejected;
    /// unparseable readings are dropped individually.
    pub fn from_raw(raw: &RawRow) -> Result<Self> {
        let latitude = Self::coordinate(raw, COL_LATITUDE)?;
        let longitude = Self::coordinate(raw, COL_LONGITUDE)?;

        let text = |col: &str| raw.get(col).map(|v| v.trim().to_string());

        let district = text(COL_DISTRICT).filter(|d| !d.is_empty());
        let timestamp = text(COL_TIMESTAMP).unwrap_or_default();
        let day = format_date(&timestamp);

        let readings = TREND_PARAMETERS
            .into_iter()
            .filter_map(|param| {
                raw.get(param.column())
                    .and_then(|v| parse_number(v.as_str()))
                    .map(|value| (param, value))
            })
            .collect();

        Ok(Self {
            station_id: text(COL_STATION_ID).unwrap_or_default(),
            station_name: text(COL_STATION_NAME).unwrap_or_default(),
            latitude,
            longitude,
            district,
            timestamp,
            day,
            readings,
        })
    }

    fn coordinate(raw: &RawRow, column: &str) -> Result<f64> {
        let value = raw.get(column).ok_or_else(|| {
            ProcessingError::InvalidCoordinate(format!("missing '{}' column value", column))
        })?;

        parse_number(value.as_str()).ok_or_else(|| {
            ProcessingError::InvalidCoordinate(format!("invalid {}: '{}'", column, value))
        })
    }

    pub fn reading(&self, param: Parameter) -> Option<f64> {
        self.readings
            .iter()
            .find(|(p, _)| *p == param)
            .map(|(_, value)| *value)
    }

    /// Parsed readings in declared scan order.
    pub fn readings(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.readings.iter().copied()
    }

    pub fn metal_readings(&self) -> impl Iterator<Item = (Metal, f64)> + '_ {
        self.readings()
            .filter_map(|(param, value)| param.metal().map(|m| (m, value)))
    }

    pub fn district_or_default(&self) -> &str {
        self.district.as_deref().unwrap_or(DEFAULT_DISTRICT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HmpiStatus {
    Good,
    Bad,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HmpiResult {
    pub value: f64,
    pub status: HmpiStatus,
}

impl HmpiResult {
    pub fn is_critical(&self) -> bool {
        self.status == HmpiStatus::Critical
    }
}

/// A sample with its HMPI score attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSample {
    pub sample: SampleRow,
    pub hmpi: HmpiResult,
}

#[cfg(test)]
pub(crate) fn raw_row(fields: &[(&str, &str)]) -> RawRow {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
