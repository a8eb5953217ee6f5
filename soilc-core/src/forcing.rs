//! Environmental forcing for decomposition models.
//!
//! Forcing is an ordered series of fixed-shape records, one per timestep.
//! Order is significant: record `t` drives the step from pool state `t` to `t + 1`.

use crate::errors::{SoilCError, SoilCResult};
use crate::pools::{CarbonPool, PoolSlice};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const COL_LITTER_TEMP: &str = "LITTER_TEMP";
pub const COL_SOIL_TEMP: &str = "SOIL_TEMP";
pub const COL_LITTER_MOIST: &str = "LITTER_MOIST";
pub const COL_SOIL_MOIST: &str = "SOIL_MOIST";
pub const COL_LITTER_INPUT: &str = "LITTER_INPUT";

/// Columns every forcing table must supply.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_LITTER_TEMP,
    COL_SOIL_TEMP,
    COL_LITTER_MOIST,
    COL_SOIL_MOIST,
    COL_LITTER_INPUT,
];

/// Environmental drivers for a single timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForcingRecord {
    /// Litter layer temperature
    /// unit: same as `Tref`
    #[serde(rename = "LITTER_TEMP")]
    pub litter_temp: FloatValue,
    /// Soil temperature
    #[serde(rename = "SOIL_TEMP")]
    pub soil_temp: FloatValue,
    /// Litter layer moisture
    #[serde(rename = "LITTER_MOIST")]
    pub litter_moist: FloatValue,
    /// Soil moisture
    #[serde(rename = "SOIL_MOIST")]
    pub soil_moist: FloatValue,
    /// External carbon input to the litter pool during the step
    /// unit: carbon per timestep
    #[serde(rename = "LITTER_INPUT")]
    pub litter_input: FloatValue,
}

impl ForcingRecord {
    /// Temperature driving each pool.
    pub fn temperature(&self) -> PoolSlice {
        PoolSlice::new(self.litter_temp, self.soil_temp)
    }

    /// Moisture driving each pool.
    pub fn moisture(&self) -> PoolSlice {
        PoolSlice::new(self.litter_moist, self.soil_moist)
    }

    /// External input entering each pool. Only the litter pool receives input.
    pub fn external_input(&self) -> PoolSlice {
        PoolSlice::uniform(0.0).with(CarbonPool::Litter, self.litter_input)
    }
}

/// Time-ordered forcing series.
///
/// The number of records determines the number of simulation steps. An empty
/// series is valid and produces a simulation with no steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForcingData {
    records: Vec<ForcingRecord>,
}

impl ForcingData {
    pub fn from_records(records: Vec<ForcingRecord>) -> Self {
        Self { records }
    }

    /// Build forcing from named columns.
    ///
    /// Every column in [`REQUIRED_COLUMNS`] must be present and all of them must
    /// have the same length. Extra columns are ignored.
    pub fn from_columns(columns: &HashMap<String, Vec<FloatValue>>) -> SoilCResult<Self> {
        let litter_temp = required_column(columns, COL_LITTER_TEMP)?;
        let soil_temp = required_column(columns, COL_SOIL_TEMP)?;
        let litter_moist = required_column(columns, COL_LITTER_MOIST)?;
        let soil_moist = required_column(columns, COL_SOIL_MOIST)?;
        let litter_input = required_column(columns, COL_LITTER_INPUT)?;

        let expected = litter_temp.len();
        for name in REQUIRED_COLUMNS {
            let found = required_column(columns, name)?.len();
            if found != expected {
                return Err(SoilCError::ForcingLengthMismatch {
                    column: name.to_string(),
                    expected,
                    found,
                });
            }
        }

        let records = (0..expected)
            .map(|t| ForcingRecord {
                litter_temp: litter_temp[t],
                soil_temp: soil_temp[t],
                litter_moist: litter_moist[t],
                soil_moist: soil_moist[t],
                litter_input: litter_input[t],
            })
            .collect();

        Ok(Self { records })
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ForcingRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[ForcingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForcingRecord> {
        self.records.iter()
    }

    /// Extract a single column in time order.
    pub fn column(&self, name: &str) -> SoilCResult<Vec<FloatValue>> {
        let extract: fn(&ForcingRecord) -> FloatValue = match name {
            COL_LITTER_TEMP => |r: &ForcingRecord| r.litter_temp,
            COL_SOIL_TEMP => |r: &ForcingRecord| r.soil_temp,
            COL_LITTER_MOIST => |r: &ForcingRecord| r.litter_moist,
            COL_SOIL_MOIST => |r: &ForcingRecord| r.soil_moist,
            COL_LITTER_INPUT => |r: &ForcingRecord| r.litter_input,
            _ => return Err(SoilCError::MissingForcingColumn(name.to_string())),
        };
        Ok(self.records.iter().map(extract).collect())
    }
}

fn required_column<'a>(
    columns: &'a HashMap<String, Vec<FloatValue>>,
    name: &str,
) -> SoilCResult<&'a [FloatValue]> {
    columns
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| SoilCError::MissingForcingColumn(name.to_string()))
}

impl From<Vec<ForcingRecord>> for ForcingData {
    fn from(records: Vec<ForcingRecord>) -> Self {
        Self::from_records(records)
    }
}

impl<'a> IntoIterator for &'a ForcingData {
    type Item = &'a ForcingRecord;
    type IntoIter = std::slice::Iter<'a, ForcingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
