//! Canonical integer codes for weather categories
//!
//! This is the only place a [`WeatherCategory`] is turned into a number or
//! back. Sources that send an explicit weather code and the JSON form of a
//! [`ForecastPoint`](super::ForecastPoint) both use this table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::WeatherCategory;

/// Code stored for [`WeatherCategory::Unknown`], the "no data" sentinel
pub const NO_DATA_CODE: i32 = 0;

const CODE_TABLE: [(WeatherCategory, i32); 8] = [
    (WeatherCategory::Unknown, NO_DATA_CODE),
    (WeatherCategory::Clear, 1),
    (WeatherCategory::PartlyCloudySun, 2),
    (WeatherCategory::MostlyCloudySun, 3),
    (WeatherCategory::Cloudy, 4),
    (WeatherCategory::Rain, 5),
    (WeatherCategory::Snow, 6),
    (WeatherCategory::Fog, 7),
];

impl WeatherCategory {
    /// Returns the canonical storage code for this category
    pub fn code(self) -> i32 {
        CODE_TABLE
            .iter()
            .find(|(category, _)| *category == self)
            .map(|(_, code)| *code)
            .unwrap_or(NO_DATA_CODE)
    }

    /// Looks up the category for a storage code
    ///
    /// Returns `None` for codes outside the table.
    pub fn from_code(code: i32) -> Option<Self> {
        CODE_TABLE
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(category, _)| *category)
    }
}

impl Serialize for WeatherCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for WeatherCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i32::deserialize(deserializer)?;
        Ok(Self::from_code(code).unwrap_or(WeatherCategory::Unknown))
    }
}
