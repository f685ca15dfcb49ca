//! Application constants for the Maji Ndogo processor
//!
//! Column names, the crop vocabulary, and the default source locations and
//! correction tables for the farm survey.

// =============================================================================
// Field Survey Columns
// =============================================================================

pub mod field_columns {
    pub const FIELD_ID: &str = "Field_ID";
    pub const ELEVATION: &str = "Elevation";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const LOCATION: &str = "Location";
    pub const SLOPE: &str = "Slope";
    pub const RAINFALL: &str = "Rainfall";
    pub const MIN_TEMPERATURE: &str = "Min_temperature_C";
    pub const MAX_TEMPERATURE: &str = "Max_temperature_C";
    pub const AVE_TEMPS: &str = "Ave_temps";
    pub const SOIL_FERTILITY: &str = "Soil_fertility";
    pub const SOIL_TYPE: &str = "Soil_type";
    pub const PH: &str = "pH";
    pub const POLLUTION_LEVEL: &str = "Pollution_level";
    pub const PLOT_SIZE: &str = "Plot_size";
    pub const ANNUAL_YIELD: &str = "Annual_yield";
    pub const CROP_TYPE: &str = "Crop_type";
    pub const STANDARD_YIELD: &str = "Standard_yield";
    /// Row index written by the tool that originally exported the survey
    pub const ROW_ORIGIN: &str = "Unnamed: 0";
    pub const WEATHER_STATION: &str = "Weather_station";

    /// Cleaned field table columns, in output order
    pub const ALL: &[&str] = &[
        FIELD_ID,
        ELEVATION,
        LATITUDE,
        LONGITUDE,
        LOCATION,
        SLOPE,
        RAINFALL,
        MIN_TEMPERATURE,
        MAX_TEMPERATURE,
        AVE_TEMPS,
        SOIL_FERTILITY,
        SOIL_TYPE,
        PH,
        POLLUTION_LEVEL,
        PLOT_SIZE,
        ANNUAL_YIELD,
        CROP_TYPE,
        STANDARD_YIELD,
        ROW_ORIGIN,
        WEATHER_STATION,
    ];
}

// =============================================================================
// Weather Columns
// =============================================================================

pub mod weather_columns {
    pub const STATION_ID: &str = "Weather_station_ID";
    pub const MESSAGE: &str = "Message";
    pub const MEASUREMENT: &str = "Measurement";
    pub const VALUE: &str = "Value";

    /// Columns required in the raw message table
    pub const RAW: &[&str] = &[STATION_ID, MESSAGE];

    /// Narrow measurement table columns, in output order
    pub const ALL: &[&str] = &[STATION_ID, MESSAGE, MEASUREMENT, VALUE];
}

// =============================================================================
// Vocabulary
// =============================================================================

/// Closed crop vocabulary, lower case
pub const CROP_TYPES: &[&str] = &[
    "cassava", "tea", "wheat", "potato", "banana", "coffee", "rice", "maize",
];

/// Case-insensitive crop vocabulary membership
pub fn is_known_crop(value: &str) -> bool {
    let folded = value.to_lowercase();
    CROP_TYPES.contains(&folded.as_str())
}

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_SQL_QUERY: &str = "
    SELECT *
    FROM geographic_features
    LEFT JOIN weather_features USING (Field_ID)
    LEFT JOIN soil_and_crop_features USING (Field_ID)
    LEFT JOIN farm_management_features USING (Field_ID)
";

pub const DEFAULT_DB_PATH: &str = "sqlite:///Maji_Ndogo_farm_survey_small.db";

pub const DEFAULT_WEATHER_CSV: &str =
    "https://raw.githubusercontent.com/Explore-AI/Public-Data/master/Maji_Ndogo/Weather_station_data.csv";

pub const DEFAULT_WEATHER_MAPPING_CSV: &str =
    "https://raw.githubusercontent.com/Explore-AI/Public-Data/master/Maji_Ndogo/Weather_data_field_mapping.csv";

/// The survey export writes yield under the crop header and vice versa
pub const DEFAULT_COLUMN_SWAP: &[(&str, &str)] = &[
    (field_columns::ANNUAL_YIELD, field_columns::CROP_TYPE),
    (field_columns::CROP_TYPE, field_columns::ANNUAL_YIELD),
];

pub const DEFAULT_VALUE_FIXES: &[(&str, &str)] =
    &[("cassaval", "cassava"), ("wheatn", "wheat"), ("teaa", "tea")];

pub const DEFAULT_RAINFALL_PATTERN: &str = r"(\d+(\.\d+)?)\s?mm";
pub const DEFAULT_TEMPERATURE_PATTERN: &str = r"(\d+(\.\d+)?)\s?C";
pub const DEFAULT_POLLUTION_PATTERN: &str = r"=\s*(-?\d+(\.\d+)?)|Pollution at \s*(-?\d+(\.\d+)?)";

/// Timeout for a single remote CSV fetch, in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 30;
