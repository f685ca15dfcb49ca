//! Raw source readers.
//!
//! Each reader acquires its connection or client, performs exactly one read
//! and releases it before returning. No correction logic lives here.

pub mod database;
pub mod remote;

pub use database::read_field_table;
pub use remote::{read_station_mapping, read_weather_messages};
