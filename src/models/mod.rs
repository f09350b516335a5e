pub mod column;
pub mod dataset;
pub mod season;
pub mod value;

pub use column::{normalize_city, ColumnId, CITY_ALIASES};
pub use dataset::{ColumnSchema, Record, Schema, WeatherDataset};
pub use season::Season;
pub use value::{ColumnKind, Value};
