//! Dataset outputs: the `games.csv` table and the Prometheus metrics snapshot.

pub mod error;
pub mod metrics;
pub mod table;

pub use error::DatasetError;
pub use metrics::{
    GAME_COUNT_METRIC, GAME_RATING_METRIC, MetricsPoint, MetricsSnapshot, RATING_SCALE,
    escape_label_value, write_metrics, write_metrics_file,
};
pub use table::{
    GAME_FIELDS, format_float, games_to_csv_bytes, read_games, read_games_csv, write_games,
    write_games_csv,
};
