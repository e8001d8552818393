//! Prometheus text exposition of library counts.
//!
//! The grid is dense: every combination of observed release year, observed
//! owned platform and status is emitted, zero or not, so a scraper never has
//! to guess whether a missing series means zero.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::RangeInclusive;
use std::path::Path;

use gametrack_core::{GameRecord, GameStatus};

use crate::error::DatasetError;

pub const GAME_COUNT_METRIC: &str = "gametrack_game_count";
pub const GAME_RATING_METRIC: &str = "gametrack_game_rating";

/// User ratings are 1-10; 0 means unrated.
pub const RATING_SCALE: RangeInclusive<i64> = 1..=10;

/// One series of a metric family.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsPoint {
    pub labels: Vec<(&'static str, String)>,
    pub value: u64,
}

impl MetricsPoint {
    fn new(labels: Vec<(&'static str, String)>, value: u64) -> Self {
        Self { labels, value }
    }

    /// Value of a label, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Both metric families, computed from a full game list.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// `(year, platform, status)` counts, status-major.
    pub game_counts: Vec<MetricsPoint>,
    /// `(year, rating)` counts, year-major.
    pub ratings: Vec<MetricsPoint>,
}

impl MetricsSnapshot {
    pub fn from_games(games: &[GameRecord]) -> Self {
        let years: BTreeSet<i32> = games.iter().map(|g| g.release_year).collect();
        let platforms: BTreeSet<&str> = games.iter().map(|g| g.owned_platform.as_str()).collect();

        let mut counts: HashMap<(i32, &str, GameStatus), u64> = HashMap::new();
        let mut ratings: HashMap<(i64, i32), u64> = HashMap::new();

        for game in games {
            *counts
                .entry((game.release_year, game.owned_platform.as_str(), game.status))
                .or_default() += 1;

            match game.user_rating {
                0 => {}
                rating if RATING_SCALE.contains(&rating) => {
                    *ratings.entry((rating, game.release_year)).or_default() += 1;
                }
                rating => {
                    log::warn!(
                        "Game {} has user rating {rating} outside {}-{}; not counted",
                        game.igdb_id,
                        RATING_SCALE.start(),
                        RATING_SCALE.end()
                    );
                }
            }
        }

        let mut game_counts = Vec::with_capacity(GameStatus::all().len() * years.len() * platforms.len());
        for &status in GameStatus::all() {
            for &year in &years {
                for &platform in &platforms {
                    let value = counts.get(&(year, platform, status)).copied().unwrap_or(0);
                    game_counts.push(MetricsPoint::new(
                        vec![
                            ("year", year.to_string()),
                            ("platform", platform.to_string()),
                            ("status", status.label().to_string()),
                        ],
                        value,
                    ));
                }
            }
        }

        let mut rating_points = Vec::with_capacity(years.len() * RATING_SCALE.count());
        for &year in &years {
            for rating in RATING_SCALE {
                let value = ratings.get(&(rating, year)).copied().unwrap_or(0);
                rating_points.push(MetricsPoint::new(
                    vec![("year", year.to_string()), ("rating", rating.to_string())],
                    value,
                ));
            }
        }

        Self {
            game_counts,
            ratings: rating_points,
        }
    }

    /// Total number of series across both families.
    pub fn series_count(&self) -> usize {
        self.game_counts.len() + self.ratings.len()
    }

    /// Write the exposition text. Returns the number of series written.
    pub fn write_exposition<W: Write>(&self, mut w: W) -> io::Result<usize> {
        let mut written = 0;
        written += write_family(&mut w, GAME_COUNT_METRIC, "Number of games", &self.game_counts)?;
        written += write_family(&mut w, GAME_RATING_METRIC, "Game rating", &self.ratings)?;
        w.flush()?;
        Ok(written)
    }
}

fn write_family<W: Write>(
    w: &mut W,
    name: &str,
    help: &str,
    points: &[MetricsPoint],
) -> io::Result<usize> {
    writeln!(w, "# HELP {name} {help}")?;
    writeln!(w, "# TYPE {name} gauge")?;
    for point in points {
        let labels = point
            .labels
            .iter()
            .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(w, "{name}{{{labels}}} {:.1}", point.value as f64)?;
    }
    Ok(points.len())
}

/// Escape a label value for the text exposition format.
pub fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Compute and write metrics for `games`. Returns the number of series.
pub fn write_metrics<W: Write>(writer: W, games: &[GameRecord]) -> Result<usize, DatasetError> {
    let snapshot = MetricsSnapshot::from_games(games);
    Ok(snapshot.write_exposition(writer)?)
}

/// Compute and write metrics to a file, replacing it.
pub fn write_metrics_file(path: &Path, games: &[GameRecord]) -> Result<usize, DatasetError> {
    let file = File::create(path)?;
    write_metrics(BufWriter::new(file), games)
}
