//! Song catalog loading
//!
//! Reads a CSV song table, drops rows with missing or non-numeric required
//! fields, de-duplicates on (track name, artist) keeping the first
//! occurrence, then fits the min-max scaler once and stores every song's
//! normalized feature vector. The catalog is immutable after construction.

use crate::features::{FeatureVector, FEATURE_COLUMNS};
use crate::scaler::MinMaxScaler;
use moodmix_common::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const TRACK_NAME_COLUMN: &str = "track_name";
pub const ARTIST_NAME_COLUMN: &str = "artist_name";
pub const TRACK_ID_COLUMN: &str = "track_id";

/// Base URL for playback links built from a song's external id
pub const TRACK_LINK_PREFIX: &str = "http://open.spotify.com/track/";

/// Link used when a song has no external id
pub const MISSING_LINK: &str = "#";

/// One row of the catalog CSV as read from disk
///
/// Every field is optional so that null or garbage cells surface as `None`
/// instead of aborting the whole load.
#[derive(Debug, Deserialize)]
struct RawSongRow {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    track_name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    artist_name: Option<String>,
    #[serde(default, deserialize_with = "padded_number")]
    valence: Option<f64>,
    #[serde(default, deserialize_with = "padded_number")]
    energy: Option<f64>,
    #[serde(default, deserialize_with = "padded_number")]
    danceability: Option<f64>,
    #[serde(default, deserialize_with = "padded_number")]
    acousticness: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    track_id: Option<String>,
}

/// Numeric cell with surrounding whitespace allowed; garbage reads as `None`
fn padded_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<String> = csv::invalid_option(deserializer)?;
    Ok(cell.and_then(|c| c.trim().parse().ok()))
}

impl RawSongRow {
    fn into_record(self) -> Option<SongRecord> {
        let features = [self.valence?, self.energy?, self.danceability?, self.acousticness?];
        if features.iter().any(|v| !v.is_finite()) {
            return None;
        }

        Some(SongRecord {
            track_name: self.track_name.filter(|s| !s.is_empty())?,
            artist_name: self.artist_name.filter(|s| !s.is_empty())?,
            track_id: self.track_id.filter(|s| !s.is_empty()),
            features,
        })
    }
}

/// A validated song with raw (unscaled) features
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    pub track_name: String,
    pub artist_name: String,
    pub track_id: Option<String>,
    pub features: FeatureVector,
}

impl SongRecord {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        track_id: Option<&str>,
        features: FeatureVector,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            track_id: track_id.map(str::to_string),
            features,
        }
    }
}

/// A catalog song with normalized features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub track_name: String,
    pub artist_name: String,
    pub track_id: Option<String>,
    pub features: FeatureVector,
}

impl Song {
    /// Playback link, or `"#"` when the song has no external id
    pub fn link(&self) -> String {
        match &self.track_id {
            Some(id) => format!("{}{}", TRACK_LINK_PREFIX, id),
            None => MISSING_LINK.to_string(),
        }
    }
}

/// Row accounting for a catalog load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub dropped_null: usize,
    pub dropped_duplicate: usize,
    pub loaded: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
    scaler: MinMaxScaler,
    report: LoadReport,
}

impl Catalog {
    /// Load a catalog CSV from disk
    pub fn load(path: &Path) -> Result<Catalog> {
        info!("Loading song catalog from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a catalog from any CSV source with a header row
    pub fn from_reader<R: Read>(source: R) -> Result<Catalog> {
        // Ragged rows fail the whole load. Text cells are kept verbatim so
        // that "Song" and "Song " stay distinct songs.
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        for column in [TRACK_NAME_COLUMN, ARTIST_NAME_COLUMN]
            .into_iter()
            .chain(FEATURE_COLUMNS)
        {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::MissingColumn(column.to_string()));
            }
        }

        let mut rows_read = 0;
        let mut records = Vec::new();
        for row in reader.deserialize::<RawSongRow>() {
            let row = row?;
            rows_read += 1;
            match row.into_record() {
                Some(record) => records.push(record),
                None => debug!("Dropping catalog row {} with missing values", rows_read),
            }
        }

        let dropped_null = rows_read - records.len();
        Self::build(records, rows_read, dropped_null)
    }

    /// Build a catalog from already-validated records
    pub fn from_records(records: Vec<SongRecord>) -> Result<Catalog> {
        let rows_read = records.len();
        let (valid, invalid): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.features.iter().all(|v| v.is_finite()));
        Self::build(valid, rows_read, invalid.len())
    }

    fn build(records: Vec<SongRecord>, rows_read: usize, dropped_null: usize) -> Result<Catalog> {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let unique: Vec<SongRecord> = records
            .into_iter()
            .filter(|r| seen.insert((r.track_name.clone(), r.artist_name.clone())))
            .collect();
        let dropped_duplicate = rows_read - dropped_null - unique.len();

        let scaler =
            MinMaxScaler::fit(unique.iter().map(|r| &r.features)).ok_or(Error::EmptyCatalog)?;

        let songs: Vec<Song> = unique
            .into_iter()
            .map(|r| Song {
                features: scaler.transform(&r.features),
                track_name: r.track_name,
                artist_name: r.artist_name,
                track_id: r.track_id,
            })
            .collect();

        let report = LoadReport {
            rows_read,
            dropped_null,
            dropped_duplicate,
            loaded: songs.len(),
        };
        info!(
            rows_read = report.rows_read,
            dropped_null = report.dropped_null,
            dropped_duplicate = report.dropped_duplicate,
            loaded = report.loaded,
            "Catalog built"
        );

        Ok(Catalog {
            songs,
            scaler,
            report,
        })
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "track_id,artist_name,track_name,popularity,valence,energy,danceability,acousticness\n";

    fn load(body: &str) -> Result<Catalog> {
        Catalog::from_reader(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn test_loads_and_normalizes() {
        let catalog = load(
            "id1,Artist A,Song A,10,0.0,0.2,0.4,0.1\n\
             id2,Artist B,Song B,20,1.0,0.6,0.8,0.9\n",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.songs()[0].features, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(catalog.songs()[1].features, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(catalog.songs()[0].track_id.as_deref(), Some("id1"));
    }

    #[test]
    fn test_drops_rows_with_nulls() {
        let catalog = load(
            "id1,Artist A,Song A,10,0.5,0.2,0.4,0.1\n\
             id2,Artist B,Song B,20,,0.6,0.8,0.9\n\
             id3,,Song C,20,0.3,0.6,0.8,0.9\n\
             id4,Artist D,Song D,20,abc,0.6,0.8,0.9\n\
             id5,Artist E,Song E,20,NaN,0.6,0.8,0.9\n\
             id6,Artist F,Song F,30,0.9,0.1,0.2,0.3\n",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let report = catalog.report();
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.dropped_null, 4);
        assert_eq!(report.dropped_duplicate, 0);
        assert_eq!(report.loaded, 2);
    }

    #[test]
    fn test_deduplicates_keeping_first() {
        let catalog = load(
            "id1,Artist A,Song A,10,0.5,0.2,0.4,0.1\n\
             id2,Artist A,Song A,20,0.9,0.9,0.9,0.9\n\
             id3,Artist B,Song A,20,0.1,0.1,0.1,0.1\n",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.songs()[0].track_id.as_deref(), Some("id1"));
        assert_eq!(catalog.songs()[1].artist_name, "Artist B");
        assert_eq!(catalog.report().dropped_duplicate, 1);
    }

    #[test]
    fn test_missing_track_id_column_is_allowed() {
        let csv = "track_name,artist_name,valence,energy,danceability,acousticness\n\
                   Song A,Artist A,0.5,0.2,0.4,0.1\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.songs()[0].track_id, None);
        assert_eq!(catalog.songs()[0].link(), "#");
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "track_name,artist_name,valence,energy,danceability\n\
                   Song A,Artist A,0.5,0.2,0.4\n";
        match Catalog::from_reader(csv.as_bytes()) {
            Err(Error::MissingColumn(column)) => assert_eq!(column, "acousticness"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_no_usable_rows_fails() {
        assert!(matches!(load(""), Err(Error::EmptyCatalog)));
        assert!(matches!(
            load("id1,Artist A,Song A,10,,,,\n"),
            Err(Error::EmptyCatalog)
        ));
    }

    #[test]
    fn test_ragged_rows_fail_the_load() {
        let csv = "track_name,artist_name,valence,energy,danceability,acousticness\n\
                   A,X,0.1,0.2,0.3,0.4\n\
                   B,Y,0.5,0.6,0.7,0.8,extra,garbage\n";
        assert!(matches!(Catalog::from_reader(csv.as_bytes()), Err(Error::Csv(_))));

        let short = "track_name,artist_name,valence,energy,danceability,acousticness\n\
                     A,X,0.1,0.2,0.3,0.4\n\
                     B,Y,0.5\n";
        assert!(matches!(Catalog::from_reader(short.as_bytes()), Err(Error::Csv(_))));
    }

    #[test]
    fn test_text_cells_are_not_trimmed() {
        let catalog = load(
            "id1,Artist A,Song,10,0.5,0.2,0.4,0.1\n\
             id2,Artist A,Song ,20,0.9,0.9,0.9,0.9\n",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.songs()[0].track_name, "Song");
        assert_eq!(catalog.songs()[1].track_name, "Song ");
        assert_eq!(catalog.report().dropped_duplicate, 0);
    }

    #[test]
    fn test_padded_numbers_still_parse() {
        let catalog = load(
            "id1,Artist A,Song A,10, 0.5 ,0.2,0.4,0.1\n\
             id2,Artist B,Song B,20,1.0,0.6,0.8,0.9\n",
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.report().dropped_null, 0);
    }

    #[test]
    fn test_link_format() {
        let catalog = load("4uLU6hMCjMI75M1A2tKUQC,Artist A,Song A,10,0.5,0.2,0.4,0.1\n").unwrap();
        assert_eq!(
            catalog.songs()[0].link(),
            "http://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"
        );
    }

    #[test]
    fn test_from_records() {
        let catalog = Catalog::from_records(vec![
            SongRecord::new("A", "X", Some("a"), [0.0, 0.0, 0.0, 0.0]),
            SongRecord::new("B", "X", None, [2.0, 2.0, 2.0, 2.0]),
            SongRecord::new("A", "X", None, [1.0, 1.0, 1.0, 1.0]),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.songs()[1].features, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(catalog.scaler().max(), &[2.0, 2.0, 2.0, 2.0]);
    }
}
