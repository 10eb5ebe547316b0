use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Number of relay channels on the board
pub const CHANNEL_COUNT: usize = 16;

/// Default time between frames when generating shows
pub const DEFAULT_INTERVAL_MS: i64 = 500;

/// A single entry in a show row. The authoring tool writes `0`/`1`, but
/// hand-written shows often use `true`/`false`, so both are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Flag(bool),
    Bit(i64),
}

impl Cell {
    /// The engaged state this cell asks for. `None` if the number is not 0 or 1.
    pub fn engaged(&self) -> Option<bool> {
        match *self {
            Cell::Flag(flag) => Some(flag),
            Cell::Bit(0) => Some(false),
            Cell::Bit(1) => Some(true),
            Cell::Bit(_) => None,
        }
    }
}

impl From<bool> for Cell {
    fn from(engaged: bool) -> Self {
        Cell::Bit(engaged as i64)
    }
}

/// The show document as it is stored on disk:
///
/// ```json
/// { "show": [[1, 0, ...], ...], "loop": true, "interval": 500 }
/// ```
///
/// This is the raw format only. The player validates it before anything is
/// drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowFile {
    pub show: Vec<Vec<Cell>>,
    #[serde(rename = "loop", default)]
    pub looping: bool,
    pub interval: i64,
}

impl ShowFile {
    pub fn new(rows: Vec<Vec<bool>>, looping: bool, interval: i64) -> Self {
        Self {
            show: rows
                .into_iter()
                .map(|row| row.into_iter().map(Cell::from).collect())
                .collect(),
            looping,
            interval,
        }
    }

    /// One channel lit at a time, walking from the first channel to the last
    pub fn chase(channels: usize, interval: i64) -> Self {
        let rows = (0..channels)
            .map(|lit| (0..channels).map(|i| i == lit).collect())
            .collect();

        Self::new(rows, true, interval)
    }

    /// Every channel on, then every channel off
    pub fn flash(channels: usize, interval: i64) -> Self {
        let rows = alloc::vec![alloc::vec![true; channels], alloc::vec![false; channels]];

        Self::new(rows, true, interval)
    }

    /// Even and odd channels taking turns
    pub fn alternate(channels: usize, interval: i64) -> Self {
        let rows = [0, 1]
            .iter()
            .map(|phase| (0..channels).map(|i| i % 2 == *phase).collect())
            .collect();

        Self::new(rows, true, interval)
    }

    #[cfg(feature = "std")]
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_cells_accept_bits_and_flags() {
        let file = ShowFile::from_json(r#"{"show": [[1, 0, true, false]], "interval": 250}"#)
            .unwrap();

        let engaged: Vec<Option<bool>> = file.show[0].iter().map(Cell::engaged).collect();
        assert_eq!(engaged, vec![Some(true), Some(false), Some(true), Some(false)]);
        assert!(!file.looping);
        assert_eq!(file.interval, 250);
    }

    #[test]
    fn test_out_of_range_bit() {
        assert_eq!(Cell::Bit(2).engaged(), None);
        assert_eq!(Cell::Bit(-1).engaged(), None);
    }

    #[test]
    fn test_written_show_uses_loop_key() {
        let json = ShowFile::flash(2, 100).to_json().unwrap();

        assert!(json.contains("\"loop\": true"));
        assert!(json.contains("\"interval\": 100"));
        assert_eq!(ShowFile::from_json(&json).unwrap(), ShowFile::flash(2, 100));
    }

    #[test]
    fn test_chase_lights_one_channel_per_row() {
        let chase = ShowFile::chase(4, 200);

        assert_eq!(chase.show.len(), 4);
        for (row_index, row) in chase.show.iter().enumerate() {
            let lit: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.engaged() == Some(true))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(lit, vec![row_index]);
        }
    }

    #[test]
    fn test_alternate_rows_are_complements() {
        let alternate = ShowFile::alternate(CHANNEL_COUNT, DEFAULT_INTERVAL_MS);

        for (a, b) in alternate.show[0].iter().zip(alternate.show[1].iter()) {
            assert_ne!(a.engaged(), b.engaged());
        }
    }
}
