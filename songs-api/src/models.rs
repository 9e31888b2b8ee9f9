//! Response shapes for the rating endpoints

use serde::Serialize;
use songs_common::SongId;

/// Result of appending a rating: the song id and all of its ratings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedSong {
    #[serde(rename = "_id")]
    pub id: SongId,
    pub rates: Vec<i64>,
}

/// Aggregate over a song's ratings
///
/// A song without ratings reports -1 for every aggregate and a count of 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub lowest: i64,
    pub highest: i64,
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    pub const NO_RATINGS: RatingSummary = RatingSummary {
        lowest: -1,
        highest: -1,
        average: -1.0,
        count: 0,
    };

    pub fn from_rates(rates: &[i64]) -> Self {
        let (Some(&lowest), Some(&highest)) = (rates.iter().min(), rates.iter().max()) else {
            return Self::NO_RATINGS;
        };

        let sum: i64 = rates.iter().sum();

        Self {
            lowest,
            highest,
            average: sum as f64 / rates.len() as f64,
            count: rates.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_two() {
        let summary = RatingSummary::from_rates(&[5, 3]);
        assert_eq!(
            summary,
            RatingSummary {
                lowest: 3,
                highest: 5,
                average: 4.0,
                count: 2
            }
        );
    }

    #[test]
    fn test_summary_of_none() {
        assert_eq!(RatingSummary::from_rates(&[]), RatingSummary::NO_RATINGS);
    }

    #[test]
    fn test_summary_non_integral_average() {
        let summary = RatingSummary::from_rates(&[1, 2, 2]);
        assert_eq!(summary.lowest, 1);
        assert_eq!(summary.highest, 2);
        assert!((summary.average - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn test_empty_summary_serialization() {
        let value = serde_json::to_value(RatingSummary::NO_RATINGS).unwrap();
        assert_eq!(value["lowest"], -1);
        assert_eq!(value["highest"], -1);
        assert_eq!(value["average"].as_f64(), Some(-1.0));
        assert_eq!(value["count"], 0);
    }
}
