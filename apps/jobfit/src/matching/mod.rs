//! Résumé evidence matching, CV scoring and the combined fit verdict.

pub mod cv;
pub mod evidence;
pub mod fit;
pub mod report;

pub use cv::{CvAligner, MatchResult};
pub use evidence::EvidenceMatcher;
pub use fit::{combine, FitBadge, FitVerdict, FIT_THRESHOLD};
pub use report::{MatchReport, MatchService, Recommendations};

/// Rounds half away from zero to one decimal place.
pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(57.894), 57.9);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(100.0), 100.0);
        assert_eq!(round1(33.333), 33.3);
    }
}
