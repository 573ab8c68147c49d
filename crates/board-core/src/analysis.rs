//! Remote evaluation result model and its display helpers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Centipawn,
    Mate,
}

impl ScoreKind {
    /// The service tags mate scores with `"mate"`; anything else is centipawns.
    pub fn from_wire(kind: &str) -> Self {
        if kind.trim().eq_ignore_ascii_case("mate") {
            ScoreKind::Mate
        } else {
            ScoreKind::Centipawn
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score_kind: ScoreKind,
    pub score_value: f64,
    /// Best move in UCI notation
    pub best_move: String,
    pub principal_variation: Vec<String>,
    pub search_depth: u32,
}

impl AnalysisResult {
    /// `Mate in 3` or pawns with an explicit sign (`+0.35`).
    pub fn evaluation_text(&self) -> String {
        match self.score_kind {
            ScoreKind::Mate => format!("Mate in {}", self.score_value.abs().round() as i64),
            ScoreKind::Centipawn => format!("{:+.2}", self.score_value / 100.0),
        }
    }

    /// Raw score with a leading `+` for non-negative values (`+35`, `-120`).
    pub fn signed_value(&self) -> String {
        let sign = if self.score_value >= 0.0 { "+" } else { "" };
        if self.score_value.fract() == 0.0 {
            format!("{sign}{}", self.score_value as i64)
        } else {
            format!("{sign}{}", self.score_value)
        }
    }

    /// Fill of the evaluation bar in percent. A five pawn advantage either
    /// way saturates it; mate scores pin it to the winning side.
    pub fn bar_percentage(&self) -> f64 {
        match self.score_kind {
            ScoreKind::Mate if self.score_value > 0.0 => 100.0,
            ScoreKind::Mate => 0.0,
            ScoreKind::Centipawn => {
                let pawns = self.score_value / 100.0;
                ((pawns + 5.0) / 10.0 * 100.0).clamp(0.0, 100.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(kind: ScoreKind, value: f64) -> AnalysisResult {
        AnalysisResult {
            score_kind: kind,
            score_value: value,
            best_move: "e2e4".into(),
            principal_variation: vec!["e2e4".into(), "e7e5".into()],
            search_depth: 15,
        }
    }

    #[test]
    fn test_score_kind_from_wire() {
        assert_eq!(ScoreKind::from_wire("mate"), ScoreKind::Mate);
        assert_eq!(ScoreKind::from_wire("MATE"), ScoreKind::Mate);
        assert_eq!(ScoreKind::from_wire("cp"), ScoreKind::Centipawn);
        assert_eq!(ScoreKind::from_wire(""), ScoreKind::Centipawn);
    }

    #[test]
    fn test_evaluation_text() {
        assert_eq!(result(ScoreKind::Centipawn, 35.0).evaluation_text(), "+0.35");
        assert_eq!(result(ScoreKind::Centipawn, -120.0).evaluation_text(), "-1.20");
        assert_eq!(result(ScoreKind::Mate, -3.0).evaluation_text(), "Mate in 3");
    }

    #[test]
    fn test_signed_value() {
        assert_eq!(result(ScoreKind::Centipawn, 35.0).signed_value(), "+35");
        assert_eq!(result(ScoreKind::Centipawn, 0.0).signed_value(), "+0");
        assert_eq!(result(ScoreKind::Centipawn, -12.0).signed_value(), "-12");
        assert_eq!(result(ScoreKind::Centipawn, 12.5).signed_value(), "+12.5");
    }

    #[test]
    fn test_bar_percentage() {
        assert_eq!(result(ScoreKind::Centipawn, 0.0).bar_percentage(), 50.0);
        assert_eq!(result(ScoreKind::Centipawn, 250.0).bar_percentage(), 75.0);
        assert_eq!(result(ScoreKind::Centipawn, 900.0).bar_percentage(), 100.0);
        assert_eq!(result(ScoreKind::Centipawn, -900.0).bar_percentage(), 0.0);
        assert_eq!(result(ScoreKind::Mate, 2.0).bar_percentage(), 100.0);
        assert_eq!(result(ScoreKind::Mate, -2.0).bar_percentage(), 0.0);
    }
}
