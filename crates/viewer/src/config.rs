use std::env;

use board_core::board::STARTING_FEN;

use crate::clients::analysis::DEFAULT_DEPTH;
use crate::controller::AnalysisPolicy;

const DEFAULT_ANALYSIS_URL: &str =
    "https://fastapi-app-652057693890.us-central1.run.app/analyze-position";

#[derive(Clone, Debug)]
pub struct Config {
    /// Remote evaluation endpoint (POST {fen, depth})
    pub analysis_url: String,
    pub analysis_depth: u32,
    pub analysis_timeout_secs: u64,
    pub analysis_policy: AnalysisPolicy,
    /// Position shown at startup; never auto-analyzed
    pub start_fen: String,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            analysis_depth: DEFAULT_DEPTH,
            analysis_timeout_secs: 30,
            analysis_policy: AnalysisPolicy::default(),
            start_fen: STARTING_FEN.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            analysis_url: env::var("ANALYSIS_URL").unwrap_or(defaults.analysis_url),
            analysis_depth: env::var("ANALYSIS_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.analysis_depth),
            analysis_timeout_secs: env::var("ANALYSIS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.analysis_timeout_secs),
            analysis_policy: env::var("ANALYSIS_POLICY")
                .ok()
                .and_then(|v| AnalysisPolicy::from_name(&v))
                .unwrap_or(defaults.analysis_policy),
            start_fen: env::var("START_FEN").unwrap_or(defaults.start_fen),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}
