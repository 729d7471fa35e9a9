//! Business logic services
//!
//! This module contains the scoring core: transaction statistics and the
//! credit scoring engine built on them.

pub mod scoring_engine;
pub mod stats;

pub use scoring_engine::{BadgeType, CreditScoreResult, CreditTier, ScoreBreakdown, ScoringEngine};
pub use stats::{aggregate, window_stats, AnalysisWindow, HistoryStats, StatusPolicy, WindowStats};
