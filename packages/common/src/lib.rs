pub mod documents;
pub mod export;
pub mod rubric;
pub mod scoring;

pub use rubric::{RubricError, Scores};
pub use scoring::{
    EvaluationFlag, EvaluationRecord, RankingStatus, SummaryStats, Team, TeamRanking,
    compute_rankings, summarize,
};
