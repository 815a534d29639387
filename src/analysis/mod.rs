//! Ranking views and query answering over the value table

pub mod answer;
pub mod query;
pub mod rank;

pub use answer::{Answer, Highlight, Intent};
pub use query::{KeywordRule, QueryDispatcher, RuleTarget};
pub use rank::{
    DatasetSummary, Direction, Insights, MarketDistribution, RankingEngine, RegionAverage, top_k,
    top_scores,
};
