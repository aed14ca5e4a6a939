pub mod aggregator;
pub mod analysis;
pub mod comparison;
pub mod crawler;
pub mod http;
pub mod narrative;
pub mod report;

pub use aggregator::{overall_winner, DimensionWinners, ScoreAggregator, Verdict};
pub use analysis::AnalysisService;
pub use comparison::ComparisonEngine;
pub use crawler::{acquire_pair, HttpPageSource, PageSource};
pub use narrative::{NarrativeBridge, NarrativeGenerator};
pub use report::{brand_name, ReportAssembler};
