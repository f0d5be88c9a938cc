pub mod classifier;
pub mod cli;
pub mod filters;
pub mod query;
pub mod ranking;
pub mod report;
pub mod search;
pub mod stats;
pub mod storage;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
