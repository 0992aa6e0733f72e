pub mod builders;
pub mod mocks;

// Re-export main utilities for use by test files
pub use builders::{card_record, score_record, SessionBuilder, TestSetup};
#[allow(unused_imports)]
pub use mocks::FlakySessionRepository;
