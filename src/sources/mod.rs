pub mod fetch;

pub use fetch::{FetchRecords, GitlabTokenSource};
