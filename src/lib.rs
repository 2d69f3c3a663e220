pub mod archive;
pub mod catalog;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod plot;
pub mod trend;
