pub mod collector;
pub mod example;
pub mod snapshot;
