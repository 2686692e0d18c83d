pub mod summary;
pub mod tables;
pub mod writer;
