pub mod models;
pub mod storage;
