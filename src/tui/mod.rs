pub mod app;
pub mod changelog;
pub mod edit;
pub mod handlers;
pub mod state;
pub mod ui;
