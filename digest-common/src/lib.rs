pub mod command;
pub mod event;
pub mod keywords;
pub mod models;
