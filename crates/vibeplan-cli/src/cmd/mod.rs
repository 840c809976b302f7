pub mod config;
pub mod doc;
pub mod project;
pub mod serve;
pub mod theme;
pub mod todo;
