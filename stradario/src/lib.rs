pub mod collect;
pub mod config;
pub mod pipeline;
pub mod roads;
