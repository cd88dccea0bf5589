pub mod enrich;
pub mod geometry;
pub mod group;
pub mod naming;
pub mod writer;
