pub mod advisor;
pub mod anchor;
pub mod calculator;
