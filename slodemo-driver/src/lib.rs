pub mod config;
pub mod mix;
pub mod pacer;
pub mod selector;
pub mod stats;
