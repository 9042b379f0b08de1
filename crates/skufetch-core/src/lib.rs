pub mod config;
pub mod logging;

pub mod chunk;
pub mod descriptor;
pub mod fetcher;
pub mod input;
pub mod progress;
pub mod runner;
pub mod sink;
