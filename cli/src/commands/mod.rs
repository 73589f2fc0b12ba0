pub mod config;
pub mod export;
pub mod generate;
pub mod logs;
pub mod rollup;
