//! different utility modules used throughout the project
/// logging to terminal and file
pub mod logger;
/// plotting a function or its derivatives with plotters or gnuplot
pub mod plots;
/// settings read from a TOML file
pub mod config;
