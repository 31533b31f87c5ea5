//! Terminal front end: the interactive menu shell.
pub mod shell;
