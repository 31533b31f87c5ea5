// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
//! # DerivativeXpert
//!
//! Calculus teaching tool: string expressions are parsed into symbolic form, evaluated,
//! differentiated and analysed (critical points, monotonicity, concavity, asymptotes,
//! domain and range), and plotted.
//!
//! ```
//! use DerivativeXpert::calculus::analysis::AnalysisFacade;
//! use DerivativeXpert::calculus::function::ScalarExpression;
//! let f = ScalarExpression::create("x^3 - 3*x").unwrap();
//! assert_eq!(AnalysisFacade::new().critical_points(&f, None), vec![-1.0, 1.0]);
//! ```
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Utils;
pub mod calculus;
pub mod cli;
pub mod error;
pub mod numerical;
pub mod symbolic;
