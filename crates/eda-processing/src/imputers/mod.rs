//! Imputation module for handling missing values.
//!
//! This module provides the statistical imputation strategies:
//! - Mean or median for numeric columns, chosen by skewness
//! - First mode for categorical columns

mod statistical;

pub use statistical::StatisticalImputer;
