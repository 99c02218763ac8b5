//! Stateless async functions, one module per backend resource.
//!
//! They build paths and query strings and call the [`ApiClient`]; they never
//! cache, retry or swallow errors.
//!
//! [`ApiClient`]: crate::ApiClient

pub mod collect;
pub mod comments;
pub mod dashboard;
pub mod insights;
pub mod sentiments;
pub mod teams;
pub mod trends;

use chrono::NaiveDate;

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
