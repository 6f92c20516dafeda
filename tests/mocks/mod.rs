//! Mock infrastructure for testing external services
//!
//! This module provides a mock server for the spreadsheet-backed upstream
//! (roster and leave endpoints). It supports success, failure, slow and
//! redirecting responses.


pub use upstream::*;
