//! Times tables drill; timed sessions of multiplication problems and per table statistics.

// A session is 20 problems of one table, all correct within a minute counts as a success.
// Both front ends only go through this library, so the rules live in one place.

/// Main types and traits
pub mod traits;

/// Creating the problems for a session.
pub mod algorithm;

/// Checking answers and scoring a session.
pub mod scoring;

/// Statistics per table and their storage.
pub mod recorder;

/// Implementor for a training session.
pub mod training;

/// Settings for the front ends.
pub mod config;
