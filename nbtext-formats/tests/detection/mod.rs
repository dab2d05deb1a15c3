//! Format detection tests
//!
//! Guessing with a known extension, and divining without one.

mod divine;
mod guess;
