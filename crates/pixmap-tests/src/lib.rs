//! Integration tests for the pixmap crates.
//!
//! End-to-end checks that decode, transform and encode together, and that
//! every transform gives the same bytes whatever the sequential cutoff.
