//! Unit tests - Configuration sources and dataset files
//!
//! These tests exercise the process environment and the filesystem, so they
//! live outside the library's inline test modules.
