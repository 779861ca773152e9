//! Common test utilities for bake integration tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write a Bakefile (and nothing else) into a fresh temp dir
#[allow(dead_code)]
pub fn bakefile(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Bakefile");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

/// A registry parsed from recipe text
#[allow(dead_code)]
pub fn registry(text: &str) -> bake::Registry {
    bake::parse(text).unwrap()
}
