//! Common test utilities and helpers
//!
//! This module provides reusable test helpers to reduce code duplication
//! across integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test command builder for the promo-footer-bar CLI
pub struct TestCommand {
    cmd: Command,
}

impl TestCommand {
    /// Create a new test command for the promo-footer-bar binary
    pub fn new() -> Self {
        let cmd = Command::cargo_bin("promo-footer-bar")
            .expect("Failed to find promo-footer-bar binary");
        Self { cmd }
    }

    /// Add arguments to the command
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.cmd.arg(arg.as_ref());
        }
        self
    }

    /// Add a single argument to the command
    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg.as_ref());
        self
    }

    /// Set environment variable
    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.cmd.env(key.as_ref(), val.as_ref());
        self
    }

    /// Execute and expect success
    pub fn expect_success(mut self) -> TestAssertion {
        let assert = self.cmd.assert().success();
        TestAssertion { assert }
    }

    /// Execute and expect failure
    pub fn expect_failure(mut self) -> TestAssertion {
        let assert = self.cmd.assert().failure();
        TestAssertion { assert }
    }

    /// Execute, expect success and return stdout
    pub fn stdout(self) -> String {
        let assert = self.expect_success().done();
        String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
    }
}

impl Default for TestCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Test assertion wrapper with convenient methods
pub struct TestAssertion {
    assert: assert_cmd::assert::Assert,
}

impl TestAssertion {
    /// Assert stdout contains text
    pub fn stdout_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stdout(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    /// Assert stdout does not contain text
    pub fn stdout_lacks<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self
            .assert
            .stdout(predicate::str::contains(text.as_ref()).not());
        Self { assert }
    }

    /// Assert multiple stdout patterns
    pub fn stdout_contains_all<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.assert = self.assert.stdout(predicate::str::contains(pattern.as_ref()));
        }
        Self { assert: self.assert }
    }

    /// Assert stderr contains text
    pub fn stderr_contains<S: AsRef<str>>(self, text: S) -> Self {
        let assert = self.assert.stderr(predicate::str::contains(text.as_ref()));
        Self { assert }
    }

    /// Finish the assertion
    pub fn done(self) -> assert_cmd::assert::Assert {
        self.assert
    }
}

/// Isolated project and home directory for one test
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub home_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestEnvironment {
    /// Create a new test environment with temporary directories
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let home_dir = TempDir::new().expect("Failed to create temp home directory");
        let config_path = temp_dir.path().join(".promo-footer-bar/config.toml");

        Self {
            temp_dir,
            home_dir,
            config_path,
        }
    }

    /// Initialize configuration in the test environment
    pub fn init_config(&self) -> TestAssertion {
        self.command().arg("init").expect_success()
    }

    /// Get the project path
    pub fn project_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory holding the option store files
    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join(".promo-footer-bar/data")
    }

    /// Write a JSON fixture into the project directory
    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap())
            .expect("Failed to write fixture");
        path
    }

    /// Import a JSON array of notification entries
    pub fn import(&self, entries: &Value) -> TestAssertion {
        let file = self.write_json("notifications.json", entries);
        self.command()
            .arg("import")
            .arg(file.to_string_lossy())
            .expect_success()
    }

    /// Create a command configured for this environment
    pub fn command(&self) -> TestCommand {
        TestCommand::new()
            .env("HOME", self.home_dir.path().to_string_lossy())
            .env("RUST_LOG", "warn")
            .arg("--project")
            .arg(self.project_path().to_string_lossy())
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Assertion helpers for common patterns
pub mod assertions {
    /// Assert that a path exists
    pub fn assert_path_exists<P: AsRef<std::path::Path>>(path: P) {
        assert!(
            path.as_ref().exists(),
            "Path should exist: {}",
            path.as_ref().display()
        );
    }

    /// Assert that a path does not exist
    pub fn assert_path_missing<P: AsRef<std::path::Path>>(path: P) {
        assert!(
            !path.as_ref().exists(),
            "Path should not exist: {}",
            path.as_ref().display()
        );
    }
}
