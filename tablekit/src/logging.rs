//! Logger setup for hosts and tests.

use std::fs::File;
use std::path::Path;

use simplelog::{Config, LevelFilter, TestLogger, WriteLogger};

use crate::error::LoggingError;

/// Send all `log` output at or above `level` to the file at `path`.
pub fn init_file_logger(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), LoggingError> {
    let file = File::create(path)?;
    WriteLogger::init(level, Config::default(), file)?;
    Ok(())
}

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_test_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
