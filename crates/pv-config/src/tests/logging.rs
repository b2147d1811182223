use crate::{LogLevel, initialize_logging};

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok};
use log::LevelFilter;
use tempfile::TempDir;

// The log crate allows exactly one global logger per process, so file
// initialization and its output are exercised in a single test.
#[test]
fn given_file_output_when_initialized_then_log_lines_are_written() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("pv.log");

    let result = initialize_logging(
        LogLevel(LevelFilter::Info),
        Some(log_path.clone()),
        false,
    );
    assert_that!(result, ok(anything()));

    log::info!("hello from the logging test");

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert_that!(contents.contains("hello from the logging test"), eq(true));
    assert_that!(contents.contains("INFO"), eq(true));
}
