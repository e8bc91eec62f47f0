// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::PathBuf;
use tracing_appender::rolling::RollingFileAppender;

/// Opens (creating it if needed) a log file that is never rotated.
///
/// Note that if you wrap this up in a non blocking writer, output is lost unless its
/// worker guard is held for the life of the program.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create_log_file_appender(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = PathBuf::from(path_str);

    let parent = path.parent().ok_or_else(|| {
        miette::miette!("Can't get the parent folder of log file {}", path.display())
    })?;

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Can't get the file name of log file {}", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
