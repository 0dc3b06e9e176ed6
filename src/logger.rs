use std::path::Path;

use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};

use crate::error::LogInitError;

static LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} | {t} | {({l}):5.5} | {m}{n}";

fn console_appender() -> Appender {
    let console_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build();
    Appender::builder().build("console", Box::new(console_appender))
}

fn file_appender(log_file: &Path) -> Result<Appender, LogInitError> {
    let appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build(log_file)?;

    Ok(Appender::builder().build("file", Box::new(appender)))
}

/// Logs into `log_file`, and also to stdout when `to_console` is set.
///
/// The terminal client passes `false` so log lines don't interleave with its prompt.
pub fn init_logger(log_file: &Path, to_console: bool) -> Result<(), LogInitError> {
    let mut builder = Config::builder().appender(file_appender(log_file)?);
    let mut root = Root::builder().appender("file");
    if to_console {
        builder = builder.appender(console_appender());
        root = root.appender("console");
    }
    let config = builder.build(root.build(log::LevelFilter::Info))?;
    let _handler = log4rs::init_config(config)?;

    Ok(())
}
