//! log4rs setup.

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

/// Pattern of the built-in console appender.
pub const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

/// Console-only configuration at `info`, used when no log4rs file exists.
pub fn console_config() -> Result<log4rs::Config, Box<dyn Error>> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    let config = log4rs::Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))?;
    Ok(config)
}

/// Initialise logging from `log_config`, or from [`console_config`] when the
/// file does not exist.
pub fn init_logging(log_config: &Path) -> Result<(), Box<dyn Error>> {
    if log_config.exists() {
        log4rs::init_file(log_config, Default::default())?;
        log::debug!("Logging configured from {}", log_config.display());
    } else {
        log4rs::init_config(console_config()?)?;
        log::debug!("{} not found, logging to console", log_config.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config() {
        let config = console_config().unwrap();
        assert_eq!(config.root().level(), LevelFilter::Info);
        assert_eq!(config.appenders().len(), 1);
    }
}
