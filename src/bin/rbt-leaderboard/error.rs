use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ShellError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Config {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}
