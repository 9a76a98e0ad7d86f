

pub enum Error {
    InvalidDisplay,
    InvalidProtocol {
        protocol: String,
    },
    SetupFailed {
        reason: String,
    },
    Authenticate {
        reason: String,
    },
    InvalidStatus {
        status: u8,
    },
    NoScreens,
    Truncated,
    Io(std::io::Error),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidDisplay => {
                f.write_str("invalid display name")
            },
            Error::InvalidProtocol { protocol } => {
                f.write_fmt(format_args!("invalid protocol: {}", protocol))
            },
            Error::SetupFailed { reason } => {
                f.write_fmt(format_args!("connection setup refused: {}", reason))
            },
            Error::Authenticate { reason } => {
                f.write_fmt(format_args!("authentication required: {}", reason))
            },
            Error::InvalidStatus { status } => {
                f.write_fmt(format_args!("server responded with invalid status code {}", status))
            },
            Error::NoScreens => {
                f.write_str("server never informed of any screens")
            },
            Error::Truncated => {
                f.write_str("server sent a truncated setup reply")
            },
            Error::Io(err) => {
                f.write_fmt(format_args!("io: {}", err))
            },
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
