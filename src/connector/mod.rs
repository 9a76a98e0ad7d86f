use crate::display::{Display, Transport, X11Connector};
use crate::display::error::Error;

use std::env;


/// the name of the display a connection was attempted for
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    name: String,
}

impl Endpoint {
    /// an explicit name, else $DISPLAY as written, else display 0
    pub fn resolve(endpoint: Option<&str>) -> Endpoint {
        let name = match endpoint {
            Some(name) => Some(name.to_string()),
            None => env::var_os("DISPLAY").map(|name| name.to_string_lossy().into_owned()),
        };

        Endpoint {
            name: name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| String::from("0")),
        }
    }

    pub fn name(&self) -> &str { &self.name }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

pub enum ConnectError {
    Unavailable {
        endpoint: Endpoint,
        cause: Option<Error>,
    },
}

impl ConnectError {
    pub fn unavailable(endpoint: Endpoint, cause: Option<Error>) -> ConnectError {
        ConnectError::Unavailable {
            endpoint,
            cause,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        match self {
            ConnectError::Unavailable { endpoint, .. } => endpoint,
        }
    }
}

impl std::fmt::Debug for ConnectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectError::Unavailable { cause: Some(cause), .. } => {
                f.write_fmt(format_args!("{} ({})", self, cause))
            },
            ConnectError::Unavailable { cause: None, .. } => {
                f.write_fmt(format_args!("{}", self))
            },
        }
    }
}

impl std::fmt::Display for ConnectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectError::Unavailable { endpoint, .. } => {
                f.write_fmt(format_args!("Failed to open display {}", endpoint))
            },
        }
    }
}

impl std::error::Error for ConnectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConnectError::Unavailable { cause, .. } => cause.as_ref().map(|cause| cause as &(dyn std::error::Error + 'static)),
        }
    }
}

/// opens a session with a display server in a single blocking attempt
pub trait Connector {
    type Session;

    fn connect(&mut self, endpoint: Option<&str>) -> Result<Self::Session, ConnectError>;
}

impl Connector for X11Connector {
    type Session = Display<Box<dyn Transport>>;

    fn connect(&mut self, endpoint: Option<&str>) -> Result<Self::Session, ConnectError> {
        self.open(endpoint)
            .map_err(|err| ConnectError::unavailable(Endpoint::resolve(endpoint), Some(err)))
    }
}
