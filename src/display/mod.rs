pub mod error;
pub mod parse;
pub mod auth;
pub mod request;

use error::Error;
use parse::{DisplayInfo, Protocol};
use auth::{Cookie, Family};
use request::*;

use std::os::unix::net::UnixStream;
use std::net::{IpAddr, TcpStream};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::env;

// https://www.x.org/docs/XProtocol/proto.pdf

const X_TCP_PORT: u16 = 6000;
const X_PROTOCOL: u16 = 11;
const X_PROTOCOL_REVISION: u16 = 0;

const X_UNIX_SOCKET_DIR: &str = "/tmp/.X11-unix";


/// anything the handshake can be spoken over
pub trait Transport: Read + Write + Send {}

impl<T> Transport for T where T: Read + Write + Send {}

pub struct Stream<T> {
    inner: T,
}

impl<T> Stream<T> where T: Read + Write {
    pub fn new(inner: T) -> Stream<T> {
        Stream {
            inner,
        }
    }

    fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.inner.write_all(bytes)?;

        self.inner.flush().map_err(|err| err.into())
    }

    fn recv(&mut self, size: usize) -> Result<Vec<u8>, Error> {
        let mut buffer = vec![0u8; size];

        match self.inner.read_exact(&mut buffer) {
            Ok(()) => Ok(buffer),
            Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => Err(Error::Truncated),
            Err(err) => Err(err.into()),
        }
    }
}

/// what the server announced when it accepted the connection
#[derive(Debug, Clone, PartialEq)]
pub struct Setup {
    pub major_version: u16,
    pub minor_version: u16,
    pub release_number: u32,
    pub resource_id_base: u32,
    pub resource_id_mask: u32,
    pub maximum_request_len: u16,
    pub roots_len: u8,
    pub vendor: String,
}

/// an established connection to an x11 server
pub struct Display<T> {
    stream: Stream<T>,
    info: DisplayInfo,
    setup: Setup,
}

impl<T> Display<T> where T: Read + Write {
    pub fn connect(inner: T, info: DisplayInfo, cookie: Cookie) -> Result<Display<T>, Error> {
        let mut stream = Stream::new(inner);

        let setup = Self::handshake(&mut stream, cookie)?;

        log::debug!("connected to {} release {}, {} screen(s)", setup.vendor, setup.release_number, setup.roots_len);

        Ok(Display {
            stream,
            info,
            setup,
        })
    }

    pub fn info(&self) -> &DisplayInfo { &self.info }

    pub fn setup(&self) -> &Setup { &self.setup }

    pub fn into_inner(self) -> T { self.stream.inner }

    fn handshake(stream: &mut Stream<T>, cookie: Cookie) -> Result<Setup, Error> {
        let request = SetupRequest::new(X_PROTOCOL, X_PROTOCOL_REVISION, cookie.name, cookie.data);

        stream.send(&request.encode())?;

        let response = SetupResponse::decode(&stream.recv(SetupResponse::SIZE)?)?;

        log::trace!("setup response: {:?}", response);

        let bytes = stream.recv(response.additional_len())?;

        match response.status {
            SetupResponse::SUCCESS => Self::read_setup(response, &bytes),
            SetupResponse::FAILED => Err(Error::SetupFailed {
                reason: reason(&bytes, response.reason_len as usize),
            }),
            SetupResponse::AUTHENTICATE => Err(Error::Authenticate {
                reason: reason(&bytes, bytes.len()),
            }),
            status => Err(Error::InvalidStatus { status }),
        }
    }

    fn read_setup(response: SetupResponse, bytes: &[u8]) -> Result<Setup, Error> {
        let success = SuccessResponse::decode(bytes)?;

        if success.roots_len == 0 {
            return Err(Error::NoScreens);
        }

        Ok(Setup {
            major_version: response.major_version,
            minor_version: response.minor_version,
            release_number: success.release_number,
            resource_id_base: success.resource_id_base,
            resource_id_mask: success.resource_id_mask,
            maximum_request_len: success.maximum_request_len,
            roots_len: success.roots_len,
            vendor: success.vendor(bytes)?,
        })
    }
}

fn reason(bytes: &[u8], len: usize) -> String {
    let reason = &bytes[..len.min(bytes.len())];

    String::from_utf8_lossy(reason)
        .trim_end_matches('\0')
        .to_string()
}

/// the display name to use, an explicit name wins over $DISPLAY
pub fn display_name(name: Option<&str>) -> Result<Option<String>, Error> {
    let name = match name {
        Some(name) => Some(name.to_string()),
        None => match env::var("DISPLAY") {
            Ok(name) => Some(name),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => return Err(Error::InvalidDisplay),
        },
    };

    Ok(name.filter(|name| !name.is_empty()))
}

/// opens x11 connections over unix sockets or tcp
#[derive(Debug, Clone)]
pub struct X11Connector {
    socket_dir: PathBuf,
}

impl Default for X11Connector {
    fn default() -> X11Connector {
        X11Connector::new(X_UNIX_SOCKET_DIR)
    }
}

impl X11Connector {
    pub fn new<P: Into<PathBuf>>(socket_dir: P) -> X11Connector {
        X11Connector {
            socket_dir: socket_dir.into(),
        }
    }

    pub fn socket_path(&self, info: &DisplayInfo) -> PathBuf {
        match info.is_socket_path() {
            true => PathBuf::from(&info.host),
            false => self.socket_dir.join(format!("X{}", info.display)),
        }
    }

    pub fn open(&self, name: Option<&str>) -> Result<Display<Box<dyn Transport>>, Error> {
        let info = match display_name(name)? {
            Some(name) => parse::parse(&name)?,
            None => DisplayInfo::default(),
        };

        log::debug!("opening display {:?}", info);

        let (stream, family, address) = self.transport(&info)?;

        let cookie = auth::cookie(family, &address, info.display);

        Display::connect(stream, info, cookie)
    }

    fn transport(&self, info: &DisplayInfo) -> Result<(Box<dyn Transport>, u16, Vec<u8>), Error> {
        match info.protocol {
            Protocol::UnixSocket => {
                let stream: Box<dyn Transport> = Box::new(UnixStream::connect(self.socket_path(info))?);

                Ok((stream, Family::LOCAL, local_address()))
            },
            Protocol::TcpSocket => {
                let port = X_TCP_PORT.checked_add(info.display).ok_or(Error::InvalidDisplay)?;
                let host = if info.host.is_empty() { "localhost" } else { info.host.as_str() };

                let stream = TcpStream::connect((host, port))?;

                stream.set_nodelay(true)?;

                let (family, address) = match stream.peer_addr()?.ip() {
                    ip if ip.is_loopback() => (Family::LOCAL, local_address()),
                    IpAddr::V4(ip) => (Family::INTERNET, ip.octets().to_vec()),
                    IpAddr::V6(ip) => (Family::INTERNET6, ip.octets().to_vec()),
                };

                let stream: Box<dyn Transport> = Box::new(stream);

                Ok((stream, family, address))
            },
        }
    }
}

fn local_address() -> Vec<u8> {
    auth::hostname()
        .map(|name| name.into_bytes())
        .unwrap_or_default()
}

/// opens the display named by `name`, $DISPLAY, or display 0
pub fn open(name: Option<&str>) -> Result<Display<Box<dyn Transport>>, Error> {
    X11Connector::default().open(name)
}
