use crate::display::error::*;

use std::iter::Peekable;
use std::str::Chars;


/// represents which transport the x11 connection should use

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Protocol {
    TcpSocket,

    #[default]
    UnixSocket,
}

impl Protocol {
    pub fn from(value: String) -> Result<Protocol, Error> {
        match value.to_lowercase().as_str() {
            "unix" | "local" => Ok(Protocol::UnixSocket),
            "tcp" | "inet" => Ok(Protocol::TcpSocket),
            _ => Err(Error::InvalidProtocol { protocol: value }),
        }
    }
}

/// representing the $DISPLAY environment variable
/// syntax: <host>/<protocol>:<display>.<screen>

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayInfo {
    pub host: String,
    pub protocol: Protocol,
    pub display: u16,
    pub screen: u16,
}

impl DisplayInfo {
    pub fn new(host: &str, protocol: Protocol, display: u16, screen: u16) -> DisplayInfo {
        DisplayInfo {
            host: host.to_string(),
            protocol,
            display,
            screen,
        }
    }

    /// a host starting with `/` names the unix socket itself
    pub fn is_socket_path(&self) -> bool {
        self.host.starts_with('/')
    }
}

#[derive(PartialEq)]
pub enum State {
    Host,
    Protocol,
    Display,
    Screen,
    Finished,
}

pub struct Iter<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Iter<'a> {
    pub fn new(chars: Peekable<Chars<'a>>) -> Iter<'a> {
        Iter {
            chars,
        }
    }

    pub fn take_while<F: Fn(&char) -> bool>(&mut self, f: F) -> Result<String, Error> {
        let mut buf = String::new();

        while self.chars.peek().map(|c| f(c)).unwrap_or(false) {
            buf.push(self.chars.next().ok_or(Error::InvalidDisplay)?);
        }

        Ok(buf)
    }

    pub fn peek(&mut self) -> Option<char> { self.chars.peek().copied() }

    pub fn next_option(&mut self) -> Option<char> { self.chars.next() }

    pub fn next(&mut self) -> Result<char, Error> {
        self.chars.next().ok_or(Error::InvalidDisplay)
    }

    pub fn expect(&mut self, expect: char) -> Result<(), Error> {
        (self.next()? == expect).then_some(()).ok_or(Error::InvalidDisplay)
    }
}

fn number(digits: String) -> Result<u16, Error> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidDisplay);
    }

    digits.parse::<u16>().map_err(|_| Error::InvalidDisplay)
}

/// this parses the $DISPLAY environment variable using a state machine
pub struct Parser<'a> {
    iter: Iter<'a>,
    display: DisplayInfo,
    explicit_protocol: bool,
    state: State,
}

impl<'a> Parser<'a> {
    pub fn new(display: &'a str) -> Parser<'a> {
        Parser {
            iter: Iter::new(display.chars().peekable()),
            display: DisplayInfo::default(),
            explicit_protocol: false,
            state: State::Host,
        }
    }

    pub fn parse(&mut self) -> Result<DisplayInfo, Error> {
        while self.state != State::Finished {
            match self.state {
                State::Host if self.iter.peek() == Some('/') => {
                    self.display.host = self.iter.take_while(|c| *c != ':')?;

                    self.iter.expect(':')?;

                    self.state = State::Display;
                },
                State::Host => {
                    self.display.host = self.iter.take_while(|c| *c != ':' && *c != '/')?;

                    match self.iter.next()? {
                        ':' => self.state = State::Display,
                        _ => self.state = State::Protocol,
                    }
                },
                State::Protocol => {
                    self.display.protocol = Protocol::from(self.iter.take_while(|c| *c != ':')?)?;
                    self.explicit_protocol = true;

                    self.iter.expect(':')?;

                    self.state = State::Display;
                },
                State::Display => {
                    self.display.display = number(self.iter.take_while(|c| *c != '.')?)?;

                    match self.iter.next_option() {
                        Some(_) => self.state = State::Screen,
                        None => self.state = State::Finished,
                    }
                },
                State::Screen => {
                    self.display.screen = number(self.iter.take_while(|_| true)?)?;

                    self.state = State::Finished;
                },
                State::Finished => {},
            }
        }

        if self.display.host == "unix" {
            self.display.host.clear();
        } else if self.display.is_socket_path() {
            self.display.protocol = Protocol::UnixSocket;
        } else if !self.explicit_protocol && !self.display.host.is_empty() {
            self.display.protocol = Protocol::TcpSocket;
        }

        Ok(self.display.clone())
    }
}

pub fn parse(display: &str) -> Result<DisplayInfo, Error> {
    Parser::new(display).parse()
}
