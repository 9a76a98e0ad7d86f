//! This crate opens a connection to an x11 display server in pure Rust and reports the handle.
//!
//! [protocol]: https://www.x.org/docs/XProtocol/proto.pdf
//!
//! The connection is made exactly once: the display name is resolved (explicit name, then
//! `$DISPLAY`, then display 0), the socket is opened, and the connection setup of the x11
//! [protocol] is performed, including `MIT-MAGIC-COOKIE-1` authorization read from
//! `$XAUTHORITY`. Nothing past the setup is spoken.
//!
//! # Example: open the default display
//!
//! ```no_run
//! use xconnect::display;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let display = display::open(None)?;
//!
//!     println!("vendor: {}, screens: {}", display.setup().vendor, display.setup().roots_len);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Example: report through a connector
//!
//! [`run`] drives any [`connector::Connector`], which is how the `xconnect` binary works and
//! how it is tested without a server:
//!
//! ```no_run
//! use xconnect::display::X11Connector;
//!
//! let code = xconnect::run(&mut X11Connector::default(), None, &mut std::io::stdout(), &mut std::io::stderr());
//!
//! std::process::exit(code.unwrap_or(xconnect::FAILURE));
//! ```

/// display contains the x11 connection setup
pub mod display;

/// connector is the seam between the runner and whatever opens sessions
pub mod connector;

use connector::Connector;

use std::io::{self, Write};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;

/// makes one connection attempt and reports it, returning the exit status
///
/// on success a single `DEBUG:` line with the handle's address goes to `stdout`, on failure a
/// single `Oops:` line naming the endpoint goes to `stderr` and nothing is written to `stdout`.
pub fn run<C, O, E>(connector: &mut C, endpoint: Option<&str>, stdout: &mut O, stderr: &mut E) -> io::Result<i32>
where
    C: Connector,
    O: Write,
    E: Write,
{
    match connector.connect(endpoint) {
        Ok(session) => {
            let session = Box::new(session);

            writeln!(stdout, "DEBUG: {:p}", session)?;

            Ok(SUCCESS)
        },
        Err(err) => {
            log::debug!("{:?}", err);

            writeln!(stderr, "Oops: {}", err)?;

            Ok(FAILURE)
        },
    }
}
