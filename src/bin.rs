use xconnect::display::X11Connector;

use std::process;
use std::io;


fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let code = xconnect::run(&mut X11Connector::default(), None, &mut io::stdout(), &mut io::stderr());

    process::exit(code.unwrap_or(xconnect::FAILURE));
}
