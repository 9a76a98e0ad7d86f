use xconnect::connector::Connector;
use xconnect::display::X11Connector;

use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::process::Command;
use std::thread::{self, JoinHandle};
use std::env;


#[cfg(test)]
mod tests {
    use super::*;

    use serial_test::serial;

    fn pad(len: usize) -> usize {
        (4 - (len % 4)) % 4
    }

    fn reply(status: u8, body: &[u8]) -> Vec<u8> {
        let mut bytes = vec![status, 0];
        bytes.extend(11u16.to_ne_bytes());
        bytes.extend(0u16.to_ne_bytes());
        bytes.extend(((body.len() / 4) as u16).to_ne_bytes());
        bytes.extend(body);
        bytes
    }

    fn accepted(vendor: &str) -> Vec<u8> {
        let mut body = vec![0u8; 32];
        body[16..18].copy_from_slice(&(vendor.len() as u16).to_ne_bytes());
        body[20] = 1;
        body.extend(vendor.as_bytes());
        body.extend(vec![0u8; pad(vendor.len())]);

        reply(1, &body)
    }

    /// accepts one client on `<dir>/X<display>`, reads its setup request and answers with `response`
    fn serve(dir: &Path, display: u16, response: Vec<u8>) -> JoinHandle<Vec<u8>> {
        let listener = UnixListener::bind(dir.join(format!("X{}", display))).unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let mut header = [0u8; 12];
            stream.read_exact(&mut header).unwrap();

            let name_len = u16::from_ne_bytes([header[6], header[7]]) as usize;
            let data_len = u16::from_ne_bytes([header[8], header[9]]) as usize;

            let mut auth = vec![0u8; name_len + pad(name_len) + data_len + pad(data_len)];
            stream.read_exact(&mut auth).unwrap();

            stream.write_all(&response).unwrap();

            header.to_vec()
        })
    }

    fn without_authority(dir: &Path) {
        env::set_var("XAUTHORITY", dir.join("no-such-authority"));
    }

    #[test]
    #[serial]
    fn test_connect_to_fake_server() {
        let dir = tempfile::tempdir().unwrap();
        without_authority(dir.path());

        let server = serve(dir.path(), 3, accepted("Fake Server"));

        let display = X11Connector::new(dir.path()).connect(Some(":3")).unwrap();

        let header = server.join().unwrap();

        assert_eq!(display.setup().vendor, "Fake Server");
        assert_eq!(display.info().display, 3);
        assert_eq!(u16::from_ne_bytes([header[2], header[3]]), 11);
    }

    #[test]
    #[serial]
    fn test_run_reports_handle() {
        let dir = tempfile::tempdir().unwrap();
        without_authority(dir.path());

        let server = serve(dir.path(), 4, accepted("Fake Server"));

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = xconnect::run(&mut X11Connector::new(dir.path()), Some(":4"), &mut stdout, &mut stderr).unwrap();

        server.join().unwrap();

        let stdout = String::from_utf8(stdout).unwrap();

        assert_eq!(code, 0);
        assert_eq!(stdout.lines().count(), 1);
        assert!(stdout.starts_with("DEBUG: "));
        assert!(stderr.is_empty());
    }

    #[test]
    #[serial]
    fn test_run_reports_refusal() {
        let dir = tempfile::tempdir().unwrap();
        without_authority(dir.path());

        let server = serve(dir.path(), 5, reply(0, b"go away\0"));

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = xconnect::run(&mut X11Connector::new(dir.path()), Some(":5"), &mut stdout, &mut stderr).unwrap();

        server.join().unwrap();

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(String::from_utf8(stderr).unwrap(), "Oops: Failed to open display :5\n");
    }

    #[test]
    #[serial]
    fn test_run_default_display() {
        let dir = tempfile::tempdir().unwrap();
        env::remove_var("DISPLAY");

        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());
        let code = xconnect::run(&mut X11Connector::new(dir.path()), None, &mut stdout, &mut stderr).unwrap();

        assert_eq!(code, 1);
        assert!(stdout.is_empty());
        assert_eq!(String::from_utf8(stderr).unwrap(), "Oops: Failed to open display 0\n");
    }

    #[test]
    fn test_binary_reports_handle() {
        let dir = tempfile::tempdir().unwrap();

        let server = serve(dir.path(), 6, accepted("Fake Server"));

        let output = Command::new(env!("CARGO_BIN_EXE_xconnect"))
            .env("DISPLAY", format!("{}:6", dir.path().join("X6").display()))
            .env("XAUTHORITY", dir.path().join("no-such-authority"))
            .env_remove("RUST_LOG")
            .output()
            .unwrap();

        server.join().unwrap();

        let stdout = String::from_utf8(output.stdout).unwrap();

        assert_eq!(output.status.code(), Some(0));
        assert_eq!(stdout.lines().count(), 1);
        assert!(stdout.starts_with("DEBUG: 0x"));
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_binary_fails_on_bad_display() {
        let output = Command::new(env!("CARGO_BIN_EXE_xconnect"))
            .env("DISPLAY", "nowhere/udp:0")
            .env_remove("RUST_LOG")
            .output()
            .unwrap();

        let stderr = String::from_utf8(output.stderr).unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        assert_eq!(stderr, "Oops: Failed to open display nowhere/udp:0\n");
    }
}
