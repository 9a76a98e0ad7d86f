use super::error::Error;

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::env;


pub const MIT_MAGIC_COOKIE: &[u8] = b"MIT-MAGIC-COOKIE-1";

#[non_exhaustive]
pub struct Family;

impl Family {
    pub const INTERNET: u16 = 0;
    pub const INTERNET6: u16 = 6;
    pub const LOCAL: u16 = 256;
    pub const WILD: u16 = 65535;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub family: u16,
    pub address: Vec<u8>,
    pub number: Vec<u8>,
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

impl Entry {
    fn matches(&self, family: u16, address: &[u8], display: u16) -> bool {
        let host = self.family == Family::WILD || (self.family == family && self.address == address);
        let number = self.number.is_empty() || self.number == display.to_string().as_bytes();

        host && number && self.name == MIT_MAGIC_COOKIE
    }
}

/// the credentials sent along with the setup request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cookie {
    pub name: Vec<u8>,
    pub data: Vec<u8>,
}

pub struct XAuth<R> {
    file: R,
}

impl XAuth<BufReader<File>> {
    pub fn open() -> Result<XAuth<BufReader<File>>, Error> {
        let path = path().ok_or(Error::Io(io::ErrorKind::NotFound.into()))?;

        log::trace!("reading authority file {}", path.display());

        Ok(XAuth::new(BufReader::new(File::open(path)?)))
    }
}

impl<R> XAuth<R> where R: Read {
    pub fn new(file: R) -> XAuth<R> {
        XAuth {
            file,
        }
    }

    fn u16(&mut self) -> Result<u16, Error> {
        let mut bytes = [0u8; 2];

        self.file.read_exact(&mut bytes)?;

        Ok(u16::from_be_bytes(bytes))
    }

    fn value(&mut self) -> Result<Vec<u8>, Error> {
        let mut buffer = vec![0u8; self.u16()? as usize];

        self.file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    pub fn entry(&mut self) -> Result<Entry, Error> {
        Ok(Entry {
            family: self.u16()?,
            address: self.value()?,
            number: self.value()?,
            name: self.value()?,
            data: self.value()?,
        })
    }

    /// reads entries until the file ends, a truncated trailing entry is dropped
    pub fn entries(&mut self) -> Vec<Entry> {
        let mut entries = Vec::new();

        while let Ok(entry) = self.entry() {
            entries.push(entry);
        }

        entries
    }
}

fn path() -> Option<PathBuf> {
    env::var_os("XAUTHORITY")
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".Xauthority")))
}

pub fn hostname() -> Option<String> {
    ["/proc/sys/kernel/hostname", "/etc/hostname"]
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

pub fn select(entries: &[Entry], family: u16, address: &[u8], display: u16) -> Option<Cookie> {
    entries.iter()
        .find(|entry| entry.matches(family, address, display))
        .map(|entry| Cookie {
            name: entry.name.clone(),
            data: entry.data.clone(),
        })
}

/// looks up the cookie for a display, a missing authority file means no authorization
pub fn cookie(family: u16, address: &[u8], display: u16) -> Cookie {
    match XAuth::open() {
        Ok(mut auth) => {
            let entries = auth.entries();

            log::debug!("authority file holds {} entries", entries.len());

            select(&entries, family, address, display).unwrap_or_default()
        },
        Err(err) => {
            log::debug!("no authority file, connecting without authorization: {}", err);

            Cookie::default()
        },
    }
}
