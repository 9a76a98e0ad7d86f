use crate::display::error::Error;


// https://www.x.org/releases/X11R7.7/doc/xproto/x11protocol.html#Encoding::Connection_Setup

pub const LITTLE_ENDIAN: u8 = 0x6c;
pub const BIG_ENDIAN: u8 = 0x42;

pub fn endian() -> u8 {
    cfg!(target_endian = "little")
        .then_some(LITTLE_ENDIAN)
        .unwrap_or(BIG_ENDIAN)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupRequest {
    pub endian: u8,
    pub major_version: u16,
    pub minor_version: u16,
    pub auth_name: Vec<u8>,
    pub auth_data: Vec<u8>,
}

impl SetupRequest {
    pub fn new(major_version: u16, minor_version: u16, auth_name: Vec<u8>, auth_data: Vec<u8>) -> SetupRequest {
        SetupRequest {
            endian: endian(),
            major_version,
            minor_version,
            auth_name,
            auth_data,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(12 + self.auth_name.len() + self.auth_data.len() + 6);

        bytes.extend([self.endian, 0]);
        bytes.extend(self.major_version.to_ne_bytes());
        bytes.extend(self.minor_version.to_ne_bytes());
        bytes.extend((self.auth_name.len() as u16).to_ne_bytes());
        bytes.extend((self.auth_data.len() as u16).to_ne_bytes());
        bytes.extend([0u8; 2]);

        for field in [&self.auth_name, &self.auth_data] {
            bytes.extend(field);
            bytes.extend(vec![0u8; pad(field.len())]);
        }

        bytes
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupResponse {
    pub status: u8,
    pub reason_len: u8,
    pub major_version: u16,
    pub minor_version: u16,
    pub length: u16,
}

impl SetupResponse {
    pub const SIZE: usize = 8;

    pub const FAILED: u8 = 0;
    pub const SUCCESS: u8 = 1;
    pub const AUTHENTICATE: u8 = 2;

    pub fn decode(bytes: &[u8]) -> Result<SetupResponse, Error> {
        let mut reader = Reader::new(bytes);

        Ok(SetupResponse {
            status: reader.u8()?,
            reason_len: reader.u8()?,
            major_version: reader.u16()?,
            minor_version: reader.u16()?,
            length: reader.u16()?,
        })
    }

    /// the number of bytes following the header
    pub fn additional_len(&self) -> usize {
        self.length as usize * 4
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuccessResponse {
    pub release_number: u32,
    pub resource_id_base: u32,
    pub resource_id_mask: u32,
    pub motion_buffer_size: u32,
    pub vendor_len: u16,
    pub maximum_request_len: u16,
    pub roots_len: u8,
    pub pixmap_formats_len: u8,
    pub image_byte_order: u8,
    pub bitmap_format_bit_order: u8,
    pub bitmap_format_scanline_unit: u8,
    pub bitmap_format_scanline_pad: u8,
    pub min_keycode: u8,
    pub max_keycode: u8,
}

impl SuccessResponse {
    pub const SIZE: usize = 32;

    pub fn decode(bytes: &[u8]) -> Result<SuccessResponse, Error> {
        let mut reader = Reader::new(bytes);

        let response = SuccessResponse {
            release_number: reader.u32()?,
            resource_id_base: reader.u32()?,
            resource_id_mask: reader.u32()?,
            motion_buffer_size: reader.u32()?,
            vendor_len: reader.u16()?,
            maximum_request_len: reader.u16()?,
            roots_len: reader.u8()?,
            pixmap_formats_len: reader.u8()?,
            image_byte_order: reader.u8()?,
            bitmap_format_bit_order: reader.u8()?,
            bitmap_format_scanline_unit: reader.u8()?,
            bitmap_format_scanline_pad: reader.u8()?,
            min_keycode: reader.u8()?,
            max_keycode: reader.u8()?,
        };

        reader.take(4)?;

        Ok(response)
    }

    /// the vendor string directly follows the fixed block
    pub fn vendor(&self, bytes: &[u8]) -> Result<String, Error> {
        let start = SuccessResponse::SIZE;
        let end = start + self.vendor_len as usize;

        let vendor = bytes.get(start..end).ok_or(Error::Truncated)?;

        Ok(String::from_utf8_lossy(vendor).into_owned())
    }
}

/// reads native endian integers from the front of a byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Reader<'a> {
        Reader {
            bytes,
        }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.bytes.len() < len {
            return Err(Error::Truncated);
        }

        let (head, tail) = self.bytes.split_at(len);

        self.bytes = tail;

        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16, Error> {
        let bytes = self.take(2)?;

        Ok(u16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    pub fn u32(&mut self) -> Result<u32, Error> {
        let bytes = self.take(4)?;

        Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

pub fn pad(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad(0), 0);
        assert_eq!(pad(1), 3);
        assert_eq!(pad(4), 0);
        assert_eq!(pad(18), 2);
    }

    #[test]
    fn test_setup_request_layout() {
        let request = SetupRequest::new(11, 0, b"MIT-MAGIC-COOKIE-1".to_vec(), vec![7u8; 16]);
        let bytes = request.encode();

        assert_eq!(bytes.len(), 12 + 20 + 16);
        assert_eq!(bytes[0], endian());
        assert_eq!(u16::from_ne_bytes([bytes[2], bytes[3]]), 11);
        assert_eq!(u16::from_ne_bytes([bytes[6], bytes[7]]), 18);
        assert_eq!(u16::from_ne_bytes([bytes[8], bytes[9]]), 16);
        assert_eq!(&bytes[12..30], b"MIT-MAGIC-COOKIE-1");
        assert_eq!(&bytes[30..32], &[0, 0]);
        assert_eq!(&bytes[32..], &[7u8; 16]);
    }

    #[test]
    fn test_setup_request_without_auth() {
        let bytes = SetupRequest::new(11, 0, Vec::new(), Vec::new()).encode();

        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn test_setup_response() {
        let mut bytes = vec![SetupResponse::FAILED, 5];
        bytes.extend(11u16.to_ne_bytes());
        bytes.extend(0u16.to_ne_bytes());
        bytes.extend(2u16.to_ne_bytes());

        let response = SetupResponse::decode(&bytes).unwrap();

        assert_eq!(response.status, SetupResponse::FAILED);
        assert_eq!(response.reason_len, 5);
        assert_eq!(response.additional_len(), 8);
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(SetupResponse::decode(&[1, 0, 11]), Err(Error::Truncated)));
        assert!(matches!(SuccessResponse::decode(&[0u8; 31]), Err(Error::Truncated)));
    }

    #[test]
    fn test_vendor() {
        let mut bytes = vec![0u8; SuccessResponse::SIZE];
        bytes[16..18].copy_from_slice(&4u16.to_ne_bytes());
        bytes.extend(b"Test");

        let response = SuccessResponse::decode(&bytes).unwrap();

        assert_eq!(response.vendor(&bytes).unwrap(), "Test");
    }

    #[test]
    fn test_vendor_not_utf8() {
        let mut bytes = vec![0u8; SuccessResponse::SIZE];
        bytes[16..18].copy_from_slice(&4u16.to_ne_bytes());
        bytes.extend([b'X', 0xff, 0xfe, b'Y']);

        let response = SuccessResponse::decode(&bytes).unwrap();

        assert_eq!(response.vendor(&bytes).unwrap(), "X\u{fffd}\u{fffd}Y");
    }

    #[test]
    fn test_vendor_truncated() {
        let mut bytes = vec![0u8; SuccessResponse::SIZE];
        bytes[16..18].copy_from_slice(&8u16.to_ne_bytes());
        bytes.extend(b"abc");

        let response = SuccessResponse::decode(&bytes).unwrap();

        assert!(matches!(response.vendor(&bytes), Err(Error::Truncated)));
    }
}
