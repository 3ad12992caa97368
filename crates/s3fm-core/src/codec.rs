//! Lenient base64 decoding for request bodies and credentials.
//!
//! Clients of the file manager send base64 produced by many encoders, so
//! decoding accepts what a forgiving decoder would: bytes outside the
//! standard alphabet are dropped before decoding, and non-zero trailing
//! bits in the last symbol are ignored. Padding must still be canonical.

use base64::alphabet;
use base64::engine::{Engine, GeneralPurpose, GeneralPurposeConfig};

/// Standard-alphabet engine that tolerates non-zero trailing bits.
pub const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

fn is_base64_symbol(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=')
}

/// Decode `input`, skipping every byte outside `[A-Za-z0-9+/=]`.
///
/// # Errors
///
/// Fails when the remaining symbols are not valid padded base64.
///
/// # Examples
///
/// ```
/// use s3fm_core::codec::decode_lenient;
///
/// assert_eq!(decode_lenient("aG\nk=").unwrap(), b"hi");
/// assert_eq!(decode_lenient("aGj=").unwrap(), b"hi");
/// ```
pub fn decode_lenient(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let symbols: Vec<u8> = input.bytes().filter(|b| is_base64_symbol(*b)).collect();
    LENIENT_BASE64.decode(symbols)
}
