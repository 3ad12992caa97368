//! JSON text in the layout produced by Python's `json.dumps` defaults.
//!
//! Clients of the file manager were written against bodies such as
//! `{"error": "Unauthorized"}` and `["docs/", "photos/"]`: a space after
//! every `:` and `,`, and non-ASCII characters escaped as lowercase
//! `\uXXXX` (UTF-16 surrogate pairs above the BMP). [`CompatFormatter`]
//! reproduces that layout on top of `serde_json`.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

/// A `serde_json` formatter matching `json.dumps(obj)` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatFormatter;

impl Formatter for CompatFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut utf8 = [0u8; 4];
        let mut utf16 = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
            } else {
                for unit in ch.encode_utf16(&mut utf16) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` with [`CompatFormatter`].
pub fn to_compat_string<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut out = Vec::with_capacity(64);
    let mut serializer = Serializer::with_formatter(&mut out, CompatFormatter);
    value.serialize(&mut serializer)?;
    // The formatter escapes everything outside ASCII.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Build the `{"error": "<message>"}` body used by every failure response.
#[must_use]
pub fn error_body(message: &str) -> String {
    #[derive(Serialize)]
    struct ErrorBody<'a> {
        error: &'a str,
    }

    to_compat_string(&ErrorBody { error: message })
        .expect("JSON serialization of error cannot fail")
}
