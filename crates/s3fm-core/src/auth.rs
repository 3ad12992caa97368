//! HTTP Basic authentication against the user directory.
//!
//! Every failure (no header, another scheme, undecodable token, missing
//! `:`, unknown user, wrong password) is the same `401` to the caller. The
//! reason is only logged at debug level, and the password never is.

use std::fmt;

use s3fm_model::{FileError, RequestEnvelope};
use tracing::debug;

use crate::codec::decode_lenient;
use crate::users::{UserDirectory, UserTable};

/// Header carrying the credentials. Looked up with this exact casing.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

const BASIC_PREFIX: &str = "Basic ";

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The username from the credentials.
    pub username: String,
    /// The user's root folder from the directory.
    pub root_folder: String,
}

/// Username and password decoded from a Basic header.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// Text before the first `:`.
    pub username: String,
    /// Text after the first `:` (may itself contain `:`).
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Why a request was not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No `Authorization` header, or an empty one.
    #[error("missing authorization header")]
    MissingHeader,
    /// The header does not start with `Basic `.
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    /// The token is not valid base64.
    #[error("credentials are not valid base64")]
    InvalidEncoding,
    /// The decoded token is not UTF-8.
    #[error("credentials are not valid UTF-8")]
    InvalidUtf8,
    /// The decoded token has no `:`.
    #[error("credentials have no ':' separator")]
    MissingSeparator,
    /// The username is not in the directory.
    #[error("unknown user")]
    UnknownUser,
    /// The password does not match.
    #[error("wrong password")]
    WrongPassword,
}

/// Decode a `Basic <base64(user:password)>` header value.
///
/// # Errors
///
/// Returns the [`AuthFailure`] describing the first problem found.
///
/// # Examples
///
/// ```
/// use s3fm_core::auth::parse_basic_auth;
///
/// let creds = parse_basic_auth(Some("Basic YWxpY2U6cHcx")).unwrap();
/// assert_eq!(creds.username, "alice");
/// assert_eq!(creds.password, "pw1");
/// ```
pub fn parse_basic_auth(header: Option<&str>) -> Result<BasicCredentials, AuthFailure> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthFailure::MissingHeader)?;
    let token = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(AuthFailure::UnsupportedScheme)?;
    let decoded = decode_lenient(token).map_err(|_| AuthFailure::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthFailure::InvalidUtf8)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthFailure::MissingSeparator)?;
    Ok(BasicCredentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

/// Check credentials against a user table.
///
/// # Errors
///
/// Returns [`AuthFailure::UnknownUser`] or [`AuthFailure::WrongPassword`].
pub fn verify(users: &UserTable, credentials: &BasicCredentials) -> Result<Identity, AuthFailure> {
    let record = users
        .get(&credentials.username)
        .ok_or(AuthFailure::UnknownUser)?;
    if record.password != credentials.password {
        return Err(AuthFailure::WrongPassword);
    }
    Ok(Identity {
        username: credentials.username.clone(),
        root_folder: record.root_folder.clone(),
    })
}

/// Authenticate a request.
///
/// The directory is only consulted once the header parses, so malformed
/// requests never trigger a secret fetch.
///
/// Returns `Ok(None)` for any credential problem.
///
/// # Errors
///
/// Fails only when the user directory cannot be loaded.
pub async fn authenticate(
    request: &RequestEnvelope,
    directory: &UserDirectory,
) -> Result<Option<Identity>, FileError> {
    let credentials = match parse_basic_auth(request.header(AUTHORIZATION_HEADER)) {
        Ok(credentials) => credentials,
        Err(reason) => {
            debug!(%reason, "rejected authorization header");
            return Ok(None);
        }
    };

    let users = directory.users().await?;
    match verify(&users, &credentials) {
        Ok(identity) => Ok(Some(identity)),
        Err(reason) => {
            debug!(username = %credentials.username, %reason, "rejected credentials");
            Ok(None)
        }
    }
}
