//! Network credential parsing
//!
//! Credentials are a two-line `key=value` text embedded into the firmware
//! image (the same embed-then-parse approach used for the rest of the
//! configuration). A missing or malformed file is not fatal: the station
//! runs without connectivity and the sync protocol short-circuits to
//! `NoCredentials` each interval.

use heapless::String;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;
/// Maximum WPA2 passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Errors raised while parsing the credentials text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialError {
    /// Fewer than two lines present
    Missing,
    /// A line has no `=` separator or an empty value
    Malformed,
    /// A value exceeds its field capacity
    TooLong,
}

/// Parsed Wi-Fi credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Parse the two-line credentials text: `ssid=...` then `password=...`.
///
/// Only line order matters; the key names are not interpreted.
pub fn parse(text: &str) -> Result<Credentials, CredentialError> {
    let mut lines = text.lines();
    let ssid_line = lines.next().ok_or(CredentialError::Missing)?;
    let password_line = lines.next().ok_or(CredentialError::Missing)?;

    let ssid = value_of(ssid_line)?;
    let password = value_of(password_line)?;

    Ok(Credentials {
        ssid: String::try_from(ssid).map_err(|_| CredentialError::TooLong)?,
        password: String::try_from(password).map_err(|_| CredentialError::TooLong)?,
    })
}

fn value_of(line: &str) -> Result<&str, CredentialError> {
    let (_, value) = line.split_once('=').ok_or(CredentialError::Malformed)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(CredentialError::Malformed);
    }
    Ok(value)
}
