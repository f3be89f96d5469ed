//! Open-Meteo forecast client
//!
//! One-shot HTTP/1.0 GET against the fixed endpoint, reading the socket to
//! EOF (the 1.0 request keeps the response unchunked) and pulling
//! `daily.weather_code` out of the JSON body. Parsing runs on the small
//! firmware heap; everything handed back to the core is `heapless`.

use core::fmt::Write as _;

use defmt::{info, warn};
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;
use embassy_time::Duration;
use embedded_io_async::Write as _;
use heapless::{String, Vec};
use serde::Deserialize;

use meteoron_core::config::Location;
use meteoron_core::forecast::MAX_FORECAST_CODES;
use meteoron_core::traits::{ForecastSource, NetworkError};

use super::resolve;

/// Fixed forecast endpoint
pub const FORECAST_HOST: &str = "api.open-meteo.com";
const FORECAST_PATH: &str = "/v1/dwd-icon";
const HTTP_PORT: u16 = 80;

/// Whole-request socket timeout
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Response ceiling; the one-day payload is a few hundred bytes
const MAX_RESPONSE_LEN: usize = 2048;

#[derive(Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

#[derive(Deserialize)]
struct DailyBlock {
    weather_code: alloc::vec::Vec<u16>,
}

/// Open-Meteo client over the shared network stack
pub struct OpenMeteo {
    stack: Stack<'static>,
}

impl OpenMeteo {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl ForecastSource for OpenMeteo {
    async fn fetch(
        &mut self,
        location: &Location,
        forecast_days: u8,
    ) -> Result<Vec<u16, MAX_FORECAST_CODES>, NetworkError> {
        let address = resolve(self.stack, FORECAST_HOST).await?;

        let mut rx_buffer = [0u8; MAX_RESPONSE_LEN];
        let mut tx_buffer = [0u8; 512];
        let mut socket = TcpSocket::new(self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(SOCKET_TIMEOUT));

        socket
            .connect((address, HTTP_PORT))
            .await
            .map_err(|_| NetworkError::Connect)?;

        let mut request: String<384> = String::new();
        write!(
            request,
            "GET {}?timezone={}&latitude={}&longitude={}&daily=weather_code&forecast_days={} \
             HTTP/1.0\r\nHost: {}\r\nAccept: application/json\r\nConnection: close\r\n\r\n",
            FORECAST_PATH,
            location.timezone,
            location.latitude,
            location.longitude,
            forecast_days,
            FORECAST_HOST,
        )
        .map_err(|_| NetworkError::Protocol)?;

        socket
            .write_all(request.as_bytes())
            .await
            .map_err(|_| NetworkError::Connect)?;

        let mut response: Vec<u8, MAX_RESPONSE_LEN> = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            match socket.read(&mut chunk).await {
                Ok(0) => break,
                Ok(read) => {
                    if response.extend_from_slice(&chunk[..read]).is_err() {
                        warn!("forecast response exceeded {} bytes", MAX_RESPONSE_LEN);
                        return Err(NetworkError::Protocol);
                    }
                }
                Err(_) => return Err(NetworkError::Connect),
            }
        }

        let codes = parse_response(&response)?;
        info!("forecast service returned {} code(s)", codes.len());
        Ok(codes)
    }
}

/// Split the HTTP response and extract `daily.weather_code`
fn parse_response(raw: &[u8]) -> Result<Vec<u16, MAX_FORECAST_CODES>, NetworkError> {
    let header_end = find_subsequence(raw, b"\r\n\r\n").ok_or(NetworkError::Protocol)?;
    let head = &raw[..header_end];
    let body = &raw[header_end + 4..];

    // Status line: "HTTP/1.x 200 ..."
    let status_ok = head
        .split(|&b| b == b'\r')
        .next()
        .map(|line| line.windows(4).any(|w| w == b" 200"))
        .unwrap_or(false);
    if !status_ok {
        warn!("forecast service answered non-200");
        return Err(NetworkError::Protocol);
    }

    let parsed: ForecastResponse =
        serde_json::from_slice(body).map_err(|_| NetworkError::Protocol)?;
    if parsed.daily.weather_code.is_empty() {
        return Err(NetworkError::Protocol);
    }

    let mut codes = Vec::new();
    for code in parsed.daily.weather_code.iter().take(MAX_FORECAST_CODES) {
        let _ = codes.push(*code);
    }
    Ok(codes)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
