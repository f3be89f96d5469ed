//! SNTP client
//!
//! Single-shot NTP query: a 48-byte mode-3/version-3 request over UDP 123,
//! transmit-timestamp seconds pulled from offset 40 of the reply and
//! shifted from the NTP epoch (1900) to Unix (1970). A 2 second timeout
//! keeps a dead time server from stalling the clock slot.

use defmt::warn;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration};

use meteoron_core::traits::{NetworkError, TimeSource};

use super::resolve;

/// Fixed time server
pub const NTP_SERVER: &str = "time.apple.com";
const NTP_PORT: u16 = 123;

/// Socket timeout for the reply
const NTP_TIMEOUT: Duration = Duration::from_secs(2);

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
const NTP_EPOCH_OFFSET: u32 = 2_208_988_800;

/// Byte offset of the transmit-timestamp seconds field
const TRANSMIT_SECONDS_OFFSET: usize = 40;

/// SNTP client over the shared network stack
pub struct SntpClient {
    stack: Stack<'static>,
}

impl SntpClient {
    pub fn new(stack: Stack<'static>) -> Self {
        Self { stack }
    }
}

impl TimeSource for SntpClient {
    async fn now_utc(&mut self) -> Result<i64, NetworkError> {
        let address = resolve(self.stack, NTP_SERVER).await?;

        let mut rx_meta = [PacketMetadata::EMPTY; 2];
        let mut rx_buffer = [0u8; 128];
        let mut tx_meta = [PacketMetadata::EMPTY; 2];
        let mut tx_buffer = [0u8; 128];
        let mut socket = UdpSocket::new(
            self.stack,
            &mut rx_meta,
            &mut rx_buffer,
            &mut tx_meta,
            &mut tx_buffer,
        );
        socket.bind(0).map_err(|_| NetworkError::Connect)?;

        // LI=0, VN=3, Mode=3 (client); the rest of the packet stays zero
        let mut packet = [0u8; 48];
        packet[0] = 0x1B;

        socket
            .send_to(&packet, (address, NTP_PORT))
            .await
            .map_err(|_| NetworkError::Connect)?;

        let (len, _) = with_timeout(NTP_TIMEOUT, socket.recv_from(&mut packet))
            .await
            .map_err(|_| NetworkError::Timeout)?
            .map_err(|_| NetworkError::Connect)?;

        if len < packet.len() {
            warn!("short NTP reply: {} bytes", len);
            return Err(NetworkError::Protocol);
        }

        let seconds = u32::from_be_bytes([
            packet[TRANSMIT_SECONDS_OFFSET],
            packet[TRANSMIT_SECONDS_OFFSET + 1],
            packet[TRANSMIT_SECONDS_OFFSET + 2],
            packet[TRANSMIT_SECONDS_OFFSET + 3],
        ]);
        if seconds == 0 {
            return Err(NetworkError::Protocol);
        }

        Ok(seconds.saturating_sub(NTP_EPOCH_OFFSET) as i64)
    }
}
