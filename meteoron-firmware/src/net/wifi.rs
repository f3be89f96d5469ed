//! Wi-Fi link establishment
//!
//! Implements the station's connectivity boundary over the CYW43439: a
//! bounded join retry with a fixed backoff, flashing the on-chip LED on
//! each attempt, then a DHCP wait. Credential problems short-circuit
//! without touching the radio, and the station keeps rotating offline.

use cyw43::{Control, JoinOptions};
use defmt::{info, warn};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};

use meteoron_core::credentials::Credentials;
use meteoron_core::traits::{ConnectionOutcome, Connectivity};

/// Join retry budget per establishment attempt
pub const JOIN_ATTEMPTS: u32 = 31;

/// Fixed backoff between join attempts (one LED flash)
const JOIN_BACKOFF_MS: u64 = 300;

/// Per-attempt join timeout
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// DHCP configuration timeout after a successful join
const DHCP_TIMEOUT: Duration = Duration::from_secs(15);

/// On-chip LED (routed through the CYW43)
const LED_GPIO: u32 = 0;

/// The Pico W wireless link
pub struct WifiLink {
    control: Control<'static>,
    stack: Stack<'static>,
    credentials: Option<Credentials>,
}

impl WifiLink {
    pub fn new(
        control: Control<'static>,
        stack: Stack<'static>,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            control,
            stack,
            credentials,
        }
    }

    async fn flash_led(&mut self) {
        self.control.gpio_set(LED_GPIO, true).await;
        Timer::after(Duration::from_millis(JOIN_BACKOFF_MS)).await;
        self.control.gpio_set(LED_GPIO, false).await;
        Timer::after(Duration::from_millis(JOIN_BACKOFF_MS)).await;
    }

    async fn wait_for_address(&mut self) -> Option<[u8; 4]> {
        if with_timeout(DHCP_TIMEOUT, self.stack.wait_config_up())
            .await
            .is_err()
        {
            warn!("joined but DHCP never configured");
            return None;
        }
        self.stack
            .config_v4()
            .map(|config| config.address.address().octets())
    }
}

impl Connectivity for WifiLink {
    async fn establish(&mut self) -> ConnectionOutcome {
        let Some(credentials) = self.credentials.clone() else {
            return ConnectionOutcome::NoCredentials;
        };

        // Still configured from a previous interval
        if let Some(config) = self.stack.config_v4() {
            self.control.gpio_set(LED_GPIO, true).await;
            return ConnectionOutcome::Connected(config.address.address().octets());
        }

        for attempt in 1..=JOIN_ATTEMPTS {
            let join = self.control.join(
                credentials.ssid.as_str(),
                JoinOptions::new(credentials.password.as_bytes()),
            );

            match with_timeout(JOIN_TIMEOUT, join).await {
                Ok(Ok(())) => {
                    if let Some(ip) = self.wait_for_address().await {
                        info!(
                            "wifi up after {} attempt(s): {}.{}.{}.{}",
                            attempt, ip[0], ip[1], ip[2], ip[3]
                        );
                        // Solid LED while the link is up
                        self.control.gpio_set(LED_GPIO, true).await;
                        return ConnectionOutcome::Connected(ip);
                    }
                }
                Ok(Err(err)) => {
                    warn!("join attempt {} failed, status {}", attempt, err.status);
                }
                Err(_) => {
                    warn!("join attempt {} timed out", attempt);
                }
            }

            self.flash_led().await;
        }

        warn!("wifi join budget exhausted, continuing offline");
        ConnectionOutcome::TimedOut
    }
}
