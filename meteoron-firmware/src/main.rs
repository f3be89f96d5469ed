//! Meteoron - Environmental Display Station Firmware
//!
//! Main firmware binary for the Raspberry Pi Pico W: reads the outdoor
//! DS18x20 and indoor BME280, fetches the Open-Meteo daily forecast once
//! an hour, and rotates readings, forecast icons and an NTP-synced clock
//! across a 128x64 SSD1306 OLED.
//!
//! All orchestration lives in `meteoron-core`; this binary only binds the
//! boundary traits to the board and starts the station loop.

#![no_std]
#![no_main]

extern crate alloc;

use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::i2c::{Config as I2cConfig, I2c};
use embassy_rp::peripherals::{DMA_CH0, PIO0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use meteoron_core::config::StationConfig;
use meteoron_core::credentials;
use meteoron_core::station::Station;

use crate::display::OledRenderer;
use crate::net::{OpenMeteo, SntpClient, WifiLink};
use crate::pacer::EmbassyPacer;
use crate::sensors::StationSensors;

mod assets;
mod display;
mod net;
mod pacer;
mod sensors;

// Heap allocator for forecast JSON parsing
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 16KB
const HEAP_SIZE: usize = 16 * 1024;

/// Embedded network credentials (two `key=value` lines)
/// Leave the values empty to run the station offline
const CREDENTIALS_RAW: &str = include_str!("../credentials.txt");

// CYW43439 firmware blobs; see cyw43-firmware/README.md
const CYW43_FW: &[u8] = include_bytes!("../cyw43-firmware/43439A0.bin");
const CYW43_CLM: &[u8] = include_bytes!("../cyw43-firmware/43439A0_clm.bin");

// Seed for the network stack's local ports.
// TODO: feed this from the ROSC random bit once embassy-rp's RoscRng and
// our rand_core version line up again.
const NET_SEED: u64 = 0x7ac0_5d41_9e1c_2b8f;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    unsafe { HEAP.init(core::ptr::addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("meteoron firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("peripherals initialized");

    // OLED on I2C0 (GP4 SDA / GP5 SCL)
    let i2c0 = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, I2cConfig::default());
    let mut renderer = OledRenderer::new(i2c0);
    if renderer.init().is_err() {
        // Not fatal: every slot retries the bus, and the station loop
        // backs off while nothing renders
        error!("display init failed");
    }

    // BME280 on I2C1 (GP18 SDA / GP19 SCL), DS18x20 data on GP22
    let i2c1 = I2c::new_blocking(p.I2C1, p.PIN_19, p.PIN_18, I2cConfig::default());
    let station_sensors = StationSensors::new(Flex::new(p.PIN_22), i2c1);

    // CYW43439 radio bring-up
    let pwr = Output::new(p.PIN_23, Level::Low);
    let cs = Output::new(p.PIN_25, Level::High);
    let mut pio = Pio::new(p.PIO0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        p.PIN_24,
        p.PIN_29,
        p.DMA_CH0,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, CYW43_FW).await;
    unwrap!(spawner.spawn(cyw43_task(runner)));

    control.init(CYW43_CLM).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    static RESOURCES: StaticCell<StackResources<8>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        NET_SEED,
    );
    unwrap!(spawner.spawn(net_task(runner)));

    // Missing or malformed credentials are not fatal; the station runs
    // offline and the sync protocol short-circuits once an hour
    let creds = match credentials::parse(CREDENTIALS_RAW) {
        Ok(creds) => {
            info!("credentials loaded for ssid {}", creds.ssid.as_str());
            Some(creds)
        }
        Err(err) => {
            warn!("credentials unavailable ({}), running offline", err);
            None
        }
    };

    let mut station = Station::new(
        station_sensors,
        WifiLink::new(control, stack, creds),
        OpenMeteo::new(stack),
        SntpClient::new(stack),
        renderer,
        EmbassyPacer,
        StationConfig::default(),
    );

    info!("station assembled, entering rotation");
    station.run().await;
}
