//! Station orchestrator
//!
//! The outer display loop: walks the rotation state machine, reads each
//! sensor exactly once per slot, runs the sync refresh protocol when due,
//! and keeps the clock slot fail-soft. All collaborators come in through
//! the boundary traits, so the whole orchestration runs in host tests with
//! injected fakes and a virtual pacer.
//!
//! Failure policy: every boundary call returns a typed result and every
//! variant maps to a degraded frame or a log line - nothing here aborts
//! the loop. The one loop-level guard is a short back-off when an entire
//! cycle rendered zero frames, which only happens with a wedged display
//! bus.

use heapless::Vec;

use crate::clock::{CalendarDate, ClockTime, StationClock, FALLBACK_TIME};
use crate::config::StationConfig;
use crate::forecast::{icon_for_code, ForecastCache, ForecastDay, MAX_FORECAST_CODES};
use crate::frame::{Frame, Icon};
use crate::reading::{Quantity, Reading};
use crate::rotation::{self, CycleInputs, Slot};
use crate::sync::SyncScheduler;
use crate::traits::{
    ConnectionOutcome, Connectivity, EnvironmentSensors, ForecastSource, Pacer, Renderer,
    TimeSource,
};

/// The assembled station
pub struct Station<S, C, F, T, R, P> {
    sensors: S,
    connectivity: C,
    forecast: F,
    time: T,
    renderer: R,
    pacer: P,
    config: StationConfig,
    cache: ForecastCache,
    sync: SyncScheduler,
    clock: StationClock,
    /// Last successfully rendered clock time, for the fail-soft fallback
    last_clock: Option<ClockTime>,
}

impl<S, C, F, T, R, P> Station<S, C, F, T, R, P>
where
    S: EnvironmentSensors,
    C: Connectivity,
    F: ForecastSource,
    T: TimeSource,
    R: Renderer,
    P: Pacer,
{
    pub fn new(
        sensors: S,
        connectivity: C,
        forecast: F,
        time: T,
        renderer: R,
        pacer: P,
        config: StationConfig,
    ) -> Self {
        let sync = SyncScheduler::new(config.sync_interval_secs);
        Self {
            sensors,
            connectivity,
            forecast,
            time,
            renderer,
            pacer,
            config,
            cache: ForecastCache::new(),
            sync,
            clock: StationClock::new(),
            last_clock: None,
        }
    }

    /// Show the splash once, then rotate forever
    pub async fn run(&mut self) {
        let _ = self.present(&Frame::Splash);
        self.pacer.dwell(rotation::SPLASH_DWELL_SECS).await;

        loop {
            let shown = self.run_cycle().await;
            if shown == 0 {
                warn!("cycle rendered no frames, backing off");
                self.pacer.dwell(rotation::CYCLE_RETRY_BACKOFF_SECS).await;
            }
        }
    }

    /// One pass through the rotation; returns the number of frames shown
    pub async fn run_cycle(&mut self) -> u32 {
        let mut shown = 0;
        let mut slot = Some(Slot::first());

        while let Some(current) = slot {
            match current {
                Slot::OutdoorTemp => {
                    let sample = self.sensors.read_outdoor_temp().await;
                    shown +=
                        self.present(&Reading::from_celsius(Quantity::OutdoorTemp, sample).frame());
                }
                Slot::IndoorTemp => {
                    let sample = self.sensors.read_indoor_temp().await;
                    shown +=
                        self.present(&Reading::from_celsius(Quantity::IndoorTemp, sample).frame());
                }
                Slot::Humidity => {
                    let sample = self.sensors.read_humidity().await;
                    shown += self.present(&Reading::from_humidity(sample).frame());
                }
                Slot::Pressure => {
                    let sample = self.sensors.read_pressure_hpa().await;
                    let correction = self.config.pressure_correction_hpa;
                    shown += self.present(&Reading::from_pressure(sample, correction).frame());
                }
                Slot::SyncCheck => {
                    shown += self.run_sync().await;
                }
                Slot::Forecast { index } => {
                    if let Some(icon) = self.forecast_icons().get(index as usize).copied() {
                        shown += self.present(&Frame::Forecast { icon });
                    }
                }
                Slot::Clock => {
                    shown += self.clock_slot().await;
                }
            }

            let dwell = current.dwell_secs();
            if dwell > 0 {
                self.pacer.dwell(dwell).await;
            }

            slot = current.next(&self.cycle_inputs());
        }

        shown
    }

    /// The sync refresh protocol: connectivity, indicators, clock fix,
    /// forecast fetch. Always marks the attempt, success or failure.
    async fn run_sync(&mut self) -> u32 {
        let mut shown = 0;

        match self.connectivity.establish().await {
            ConnectionOutcome::Connected(ip) => {
                info!("link up at {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
                shown += self.present(&Frame::Status(Icon::WifiConnected));
                self.pacer.dwell(rotation::CONNECTED_DWELL_SECS).await;
                shown += self.present(&Frame::Status(Icon::ForecastBanner));

                // Connectivity is up: take the chance to fix the clock
                // before the forecast call.
                self.refresh_clock().await;

                match self
                    .forecast
                    .fetch(&self.config.location, self.config.forecast_days)
                    .await
                {
                    Ok(codes) => {
                        let valid_for = self.today();
                        info!("forecast updated, {} codes", codes.len());
                        self.cache.put(ForecastDay { valid_for, codes });
                    }
                    Err(err) => {
                        warn!("forecast fetch failed: {}", err);
                        shown += self.present(&Frame::Status(Icon::WifiDisconnected));
                        self.pacer.dwell(rotation::DISCONNECTED_DWELL_SECS).await;
                    }
                }
            }
            outcome => {
                warn!("connectivity unavailable: {}", outcome);
                shown += self.present(&Frame::Status(Icon::WifiDisconnected));
                self.pacer.dwell(rotation::DISCONNECTED_DWELL_SECS).await;
            }
        }

        let now = self.pacer.now_secs();
        self.sync.mark_attempt(now);
        shown
    }

    /// Clock slot: network time attempt, fail-soft to the last rendered
    /// time or the fixed fallback
    async fn clock_slot(&mut self) -> u32 {
        let time = match self.time.now_utc().await {
            Ok(unix) => {
                let now = self.pacer.now_secs();
                self.clock.record_fix(unix, now);
                let local = self
                    .clock
                    .local_time(now, self.config.utc_offset_secs)
                    .unwrap_or(FALLBACK_TIME);
                self.last_clock = Some(local);
                local
            }
            Err(err) => {
                warn!("network time failed: {}, showing last known time", err);
                self.last_clock.unwrap_or(FALLBACK_TIME)
            }
        };

        self.present(&Frame::Clock {
            hour: time.hour,
            minute: time.minute,
        })
    }

    /// Best-effort clock fix while the link is up
    async fn refresh_clock(&mut self) {
        match self.time.now_utc().await {
            Ok(unix) => {
                let now = self.pacer.now_secs();
                self.clock.record_fix(unix, now);
            }
            Err(err) => warn!("clock fix failed during sync: {}", err),
        }
    }

    fn present(&mut self, frame: &Frame) -> u32 {
        match self.renderer.show(frame) {
            Ok(()) => 1,
            Err(err) => {
                error!("render failed: {}", err);
                0
            }
        }
    }

    fn cycle_inputs(&mut self) -> CycleInputs {
        let now = self.pacer.now_secs();
        let today = self.clock.today(now, self.config.utc_offset_secs);
        CycleInputs {
            sync_due: self.sync.is_due(now),
            forecast_fresh: self.cache.is_fresh(today),
            forecast_frames: self.forecast_icons().len() as u8,
        }
    }

    /// Cached codes that map to an icon, in service order
    fn forecast_icons(&self) -> Vec<Icon, MAX_FORECAST_CODES> {
        match self.cache.get() {
            Some(day) => day.codes.iter().copied().filter_map(icon_for_code).collect(),
            None => Vec::new(),
        }
    }

    fn today(&mut self) -> CalendarDate {
        let now = self.pacer.now_secs();
        self.clock.today(now, self.config.utc_offset_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    use crate::config::Location;
    use crate::traits::{NetworkError, RenderError, SensorError};

    // 2025-02-23 12:00:00 UTC (14:00 local with the +2h offset)
    const NOON_UTC: i64 = 1_740_312_000;

    struct FakeSensors {
        outdoor: Result<f32, SensorError>,
        indoor: Result<f32, SensorError>,
        humidity: Result<f32, SensorError>,
        pressure: Result<f32, SensorError>,
    }

    impl Default for FakeSensors {
        fn default() -> Self {
            Self {
                outdoor: Ok(21.5),
                indoor: Ok(23.2),
                humidity: Ok(46.7),
                pressure: Ok(966.3),
            }
        }
    }

    impl EnvironmentSensors for FakeSensors {
        async fn read_outdoor_temp(&mut self) -> Result<f32, SensorError> {
            self.outdoor
        }
        async fn read_indoor_temp(&mut self) -> Result<f32, SensorError> {
            self.indoor
        }
        async fn read_humidity(&mut self) -> Result<f32, SensorError> {
            self.humidity
        }
        async fn read_pressure_hpa(&mut self) -> Result<f32, SensorError> {
            self.pressure
        }
    }

    struct FakeConnectivity {
        outcome: ConnectionOutcome,
        calls: u32,
    }

    impl FakeConnectivity {
        fn new(outcome: ConnectionOutcome) -> Self {
            Self { outcome, calls: 0 }
        }
    }

    impl Connectivity for FakeConnectivity {
        async fn establish(&mut self) -> ConnectionOutcome {
            self.calls += 1;
            self.outcome
        }
    }

    struct FakeForecast {
        result: Result<Vec<u16, MAX_FORECAST_CODES>, NetworkError>,
        calls: u32,
    }

    impl FakeForecast {
        fn with_codes(codes: &[u16]) -> Self {
            let mut vec = Vec::new();
            for code in codes {
                let _ = vec.push(*code);
            }
            Self {
                result: Ok(vec),
                calls: 0,
            }
        }

        fn failing(err: NetworkError) -> Self {
            Self {
                result: Err(err),
                calls: 0,
            }
        }
    }

    impl ForecastSource for FakeForecast {
        async fn fetch(
            &mut self,
            _location: &Location,
            _forecast_days: u8,
        ) -> Result<Vec<u16, MAX_FORECAST_CODES>, NetworkError> {
            self.calls += 1;
            self.result.clone()
        }
    }

    struct FakeTime {
        result: Result<i64, NetworkError>,
    }

    impl TimeSource for FakeTime {
        async fn now_utc(&mut self) -> Result<i64, NetworkError> {
            self.result
        }
    }

    #[derive(Default)]
    struct FakeRenderer {
        frames: Vec<Frame, 32>,
        wedged: bool,
    }

    impl Renderer for FakeRenderer {
        fn show(&mut self, frame: &Frame) -> Result<(), RenderError> {
            if self.wedged {
                return Err(RenderError::Bus);
            }
            let _ = self.frames.push(frame.clone());
            Ok(())
        }
    }

    /// Records dwells and advances virtual time instead of sleeping
    #[derive(Default)]
    struct FakePacer {
        now: u64,
        dwells: Vec<u32, 32>,
    }

    impl Pacer for FakePacer {
        async fn dwell(&mut self, seconds: u32) {
            let _ = self.dwells.push(seconds);
            self.now += seconds as u64;
        }

        fn now_secs(&mut self) -> u64 {
            self.now
        }
    }

    type TestStation =
        Station<FakeSensors, FakeConnectivity, FakeForecast, FakeTime, FakeRenderer, FakePacer>;

    fn make_station(
        sensors: FakeSensors,
        connectivity: FakeConnectivity,
        forecast: FakeForecast,
        time: FakeTime,
    ) -> TestStation {
        Station::new(
            sensors,
            connectivity,
            forecast,
            time,
            FakeRenderer::default(),
            FakePacer::default(),
            StationConfig::default(),
        )
    }

    fn healthy_station() -> TestStation {
        make_station(
            FakeSensors::default(),
            FakeConnectivity::new(ConnectionOutcome::Connected([192, 168, 1, 50])),
            FakeForecast::with_codes(&[0, 45, 999]),
            FakeTime {
                result: Ok(NOON_UTC),
            },
        )
    }

    #[test]
    fn test_healthy_cycle_without_sync() {
        let mut station = healthy_station();
        // Sync already attempted at t=0: not due again this cycle
        station.sync.mark_attempt(0);

        let shown = block_on(station.run_cycle());
        assert_eq!(shown, 5);

        let frames = station.renderer.frames.as_slice();
        assert_eq!(
            frames,
            &[
                Frame::Reading {
                    icon: Icon::OutdoorTemp,
                    label: crate::frame::Label::try_from("22C").unwrap(),
                },
                Frame::Reading {
                    icon: Icon::IndoorTemp,
                    label: crate::frame::Label::try_from("23C").unwrap(),
                },
                Frame::Reading {
                    icon: Icon::Humidity,
                    label: crate::frame::Label::try_from("47%").unwrap(),
                },
                Frame::Reading {
                    icon: Icon::Pressure,
                    // round(966.3 + 47) = 1013 hPa -> 760 mm
                    label: crate::frame::Label::try_from("760mm").unwrap(),
                },
                Frame::Clock {
                    hour: 14,
                    minute: 0,
                },
            ]
        );

        // No sync side effects
        assert_eq!(station.connectivity.calls, 0);
        assert_eq!(station.forecast.calls, 0);

        // Dwell policy: 10 s per measurement, 60 s clock cadence
        assert_eq!(station.pacer.dwells.as_slice(), &[10, 10, 10, 10, 60]);
    }

    #[test]
    fn test_sensor_failure_renders_error_and_advances() {
        let mut station = healthy_station();
        station.sensors.outdoor = Err(SensorError::Bus);
        station.sync.mark_attempt(0);

        block_on(station.run_cycle());

        let frames = station.renderer.frames.as_slice();
        assert_eq!(
            frames[0],
            Frame::Reading {
                icon: Icon::OutdoorTemp,
                label: crate::frame::Label::try_from("Error").unwrap(),
            }
        );
        // The failed slot still holds for its normal dwell, and the
        // remaining slots are unaffected
        assert_eq!(station.pacer.dwells[0], 10);
        assert_eq!(frames.len(), 5);
    }

    #[test]
    fn test_first_cycle_syncs_and_shows_forecast() {
        let mut station = healthy_station();

        let shown = block_on(station.run_cycle());

        let frames = station.renderer.frames.as_slice();
        // 4 readings, 2 status indicators, 2 forecast frames (999 is
        // unmapped and skipped), 1 clock
        assert_eq!(shown, 9);
        assert_eq!(frames[4], Frame::Status(Icon::WifiConnected));
        assert_eq!(frames[5], Frame::Status(Icon::ForecastBanner));
        assert_eq!(frames[6], Frame::Forecast { icon: Icon::Sun });
        assert_eq!(frames[7], Frame::Forecast { icon: Icon::Fog });
        assert!(matches!(frames[8], Frame::Clock { .. }));

        // Forecast frames hold 5 s each; the connected indicator 3 s
        assert_eq!(
            station.pacer.dwells.as_slice(),
            &[10, 10, 10, 10, 3, 5, 5, 60]
        );

        // Cache stamped with today and fresh
        let today = CalendarDate {
            year: 2025,
            month: 2,
            day: 23,
        };
        assert!(station.cache.is_fresh(today));
        assert_eq!(station.connectivity.calls, 1);
    }

    #[test]
    fn test_fetch_failure_keeps_stale_cache() {
        let mut station = make_station(
            FakeSensors::default(),
            FakeConnectivity::new(ConnectionOutcome::Connected([192, 168, 1, 50])),
            FakeForecast::failing(NetworkError::Timeout),
            FakeTime {
                result: Ok(NOON_UTC),
            },
        );

        // Stale forecast from yesterday
        let mut codes = Vec::new();
        let _ = codes.push(3u16);
        station.cache.put(ForecastDay {
            valid_for: CalendarDate {
                year: 2025,
                month: 2,
                day: 22,
            },
            codes,
        });

        block_on(station.run_cycle());

        let frames = station.renderer.frames.as_slice();
        // Disconnected indicator after the failed fetch
        assert!(frames.contains(&Frame::Status(Icon::WifiDisconnected)));
        // Stale data still cached, but not rendered
        assert_eq!(station.cache.get().unwrap().valid_for.day, 22);
        assert!(!frames.iter().any(|f| matches!(f, Frame::Forecast { .. })));
    }

    #[test]
    fn test_failed_syncs_stay_interval_gated() {
        let mut station = make_station(
            FakeSensors::default(),
            FakeConnectivity::new(ConnectionOutcome::NoCredentials),
            FakeForecast::with_codes(&[0]),
            FakeTime {
                result: Err(NetworkError::Timeout),
            },
        );

        // First cycle: due, attempt made (and short-circuited)
        block_on(station.run_cycle());
        assert_eq!(station.connectivity.calls, 1);

        // A handful of cycles later, still inside the interval: no retry
        block_on(station.run_cycle());
        block_on(station.run_cycle());
        assert_eq!(station.connectivity.calls, 1);

        // Once a full interval has passed, exactly one more attempt
        station.pacer.now += crate::sync::SYNC_INTERVAL_SECS;
        block_on(station.run_cycle());
        assert_eq!(station.connectivity.calls, 2);
    }

    #[test]
    fn test_clock_falls_back_then_remembers_last_fix() {
        let mut station = make_station(
            FakeSensors::default(),
            FakeConnectivity::new(ConnectionOutcome::TimedOut),
            FakeForecast::failing(NetworkError::Timeout),
            FakeTime {
                result: Err(NetworkError::Timeout),
            },
        );
        station.sync.mark_attempt(0);

        // No fix ever: the fixed fallback time is rendered
        block_on(station.run_cycle());
        assert_eq!(
            station.renderer.frames.last(),
            Some(&Frame::Clock {
                hour: 12,
                minute: 0,
            })
        );

        // A successful fix is rendered and remembered
        station.time.result = Ok(NOON_UTC);
        station.sync.mark_attempt(station.pacer.now);
        station.renderer.frames.clear();
        block_on(station.run_cycle());
        let fixed = station.renderer.frames.last().cloned();
        assert!(matches!(fixed, Some(Frame::Clock { hour: 14, .. })));

        // Back to failing: the last rendered time is reused, not the
        // fallback
        station.time.result = Err(NetworkError::Timeout);
        station.sync.mark_attempt(station.pacer.now);
        station.renderer.frames.clear();
        block_on(station.run_cycle());
        assert_eq!(station.renderer.frames.last(), fixed.as_ref());
    }

    #[test]
    fn test_wedged_display_renders_nothing() {
        let mut station = healthy_station();
        station.renderer.wedged = true;
        station.sync.mark_attempt(0);

        let shown = block_on(station.run_cycle());
        assert_eq!(shown, 0);
    }
}
