//! Time boundary for the rotation loop
//!
//! The state machine decides *what* to show and for how long; the pacer is
//! the only place real time enters the picture. Tests inject a fake that
//! records dwells and advances a virtual clock, so sequencing is verified
//! without real delays.

/// Dwell timing and monotonic time for the station loop
#[allow(async_fn_in_trait)]
pub trait Pacer {
    /// Hold the current frame for the given number of seconds
    async fn dwell(&mut self, seconds: u32);

    /// Monotonic seconds since an arbitrary epoch (never goes backwards)
    fn now_secs(&mut self) -> u64;
}
