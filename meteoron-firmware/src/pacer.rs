//! Embassy-backed pacer
//!
//! embassy-time is the single time authority: dwells are timer sleeps and
//! monotonic seconds come from `Instant`, which never goes backwards.

use embassy_time::{Duration, Instant, Timer};
use meteoron_core::traits::Pacer;

pub struct EmbassyPacer;

impl Pacer for EmbassyPacer {
    async fn dwell(&mut self, seconds: u32) {
        Timer::after(Duration::from_secs(seconds as u64)).await;
    }

    fn now_secs(&mut self) -> u64 {
        Instant::now().as_secs()
    }
}
