//! Boundary traits
//!
//! These traits define the interface between the orchestration logic and
//! the external collaborators: sensor buses, the wireless link, the
//! forecast and time services, the display, and real time itself. The
//! firmware provides the real implementations; tests inject fakes.

pub mod net;
pub mod pacer;
pub mod render;
pub mod sensor;

pub use net::{ConnectionOutcome, Connectivity, ForecastSource, NetworkError, TimeSource};
pub use pacer::Pacer;
pub use render::{RenderError, Renderer};
pub use sensor::{EnvironmentSensors, SensorError};
