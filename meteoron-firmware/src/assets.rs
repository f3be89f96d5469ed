//! Embedded bitmap assets
//!
//! All artwork is compiled into the image as P4 PBM files and framed at
//! draw time by the core parser. Measurement icons are 25x25, weather
//! icons 55x55, the splash and status bitmaps 63x63.

use meteoron_core::assets::{parse_pbm, AssetError, Bitmap};
use meteoron_core::frame::Icon;

/// Startup logo
pub fn logo() -> Result<Bitmap<'static>, AssetError> {
    parse_pbm(include_bytes!("../assets/logo.pbm"))
}

/// Bitmap for a display icon
pub fn icon(icon: Icon) -> Result<Bitmap<'static>, AssetError> {
    parse_pbm(icon_bytes(icon))
}

fn icon_bytes(icon: Icon) -> &'static [u8] {
    match icon {
        Icon::OutdoorTemp => include_bytes!("../assets/temp_out.pbm"),
        Icon::IndoorTemp => include_bytes!("../assets/temp_in.pbm"),
        Icon::Humidity => include_bytes!("../assets/hum.pbm"),
        Icon::Pressure => include_bytes!("../assets/pres.pbm"),
        Icon::Sun => include_bytes!("../assets/sun.pbm"),
        Icon::Clouds => include_bytes!("../assets/clouds.pbm"),
        Icon::Overcast => include_bytes!("../assets/overcast.pbm"),
        Icon::Fog => include_bytes!("../assets/fog.pbm"),
        Icon::Drizzle => include_bytes!("../assets/drizzle.pbm"),
        Icon::Rain => include_bytes!("../assets/rain.pbm"),
        Icon::Snow => include_bytes!("../assets/snow.pbm"),
        Icon::ShowersViolent => include_bytes!("../assets/showers-violent.pbm"),
        Icon::WifiConnected => include_bytes!("../assets/wi-fi-connected.pbm"),
        Icon::WifiDisconnected => include_bytes!("../assets/wi-fi-disconnected.pbm"),
        Icon::ForecastBanner => include_bytes!("../assets/forecast.pbm"),
    }
}
