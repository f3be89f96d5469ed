//! WMO weather-code to icon mapping
//!
//! Fixed at build time. Codes with no mapping produce no frame; the
//! rotation simply continues with the next code.

use crate::frame::Icon;

/// Map a WMO weather interpretation code to a display icon
pub fn icon_for_code(code: u16) -> Option<Icon> {
    match code {
        0 | 1 => Some(Icon::Sun),
        2 => Some(Icon::Clouds),
        3 => Some(Icon::Overcast),
        45 | 48 => Some(Icon::Fog),
        51 | 53 | 55 | 61 | 63 | 77 | 80 | 81 => Some(Icon::Drizzle),
        56 | 57 | 71 | 73 | 75 | 85 | 86 => Some(Icon::Snow),
        65 | 66 | 67 => Some(Icon::Rain),
        82 | 95 | 96 | 99 => Some(Icon::ShowersViolent),
        _ => None,
    }
}
