//! Rendering of zone results for the terminal.

use crate::config::Units;
use part77_core::{Zone, ZoneResult};

/// One-line description of `result` for the position `(lat, lon)`.
pub fn render_sentence(lat: f64, lon: f64, result: &ZoneResult, units: Units) -> String {
    let position = format!("({lat},{lon})");
    let Some(limit_ft) = result.build_limit_ft.filter(|_| result.zone != Zone::NotApplicable)
    else {
        return format!("{position} was not found in any imaginary zone");
    };

    let mut sentence = format!("{position} was found in the {} Surface", result.zone);
    if let Some(runway) = &result.runway {
        sentence.push_str(&format!(" for runway {runway}"));
        if let Some(end) = &result.end {
            sentence.push_str(&format!(" at end {end}"));
        }
    }
    sentence.push_str(&format!(
        ". The maximum build limit is {:.2} {}",
        units.convert_feet(limit_ft),
        units.label()
    ));
    sentence
}

/// `result` as pretty JSON, with the build limit in `units`.
pub fn render_json(result: &ZoneResult, units: Units) -> serde_json::Result<String> {
    let converted = ZoneResult {
        build_limit_ft: result.build_limit_ft.map(|ft| units.convert_feet(ft)),
        ..result.clone()
    };
    let mut value = serde_json::to_value(&converted)?;
    if let Some(object) = value.as_object_mut() {
        if units == Units::Meters {
            if let Some(limit) = object.remove("build_limit_ft") {
                object.insert("build_limit_m".to_string(), limit);
            }
        }
    }
    serde_json::to_string_pretty(&value)
}
