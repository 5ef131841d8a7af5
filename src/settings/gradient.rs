// SPDX-License-Identifier: GPL-3.0-or-later
use colorous::Gradient;
use serde::de::{self, Deserialize, Deserializer};

/// Look up a `colorous` colormap by name.
///
/// Names are case-insensitive, and words may be separated by spaces, underscores or hyphens.
/// Only the sequential and cyclic maps are available, as diverging maps make poor temperature
/// scales.
pub(crate) fn from_str(gradient_name: &str) -> Result<Gradient, &'static str> {
    let normalized = gradient_name
        .trim()
        .to_uppercase()
        .replace(|c| c == ' ' || c == '-', "_");
    match &normalized as &str {
        "BLUES" => Ok(colorous::BLUES),
        "CIVIDIS" => Ok(colorous::CIVIDIS),
        "COOL" => Ok(colorous::COOL),
        "CUBEHELIX" => Ok(colorous::CUBEHELIX),
        "GREENS" => Ok(colorous::GREENS),
        "GREYS" | "GRAYS" => Ok(colorous::GREYS),
        "INFERNO" => Ok(colorous::INFERNO),
        "MAGMA" => Ok(colorous::MAGMA),
        "ORANGES" => Ok(colorous::ORANGES),
        "ORANGE_RED" => Ok(colorous::ORANGE_RED),
        "PLASMA" => Ok(colorous::PLASMA),
        "PURPLES" => Ok(colorous::PURPLES),
        "RAINBOW" => Ok(colorous::RAINBOW),
        "REDS" => Ok(colorous::REDS),
        "SINEBOW" => Ok(colorous::SINEBOW),
        "TURBO" => Ok(colorous::TURBO),
        "VIRIDIS" => Ok(colorous::VIRIDIS),
        "WARM" => Ok(colorous::WARM),
        "YELLOW_ORANGE_BROWN" => Ok(colorous::YELLOW_ORANGE_BROWN),
        "YELLOW_ORANGE_RED" => Ok(colorous::YELLOW_ORANGE_RED),
        _ => Err("Invalid gradient name"),
    }
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Gradient, D::Error>
where
    D: Deserializer<'de>,
{
    let gradient_name: String = Deserialize::deserialize(deserializer)?;
    from_str(&gradient_name).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Str(&gradient_name),
            &"a name of a colorous gradient",
        )
    })
}
