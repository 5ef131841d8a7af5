// SPDX-License-Identifier: GPL-3.0-or-later
use std::convert::{Infallible, TryFrom};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use i2cdev::linux::LinuxI2CError;
use linux_embedded_hal::I2cdev;
use serde::de::{self, Deserialize, Deserializer};
use serde::Serialize;

use crate::util::parse_int_decimal_hex;

/// An I²C bus, either by number (`/dev/i2c-N`) or as a path to the device file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Bus {
    Number(u32),
    Path(PathBuf),
}

impl Default for Bus {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl From<u32> for Bus {
    fn from(bus: u32) -> Self {
        Self::Number(bus)
    }
}

impl FromStr for Bus {
    type Err = Infallible;

    /// Strings that parse as a decimal or hexadecimal integer are bus numbers, everything else
    /// is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_int_decimal_hex(s)
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Path(PathBuf::from(s))))
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "/dev/i2c-{}", n),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u32),
    String(String),
}

impl<'de> Deserialize<'de> for Bus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Ok(Self::Number(n)),
            NumberOrString::String(s) => s.parse().map_err(|_| de::Error::custom("invalid bus")),
        }
    }
}

impl TryFrom<&Bus> for I2cdev {
    type Error = LinuxI2CError;

    fn try_from(bus: &Bus) -> Result<Self, Self::Error> {
        let device_path = match bus {
            Bus::Number(n) => PathBuf::from(format!("/dev/i2c-{}", n)),
            Bus::Path(p) => p.clone(),
        };
        I2cdev::new(device_path)
    }
}

fn default_address() -> u8 {
    0x69
}

/// The bus and address of an I²C device.
#[derive(Clone, Debug, serde::Deserialize, PartialEq)]
pub(crate) struct I2cSettings {
    #[serde(default)]
    pub(crate) bus: Bus,

    #[serde(
        default = "default_address",
        deserialize_with = "deserialize_grideye_address"
    )]
    pub(crate) address: u8,
}

impl Default for I2cSettings {
    fn default() -> Self {
        Self {
            bus: Bus::default(),
            address: default_address(),
        }
    }
}

/// Accept an I²C address as either an integer or a decimal/hex string (`"0x69"`).
pub(crate) fn deserialize_address<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => u8::try_from(n).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Unsigned(n as u64), &"a 7-bit I2C address")
        }),
        NumberOrString::String(s) => parse_int_decimal_hex(&s).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&s), &"a decimal or hex I2C address")
        }),
    }
}

/// Like [`deserialize_address`], but only the two addresses a Grid-EYE can be strapped to are
/// accepted.
fn deserialize_grideye_address<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let address = deserialize_address(deserializer)?;
    amg88::Address::try_from(address).map_err(|_| {
        de::Error::invalid_value(
            de::Unexpected::Unsigned(address as u64),
            &"a Grid-EYE address (0x68 or 0x69)",
        )
    })?;
    Ok(address)
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use serde::Deserialize;

    use super::{Bus, I2cSettings};

    #[test]
    fn bus_from_num() {
        assert_eq!(Bus::from(0), Bus::Number(0))
    }

    #[test]
    fn bus_num_from_decimal_string() {
        let bus: Bus = "0".parse().unwrap();
        assert_eq!(bus, Bus::Number(0))
    }

    #[test]
    fn bus_num_from_hex_string() {
        let bus: Bus = "0x68".parse().unwrap();
        assert_eq!(bus, Bus::Number(0x68))
    }

    #[test]
    fn bus_path_from_string() {
        let bus: Bus = "/dev/i2c-0".parse().unwrap();
        assert_eq!(bus, Bus::Path(PathBuf::from("/dev/i2c-0")));
    }

    #[test]
    fn bus_display() {
        assert_eq!(Bus::Number(1).to_string(), "/dev/i2c-1");
        assert_eq!(Bus::Path("/dev/i2c-7".into()).to_string(), "/dev/i2c-7");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Wrapper {
        bus: Bus,
        #[serde(deserialize_with = "super::deserialize_address")]
        address: u8,
    }

    #[test]
    fn deserialize_numbers() {
        let parsed: Wrapper = toml::from_str("bus = 1\naddress = 105").unwrap();
        assert_eq!(
            parsed,
            Wrapper {
                bus: Bus::Number(1),
                address: 0x69
            }
        );
    }

    #[test]
    fn deserialize_strings() {
        let parsed: Wrapper = toml::from_str("bus = \"/dev/i2c-3\"\naddress = \"0x68\"").unwrap();
        assert_eq!(
            parsed,
            Wrapper {
                bus: Bus::Path(PathBuf::from("/dev/i2c-3")),
                address: 0x68
            }
        );
    }

    #[test]
    fn settings_defaults() {
        let parsed: I2cSettings = toml::from_str("").unwrap();
        assert_eq!(parsed, I2cSettings::default());
        assert_eq!(parsed.bus, Bus::Number(1));
        assert_eq!(parsed.address, 0x69);
    }

    #[test]
    fn settings_grideye_addresses() {
        let parsed: I2cSettings = toml::from_str("address = \"0x68\"").unwrap();
        assert_eq!(parsed.address, 0x68);
        let parsed: I2cSettings = toml::from_str("address = 105").unwrap();
        assert_eq!(parsed.address, 0x69);
    }

    #[test]
    fn settings_reject_other_addresses() {
        // Valid I2C addresses, but not ones a Grid-EYE can use.
        let parsed: Result<I2cSettings, _> = toml::from_str("address = \"0x40\"");
        assert!(parsed.is_err());
        let parsed: Result<I2cSettings, _> = toml::from_str("address = 0");
        assert!(parsed.is_err());
    }

    #[test]
    fn address_out_of_range() {
        let parsed: Result<Wrapper, _> = toml::from_str("bus = 1\naddress = 300");
        assert!(parsed.is_err());
        let parsed: Result<Wrapper, _> = toml::from_str("bus = 1\naddress = \"0x1ff\"");
        assert!(parsed.is_err());
    }
}
