//! Unit-tagged quantity parsing for scenario files.
//!
//! Quantities are written as `"<number> <unit>"` (`"300 K"`, `"14.7 psia"`,
//! `"2 kg/s"`); a bare number is taken as SI. Parsed values are canonical SI.

use sm_core::units::constants::ONE_ATM_PA;
use std::fmt;
use thiserror::Error;

/// Quantity family of a scenario field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Temperature (canonical: K)
    Temperature,
    /// Absolute pressure (canonical: Pa)
    Pressure,
    /// Mass flow rate (canonical: kg/s)
    MassFlow,
    /// Volumetric flow rate (canonical: m³/s)
    VolumeFlow,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "Temperature"),
            Self::Pressure => write!(f, "Absolute Pressure"),
            Self::MassFlow => write!(f, "Mass Flow"),
            Self::VolumeFlow => write!(f, "Volume Flow"),
        }
    }
}

/// Error in unit parsing or conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: Quantity },

    #[error("Ambiguous unit '{unit}': {reason}")]
    AmbiguousUnit { unit: String, reason: String },

    #[error("Value {value} out of range: {reason}")]
    OutOfRange { value: f64, reason: String },
}

/// Parse `raw_text` as a `quantity`, returning canonical SI.
pub fn parse_quantity(raw_text: &str, quantity: Quantity) -> Result<f64, UnitError> {
    let trimmed = raw_text.trim();
    match quantity {
        Quantity::Temperature => parse_temperature(trimmed),
        Quantity::Pressure => parse_pressure(trimmed),
        Quantity::MassFlow => parse_mass_flow(trimmed),
        Quantity::VolumeFlow => parse_volume_flow(trimmed),
    }
}

/// Parse temperature, return Kelvin.
fn parse_temperature(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let kelvin = match unit.to_lowercase().as_str() {
        "" | "k" | "kelvin" => value,
        "c" | "°c" | "degc" | "celsius" => value + 273.15,
        "f" | "°f" | "degf" | "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
        "r" | "°r" | "degr" | "rankine" => value * 5.0 / 9.0,
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::Temperature,
            });
        }
    };

    if !kelvin.is_finite() || kelvin <= 0.0 {
        return Err(UnitError::OutOfRange {
            value: kelvin,
            reason: "absolute temperature must be > 0 K".to_string(),
        });
    }
    Ok(kelvin)
}

/// Parse pressure, return Pa (absolute). Gauge units assume a 1 atm reference.
fn parse_pressure(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let pa = match unit.to_lowercase().as_str() {
        "" | "pa" | "pascal" => value,
        "kpa" => value * 1e3,
        "mpa" => value * 1e6,
        "bar" => value * 1e5,
        "mbar" | "millibar" => value * 100.0,
        "atm" => value * ONE_ATM_PA,
        "torr" => value * ONE_ATM_PA / 760.0,
        "psia" => value * 6_894.757,
        "psig" => value * 6_894.757 + ONE_ATM_PA,
        "barg" => value * 1e5 + ONE_ATM_PA,
        "kpag" => value * 1e3 + ONE_ATM_PA,
        "psi" => {
            return Err(UnitError::AmbiguousUnit {
                unit: "psi".to_string(),
                reason: "use 'psia' (absolute) or 'psig' (gauge)".to_string(),
            });
        }
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::Pressure,
            });
        }
    };

    if !pa.is_finite() || pa <= 0.0 {
        return Err(UnitError::OutOfRange {
            value: pa,
            reason: "absolute pressure must be positive".to_string(),
        });
    }
    Ok(pa)
}

/// Parse mass flow, return kg/s.
fn parse_mass_flow(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let kg_s = match unit.to_lowercase().as_str() {
        "" | "kg/s" => value,
        "g/s" => value / 1e3,
        "kg/min" => value / 60.0,
        "kg/h" | "kg/hr" => value / 3600.0,
        "lbm/s" => value * 0.453_592_37,
        "lbm/min" => value * 0.453_592_37 / 60.0,
        "lbm/h" | "lbm/hr" => value * 0.453_592_37 / 3600.0,
        "lb/s" | "lb/min" | "lb/h" => {
            return Err(UnitError::AmbiguousUnit {
                unit,
                reason: "use 'lbm' for mass".to_string(),
            });
        }
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::MassFlow,
            });
        }
    };

    check_flow(kg_s)
}

/// Parse volumetric flow, return m³/s.
fn parse_volume_flow(input: &str) -> Result<f64, UnitError> {
    let (value, unit) = split_value_and_unit(input)?;

    let m3_s = match unit.to_lowercase().as_str() {
        "" | "m3/s" | "m^3/s" | "m³/s" => value,
        "m3/min" | "m^3/min" => value / 60.0,
        "m3/h" | "m^3/h" => value / 3600.0,
        "l/s" => value / 1e3,
        "l/min" | "lpm" => value / 60e3,
        "ft3/s" | "ft^3/s" | "cfs" => value * 0.028_316_846_592,
        "ft3/min" | "ft^3/min" | "cfm" => value * 0.028_316_846_592 / 60.0,
        _ => {
            return Err(UnitError::UnknownUnit {
                unit,
                quantity: Quantity::VolumeFlow,
            });
        }
    };

    check_flow(m3_s)
}

fn check_flow(v: f64) -> Result<f64, UnitError> {
    if !v.is_finite() || v < 0.0 {
        return Err(UnitError::OutOfRange {
            value: v,
            reason: "flow rate cannot be negative".to_string(),
        });
    }
    Ok(v)
}

/// Split `"14.7 psia"` into `(14.7, "psia")`; `"300"` gives `(300.0, "")`.
///
/// An exponent marker only belongs to the number when a digit or sign follows it.
fn split_value_and_unit(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    while end < bytes.len() {
        let c = bytes[end];
        let is_exponent = (c == b'e' || c == b'E')
            && end > 0
            && bytes
                .get(end + 1)
                .is_some_and(|n| n.is_ascii_digit() || *n == b'-' || *n == b'+');
        let is_sign = (c == b'-' || c == b'+')
            && (end == 0 || bytes[end - 1] == b'e' || bytes[end - 1] == b'E');
        if c.is_ascii_digit() || c == b'.' || is_exponent || is_sign {
            end += 1;
        } else {
            break;
        }
    }

    let (num_part, unit_part) = trimmed.split_at(end);
    let value: f64 = num_part
        .trim()
        .parse()
        .map_err(|_| UnitError::Parse(format!("could not parse numeric value from '{}'", input)))?;

    Ok((value, unit_part.trim().to_string()))
}
