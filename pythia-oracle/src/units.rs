//! Unit-conversion oracle for `convert {number} {unit1} to {unit2}`.
//!
//! A small fixed registry across five quantities. Linear units carry a
//! to-base scale factor; temperature is affine (base unit kelvin).

use crate::{OracleError, OracleResult};

/// Measured quantity a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Volume,
    Distance,
    Time,
    Area,
}

impl Quantity {
    fn name(&self) -> &'static str {
        match self {
            Quantity::Temperature => "temperature",
            Quantity::Volume => "volume",
            Quantity::Distance => "distance",
            Quantity::Time => "time",
            Quantity::Area => "area",
        }
    }
}

/// How a unit maps to its quantity's base unit
#[derive(Debug, Clone, Copy)]
enum Mapping {
    /// base = value × scale
    Linear(f64),
    /// base = (value + offset) × scale
    Affine { scale: f64, offset: f64 },
}

/// Recognized unit tokens (exact, case-sensitive) with their quantity
/// and base-unit mapping. Bases: kelvin, litre, metre, second, m².
const UNITS: &[(&str, Quantity, Mapping)] = &[
    // temperature
    ("c", Quantity::Temperature, Mapping::Affine { scale: 1.0, offset: 273.15 }),
    ("f", Quantity::Temperature, Mapping::Affine { scale: 5.0 / 9.0, offset: 459.67 }),
    ("K", Quantity::Temperature, Mapping::Linear(1.0)),
    // volume (US fluid ounce and liquid quart)
    ("L", Quantity::Volume, Mapping::Linear(1.0)),
    ("oz", Quantity::Volume, Mapping::Linear(0.0295735295625)),
    ("mL", Quantity::Volume, Mapping::Linear(0.001)),
    ("quart", Quantity::Volume, Mapping::Linear(0.946352946)),
    // distance
    ("m", Quantity::Distance, Mapping::Linear(1.0)),
    ("cm", Quantity::Distance, Mapping::Linear(0.01)),
    ("inch", Quantity::Distance, Mapping::Linear(0.0254)),
    ("feet", Quantity::Distance, Mapping::Linear(0.3048)),
    ("km", Quantity::Distance, Mapping::Linear(1000.0)),
    // time
    ("day", Quantity::Time, Mapping::Linear(86_400.0)),
    ("hour", Quantity::Time, Mapping::Linear(3_600.0)),
    ("minutes", Quantity::Time, Mapping::Linear(60.0)),
    ("seconds", Quantity::Time, Mapping::Linear(1.0)),
    // area
    ("m^2", Quantity::Area, Mapping::Linear(1.0)),
    ("acre", Quantity::Area, Mapping::Linear(4_046.856_422_4)),
    ("mi^2", Quantity::Area, Mapping::Linear(2_589_988.110_336)),
    ("km^2", Quantity::Area, Mapping::Linear(1_000_000.0)),
    ("hectare", Quantity::Area, Mapping::Linear(10_000.0)),
];

/// Every recognized unit token, grouped by quantity in registry order.
pub fn recognized_units() -> Vec<(&'static str, Quantity)> {
    UNITS.iter().map(|(token, quantity, _)| (*token, *quantity)).collect()
}

fn lookup(token: &str) -> OracleResult<(Quantity, Mapping)> {
    UNITS
        .iter()
        .find(|(unit, _, _)| *unit == token)
        .map(|(_, quantity, mapping)| (*quantity, *mapping))
        .ok_or_else(|| OracleError::UnknownUnit(token.to_string()))
}

fn to_base(value: f64, mapping: Mapping) -> f64 {
    match mapping {
        Mapping::Linear(scale) => value * scale,
        Mapping::Affine { scale, offset } => (value + offset) * scale,
    }
}

fn from_base(base: f64, mapping: Mapping) -> f64 {
    match mapping {
        Mapping::Linear(scale) => base / scale,
        Mapping::Affine { scale, offset } => base / scale - offset,
    }
}

/// Convert a magnitude between two recognized units of the same quantity.
pub fn convert(value: f64, from: &str, to: &str) -> OracleResult<f64> {
    let (from_quantity, from_mapping) = lookup(from)?;
    let (to_quantity, to_mapping) = lookup(to)?;
    if from_quantity != to_quantity {
        return Err(OracleError::CategoryMismatch(
            from_quantity.name(),
            to_quantity.name(),
        ));
    }
    Ok(from_base(to_base(value, from_mapping), to_mapping))
}

/// Parse and evaluate a 5-token `convert {number} {unit1} to {unit2}`
/// command, returning the converted magnitude.
pub fn convert_units(query: &str) -> OracleResult<f64> {
    let tokens: Vec<&str> = query.split_whitespace().collect();
    let malformed = || OracleError::MalformedCommand(query.to_string());

    match tokens.as_slice() {
        ["convert", number, from, "to", to] => {
            let value: f64 = number.parse().map_err(|_| malformed())?;
            convert(value, from, to)
        }
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_distance_conversions() {
        assert!((convert(1.0, "km", "m").unwrap() - 1000.0).abs() < TOL);
        assert!((convert(100.0, "cm", "m").unwrap() - 1.0).abs() < TOL);
        assert!((convert(1.0, "feet", "inch").unwrap() - 12.0).abs() < TOL);
    }

    #[test]
    fn test_temperature_affine() {
        // 0 °C = 273.15 K, 32 °F = 0 °C, 212 °F = 100 °C
        assert!((convert(0.0, "c", "K").unwrap() - 273.15).abs() < TOL);
        assert!((convert(32.0, "f", "c").unwrap()).abs() < TOL);
        assert!((convert(212.0, "f", "c").unwrap() - 100.0).abs() < TOL);
    }

    #[test]
    fn test_time_conversions() {
        assert!((convert(1.0, "day", "hour").unwrap() - 24.0).abs() < TOL);
        assert!((convert(90.0, "seconds", "minutes").unwrap() - 1.5).abs() < TOL);
    }

    #[test]
    fn test_volume_and_area() {
        assert!((convert(1.0, "L", "mL").unwrap() - 1000.0).abs() < TOL);
        assert!((convert(1.0, "hectare", "m^2").unwrap() - 10_000.0).abs() < TOL);
        // 1 quart = 32 US fluid ounces
        assert!((convert(1.0, "quart", "oz").unwrap() - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_consistency() {
        let pairs = [
            ("c", "f"),
            ("L", "quart"),
            ("m", "feet"),
            ("day", "seconds"),
            ("acre", "km^2"),
        ];
        for (from, to) in pairs {
            let there = convert(37.5, from, to).unwrap();
            let back = convert(there, to, from).unwrap();
            assert!((back - 37.5).abs() < 1e-9, "{} -> {}", from, to);
        }
    }

    #[test]
    fn test_unknown_unit_is_hard_error() {
        assert!(matches!(
            convert(1.0, "furlong", "m"),
            Err(OracleError::UnknownUnit(_))
        ));
        assert!(matches!(
            convert(1.0, "m", "fathom"),
            Err(OracleError::UnknownUnit(_))
        ));
    }

    #[test]
    fn test_category_mismatch() {
        assert!(matches!(
            convert(1.0, "m", "hour"),
            Err(OracleError::CategoryMismatch(_, _))
        ));
    }

    #[test]
    fn test_convert_units_command() {
        let out = convert_units("convert 2 km to m").unwrap();
        assert!((out - 2000.0).abs() < TOL);
    }

    #[test]
    fn test_convert_units_malformed() {
        assert!(matches!(
            convert_units("convert 2 km m"),
            Err(OracleError::MalformedCommand(_))
        ));
        assert!(matches!(
            convert_units("convert two km to m"),
            Err(OracleError::MalformedCommand(_))
        ));
    }
}
