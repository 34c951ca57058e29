//! Algorithm parameters and the bounds they must respect
//!
//! Parameters are kept in ordered maps so that iteration, grid enumeration and
//! serialization are deterministic.

use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the parameter every variant must declare
pub const LEVEL: &str = "level";

/// A single tuned parameter value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParameterValue {
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// One of an enumerated set of named values
    Choice(String),
}

impl ParameterValue {
    /// Numeric view of the value, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterValue::Int(value) => Some(*value as f64),
            ParameterValue::Float(value) => Some(*value),
            ParameterValue::Choice(_) => None,
        }
    }

    /// Integer view of the value, rounding floats
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(value) => Some(*value),
            ParameterValue::Float(value) => Some(value.round() as i64),
            ParameterValue::Choice(_) => None,
        }
    }

    /// Named view of the value, if it is a choice
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ParameterValue::Choice(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Int(value) => write!(f, "{}", value),
            ParameterValue::Float(value) => write!(f, "{:.4}", value),
            ParameterValue::Choice(value) => f.write_str(value),
        }
    }
}

/// A named parameter set
pub type Parameters = BTreeMap<String, ParameterValue>;

/// Allowed values for one parameter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParameterSpec {
    /// Closed numeric range
    Range {
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
        /// Whether values are integers
        integer: bool,
    },
    /// Enumerated set of named values, ordered from lowest to highest effort
    Choice(Vec<String>),
}

impl ParameterSpec {
    /// Integer range
    pub fn int(min: i64, max: i64) -> Self {
        Self::Range {
            min: min as f64,
            max: max as f64,
            integer: true,
        }
    }

    /// Floating-point range
    pub fn float(min: f64, max: f64) -> Self {
        Self::Range {
            min,
            max,
            integer: false,
        }
    }

    /// Enumerated choice
    pub fn choice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(values.into_iter().map(Into::into).collect())
    }

    /// Check that the spec is well formed
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            Self::Range { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(Error::invalid_bounds(name, "range limits must be finite"));
                }
                if min > max {
                    return Err(Error::invalid_bounds(
                        name,
                        format!("minimum {} exceeds maximum {}", min, max),
                    ));
                }
                Ok(())
            }
            Self::Choice(values) if values.is_empty() => {
                Err(Error::invalid_bounds(name, "choice set is empty"))
            }
            Self::Choice(_) => Ok(()),
        }
    }

    /// Value at `fraction` of the way from the lowest to the highest allowed value
    pub fn at_fraction(&self, fraction: f64) -> ParameterValue {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self {
            Self::Range { min, max, integer } => {
                let value = min + fraction * (max - min);
                if *integer {
                    ParameterValue::Int(bounded(value.round(), min.ceil(), max.floor()) as i64)
                } else {
                    ParameterValue::Float(value)
                }
            }
            Self::Choice(values) => {
                let index = (fraction * values.len().saturating_sub(1) as f64).round() as usize;
                ParameterValue::Choice(values.get(index).cloned().unwrap_or_default())
            }
        }
    }

    /// Clamp a value into the spec, converting between numeric kinds as needed
    pub fn clamp_value(&self, value: &ParameterValue) -> ParameterValue {
        match self {
            Self::Range { min, max, integer } => {
                let raw = value.as_f64().filter(|v| v.is_finite()).unwrap_or(*min);
                let clamped = bounded(raw, *min, *max);
                if *integer {
                    ParameterValue::Int(bounded(clamped.round(), min.ceil(), max.floor()) as i64)
                } else {
                    ParameterValue::Float(clamped)
                }
            }
            Self::Choice(values) => match value {
                ParameterValue::Choice(name) if values.contains(name) => value.clone(),
                ParameterValue::Int(_) | ParameterValue::Float(_) => {
                    let index = value
                        .as_i64()
                        .unwrap_or(0)
                        .clamp(0, values.len().saturating_sub(1) as i64)
                        as usize;
                    ParameterValue::Choice(values.get(index).cloned().unwrap_or_default())
                }
                ParameterValue::Choice(_) => {
                    ParameterValue::Choice(values.first().cloned().unwrap_or_default())
                }
            },
        }
    }

    /// Whether a value lies within the spec
    pub fn contains(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (Self::Range { min, max, .. }, ParameterValue::Int(v)) => {
                let v = *v as f64;
                v >= *min && v <= *max
            }
            (Self::Range { min, max, integer }, ParameterValue::Float(v)) => {
                !*integer && v.is_finite() && v >= min && v <= max
            }
            (Self::Choice(values), ParameterValue::Choice(name)) => values.contains(name),
            _ => false,
        }
    }

    /// Position of a value within the spec, scaled to 0-1
    pub fn normalize(&self, value: &ParameterValue) -> Option<f64> {
        match self {
            Self::Range { min, max, .. } => {
                let v = value.as_f64()?;
                if max > min {
                    Some(((v - min) / (max - min)).clamp(0.0, 1.0))
                } else {
                    Some(0.0)
                }
            }
            Self::Choice(values) => {
                let name = value.as_choice()?;
                let index = values.iter().position(|candidate| candidate == name)?;
                if values.len() > 1 {
                    Some(index as f64 / (values.len() - 1) as f64)
                } else {
                    Some(0.0)
                }
            }
        }
    }

    /// Evenly spaced candidate values; choice specs yield every allowed value
    pub fn grid(&self, points: usize) -> Vec<ParameterValue> {
        match self {
            Self::Range { .. } => {
                if points < 2 {
                    return vec![self.at_fraction(0.5)];
                }
                let mut values: Vec<ParameterValue> = Vec::with_capacity(points);
                for step in 0..points {
                    let value = self.at_fraction(step as f64 / (points - 1) as f64);
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                values
            }
            Self::Choice(values) => values
                .iter()
                .cloned()
                .map(ParameterValue::Choice)
                .collect(),
        }
    }

    /// Default starting value: the range midpoint, or the second choice
    pub fn default_value(&self) -> ParameterValue {
        match self {
            Self::Range { .. } => self.at_fraction(0.5),
            Self::Choice(values) => {
                let index = usize::from(values.len() > 1);
                ParameterValue::Choice(values.get(index).cloned().unwrap_or_default())
            }
        }
    }
}

// Unlike `f64::clamp`, never panics when `lower > upper`; `upper` wins.
fn bounded(value: f64, lower: f64, upper: f64) -> f64 {
    value.max(lower).min(upper)
}

/// Bounds for every tunable parameter of one variant
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParameterBounds {
    parameters: BTreeMap<String, ParameterSpec>,
}

impl ParameterBounds {
    /// Create empty bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style
    pub fn with<S: Into<String>>(mut self, name: S, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    /// Add or replace a parameter
    pub fn insert<S: Into<String>>(&mut self, name: S, spec: ParameterSpec) {
        self.parameters.insert(name.into(), spec);
    }

    /// Look up a parameter spec
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    /// Iterate over parameters in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterSpec)> {
        self.parameters.iter()
    }

    /// Number of declared parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether no parameters are declared
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether the mandatory `level` parameter is declared
    pub fn has_level(&self) -> bool {
        self.parameters.contains_key(LEVEL)
    }

    /// Validate every parameter spec
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in &self.parameters {
            spec.validate(name)?;
        }
        Ok(())
    }

    /// Clamp every declared parameter present in `parameters`; other keys pass through
    pub fn clamp(&self, parameters: &Parameters) -> Parameters {
        parameters
            .iter()
            .map(|(name, value)| {
                let value = match self.parameters.get(name) {
                    Some(spec) => spec.clamp_value(value),
                    None => value.clone(),
                };
                (name.clone(), value)
            })
            .collect()
    }

    /// Whether every declared parameter present in `parameters` is within bounds
    pub fn contains(&self, parameters: &Parameters) -> bool {
        parameters.iter().all(|(name, value)| {
            self.parameters
                .get(name)
                .map_or(true, |spec| spec.contains(value))
        })
    }

    /// Default value for every declared parameter
    pub fn defaults(&self) -> Parameters {
        self.parameters
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn levels() -> ParameterSpec {
        ParameterSpec::choice(["fast", "balanced", "optimal", "maximum"])
    }

    #[test]
    fn test_integer_range_grid() {
        let spec = ParameterSpec::int(1, 9);
        assert_eq!(
            spec.grid(3),
            vec![
                ParameterValue::Int(1),
                ParameterValue::Int(5),
                ParameterValue::Int(9)
            ]
        );
    }

    #[test]
    fn test_narrow_range_grid_is_deduplicated() {
        let spec = ParameterSpec::int(1, 2);
        assert_eq!(
            spec.grid(3),
            vec![ParameterValue::Int(1), ParameterValue::Int(2)]
        );
    }

    #[test]
    fn test_choice_grid_and_default() {
        let spec = levels();
        assert_eq!(spec.grid(3).len(), 4);
        assert_eq!(
            spec.default_value(),
            ParameterValue::Choice("balanced".to_string())
        );
    }

    #[test]
    fn test_clamp_converts_and_limits() {
        let spec = ParameterSpec::int(1, 9);
        assert_eq!(
            spec.clamp_value(&ParameterValue::Float(12.7)),
            ParameterValue::Int(9)
        );
        assert_eq!(
            spec.clamp_value(&ParameterValue::Choice("x".into())),
            ParameterValue::Int(1)
        );

        let choice = levels();
        assert_eq!(
            choice.clamp_value(&ParameterValue::Choice("turbo".into())),
            ParameterValue::Choice("fast".into())
        );
        assert_eq!(
            choice.clamp_value(&ParameterValue::Int(3)),
            ParameterValue::Choice("maximum".into())
        );
    }

    #[test]
    fn test_normalize() {
        let spec = ParameterSpec::int(1, 9);
        assert_eq!(spec.normalize(&ParameterValue::Int(5)), Some(0.5));
        assert_eq!(
            levels().normalize(&ParameterValue::Choice("maximum".into())),
            Some(1.0)
        );
        assert_eq!(levels().normalize(&ParameterValue::Int(1)), None);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let bounds = ParameterBounds::new().with("level", ParameterSpec::int(9, 1));
        assert!(bounds.validate().is_err());

        let empty_choice = ParameterBounds::new().with("level", ParameterSpec::Choice(vec![]));
        assert!(empty_choice.validate().is_err());
    }

    #[test]
    fn test_bounds_clamp_passes_unknown_keys() {
        let bounds = ParameterBounds::new().with("level", ParameterSpec::int(1, 9));
        let mut parameters = Parameters::new();
        parameters.insert("level".into(), ParameterValue::Int(40));
        parameters.insert("extra".into(), ParameterValue::Int(40));

        let clamped = bounds.clamp(&parameters);
        assert_eq!(clamped["level"], ParameterValue::Int(9));
        assert_eq!(clamped["extra"], ParameterValue::Int(40));
        assert!(bounds.contains(&clamped));
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let spec = ParameterSpec::int(9, 1);
        assert_eq!(spec.clamp_value(&ParameterValue::Int(5)), ParameterValue::Int(1));
        assert_eq!(spec.at_fraction(0.5), ParameterValue::Int(1));
    }

    proptest! {
        #[test]
        fn test_clamped_values_are_contained(
            min in -1000i64..1000,
            span in 0i64..1000,
            raw in -5000.0f64..5000.0,
        ) {
            let spec = ParameterSpec::int(min, min + span);
            let clamped = spec.clamp_value(&ParameterValue::Float(raw));
            prop_assert!(spec.contains(&clamped));

            let float_spec = ParameterSpec::float(min as f64, (min + span) as f64);
            let clamped = float_spec.clamp_value(&ParameterValue::Float(raw));
            prop_assert!(float_spec.contains(&clamped));
        }

        #[test]
        fn test_fraction_values_are_contained(fraction in -1.0f64..2.0) {
            let spec = ParameterSpec::int(512, 32768);
            prop_assert!(spec.contains(&spec.at_fraction(fraction)));
            prop_assert!(levels().contains(&levels().at_fraction(fraction)));
        }
    }
}
