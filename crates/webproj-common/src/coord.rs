//! Coordinate tuples passed through transformation pipelines.

use serde::Serialize;

/// A 2 to 4 component coordinate.
///
/// Trailing components that were not supplied are `None`, never zero. They
/// serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate4 {
    pub v1: f64,
    pub v2: f64,
    pub v3: Option<f64>,
    pub v4: Option<f64>,
}

impl Coordinate4 {
    pub fn new(v1: f64, v2: f64, v3: Option<f64>, v4: Option<f64>) -> Self {
        Self { v1, v2, v3, v4 }
    }

    pub fn new_2d(v1: f64, v2: f64) -> Self {
        Self::new(v1, v2, None, None)
    }

    pub fn new_3d(v1: f64, v2: f64, v3: f64) -> Self {
        Self::new(v1, v2, Some(v3), None)
    }

    pub fn new_4d(v1: f64, v2: f64, v3: f64, v4: f64) -> Self {
        Self::new(v1, v2, Some(v3), Some(v4))
    }

    /// Build a coordinate from an engine result.
    ///
    /// Returns `None` unless there are 2, 3 or 4 components.
    pub fn from_components(values: &[f64]) -> Option<Self> {
        match *values {
            [v1, v2] => Some(Self::new_2d(v1, v2)),
            [v1, v2, v3] => Some(Self::new_3d(v1, v2, v3)),
            [v1, v2, v3, v4] => Some(Self::new_4d(v1, v2, v3, v4)),
            _ => None,
        }
    }

    /// The present components in order.
    ///
    /// Stops at the first absent component, so a `v4` without a `v3` is not
    /// passed on.
    pub fn components(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(4);
        values.push(self.v1);
        values.push(self.v2);
        if let Some(v3) = self.v3 {
            values.push(v3);
            if let Some(v4) = self.v4 {
                values.push(v4);
            }
        }
        values
    }

    /// The same coordinate with a `v4` that has no `v3` cleared.
    pub fn normalized(&self) -> Self {
        Self::new(self.v1, self.v2, self.v3, self.v3.and(self.v4))
    }

    /// Whether any present component is positive or negative infinity.
    pub fn has_infinite(&self) -> bool {
        self.components().iter().any(|v| v.is_infinite())
    }

    /// Parse the `v1,v2[,v3[,v4]]` path segment of a transformation request.
    ///
    /// Each component must be an integer or decimal literal, optionally
    /// negative: `12`, `-12.5`, `12.`, `.5`. Exponents, signs other than a
    /// leading `-`, `inf` and `nan` are rejected.
    pub fn from_path_segment(s: &str) -> Result<Self, CoordinateParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(CoordinateParseError::InvalidFormat(s.to_string()));
        }

        let mut values = Vec::with_capacity(parts.len());
        for part in parts {
            if !is_number_literal(part) {
                return Err(CoordinateParseError::InvalidNumber(part.to_string()));
            }
            let value: f64 = part
                .parse()
                .map_err(|_| CoordinateParseError::InvalidNumber(part.to_string()))?;
            values.push(value);
        }

        Self::from_components(&values).ok_or_else(|| CoordinateParseError::InvalidFormat(s.to_string()))
    }
}

fn is_number_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());

    match frac_part {
        None => !int_part.is_empty() && all_digits(int_part),
        Some(frac) if int_part.is_empty() => !frac.is_empty() && all_digits(frac),
        Some(frac) => all_digits(int_part) && all_digits(frac),
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoordinateParseError {
    #[error("Invalid coordinate format: {0}. Expected 'v1,v2[,v3[,v4]]'")]
    InvalidFormat(String),

    #[error("Invalid number in coordinate: {0}")]
    InvalidNumber(String),
}
