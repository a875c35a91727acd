//! Fixed-point resource quantities.
//!
//! A [`Quantity`] is an exact count of thousandths of its base unit (cores,
//! bytes, devices). The textual form follows the cluster's quantity grammar:
//! an optionally signed decimal number followed by a decimal SI suffix
//! (`n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`), a binary suffix
//! (`Ki` … `Ei`), or a decimal exponent (`e3`, `E-2`).
//!
//! Values finer than one milli-unit round up to the next milli-unit, the
//! same rounding the cluster applies when it reports milli values.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{QuantityError, QuantityResult};

/// Largest decimal exponent accepted in `e<exp>` notation.
const MAX_EXPONENT: u32 = 64;

/// Exact resource amount in milli-units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity {
    milli: i64,
}

impl Quantity {
    pub const ZERO: Quantity = Quantity { milli: 0 };

    pub const fn from_milli(milli: i64) -> Self {
        Self { milli }
    }

    pub const fn from_units(units: i64) -> Self {
        Self {
            milli: units.saturating_mul(1000),
        }
    }

    pub const fn milli(self) -> i64 {
        self.milli
    }

    pub const fn is_zero(self) -> bool {
        self.milli == 0
    }

    pub const fn is_positive(self) -> bool {
        self.milli > 0
    }

    /// Value in base units as a float (e.g. fractional cores).
    pub fn as_f64(self) -> f64 {
        self.milli as f64 / 1000.0
    }

    /// Whole base units, rounded up away from zero.
    pub fn ceil_units(self) -> i64 {
        let whole = self.milli / 1000;
        match self.milli % 1000 {
            0 => whole,
            rem if rem > 0 => whole + 1,
            _ => whole - 1,
        }
    }

    pub fn parse(input: &str) -> QuantityResult<Self> {
        input.parse()
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (negative, body) = match input.as_bytes().first() {
            None => return Err(QuantityError::Empty),
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            Some(_) => (false, input),
        };

        let split = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (number, suffix) = body.split_at(split);
        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(QuantityError::InvalidNumber(s.to_string()));
        }

        let (exp10, binary_shift) =
            parse_suffix(suffix).ok_or_else(|| QuantityError::InvalidSuffix(s.to_string()))?;

        let overflow = || QuantityError::Overflow(s.to_string());

        let digits = format!("{whole}{fraction}");
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(Self::ZERO);
        }
        if digits.len() > 30 || exp10.unsigned_abs() > MAX_EXPONENT {
            return Err(overflow());
        }
        let mantissa: i128 = digits
            .parse()
            .map_err(|_| QuantityError::InvalidNumber(s.to_string()))?;
        let scaled = mantissa
            .checked_mul(1i128 << binary_shift)
            .ok_or_else(overflow)?;

        // Shift from the written units to milli-units.
        let exponent = exp10 - fraction.len() as i32 + 3;
        let milli = if exponent >= 0 {
            10i128
                .checked_pow(exponent as u32)
                .and_then(|factor| scaled.checked_mul(factor))
                .ok_or_else(overflow)?
        } else {
            match 10i128.checked_pow(exponent.unsigned_abs()) {
                Some(divisor) => ceil_div(scaled, divisor),
                None => i128::from(scaled != 0),
            }
        };

        let milli = i64::try_from(milli).map_err(|_| overflow())?;
        Ok(Self {
            milli: if negative { -milli } else { milli },
        })
    }
}

/// Map a suffix to `(decimal exponent, binary shift)`.
fn parse_suffix(suffix: &str) -> Option<(i32, u32)> {
    let parsed = match suffix {
        "" => (0, 0),
        "n" => (-9, 0),
        "u" => (-6, 0),
        "m" => (-3, 0),
        "k" => (3, 0),
        "M" => (6, 0),
        "G" => (9, 0),
        "T" => (12, 0),
        "P" => (15, 0),
        "E" => (18, 0),
        "Ki" => (0, 10),
        "Mi" => (0, 20),
        "Gi" => (0, 30),
        "Ti" => (0, 40),
        "Pi" => (0, 50),
        "Ei" => (0, 60),
        other => {
            let exp = other.strip_prefix(['e', 'E'])?;
            (exp.parse().ok()?, 0)
        }
    };
    Some(parsed)
}

fn ceil_div(value: i128, divisor: i128) -> i128 {
    value / divisor + i128::from(value % divisor != 0)
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milli % 1000 == 0 {
            write!(f, "{}", self.milli / 1000)
        } else {
            write!(f, "{}m", self.milli)
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity::from_milli(self.milli.saturating_add(rhs.milli))
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        *self = *self + rhs;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity::from_milli(self.milli.saturating_sub(rhs.milli))
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        *self = *self - rhs;
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::from_milli(self.milli.saturating_neg())
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

/// Accepts `"4000m"`-style strings as well as bare JSON numbers.
struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a resource quantity string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        v.checked_mul(1000)
            .map(Quantity::from_milli)
            .ok_or_else(|| E::custom(QuantityError::Overflow(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(QuantityError::Overflow(v.to_string())))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        self.visit_str(&v.to_string())
    }
}
