// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fixed-point decimal value.
//!
//! A `Real` is a signed mantissa scaled by a hint: either a power of ten
//! (exponent hints) or a binary fraction denominator (fraction hints).
//! Three additional hints encode the non-finite values infinity, negative
//! infinity, and not-a-number; those carry no mantissa on the wire.

use crate::core::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scaling hint for a [`Real`] mantissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RealHint {
    /// Scale by 10^-14
    ExponentNeg14 = 0,
    /// Scale by 10^-13
    ExponentNeg13 = 1,
    /// Scale by 10^-12
    ExponentNeg12 = 2,
    /// Scale by 10^-11
    ExponentNeg11 = 3,
    /// Scale by 10^-10
    ExponentNeg10 = 4,
    /// Scale by 10^-9
    ExponentNeg9 = 5,
    /// Scale by 10^-8
    ExponentNeg8 = 6,
    /// Scale by 10^-7
    ExponentNeg7 = 7,
    /// Scale by 10^-6
    ExponentNeg6 = 8,
    /// Scale by 10^-5
    ExponentNeg5 = 9,
    /// Scale by 10^-4
    ExponentNeg4 = 10,
    /// Scale by 10^-3
    ExponentNeg3 = 11,
    /// Scale by 10^-2
    ExponentNeg2 = 12,
    /// Scale by 10^-1
    ExponentNeg1 = 13,
    /// No scaling
    Exponent0 = 14,
    /// Scale by 10^1
    Exponent1 = 15,
    /// Scale by 10^2
    Exponent2 = 16,
    /// Scale by 10^3
    Exponent3 = 17,
    /// Scale by 10^4
    Exponent4 = 18,
    /// Scale by 10^5
    Exponent5 = 19,
    /// Scale by 10^6
    Exponent6 = 20,
    /// Scale by 10^7
    Exponent7 = 21,
    /// Whole number (denominator 1)
    Fraction1 = 22,
    /// Halves
    Fraction2 = 23,
    /// Quarters
    Fraction4 = 24,
    /// Eighths
    Fraction8 = 25,
    /// Sixteenths
    Fraction16 = 26,
    /// Thirty-seconds
    Fraction32 = 27,
    /// Sixty-fourths
    Fraction64 = 28,
    /// 128ths
    Fraction128 = 29,
    /// 256ths
    Fraction256 = 30,
    /// Positive infinity (no mantissa)
    Infinity = 33,
    /// Negative infinity (no mantissa)
    NegInfinity = 34,
    /// Not a number (no mantissa)
    NotANumber = 35,
}

impl RealHint {
    /// Decode a hint from its wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(RealHint::ExponentNeg14),
            1 => Ok(RealHint::ExponentNeg13),
            2 => Ok(RealHint::ExponentNeg12),
            3 => Ok(RealHint::ExponentNeg11),
            4 => Ok(RealHint::ExponentNeg10),
            5 => Ok(RealHint::ExponentNeg9),
            6 => Ok(RealHint::ExponentNeg8),
            7 => Ok(RealHint::ExponentNeg7),
            8 => Ok(RealHint::ExponentNeg6),
            9 => Ok(RealHint::ExponentNeg5),
            10 => Ok(RealHint::ExponentNeg4),
            11 => Ok(RealHint::ExponentNeg3),
            12 => Ok(RealHint::ExponentNeg2),
            13 => Ok(RealHint::ExponentNeg1),
            14 => Ok(RealHint::Exponent0),
            15 => Ok(RealHint::Exponent1),
            16 => Ok(RealHint::Exponent2),
            17 => Ok(RealHint::Exponent3),
            18 => Ok(RealHint::Exponent4),
            19 => Ok(RealHint::Exponent5),
            20 => Ok(RealHint::Exponent6),
            21 => Ok(RealHint::Exponent7),
            22 => Ok(RealHint::Fraction1),
            23 => Ok(RealHint::Fraction2),
            24 => Ok(RealHint::Fraction4),
            25 => Ok(RealHint::Fraction8),
            26 => Ok(RealHint::Fraction16),
            27 => Ok(RealHint::Fraction32),
            28 => Ok(RealHint::Fraction64),
            29 => Ok(RealHint::Fraction128),
            30 => Ok(RealHint::Fraction256),
            33 => Ok(RealHint::Infinity),
            34 => Ok(RealHint::NegInfinity),
            35 => Ok(RealHint::NotANumber),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized real hint code {other}"
            ))),
        }
    }

    /// Get the wire code for this hint.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Check if this hint encodes a non-finite value with no mantissa.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            RealHint::Infinity | RealHint::NegInfinity | RealHint::NotANumber
        )
    }

    /// Get the decimal exponent for exponent hints.
    #[must_use]
    pub const fn exponent(self) -> Option<i32> {
        let code = self.code();
        if code <= 21 {
            Some(code as i32 - 14)
        } else {
            None
        }
    }

    /// Get the denominator for fraction hints.
    #[must_use]
    pub const fn denominator(self) -> Option<u32> {
        let code = self.code();
        if code >= 22 && code <= 30 {
            Some(1u32 << (code - 22))
        } else {
            None
        }
    }
}

/// Fixed-point decimal: mantissa plus scaling hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Real {
    /// Signed mantissa; ignored for special hints
    pub mantissa: i64,
    /// Scaling hint
    pub hint: RealHint,
}

impl Real {
    /// Create a real from a mantissa and hint.
    #[must_use]
    pub const fn new(mantissa: i64, hint: RealHint) -> Self {
        Self { mantissa, hint }
    }

    /// Positive infinity.
    #[must_use]
    pub const fn infinity() -> Self {
        Self::new(0, RealHint::Infinity)
    }

    /// Negative infinity.
    #[must_use]
    pub const fn neg_infinity() -> Self {
        Self::new(0, RealHint::NegInfinity)
    }

    /// Not a number.
    #[must_use]
    pub const fn not_a_number() -> Self {
        Self::new(0, RealHint::NotANumber)
    }

    /// Convert to a double.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self.hint {
            RealHint::Infinity => f64::INFINITY,
            RealHint::NegInfinity => f64::NEG_INFINITY,
            RealHint::NotANumber => f64::NAN,
            hint => {
                if let Some(exp) = hint.exponent() {
                    self.mantissa as f64 * 10f64.powi(exp)
                } else {
                    // Remaining hints are fractional by construction.
                    let denom = hint.denominator().unwrap_or(1);
                    self.mantissa as f64 / f64::from(denom)
                }
            }
        }
    }

    /// Build a real from a double using the given scaling hint.
    ///
    /// The mantissa is the rounded scaled value. Fails for special hints
    /// and for non-finite inputs; use the dedicated constructors for those.
    pub fn from_f64(value: f64, hint: RealHint) -> Result<Self> {
        if hint.is_special() {
            return Err(CodecError::invalid_argument(
                "special real hints take no mantissa",
            ));
        }
        if !value.is_finite() {
            return Err(CodecError::invalid_argument(
                "non-finite value requires a special real hint",
            ));
        }
        let scaled = if let Some(exp) = hint.exponent() {
            value / 10f64.powi(exp)
        } else {
            value * f64::from(hint.denominator().unwrap_or(1))
        };
        let rounded = scaled.round();
        if rounded > i64::MAX as f64 || rounded < i64::MIN as f64 {
            return Err(CodecError::invalid_argument(
                "scaled value exceeds mantissa range",
            ));
        }
        Ok(Self::new(rounded as i64, hint))
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hint {
            RealHint::Infinity => return write!(f, "Inf"),
            RealHint::NegInfinity => return write!(f, "-Inf"),
            RealHint::NotANumber => return write!(f, "NaN"),
            _ => {}
        }
        if let Some(denom) = self.hint.denominator() {
            if denom == 1 {
                return write!(f, "{}", self.mantissa);
            }
            return write!(f, "{}/{}", self.mantissa, denom);
        }
        // Exponent hints render as plain decimal text.
        let exp = self.hint.exponent().unwrap_or(0);
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        if exp >= 0 {
            return write!(f, "{sign}{digits}{}", "0".repeat(exp as usize));
        }
        let places = (-exp) as usize;
        if digits.len() > places {
            let split = digits.len() - places;
            write!(f, "{sign}{}.{}", &digits[..split], &digits[split..])
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(places - digits.len()))
        }
    }
}
