//! Finite-difference formulas and the built-in formula registry.
//!
//! A [`Formula`] is a stencil of `(offset, weight)` pairs together with the
//! order of the derivative it approximates and a default step size. For a
//! step `h`, a formula of order `k` approximates
//!
//! ```text
//! f⁽ᵏ⁾(x) ≈ Σᵢ wᵢ · f(x + oᵢ·h) / hᵏ
//! ```
//!
//! # Built-in formulas
//!
//! | Kind         | Stencil                     | Order | Default step |
//! |--------------|-----------------------------|-------|--------------|
//! | `Forward`    | (0, -1), (1, 1)             | 1     | 2e-8         |
//! | `Backward`   | (-1, -1), (0, 1)            | 1     | 2e-8         |
//! | `Central`    | (-1, -0.5), (1, 0.5)        | 1     | 6e-6         |
//! | `Central2nd` | (-1, 1), (0, -2), (1, 1)    | 2     | 1e-4         |
//!
//! The default steps balance truncation error against cancellation error:
//! one-sided formulas have O(h) truncation error and are best near
//! sqrt(ε), the symmetric ones are O(h²) and tolerate a larger step.
//!
//! The weights of every difference formula sum to zero. For the built-in
//! formulas the weights are small dyadic numbers, so the estimate for a
//! constant function is exactly zero. Custom weights such as `0.1` are not
//! exactly representable; their estimate for a constant vanishes only up to
//! rounding.

use crate::error::{FdError, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative tolerance on the sum of the weights of a custom formula.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-12;

/// One point of a stencil: an offset in multiples of the step and its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StencilPoint {
    /// Offset from the evaluation point, in multiples of the step
    pub loc: f64,
    /// Weight applied to the function value at this offset
    pub coeff: f64,
}

impl StencilPoint {
    /// Creates a stencil point.
    pub const fn new(loc: f64, coeff: f64) -> Self {
        Self { loc, coeff }
    }
}

/// Order of the derivative a formula approximates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DerivativeOrder {
    /// First derivative; the weighted sum is divided by `h`.
    First,
    /// Second derivative; the weighted sum is divided by `h²`.
    Second,
}

impl DerivativeOrder {
    /// Power of the step the weighted sum is divided by.
    pub fn exponent(self) -> u32 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// A finite-difference stencil.
///
/// Built-in formulas live in a static registry and are obtained with
/// [`lookup`] or [`FormulaKind::formula`]. Custom formulas are built with
/// [`Formula::new`], which validates them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Formula {
    stencil: Cow<'static, [StencilPoint]>,
    order: DerivativeOrder,
    step: f64,
}

impl Formula {
    /// Creates and validates a custom formula.
    ///
    /// # Errors
    ///
    /// Returns `FdError::InvalidFormula` if the stencil is empty, contains
    /// non-finite or duplicate offsets, has weights that do not sum to zero,
    /// or if `step` is not positive and finite.
    ///
    /// The weight sum is checked with a relative tolerance of `1e-12`. Unless
    /// every weight times the function value is exact in floating point, the
    /// derivative of a constant function is then zero only up to rounding.
    pub fn new(stencil: Vec<StencilPoint>, order: DerivativeOrder, step: f64) -> Result<Self> {
        let formula = Self {
            stencil: Cow::Owned(stencil),
            order,
            step,
        };
        formula.validate()?;
        Ok(formula)
    }

    /// The stencil points, in declaration order.
    pub fn stencil(&self) -> &[StencilPoint] {
        &self.stencil
    }

    /// The derivative order.
    pub fn order(&self) -> DerivativeOrder {
        self.order
    }

    /// The default step used when no explicit step is configured.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Whether the stencil evaluates the function at the origin itself.
    pub fn uses_origin(&self) -> bool {
        self.stencil.iter().any(|p| p.loc == 0.0)
    }

    /// Checks the structural invariants of the formula.
    pub fn validate(&self) -> Result<()> {
        if self.stencil.is_empty() {
            return Err(FdError::invalid_formula("stencil is empty"));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(FdError::invalid_formula(format!(
                "default step must be positive and finite, got {}",
                self.step
            )));
        }

        for (i, p) in self.stencil.iter().enumerate() {
            if !p.loc.is_finite() || !p.coeff.is_finite() {
                return Err(FdError::invalid_formula(format!(
                    "stencil point {} is not finite: ({}, {})",
                    i, p.loc, p.coeff
                )));
            }
            if self.stencil[..i].iter().any(|q| q.loc == p.loc) {
                return Err(FdError::invalid_formula(format!(
                    "duplicate stencil offset {}",
                    p.loc
                )));
            }
        }

        let sum: f64 = self.stencil.iter().map(|p| p.coeff).sum();
        let scale: f64 = self.stencil.iter().map(|p| p.coeff.abs()).sum();
        if sum.abs() > WEIGHT_SUM_TOLERANCE * scale.max(1.0) {
            return Err(FdError::invalid_formula(format!(
                "weights sum to {} instead of zero",
                sum
            )));
        }

        Ok(())
    }

    /// Rejects formulas that are not first order.
    pub(crate) fn require_first_order(&self, operation: &str) -> Result<()> {
        match self.order {
            DerivativeOrder::First => Ok(()),
            order => Err(FdError::unsupported_order(operation, order.exponent())),
        }
    }
}

impl From<FormulaKind> for Formula {
    fn from(kind: FormulaKind) -> Self {
        lookup(kind).clone()
    }
}

/// Identifiers of the built-in formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FormulaKind {
    /// Two-point forward difference.
    Forward = 0,
    /// Two-point backward difference.
    Backward = 1,
    /// Two-point symmetric difference.
    #[default]
    Central = 2,
    /// Three-point symmetric second difference.
    Central2nd = 3,
}

impl FormulaKind {
    /// All built-in kinds, in registry order.
    pub const ALL: [FormulaKind; 4] = [
        FormulaKind::Forward,
        FormulaKind::Backward,
        FormulaKind::Central,
        FormulaKind::Central2nd,
    ];

    /// The registry entry for this kind.
    pub fn formula(self) -> &'static Formula {
        lookup(self)
    }

    /// Canonical lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Central => "central",
            Self::Central2nd => "central2nd",
        }
    }
}

impl fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for FormulaKind {
    type Err = FdError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        FormulaKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| FdError::unknown_formula(s))
    }
}

static FORWARD_STENCIL: [StencilPoint; 2] =
    [StencilPoint::new(0.0, -1.0), StencilPoint::new(1.0, 1.0)];
static BACKWARD_STENCIL: [StencilPoint; 2] =
    [StencilPoint::new(-1.0, -1.0), StencilPoint::new(0.0, 1.0)];
static CENTRAL_STENCIL: [StencilPoint; 2] =
    [StencilPoint::new(-1.0, -0.5), StencilPoint::new(1.0, 0.5)];
static CENTRAL_2ND_STENCIL: [StencilPoint; 3] = [
    StencilPoint::new(-1.0, 1.0),
    StencilPoint::new(0.0, -2.0),
    StencilPoint::new(1.0, 1.0),
];

/// Indexed by `FormulaKind as usize`.
static REGISTRY: [Formula; 4] = [
    Formula {
        stencil: Cow::Borrowed(&FORWARD_STENCIL),
        order: DerivativeOrder::First,
        step: 2e-8,
    },
    Formula {
        stencil: Cow::Borrowed(&BACKWARD_STENCIL),
        order: DerivativeOrder::First,
        step: 2e-8,
    },
    Formula {
        stencil: Cow::Borrowed(&CENTRAL_STENCIL),
        order: DerivativeOrder::First,
        step: 6e-6,
    },
    Formula {
        stencil: Cow::Borrowed(&CENTRAL_2ND_STENCIL),
        order: DerivativeOrder::Second,
        step: 1e-4,
    },
];

/// Returns the built-in formula for `kind`.
pub fn lookup(kind: FormulaKind) -> &'static Formula {
    &REGISTRY[kind as usize]
}
