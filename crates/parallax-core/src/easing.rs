//! Progress remapping curves.
//!
//! An [`Easing`] is either one of the named cubic-bezier presets, explicit
//! control points, or a caller-supplied function. Unknown names and control
//! points outside the valid range are rejected when the configuration is
//! built, never at evaluation time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EasingError {
    #[error("unknown easing name: \"{0}\"")]
    UnknownName(String),

    #[error("cubic-bezier needs exactly 4 control values, got {0}")]
    WrongArity(usize),

    #[error("cubic-bezier x values must lie in [0, 1], got x1={x1}, x2={x2}")]
    XOutOfRange { x1: f64, x2: f64 },

    #[error("cubic-bezier control values must be finite")]
    NotFinite,

    #[error("invalid cubic-bezier control value: \"{0}\"")]
    InvalidControlValue(String),
}

// ==================== Named presets ====================

macro_rules! named_easings {
    ($($variant:ident => $name:literal, [$x1:expr, $y1:expr, $x2:expr, $y2:expr];)*) => {
        /// Standard cubic-bezier presets.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NamedEasing {
            $($variant,)*
        }

        impl NamedEasing {
            /// All presets in table order.
            pub const ALL: &'static [NamedEasing] = &[$(NamedEasing::$variant,)*];

            /// Configuration name, e.g. `"easeInOutQuad"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(NamedEasing::$variant => $name,)*
                }
            }

            /// `[x1, y1, x2, y2]` control points.
            pub fn control_points(self) -> [f64; 4] {
                match self {
                    $(NamedEasing::$variant => [$x1, $y1, $x2, $y2],)*
                }
            }
        }
    };
}

named_easings! {
    Ease => "ease", [0.25, 0.1, 0.25, 1.0];
    EaseIn => "easeIn", [0.42, 0.0, 1.0, 1.0];
    EaseOut => "easeOut", [0.0, 0.0, 0.58, 1.0];
    EaseInOut => "easeInOut", [0.42, 0.0, 0.58, 1.0];
    EaseInSine => "easeInSine", [0.47, 0.0, 0.745, 0.715];
    EaseOutSine => "easeOutSine", [0.39, 0.575, 0.565, 1.0];
    EaseInOutSine => "easeInOutSine", [0.445, 0.05, 0.55, 0.95];
    EaseInQuad => "easeInQuad", [0.55, 0.085, 0.68, 0.53];
    EaseOutQuad => "easeOutQuad", [0.25, 0.46, 0.45, 0.94];
    EaseInOutQuad => "easeInOutQuad", [0.455, 0.03, 0.515, 0.955];
    EaseInCubic => "easeInCubic", [0.55, 0.055, 0.675, 0.19];
    EaseOutCubic => "easeOutCubic", [0.215, 0.61, 0.355, 1.0];
    EaseInOutCubic => "easeInOutCubic", [0.645, 0.045, 0.355, 1.0];
    EaseInQuart => "easeInQuart", [0.895, 0.03, 0.685, 0.22];
    EaseOutQuart => "easeOutQuart", [0.165, 0.84, 0.44, 1.0];
    EaseInOutQuart => "easeInOutQuart", [0.77, 0.0, 0.175, 1.0];
    EaseInQuint => "easeInQuint", [0.755, 0.05, 0.855, 0.06];
    EaseOutQuint => "easeOutQuint", [0.23, 1.0, 0.32, 1.0];
    EaseInOutQuint => "easeInOutQuint", [0.86, 0.0, 0.07, 1.0];
    EaseInExpo => "easeInExpo", [0.95, 0.05, 0.795, 0.035];
    EaseOutExpo => "easeOutExpo", [0.19, 1.0, 0.22, 1.0];
    EaseInOutExpo => "easeInOutExpo", [1.0, 0.0, 0.0, 1.0];
    EaseInCirc => "easeInCirc", [0.6, 0.04, 0.98, 0.335];
    EaseOutCirc => "easeOutCirc", [0.075, 0.82, 0.165, 1.0];
    EaseInOutCirc => "easeInOutCirc", [0.785, 0.135, 0.15, 0.86];
}

impl NamedEasing {
    pub fn curve(self) -> CubicBezier {
        let [x1, y1, x2, y2] = self.control_points();
        CubicBezier { x1, y1, x2, y2 }
    }
}

impl FromStr for NamedEasing {
    type Err = EasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NamedEasing::ALL
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| EasingError::UnknownName(s.to_string()))
    }
}

// ==================== Cubic bezier ====================

const NEWTON_ITERATIONS: usize = 8;
const SUBDIVISION_ITERATIONS: usize = 32;
const PRECISION: f64 = 1e-7;
const MIN_SLOPE: f64 = 1e-6;

/// A CSS-style cubic-bezier curve from (0,0) to (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Build a curve; x control values must lie in `[0, 1]`.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, EasingError> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(EasingError::NotFinite);
        }
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(EasingError::XOutOfRange { x1, x2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn control_points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Evaluate the curve's y for a given x (progress) in `[0, 1]`.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        if self.x1 == self.y1 && self.x2 == self.y2 {
            return x;
        }

        bezier_value(self.y1, self.y2, self.solve_t_for_x(x))
    }

    /// Newton-Raphson, falling back to bisection when the slope flattens.
    fn solve_t_for_x(&self, x: f64) -> f64 {
        let mut guess = x;
        for _ in 0..NEWTON_ITERATIONS {
            let error = bezier_value(self.x1, self.x2, guess) - x;
            if error.abs() < PRECISION {
                return guess;
            }
            let slope = bezier_derivative(self.x1, self.x2, guess);
            if slope.abs() < MIN_SLOPE {
                break;
            }
            guess -= error / slope;
            if !(0.0..=1.0).contains(&guess) {
                break;
            }
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = x;
        for _ in 0..SUBDIVISION_ITERATIONS {
            let value = bezier_value(self.x1, self.x2, t);
            if (value - x).abs() < PRECISION {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }
}

/// B(t) = 3*mt^2*t*P1 + 3*mt*t^2*P2 + t^3
fn bezier_value(p1: f64, p2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t2 * p2 + t2 * t
}

/// B'(t) = 3*mt^2*P1 + 6*mt*t*(P2-P1) + 3*t^2*(1-P2)
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

// ==================== Easing ====================

/// Caller-supplied remapping function.
#[derive(Clone)]
pub struct CustomEasing(Arc<dyn Fn(f64) -> f64 + Send + Sync>);

impl CustomEasing {
    pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, t: f64) -> f64 {
        (self.0)(t)
    }
}

impl fmt::Debug for CustomEasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomEasing(..)")
    }
}

impl PartialEq for CustomEasing {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Progress remapping applied by a segment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawEasing")]
pub enum Easing {
    Named(NamedEasing),
    CubicBezier(CubicBezier),
    Custom(CustomEasing),
}

impl Easing {
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, EasingError> {
        CubicBezier::new(x1, y1, x2, y2).map(Easing::CubicBezier)
    }

    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Easing::Custom(CustomEasing::new(f))
    }

    /// Remap progress `t`.
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Named(named) => named.curve().evaluate(t),
            Easing::CubicBezier(curve) => curve.evaluate(t),
            Easing::Custom(custom) => custom.apply(t),
        }
    }
}

impl FromStr for Easing {
    type Err = EasingError;

    /// A preset name or `cubic-bezier(x1, y1, x2, y2)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(inner) = trimmed
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts = inner
                .split(',')
                .map(|p| {
                    let p = p.trim();
                    p.parse::<f64>()
                        .map_err(|_| EasingError::InvalidControlValue(p.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Easing::try_from(parts);
        }
        trimmed.parse().map(Easing::Named)
    }
}

impl TryFrom<Vec<f64>> for Easing {
    type Error = EasingError;

    fn try_from(points: Vec<f64>) -> Result<Self, Self::Error> {
        match points.as_slice() {
            &[x1, y1, x2, y2] => Easing::cubic_bezier(x1, y1, x2, y2),
            other => Err(EasingError::WrongArity(other.len())),
        }
    }
}

impl From<NamedEasing> for Easing {
    fn from(named: NamedEasing) -> Self {
        Easing::Named(named)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEasing {
    Name(String),
    Points(Vec<f64>),
}

impl TryFrom<RawEasing> for Easing {
    type Error = EasingError;

    fn try_from(raw: RawEasing) -> Result<Self, Self::Error> {
        match raw {
            RawEasing::Name(name) => name.parse(),
            RawEasing::Points(points) => Easing::try_from(points),
        }
    }
}

/// Resolve an optional easing into a remapping function; `None` is identity.
pub fn resolve(easing: Option<&Easing>) -> impl Fn(f64) -> f64 + '_ {
    move |t| match easing {
        Some(easing) => easing.apply(t),
        None => t,
    }
}
