//! absorb::models — user-facing absorption driver and its result type.
//!
//! [`Absorber`] orchestrates the core kernels (encoding, accumulation,
//! demeaning, nesting detection) into the full within-transformation:
//! single-effect exact demeaning and multi-effect alternating projection
//! with convergence control. [`TransformResult`] is the value object every
//! call returns, carrying the demeaned matrix and structured diagnostics.

pub mod absorber;
pub mod outcome;

pub use self::absorber::Absorber;
pub use self::outcome::TransformResult;
