//! Evaluator contract for the Sill engine.
//!
//! The engine never parses or executes statements itself; it hands each
//! separator-delimited fragment to an implementation of [`Evaluate`] and
//! classifies the returned [`Outcome`]. The outcome is an exhaustive tagged
//! variant so every consumer is forced to handle all four cases.
//!
//! The crate also ships [`MlEvaluator`], a small ML-flavoured evaluator for
//! integer `val` bindings. It exists so the CLI and the engine's integration
//! tests have a real collaborator to drive; production hosts plug in their
//! own language.

mod ml;
mod outcome;

pub use ml::{MlEvaluator, MlState};
pub use outcome::Outcome;

/// A language evaluator the engine can drive.
///
/// # Contract
///
/// - `evaluate` must be deterministic for identical `(fragment, prior)`.
/// - `fragment` must not be retained beyond the call.
/// - All failures are expressed through [`Outcome`]; an unclassifiable
///   collaborator failure maps to `Outcome::Error { offset: None, .. }`.
pub trait Evaluate {
    /// Opaque accumulated-bindings state threaded between statements.
    ///
    /// The engine only clones and stores it; it never inspects it.
    type State: Clone;

    /// Evaluate one statement fragment against the prior state.
    ///
    /// The fragment is the statement text *without* its closing separator;
    /// `prior` is absent for the first statement and after a static error.
    fn evaluate(&mut self, fragment: &str, prior: Option<&Self::State>) -> Outcome<Self::State>;
}
