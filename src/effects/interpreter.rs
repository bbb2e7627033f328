//! Effect interpreter trait.
//!
//! Storage backends implement [`EffectInterpreter`]. The in-memory pool in
//! [`crate::pool::InMemoryPool`] is the reference implementation and the one
//! the tests use.

use super::Effect;

/// Applies effect batches to pool storage.
///
/// A batch is all-or-nothing: if any effect in it fails, none of the batch
/// is visible afterwards.
///
/// # Example (recording interpreter for testing)
///
/// ```ignore
/// struct Recorder(Vec<Effect>);
///
/// impl EffectInterpreter for Recorder {
///     type Error = std::convert::Infallible;
///
///     fn apply(&mut self, batch: &[Effect]) -> Result<(), Self::Error> {
///         self.0.extend_from_slice(batch);
///         Ok(())
///     }
/// }
/// ```
pub trait EffectInterpreter {
    /// The error type returned by this interpreter.
    type Error;

    /// Apply every effect of `batch`, in order, atomically.
    fn apply(&mut self, batch: &[Effect]) -> Result<(), Self::Error>;
}
