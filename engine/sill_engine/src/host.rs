//! The text-buffer host seam.
//!
//! The engine owns no text and draws no UI. Everything it needs from the
//! surrounding editor goes through [`Host`]: fetching the buffer tail,
//! placing and releasing range decorations, and publishing the aggregated
//! log after each pass.

use crate::pos::Pos;

/// Visual style of a statement range decoration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MarkStyle {
    /// The statement evaluated successfully.
    Success,
    /// The statement failed (static error or runtime exception).
    Failure,
}

/// Collaborator contract between the engine and its editor host.
///
/// One engine instance is bound to one editable document; the host is free
/// to assume calls arrive on a single thread, in pass order.
pub trait Host {
    /// Decoration handle. Moved into the checkpoint that owns it and moved
    /// back out exactly once on release, so a handle can never be released
    /// twice.
    type Mark;

    /// Buffer contents from `pos` to end of document, reflecting the buffer
    /// state at call time.
    fn text_from(&self, pos: Pos) -> String;

    /// Decorate the half-open source range `from..to`.
    fn mark(&mut self, from: Pos, to: Pos, style: MarkStyle) -> Self::Mark;

    /// Release a decoration previously returned by [`Host::mark`].
    fn release(&mut self, mark: Self::Mark);

    /// Receive the aggregated output log. Called once per completed pass.
    fn publish(&mut self, output: &str);
}
