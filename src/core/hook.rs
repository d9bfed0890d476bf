//! Hooks enrich a record immediately before a sink emission

use super::level::Level;
use super::record::Record;

/// A capability applied to each record right before it is finalized.
///
/// Hooks run once per sink emission, in registration order, and may add
/// fields or perform side effects.
pub trait Hook: Send + Sync {
    fn run(&self, event: &mut Record, level: Level, message: &str);
}

/// Adaptor to allow the use of an ordinary closure as a [`Hook`].
pub struct HookFn<F>(pub F);

impl<F> Hook for HookFn<F>
where
    F: Fn(&mut Record, Level, &str) + Send + Sync,
{
    fn run(&self, event: &mut Record, level: Level, message: &str) {
        (self.0)(event, level, message)
    }
}
