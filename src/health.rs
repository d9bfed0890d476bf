//! Dependency health-check registry
//!
//! Dependencies register a named prober once at startup; `ping` walks every
//! entry sequentially and aggregates the results into a single report. A
//! failing probe is data, not an error: the registry itself never fails.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type ProbeError = Box<dyn std::error::Error + Send + Sync>;

/// Cancellation signal handed to every prober.
///
/// Probing is sequential and is not cut short by an expired deadline; each
/// subsequent prober observes the expiry via [`ProbeContext::check`] and is
/// expected to fail fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbeContext {
    deadline: Option<Instant>,
}

impl ProbeContext {
    /// A context that never expires.
    pub fn background() -> Self {
        Self { deadline: None }
    }

    /// A context that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err` once the deadline has passed, for probers to propagate.
    pub fn check(&self) -> Result<(), ProbeError> {
        if self.is_expired() {
            Err("probe deadline exceeded".into())
        } else {
            Ok(())
        }
    }
}

/// Liveness prober for one dependency.
pub trait HealthCheck: Send + Sync {
    fn ping(&self, ctx: &ProbeContext) -> Result<(), ProbeError>;
}

impl<F> HealthCheck for F
where
    F: Fn(&ProbeContext) -> Result<(), ProbeError> + Send + Sync,
{
    fn ping(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        self(ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub name: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: Status,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<Detail>,
}

/// Named probers behind one read/write lock.
pub struct Registry {
    entries: RwLock<Vec<(String, Arc<dyn HealthCheck>)>>,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Register a dependency to monitor.
    ///
    /// # Panics
    ///
    /// Registering the same name twice is a programming error and panics.
    pub fn register(&self, name: impl Into<String>, check: impl HealthCheck + 'static) {
        let name = name.into();
        let check: Arc<dyn HealthCheck> = Arc::new(check);
        let mut entries = self.entries.write();
        if entries.iter().any(|(existing, _)| *existing == name) {
            panic!("health: register called twice for check {}", name);
        }
        entries.push((name, check));
    }

    /// Probe every registered dependency in registration order.
    ///
    /// Overall status is `down` if any probe fails; per-entry errors carry
    /// the probe's message and are omitted on success.
    pub fn ping(&self, ctx: &ProbeContext) -> Health {
        let entries = self.entries.read();
        let mut status = Status::Up;
        let mut details = Vec::with_capacity(entries.len());

        for (name, check) in entries.iter() {
            match check.ping(ctx) {
                Ok(()) => details.push(Detail {
                    name: name.clone(),
                    status: Status::Up,
                    error: None,
                }),
                Err(err) => {
                    status = Status::Down;
                    details.push(Detail {
                        name: name.clone(),
                        status: Status::Down,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Health { status, details }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Registry = Registry::new();

/// The process-wide registry.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Register a dependency with the process-wide registry.
pub fn register(name: impl Into<String>, check: impl HealthCheck + 'static) {
    DEFAULT_REGISTRY.register(name, check)
}

/// Probe every dependency in the process-wide registry.
pub fn ping(ctx: &ProbeContext) -> Health {
    DEFAULT_REGISTRY.ping(ctx)
}
