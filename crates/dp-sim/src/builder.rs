//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use dp_agent::AgentCell;
use dp_core::{AgentId, ShutdownSignal, SimConfig};
use dp_ring::ResourceRing;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                   |
/// |------------------|-------------------------------------------|
/// | `.ring(r)`       | A fresh ring of `config.agent_count` slots |
/// | `.shutdown(s)`   | A fresh `ShutdownSignal`                  |
///
/// Supplying the ring lets a harness hold a slot from outside the run;
/// supplying the signal lets the caller stop the run early.
///
/// # Example
///
/// ```rust,ignore
/// let ring = Arc::new(ResourceRing::new(config.agent_count));
/// let sim = SimBuilder::new(config)
///     .ring(ring.clone())
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:   SimConfig,
    ring:     Option<Arc<ResourceRing>>,
    shutdown: Option<ShutdownSignal>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, ring: None, shutdown: None }
    }

    /// Use an existing ring.  Its length must equal the agent count.
    pub fn ring(mut self, ring: Arc<ResourceRing>) -> Self {
        self.ring = Some(ring);
        self
    }

    /// Use an existing shutdown signal.  It must not have fired yet.
    pub fn shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let agent_count = self.config.agent_count;

        let ring = match self.ring {
            Some(r) => {
                if r.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      r.len(),
                        what:     "resource ring",
                    });
                }
                r
            }
            None => Arc::new(ResourceRing::new(agent_count)),
        };

        let shutdown = self.shutdown.unwrap_or_default();
        if let Some(reason) = shutdown.reason() {
            return Err(SimError::Config(dp_core::DpError::Config(format!(
                "shutdown signal already fired ({reason})"
            ))));
        }

        // validate() guarantees the count fits a u32.
        let cells = (0..agent_count as u32)
            .map(|i| AgentCell::new(AgentId(i)))
            .collect();

        Ok(Sim {
            config: self.config,
            ring,
            shutdown,
            cells,
        })
    }
}
