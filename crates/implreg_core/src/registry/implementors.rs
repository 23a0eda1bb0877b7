//! In-process implementors registry with a pending holder and one consumer.

use crate::model::contribution::Contribution;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Sink the documentation UI installs to receive contributions.
///
/// Implemented for every `FnMut(Contribution)` so a plain closure can be
/// installed directly.
pub trait ImplementorsConsumer {
    fn accept(&mut self, contribution: Contribution);
}

impl<F> ImplementorsConsumer for F
where
    F: FnMut(Contribution),
{
    fn accept(&mut self, contribution: Contribution) {
        self(contribution)
    }
}

/// How contributions are held while no consumer is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingPolicy {
    /// Keep only the most recent contribution; earlier ones are superseded.
    #[default]
    SingleSlot,
    /// Keep every contribution in registration order.
    Buffered,
}

impl PendingPolicy {
    /// Stable string id used by config and CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleSlot => PENDING_POLICY_SINGLE_SLOT,
            Self::Buffered => PENDING_POLICY_BUFFERED,
        }
    }
}

/// Config/CLI string value for [`PendingPolicy::SingleSlot`].
pub const PENDING_POLICY_SINGLE_SLOT: &str = "single-slot";
/// Config/CLI string value for [`PendingPolicy::Buffered`].
pub const PENDING_POLICY_BUFFERED: &str = "buffered";

/// Observable lifecycle state of one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No consumer, nothing pending.
    Uninitialized,
    /// Contributions held, waiting for a consumer.
    PendingHeld,
    /// A consumer is installed; contributions are forwarded on arrival.
    ConsumerActive,
}

/// Merge point between fragment loads and the documentation UI.
///
/// One instance lives for one rendered documentation session. The consumer
/// may borrow from the session owner for `'c`.
pub struct ImplementorsRegistry<'c> {
    policy: PendingPolicy,
    pending: Vec<Contribution>,
    consumer: Option<Box<dyn ImplementorsConsumer + 'c>>,
}

impl<'c> ImplementorsRegistry<'c> {
    pub fn new() -> Self {
        Self::with_policy(PendingPolicy::default())
    }

    pub fn with_policy(policy: PendingPolicy) -> Self {
        Self {
            policy,
            pending: Vec::new(),
            consumer: None,
        }
    }

    pub fn policy(&self) -> PendingPolicy {
        self.policy
    }

    pub fn state(&self) -> RegistryState {
        if self.consumer.is_some() {
            RegistryState::ConsumerActive
        } else if self.pending.is_empty() {
            RegistryState::Uninitialized
        } else {
            RegistryState::PendingHeld
        }
    }

    pub fn has_consumer(&self) -> bool {
        self.consumer.is_some()
    }

    /// Number of contributions waiting for a consumer.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Registers one fragment's contribution.
    ///
    /// Forwards synchronously when a consumer is installed; otherwise the
    /// contribution is held according to the pending policy.
    pub fn register(&mut self, contribution: Contribution) {
        if let Some(consumer) = self.consumer.as_mut() {
            debug!(
                "event=contribution_forwarded module=registry libraries={} entries={}",
                contribution.len(),
                contribution.entry_count()
            );
            consumer.accept(contribution);
            return;
        }

        match self.policy {
            PendingPolicy::SingleSlot => {
                if !self.pending.is_empty() {
                    trace!(
                        "event=pending_superseded module=registry dropped={}",
                        self.pending.len()
                    );
                }
                self.pending.clear();
                self.pending.push(contribution);
            }
            PendingPolicy::Buffered => self.pending.push(contribution),
        }
        debug!(
            "event=contribution_held module=registry policy={} pending={}",
            self.policy.as_str(),
            self.pending.len()
        );
    }

    /// Installs the consumer, flushing anything pending into it first.
    ///
    /// Returns the consumer it replaced. A replacement consumer receives only
    /// contributions registered after it was installed.
    pub fn install_consumer(
        &mut self,
        consumer: impl ImplementorsConsumer + 'c,
    ) -> Option<Box<dyn ImplementorsConsumer + 'c>> {
        let mut consumer: Box<dyn ImplementorsConsumer + 'c> = Box::new(consumer);
        let flushed = self.pending.len();
        for contribution in self.pending.drain(..) {
            consumer.accept(contribution);
        }

        let replaced = self.consumer.replace(consumer);
        debug!(
            "event=consumer_installed module=registry flushed={} replaced={}",
            flushed,
            replaced.is_some()
        );
        replaced
    }
}

impl Default for ImplementorsRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ImplementorsRegistry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementorsRegistry")
            .field("policy", &self.policy)
            .field("state", &self.state())
            .field("pending", &self.pending.len())
            .finish()
    }
}
