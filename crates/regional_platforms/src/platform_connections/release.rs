//! Deferred node releases and the authorized mutation window.

use bevy::prelude::*;

use crate::network::{NetworkAccess, NodeId};

/// FIFO of node ids scheduled for release.
///
/// Structural changes to the shared network must not happen inside an
/// arbitrary callback; callers append here and [`flush_node_releases`] drains
/// the queue at the single authorized point in the fixed tick. Once queued, a
/// release always eventually executes unless the process tears down first --
/// there is no cancellation.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeReleaseQueue {
    pending: Vec<NodeId>,
}

impl NodeReleaseQueue {
    /// Queue node ids for release. Zero ids (the "not created" sentinel) are
    /// discarded; de-duplication across calls is the caller's business.
    pub fn schedule(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        self.pending.extend(nodes.into_iter().filter(|&n| n != 0));
    }

    /// Take everything queued so far, in FIFO order.
    pub fn drain(&mut self) -> Vec<NodeId> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Queued ids awaiting the next mutation window.
    pub fn pending(&self) -> &[NodeId] {
        &self.pending
    }
}

/// Drain the release queue into the host network.
///
/// The only system of [`crate::PlatformSet::MutationWindow`]: all structural
/// releases are serialized here, after every command and reconciliation
/// system of the tick has run.
pub fn flush_node_releases<N: NetworkAccess + Resource>(
    mut net: ResMut<N>,
    mut queue: ResMut<NodeReleaseQueue>,
) {
    if queue.is_empty() {
        return;
    }
    for node in queue.drain() {
        net.release_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_discards_zero_sentinel() {
        let mut queue = NodeReleaseQueue::default();
        queue.schedule([0, 4, 0, 9]);
        assert_eq!(queue.pending(), &[4, 9]);
    }

    #[test]
    fn drain_preserves_fifo_and_empties_queue() {
        let mut queue = NodeReleaseQueue::default();
        queue.schedule([3]);
        queue.schedule([1, 2]);
        assert_eq!(queue.len(), 3);

        let drained = queue.drain();
        assert_eq!(drained, vec![3, 1, 2]);
        assert!(queue.is_empty());
    }
}
