//! The trust ledger: every recorded edge, indexed for queries.
//!
//! Edges are stored in an append-only arena. Each `(origin, dest)` pair keeps
//! its edges in discovery order, transactions index the edges they created,
//! and every entity ever seen gets a stable rank (sorted order) used as its
//! row and column in the weight matrix.
//!
//! Indirect trust is the maximum flow between two entities over the direct
//! trust graph, recomputed from scratch on every query.

use std::collections::{BTreeSet, HashMap, HashSet};

use tir_types::{Entity, Outpoint, TrustAmount, TxHash};
use tracing::{debug, info};

use crate::edge::{DirectTrust, EdgeId};
use crate::flow::max_flow;
use crate::TrustError;

#[derive(Debug, Default)]
pub struct TrustLedger {
    edges: Vec<DirectTrust>,
    by_pair: HashMap<(Entity, Entity), Vec<EdgeId>>,
    by_tx: HashMap<TxHash, Vec<EdgeId>>,
    entities: BTreeSet<Entity>,
}

impl TrustLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&DirectTrust> {
        self.edges.get(id.0)
    }

    /// Record one edge, spending its predecessor if it has one.
    pub fn add(&mut self, edge: DirectTrust) -> Result<EdgeId, TrustError> {
        let origin = edge.origin_entity();
        let dest = edge.dest_entity();
        self.check(&edge, &origin, &dest)?;
        self.insert(edge, origin, dest)
    }

    /// Record the edges of one transaction. Every edge is checked before any
    /// is applied, so a failure leaves the ledger untouched.
    pub fn add_batch(&mut self, edges: Vec<DirectTrust>) -> Result<Vec<EdgeId>, TrustError> {
        let mut spent = HashSet::new();
        let mut checked = Vec::with_capacity(edges.len());
        for edge in edges {
            let origin = edge.origin_entity();
            let dest = edge.dest_entity();
            self.check(&edge, &origin, &dest)?;
            if let Some(prev) = edge.prev() {
                if !spent.insert(prev) {
                    return Err(TrustError::InvariantViolation(format!(
                        "tx {} spends trust {} twice",
                        edge.tx_hash, prev
                    )));
                }
            }
            checked.push((edge, origin, dest));
        }

        checked
            .into_iter()
            .map(|(edge, origin, dest)| self.insert(edge, origin, dest))
            .collect()
    }

    /// Everything `insert` relies on, without mutating.
    fn check(&self, edge: &DirectTrust, origin: &Entity, dest: &Entity) -> Result<(), TrustError> {
        if origin == dest {
            return Err(TrustError::InvariantViolation(format!(
                "tx {} makes {} trust itself",
                edge.tx_hash, origin
            )));
        }
        if !edge.validate() {
            return Err(TrustError::InvariantViolation(format!(
                "malformed trust in tx {}",
                edge.tx_hash
            )));
        }
        if let Some(prev_id) = edge.prev() {
            let prev = self.edge(prev_id).ok_or_else(|| {
                TrustError::InvariantViolation(format!("unknown predecessor {}", prev_id))
            })?;
            prev.check_spend(edge)?;
            // A spent edge must carry trust.
            if prev.is_null() {
                return Err(TrustError::InvariantViolation(format!(
                    "tx {} spends null trust from tx {}",
                    edge.tx_hash, prev.tx_hash
                )));
            }
        }
        Ok(())
    }

    fn insert(
        &mut self,
        mut edge: DirectTrust,
        origin: Entity,
        dest: Entity,
    ) -> Result<EdgeId, TrustError> {
        let id = EdgeId(self.edges.len());
        if let Some(prev_id) = edge.prev() {
            let prev = &mut self.edges[prev_id.0];
            prev.spend(prev_id, id, &mut edge)?;
            debug_assert!(prev.validate() && !prev.is_spendable());
        }

        info!(
            tx = %edge.tx_hash,
            origin = %origin,
            dest = %dest,
            amount = edge.amount,
            increase = edge.is_increase(),
            "trust recorded"
        );

        self.by_tx.entry(edge.tx_hash).or_default().push(id);
        self.by_pair
            .entry((origin.clone(), dest.clone()))
            .or_default()
            .push(id);
        self.entities.insert(origin);
        self.entities.insert(dest);
        self.edges.push(edge);
        Ok(id)
    }

    /// All edges from `origin` to `dest`, in discovery order.
    pub fn direct_trusts(&self, origin: &Entity, dest: &Entity) -> Vec<(EdgeId, &DirectTrust)> {
        self.by_pair
            .get(&(origin.clone(), dest.clone()))
            .map(|ids| ids.iter().map(|id| (*id, &self.edges[id.0])).collect())
            .unwrap_or_default()
    }

    pub fn spendable_direct_trusts(
        &self,
        origin: &Entity,
        dest: &Entity,
    ) -> Vec<(EdgeId, &DirectTrust)> {
        self.direct_trusts(origin, dest)
            .into_iter()
            .filter(|(_, edge)| edge.is_spendable())
            .collect()
    }

    /// Sum of spendable trust from `origin` to `dest`; infinite for oneself.
    pub fn direct_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        if origin == dest {
            return TrustAmount::Infinite;
        }
        let sum = self
            .spendable_direct_trusts(origin, dest)
            .iter()
            .fold(0u64, |acc, (_, edge)| acc.saturating_add(edge.amount));
        TrustAmount::Finite(sum)
    }

    /// Maximum flow from `origin` to `dest`; infinite for oneself, zero when
    /// either entity has never been seen.
    pub fn indirect_trust(&self, origin: &Entity, dest: &Entity) -> TrustAmount {
        if origin == dest {
            return TrustAmount::Infinite;
        }
        let (Some(source), Some(sink)) = (self.entity_index(origin), self.entity_index(dest))
        else {
            return TrustAmount::ZERO;
        };

        let capacity: Vec<Vec<u64>> = self
            .weight_matrix()
            .into_iter()
            .map(|row| row.into_iter().map(|w| w.finite().unwrap_or(0)).collect())
            .collect();
        let flow = max_flow(&capacity, source, sink);
        debug!(origin = %origin, dest = %dest, entities = capacity.len(), flow, "indirect trust");
        TrustAmount::Finite(flow)
    }

    /// Direct trust between every pair of entities, rows and columns in rank
    /// order.
    pub fn weight_matrix(&self) -> Vec<Vec<TrustAmount>> {
        self.entities
            .iter()
            .map(|origin| {
                self.entities
                    .iter()
                    .map(|dest| self.direct_trust(origin, dest))
                    .collect()
            })
            .collect()
    }

    /// Every entity seen so far, in rank order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Rank of `entity`, if it has been seen.
    pub fn entity_index(&self, entity: &Entity) -> Option<usize> {
        if !self.entities.contains(entity) {
            return None;
        }
        Some(self.entities.range(..entity).count())
    }

    /// Edges created by transaction `hash`.
    pub fn edges_by_tx(&self, hash: &TxHash) -> Vec<(EdgeId, &DirectTrust)> {
        self.by_tx
            .get(hash)
            .map(|ids| ids.iter().map(|id| (*id, &self.edges[id.0])).collect())
            .unwrap_or_default()
    }

    /// The edge backed by `outpoint`.
    pub fn by_outpoint(&self, outpoint: &Outpoint) -> Option<(EdgeId, &DirectTrust)> {
        self.by_tx.get(&outpoint.hash)?.iter().find_map(|id| {
            let edge = &self.edges[id.0];
            (edge.output_index() == Some(outpoint.index)).then_some((*id, edge))
        })
    }

    /// Whether `hash` has produced any trust edge.
    pub fn is_trust_tx(&self, hash: &TxHash) -> bool {
        self.by_tx.contains_key(hash)
    }

    pub fn is_trust_output(&self, outpoint: &Outpoint) -> bool {
        self.by_outpoint(outpoint).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::TrustOutput;
    use tir_chain::Script;
    use tir_crypto::{derive_entity, public_from_private};
    use tir_types::{PrivateKey, PublicKey};

    fn key(n: u8) -> PublicKey {
        public_from_private(&PrivateKey([n; 32])).unwrap()
    }

    fn entity(n: u8) -> Entity {
        derive_entity(&key(n))
    }

    fn edge(from: u8, to: u8, amount: u64, tx: u8, prev: Option<EdgeId>) -> DirectTrust {
        let output = TrustOutput {
            index: 0,
            script: Script::multisig(1, &[key(from), key(to)]).unwrap(),
        };
        DirectTrust::new(key(from), key(to), amount, TxHash::new([tx; 32]), Some(output), prev)
    }

    #[test]
    fn self_trust_is_infinite() {
        let ledger = TrustLedger::new();
        assert_eq!(ledger.direct_trust(&entity(1), &entity(1)), TrustAmount::Infinite);
        assert_eq!(ledger.indirect_trust(&entity(1), &entity(1)), TrustAmount::Infinite);
    }

    #[test]
    fn unknown_pairs_have_no_trust() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        assert_eq!(ledger.direct_trust(&entity(2), &entity(1)), 0);
        assert_eq!(ledger.indirect_trust(&entity(1), &entity(3)), 0);
        assert_eq!(ledger.indirect_trust(&entity(3), &entity(4)), 0);
    }

    #[test]
    fn increases_accumulate() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        ledger.add(edge(1, 2, 5, 2, None)).unwrap();
        assert_eq!(ledger.direct_trust(&entity(1), &entity(2)), 15);
        assert_eq!(ledger.direct_trusts(&entity(1), &entity(2)).len(), 2);
    }

    #[test]
    fn decrease_replaces_spent_amount() {
        let mut ledger = TrustLedger::new();
        let first = ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        let second = ledger.add(edge(1, 2, 4, 2, Some(first))).unwrap();
        assert_eq!(ledger.direct_trust(&entity(1), &entity(2)), 4);
        assert_eq!(ledger.edge(first).unwrap().next(), Some(second));
        assert_eq!(ledger.spendable_direct_trusts(&entity(1), &entity(2)).len(), 1);
    }

    #[test]
    fn nullifying_edge_zeroes_the_chain() {
        let mut ledger = TrustLedger::new();
        let first = ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        let null = ledger.edge(first).unwrap().nullify(first, TxHash::new([2; 32]));
        ledger.add(null).unwrap();
        assert_eq!(ledger.direct_trust(&entity(1), &entity(2)), 0);
        assert!(ledger.is_trust_tx(&TxHash::new([2; 32])));
        assert!(!ledger.is_trust_output(&Outpoint::new(TxHash::new([2; 32]), 0)));
    }

    #[test]
    fn double_spend_is_rejected_without_mutation() {
        let mut ledger = TrustLedger::new();
        let first = ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        ledger.add(edge(1, 2, 4, 2, Some(first))).unwrap();
        let err = ledger.add(edge(1, 2, 3, 3, Some(first))).unwrap_err();
        assert!(matches!(err, TrustError::InvariantViolation(_)));
        assert_eq!(ledger.len(), 2);
        assert!(!ledger.is_trust_tx(&TxHash::new([3; 32])));
    }

    #[test]
    fn self_edge_is_rejected() {
        let mut ledger = TrustLedger::new();
        assert!(ledger.add(edge(1, 1, 10, 1, None)).is_err());
        assert!(ledger.is_empty());
        assert_eq!(ledger.entities().count(), 0);
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let mut ledger = TrustLedger::new();
        let a = ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        let b = ledger.add(edge(3, 4, 10, 2, None)).unwrap();
        let tx = TxHash::new([3; 32]);
        let good = ledger.edge(a).unwrap().nullify(a, tx);
        let bad = edge(3, 4, 11, 3, Some(b));
        assert!(ledger.add_batch(vec![good.clone(), bad]).is_err());
        assert_eq!(ledger.direct_trust(&entity(1), &entity(2)), 10);

        let other = ledger.edge(b).unwrap().nullify(b, tx);
        ledger.add_batch(vec![good, other]).unwrap();
        assert_eq!(ledger.direct_trust(&entity(1), &entity(2)), 0);
        assert_eq!(ledger.direct_trust(&entity(3), &entity(4)), 0);
        assert_eq!(ledger.edges_by_tx(&tx).len(), 2);
    }

    #[test]
    fn batch_cannot_spend_one_edge_twice() {
        let mut ledger = TrustLedger::new();
        let a = ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        let tx = TxHash::new([3; 32]);
        let null = ledger.edge(a).unwrap().nullify(a, tx);
        assert!(ledger.add_batch(vec![null.clone(), null]).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn outpoint_lookup_matches_output_index() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        let hash = TxHash::new([1; 32]);
        assert!(ledger.by_outpoint(&Outpoint::new(hash, 0)).is_some());
        assert!(ledger.by_outpoint(&Outpoint::new(hash, 1)).is_none());
        assert!(ledger.is_trust_output(&Outpoint::new(hash, 0)));
    }

    #[test]
    fn entity_ranks_follow_sorted_order() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        ledger.add(edge(3, 1, 10, 2, None)).unwrap();
        let sorted: Vec<_> = ledger.entities().cloned().collect();
        let mut expected = vec![entity(1), entity(2), entity(3)];
        expected.sort();
        assert_eq!(sorted, expected);
        for (rank, e) in expected.iter().enumerate() {
            assert_eq!(ledger.entity_index(e), Some(rank));
        }
        assert_eq!(ledger.entity_index(&entity(9)), None);
    }

    #[test]
    fn weight_matrix_has_infinite_diagonal() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 7, 1, None)).unwrap();
        let matrix = ledger.weight_matrix();
        let i = ledger.entity_index(&entity(1)).unwrap();
        let j = ledger.entity_index(&entity(2)).unwrap();
        assert_eq!(matrix[i][i], TrustAmount::Infinite);
        assert_eq!(matrix[i][j], 7);
        assert_eq!(matrix[j][i], 0);
    }

    #[test]
    fn indirect_trust_flows_through_intermediaries() {
        let mut ledger = TrustLedger::new();
        ledger.add(edge(1, 2, 10, 1, None)).unwrap();
        ledger.add(edge(2, 3, 4, 2, None)).unwrap();
        ledger.add(edge(1, 3, 1, 3, None)).unwrap();
        assert_eq!(ledger.indirect_trust(&entity(1), &entity(3)), 5);
        assert_eq!(ledger.indirect_trust(&entity(3), &entity(1)), 0);
    }
}
