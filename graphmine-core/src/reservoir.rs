//! The subgraph reservoir: a uniform sample of size `M` over the population
//! of k-subgraphs formed so far (spec §4.D).
//!
//! The spec describes the slot array as a dense array with a free-list of
//! vacant indices, and `random(N)` as "draw `idx` from `[0, max(size,N))`,
//! return `slots[idx]` if `idx < size`". Those two only agree if live
//! slots always occupy exactly `[0, size)` — a plain free-list (reusing
//! arbitrary reclaimed holes) does not guarantee that on its own. This
//! implementation keeps the population packed into `[0, size)` by
//! swap-removing on eviction/removal instead of punching a hole, which
//! satisfies every reservoir invariant in spec §3/§8 while making
//! `random(N)`'s index arithmetic exact by construction; see DESIGN.md.

use fnv::{FnvHashMap, FnvHashSet};
use rand::Rng;

use crate::model::{Node, Subgraph};

#[derive(Debug)]
pub struct SubgraphReservoir {
    capacity: usize,
    slots: Vec<Subgraph>,
    index: FnvHashMap<Subgraph, usize>,
    vertex_index: FnvHashMap<Node, FnvHashSet<usize>>,
}

impl SubgraphReservoir {
    pub fn new(capacity: usize) -> Self {
        SubgraphReservoir {
            capacity,
            slots: Vec::with_capacity(capacity),
            index: FnvHashMap::default(),
            vertex_index: FnvHashMap::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `size == M`.
    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, g: &Subgraph) -> bool {
        self.index.contains_key(g)
    }

    /// `vertex_index[u] ∩ vertex_index[v]`, resolved to the subgraphs they
    /// index. O(|vertex_index[u]| + |vertex_index[v]|).
    pub fn get_common_subgraphs(&self, u: Node, v: Node) -> Vec<Subgraph> {
        let empty = FnvHashSet::default();
        let su = self.vertex_index.get(&u).unwrap_or(&empty);
        let sv = self.vertex_index.get(&v).unwrap_or(&empty);
        su.intersection(sv).map(|&idx| self.slots[idx].clone()).collect()
    }

    /// Draws `idx` uniformly from `[0, max(size, n))` (`n = None` behaves
    /// as `n = size`, i.e. `[0, size)`) and returns `slots[idx]` if
    /// `idx < size`, else `None`.
    pub fn random<R: Rng + ?Sized>(&self, n: Option<usize>, rng: &mut R) -> Option<Subgraph> {
        let upper = n.map(|n| n.max(self.slots.len())).unwrap_or(self.slots.len());
        if upper == 0 {
            return None;
        }
        let idx = rng.gen_range(0..upper);
        if idx < self.slots.len() {
            Some(self.slots[idx].clone())
        } else {
            None
        }
    }

    /// Inserts `g`. Returns `(false, None)` if already present. If the
    /// reservoir is not full, inserts unconditionally. If full, calls
    /// `random(n)` to pick a victim among `max(size, n)` candidates; if
    /// the draw lands outside the current sample, `g` loses the coin flip
    /// and is dropped (`(false, None)`); otherwise it replaces the victim.
    pub fn add<R: Rng + ?Sized>(&mut self, g: Subgraph, n: Option<usize>, rng: &mut R) -> (bool, Option<Subgraph>) {
        if self.contains(&g) {
            return (false, None);
        }

        if !self.is_full() {
            self.insert_at_end(g);
            return (true, None);
        }

        let upper = n.map(|n| n.max(self.slots.len())).unwrap_or(self.slots.len());
        let idx = rng.gen_range(0..upper);
        if idx >= self.slots.len() {
            return (false, None);
        }

        let victim = self.slots[idx].clone();
        self.deindex_slot(&victim, idx);
        self.slots[idx] = g.clone();
        self.index.insert(g.clone(), idx);
        for node in g.nodes.iter() {
            self.vertex_index.entry(*node).or_default().insert(idx);
        }
        (true, Some(victim))
    }

    /// Swaps `old`'s slot contents for `new`. Both occupy the same slot
    /// index; the vertex index is updated only for nodes in the symmetric
    /// difference of the two node sets.
    ///
    /// Panics if `old` is absent or `new` is already present — both are
    /// caller bugs (the spec treats them as preconditions, not recoverable
    /// conditions).
    pub fn replace(&mut self, old: &Subgraph, new: Subgraph) {
        let slot = *self.index.get(old).expect("replace: `old` subgraph not in reservoir");
        assert!(!self.index.contains_key(&new), "replace: `new` subgraph already in reservoir");

        let old_nodes: FnvHashSet<Node> = old.nodes.iter().copied().collect();
        let new_nodes: FnvHashSet<Node> = new.nodes.iter().copied().collect();

        for node in old_nodes.difference(&new_nodes) {
            if let Some(set) = self.vertex_index.get_mut(node) {
                set.remove(&slot);
            }
        }
        for node in new_nodes.difference(&old_nodes) {
            self.vertex_index.entry(*node).or_default().insert(slot);
        }

        self.index.remove(old);
        self.slots[slot] = new.clone();
        self.index.insert(new, slot);
    }

    /// Removes `g`. Returns `false` (no state change) if absent.
    pub fn remove(&mut self, g: &Subgraph) -> bool {
        match self.index.get(g).copied() {
            Some(slot) => {
                self.remove_at(slot);
                true
            }
            None => false,
        }
    }

    fn insert_at_end(&mut self, g: Subgraph) {
        let slot = self.slots.len();
        for node in g.nodes.iter() {
            self.vertex_index.entry(*node).or_default().insert(slot);
        }
        self.index.insert(g.clone(), slot);
        self.slots.push(g);
    }

    fn deindex_slot(&mut self, g: &Subgraph, slot: usize) {
        for node in g.nodes.iter() {
            if let Some(set) = self.vertex_index.get_mut(node) {
                set.remove(&slot);
            }
        }
        self.index.remove(g);
    }

    fn remove_at(&mut self, slot: usize) -> Subgraph {
        let removed = self.slots.swap_remove(slot);
        self.deindex_slot(&removed, slot);

        // `swap_remove` moved the former last element into `slot` (unless
        // `slot` *was* the last element); fix up its bookkeeping. After
        // the swap, `self.slots.len()` equals the moved element's old
        // index.
        if slot < self.slots.len() {
            let old_slot = self.slots.len();
            let moved = self.slots[slot].clone();
            self.index.insert(moved.clone(), slot);
            for node in moved.nodes.iter() {
                if let Some(set) = self.vertex_index.get_mut(node) {
                    set.remove(&old_slot);
                    set.insert(slot);
                }
            }
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeSet, NodeSet};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sg(ids: &[u32]) -> Subgraph {
        let nodes: NodeSet = ids.iter().map(|&id| Node::new(id, 1)).collect();
        Subgraph::new(nodes, EdgeSet::new())
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn add_below_capacity_is_unconditional() {
        let mut r = SubgraphReservoir::new(3);
        let mut rng = rng();
        let (inserted, evicted) = r.add(sg(&[1, 2, 3]), None, &mut rng);
        assert!(inserted);
        assert!(evicted.is_none());
        assert_eq!(r.len(), 1);
        assert!(!r.is_full());
    }

    #[test]
    fn add_duplicate_is_rejected() {
        let mut r = SubgraphReservoir::new(3);
        let mut rng = rng();
        r.add(sg(&[1, 2, 3]), None, &mut rng);
        let (inserted, evicted) = r.add(sg(&[1, 2, 3]), None, &mut rng);
        assert!(!inserted);
        assert!(evicted.is_none());
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn remove_then_len_matches_live_count() {
        let mut r = SubgraphReservoir::new(3);
        let mut rng = rng();
        r.add(sg(&[1, 2, 3]), None, &mut rng);
        r.add(sg(&[4, 5, 6]), None, &mut rng);
        assert!(r.remove(&sg(&[1, 2, 3])));
        assert_eq!(r.len(), 1);
        assert!(!r.contains(&sg(&[1, 2, 3])));
        assert!(r.contains(&sg(&[4, 5, 6])));
    }

    #[test]
    fn remove_absent_returns_false() {
        let mut r = SubgraphReservoir::new(3);
        assert!(!r.remove(&sg(&[1, 2, 3])));
    }

    #[test]
    fn swap_remove_preserves_vertex_index_of_moved_subgraph() {
        let mut r = SubgraphReservoir::new(3);
        let mut rng = rng();
        r.add(sg(&[1, 2, 3]), None, &mut rng); // slot 0
        r.add(sg(&[4, 5, 6]), None, &mut rng); // slot 1
        r.add(sg(&[7, 8, 9]), None, &mut rng); // slot 2

        // removing slot 0 swap-moves slot 2's subgraph into slot 0
        r.remove(&sg(&[1, 2, 3]));

        let at_n7 = r.get_common_subgraphs(Node::new(7, 1), Node::new(8, 1));
        assert_eq!(at_n7, vec![sg(&[7, 8, 9])]);
    }

    #[test]
    fn get_common_subgraphs_empty_when_neither_node_sampled() {
        let r = SubgraphReservoir::new(3);
        let common = r.get_common_subgraphs(Node::new(1, 1), Node::new(2, 1));
        assert!(common.is_empty());
    }

    #[test]
    fn replace_updates_only_symmetric_difference_of_nodes() {
        let mut r = SubgraphReservoir::new(3);
        let mut rng = rng();
        let old = sg(&[1, 2, 3]);
        r.add(old.clone(), None, &mut rng);

        let new = sg(&[2, 3, 4]);
        r.replace(&old, new.clone());

        assert!(!r.contains(&old));
        assert!(r.contains(&new));
        assert!(r.get_common_subgraphs(Node::new(2, 1), Node::new(3, 1)).contains(&new));
        assert!(r.get_common_subgraphs(Node::new(1, 1), Node::new(2, 1)).is_empty());
        assert!(!r.get_common_subgraphs(Node::new(4, 1), Node::new(2, 1)).is_empty());
    }

    #[test]
    fn random_returns_none_when_empty() {
        let r = SubgraphReservoir::new(3);
        let mut rng = rng();
        assert!(r.random(None, &mut rng).is_none());
    }

    #[test]
    fn add_at_capacity_sometimes_loses_the_coin_flip() {
        let mut r = SubgraphReservoir::new(1);
        let mut rng = rng();
        r.add(sg(&[1, 2, 3]), None, &mut rng);
        assert!(r.is_full());

        // with n very large, the new candidate almost always loses.
        let mut wins = 0;
        let mut losses = 0;
        for i in 0..200 {
            let (inserted, _) = r.add(sg(&[10 + i, 20 + i, 30 + i]), Some(1_000_000), &mut rng);
            if inserted {
                wins += 1;
            } else {
                losses += 1;
            }
        }
        assert!(losses > wins);
    }
}
