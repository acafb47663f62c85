//! Light nodes and the collection that owns them.
//!
//! Nodes live in a [`NodeSet`] and are addressed by [`NodeId`]. Ids increase
//! monotonically and are never reused while the set lives, so a handle taken
//! before a deletion can never alias a different node afterwards. Because ids
//! are handed out in insertion order, the backing vector stays sorted by id
//! and lookups are a binary search.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec3;
use rand::Rng;

use crate::trail::Trail;

/// Amplitude of the idle per-axis wobble before renormalization.
pub const WOBBLE_AMPLITUDE: f32 = 0.08;

/// Stable handle to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A light point on the orb with its trail.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    /// Position produced by the shape generator (or by the last randomize).
    pub original_position: Vec3,
    /// Animated position; always at distance `sphere_radius` from the origin.
    pub position: Vec3,
    /// Distance of the generated position from the origin.
    pub sphere_radius: f32,
    /// Wobble phase in radians.
    pub phase: f32,
    /// Per-node speed, 0.0008-0.0016. Carried for renderers; the wobble is keyed on time and phase.
    pub speed: f32,
    /// Band color at `sphere_radius`.
    pub color: Vec3,
    pub trail: Trail,
}

impl Node {
    fn new<R: Rng + ?Sized>(id: NodeId, position: Vec3, rng: &mut R) -> Self {
        Self {
            id,
            original_position: position,
            position,
            sphere_radius: position.length(),
            phase: rng.gen::<f32>() * TAU,
            speed: 0.0008 + rng.gen::<f32>() * 0.0008,
            color: Vec3::ONE,
            trail: Trail::default(),
        }
    }

    /// Idle position at simulation time `time`: a small sinusoidal offset
    /// from the original position, pushed back onto the node's radius.
    pub fn wobbled_position(&self, time: f32) -> Vec3 {
        let theta = time * 0.15 + self.phase;
        let phi = time * 0.25 + self.phase;
        let offset = Vec3::new(theta.sin(), phi.cos(), (theta + phi).sin()) * WOBBLE_AMPLITUDE;
        project_to_radius(self.original_position + offset, self.sphere_radius)
    }
}

/// Scale `p` to length `radius`. A zero vector stays at the origin.
#[inline]
pub(crate) fn project_to_radius(p: Vec3, radius: f32) -> Vec3 {
    p.normalize_or_zero() * radius
}

/// Ordered arena of nodes.
#[derive(Clone, Debug, Default)]
pub struct NodeSet {
    nodes: Vec<Node>,
    /// Never reused, so ids stay sorted across clears.
    next_id: u64,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at `position` with random phase and speed. The trail and
    /// color are left for the caller to fill in.
    pub fn insert<R: Rng + ?Sized>(&mut self, position: Vec3, rng: &mut R) -> &mut Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node::new(id, position, rng));
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.binary_search_by_key(&id, |n| n.id).ok()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(move |i| &mut self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Remove a node and its trail.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        self.index_of(id).map(|i| self.nodes.remove(i))
    }

    /// Remove every node matching `pred`, returning the removed nodes in order.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Node) -> bool) -> Vec<Node> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            if pred(&node) {
                removed.push(node);
            } else {
                kept.push(node);
            }
        }
        self.nodes = kept;
        removed
    }

    /// Drop every node. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn set_with(n: usize) -> NodeSet {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut set = NodeSet::new();
        for i in 0..n {
            set.insert(Vec3::new(3.0, i as f32 * 0.01, 0.0), &mut rng);
        }
        set
    }

    #[test]
    fn test_ids_are_monotonic_and_not_reused() {
        let mut set = set_with(3);
        assert!(set.remove(NodeId(2)).is_some());
        let mut rng = SmallRng::seed_from_u64(4);
        let id = set.insert(Vec3::X, &mut rng).id;
        assert_eq!(id, NodeId(3));
        assert!(!set.contains(NodeId(2)));
    }

    #[test]
    fn test_clear_keeps_counting() {
        let mut set = set_with(5);
        set.clear();
        assert!(set.is_empty());
        let mut rng = SmallRng::seed_from_u64(4);
        assert_eq!(set.insert(Vec3::X, &mut rng).id, NodeId(5));
    }

    #[test]
    fn test_remove_missing_is_none() {
        let mut set = set_with(2);
        assert!(set.remove(NodeId(99)).is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_where_keeps_order() {
        let mut set = set_with(6);
        let removed = set.remove_where(|n| n.id.0 % 2 == 0);
        assert_eq!(removed.len(), 3);
        let ids: Vec<_> = set.ids().collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(3), NodeId(5)]);
        assert!(set.get(NodeId(3)).is_some());
    }

    #[test]
    fn test_new_node_fields() {
        let set = set_with(50);
        for node in set.iter() {
            assert!((node.sphere_radius - node.position.length()).abs() < 1e-6);
            assert!((0.0008..=0.0016).contains(&node.speed));
            assert!((0.0..=TAU).contains(&node.phase));
        }
    }

    #[test]
    fn test_wobble_stays_on_radius() {
        let set = set_with(20);
        for node in set.iter() {
            for step in 0..30 {
                let p = node.wobbled_position(step as f32 * 0.5);
                assert!((p.length() - node.sphere_radius).abs() < 1e-4);
                assert!(p.distance(node.original_position) < 0.2);
            }
        }
    }

    #[test]
    fn test_zero_position_stays_at_origin() {
        assert_eq!(project_to_radius(Vec3::ZERO, 3.0), Vec3::ZERO);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(7).to_string(), "node#7");
    }

    #[test]
    fn test_ids_continue_past_u32_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut set = NodeSet {
            nodes: Vec::new(),
            next_id: u64::from(u32::MAX),
        };
        let first = set.insert(Vec3::X, &mut rng).id;
        let second = set.insert(Vec3::Y, &mut rng).id;
        assert_eq!(first, NodeId(u64::from(u32::MAX)));
        assert_eq!(second, NodeId(u64::from(u32::MAX) + 1));
        assert!(set.contains(first) && set.contains(second));
    }
}
