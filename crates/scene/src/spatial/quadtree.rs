use foundation::arena::Arena;
use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use serde::{Deserialize, Serialize};

/// What happens to the points a leaf already holds when it overflows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Points stored before the overflow stay in the parent; only later
    /// insertions descend. Keeps each insertion O(depth).
    #[default]
    KeepDeposited,
    /// Stored points are pushed down on subdivision, so an internal node
    /// never holds points.
    Redistribute,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    pub capacity: usize,
    pub max_depth: u32,
    pub split_policy: SplitPolicy,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            max_depth: 12,
            split_policy: SplitPolicy::KeepDeposited,
        }
    }
}

/// Deepest subdivision allowed. Coincident points would otherwise split into
/// single-child chains until memory runs out.
pub const MAX_DEPTH_LIMIT: u32 = 32;

impl QuadtreeConfig {
    pub fn normalized(self) -> Self {
        Self {
            capacity: self.capacity.max(1),
            max_depth: self.max_depth.min(MAX_DEPTH_LIMIT),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    region: Aabb2,
    depth: u32,
    items: Vec<usize>,
    children: Option<[usize; 4]>,
}

impl Node {
    fn leaf(region: Aabb2, depth: u32) -> Self {
        Self {
            region,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

/// Read-only view of one node, for debugging overlays and tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeSummary {
    pub region: Aabb2,
    pub depth: u32,
    pub stored: usize,
    pub subdivided: bool,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct QuadtreeStats {
    pub nodes: usize,
    pub stored: usize,
    pub rejected: usize,
    pub subdivisions: usize,
    pub depth: u32,
}

const ROOT: usize = 0;

/// Point quadtree over dataset indices, built once and queried every frame.
///
/// Nodes live in an [`Arena`]; children are allocated together, exactly once
/// per node, the first time it overflows.
///
/// Ordering contract:
/// - `query` results are unordered and never contain duplicates.
#[derive(Debug, Clone)]
pub struct Quadtree {
    nodes: Arena<Node>,
    positions: Vec<Vec2>,
    config: QuadtreeConfig,
    stats: QuadtreeStats,
}

impl Quadtree {
    /// Builds an index over `positions`; item `i` is `positions[i]`.
    ///
    /// Points outside `region` (or with non-finite coordinates) are not stored
    /// and are counted in [`QuadtreeStats::rejected`].
    pub fn build(positions: &[Vec2], region: Aabb2, config: QuadtreeConfig) -> Self {
        let config = config.normalized();
        let mut nodes = Arena::with_capacity(1 + positions.len() / config.capacity);
        nodes.alloc(Node::leaf(region, 0));

        let mut tree = Self {
            nodes,
            positions: positions.to_vec(),
            config,
            stats: QuadtreeStats {
                nodes: 1,
                ..QuadtreeStats::default()
            },
        };

        for item in 0..tree.positions.len() {
            if tree.nodes[ROOT].region.contains(tree.positions[item]) {
                tree.insert(item);
            } else {
                tree.stats.rejected += 1;
            }
        }

        tracing::debug!(
            points = positions.len(),
            stored = tree.stats.stored,
            rejected = tree.stats.rejected,
            nodes = tree.stats.nodes,
            depth = tree.stats.depth,
            "quadtree built"
        );
        tree
    }

    fn insert(&mut self, item: usize) {
        let mut pending = vec![(ROOT, item)];
        while let Some((start, item)) = pending.pop() {
            let p = self.positions[item];
            let mut idx = start;
            loop {
                let node = &self.nodes[idx];
                if let Some(children) = node.children {
                    idx = children[node.region.quadrant_of(p)];
                    continue;
                }
                if node.items.len() < self.config.capacity || node.depth >= self.config.max_depth {
                    self.nodes[idx].items.push(item);
                    break;
                }

                let children = self.subdivide(idx);
                if self.config.split_policy == SplitPolicy::Redistribute {
                    let deposited = std::mem::take(&mut self.nodes[idx].items);
                    self.stats.stored -= deposited.len();
                    pending.extend(deposited.into_iter().map(|i| (idx, i)));
                }
                idx = children[self.nodes[idx].region.quadrant_of(p)];
            }
            self.stats.stored += 1;
        }
    }

    fn subdivide(&mut self, idx: usize) -> [usize; 4] {
        let (quadrants, depth) = {
            let node = &self.nodes[idx];
            (node.region.quadrants(), node.depth + 1)
        };
        let children = quadrants.map(|q| self.nodes.alloc(Node::leaf(q, depth)));
        self.nodes[idx].children = Some(children);

        self.stats.subdivisions += 1;
        self.stats.nodes += 4;
        self.stats.depth = self.stats.depth.max(depth);
        children
    }

    /// Returns every stored item whose position lies in `rect` (edges included).
    ///
    /// An empty or NaN rectangle yields an empty result.
    pub fn query(&self, rect: &Aabb2) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(rect, &mut out);
        out
    }

    /// Like [`Quadtree::query`], appending into a caller-owned buffer.
    pub fn query_into(&self, rect: &Aabb2, out: &mut Vec<usize>) {
        if rect.is_empty() {
            return;
        }

        let mut stack: Vec<usize> = vec![ROOT];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.region.intersects(rect) {
                continue;
            }
            out.extend(
                node.items
                    .iter()
                    .copied()
                    .filter(|&item| rect.contains(self.positions[item])),
            );
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
    }

    pub fn region(&self) -> Aabb2 {
        self.nodes[ROOT].region
    }

    pub fn config(&self) -> QuadtreeConfig {
        self.config
    }

    pub fn stats(&self) -> QuadtreeStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn stored_count(&self) -> usize {
        self.stats.stored
    }

    pub fn subdivisions(&self) -> usize {
        self.stats.subdivisions
    }

    pub fn depth(&self) -> u32 {
        self.stats.depth
    }

    pub fn rejected(&self) -> usize {
        self.stats.rejected
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeSummary> + '_ {
        self.nodes.iter().map(|(_, n)| NodeSummary {
            region: n.region,
            depth: n.depth,
            stored: n.items.len(),
            subdivided: n.children.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_DEPTH_LIMIT, Quadtree, QuadtreeConfig, SplitPolicy};
    use foundation::bounds::Aabb2;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
        }

        fn range(&mut self, lo: f64, hi: f64) -> f64 {
            lo + (hi - lo) * self.next_f64()
        }
    }

    fn world() -> Aabb2 {
        Aabb2::new([-100.0, -100.0], [100.0, 100.0])
    }

    fn random_points(rng: &mut Lcg, n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                // Every fourth point lands in a tight cluster to force deep splits.
                if i % 4 == 0 {
                    Vec2::new(rng.range(10.0, 10.5), rng.range(-3.0, -2.5))
                } else {
                    Vec2::new(rng.range(-100.0, 100.0), rng.range(-100.0, 100.0))
                }
            })
            .collect()
    }

    fn brute_force(points: &[Vec2], rect: &Aabb2) -> Vec<usize> {
        (0..points.len())
            .filter(|&i| rect.contains(points[i]))
            .collect()
    }

    fn stored_items(tree: &Quadtree) -> Vec<usize> {
        let mut all: Vec<usize> = tree
            .nodes
            .iter()
            .flat_map(|(_, n)| n.items.iter().copied())
            .collect();
        all.sort_unstable();
        all
    }

    fn config(capacity: usize, max_depth: u32, split_policy: SplitPolicy) -> QuadtreeConfig {
        QuadtreeConfig {
            capacity,
            max_depth,
            split_policy,
        }
    }

    #[test]
    fn query_matches_brute_force_for_random_rects() {
        for policy in [SplitPolicy::KeepDeposited, SplitPolicy::Redistribute] {
            let mut rng = Lcg(0x5eed);
            let points = random_points(&mut rng, 2_000);
            let tree = Quadtree::build(&points, world(), config(8, 10, policy));

            for _ in 0..200 {
                let a = Vec2::new(rng.range(-120.0, 120.0), rng.range(-120.0, 120.0));
                let b = Vec2::new(rng.range(-120.0, 120.0), rng.range(-120.0, 120.0));
                let rect = Aabb2::from_corners(a, b);

                let mut got = tree.query(&rect);
                got.sort_unstable();
                assert_eq!(got, brute_force(&points, &rect), "policy {policy:?} rect {rect:?}");
            }
        }
    }

    #[test]
    fn query_includes_points_on_rect_edges() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0)];
        let tree = Quadtree::build(&points, world(), QuadtreeConfig::default());
        let mut got = tree.query(&Aabb2::new([0.0, 0.0], [10.0, 10.0]));
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2]);
    }

    #[test]
    fn every_point_is_stored_exactly_once() {
        for policy in [SplitPolicy::KeepDeposited, SplitPolicy::Redistribute] {
            let mut rng = Lcg(42);
            let points = random_points(&mut rng, 1_500);
            let tree = Quadtree::build(&points, world(), config(4, 12, policy));

            assert_eq!(stored_items(&tree), (0..points.len()).collect::<Vec<_>>());
            assert_eq!(tree.stored_count(), points.len());
            assert_eq!(tree.rejected(), 0);
        }
    }

    #[test]
    fn stored_points_lie_inside_their_node() {
        let mut rng = Lcg(7);
        let points = random_points(&mut rng, 800);
        let tree = Quadtree::build(&points, world(), config(4, 12, SplitPolicy::KeepDeposited));
        for (_, node) in tree.nodes.iter() {
            for &item in &node.items {
                assert!(node.region.contains(points[item]));
            }
        }
    }

    #[test]
    fn redistribute_leaves_internal_nodes_empty() {
        let mut rng = Lcg(99);
        let points = random_points(&mut rng, 600);
        let tree = Quadtree::build(&points, world(), config(4, 12, SplitPolicy::Redistribute));
        for summary in tree.nodes() {
            if summary.subdivided {
                assert_eq!(summary.stored, 0);
            }
        }
    }

    #[test]
    fn five_points_in_one_quadrant_split_once() {
        // All in the north-west quadrant of the root.
        let points = vec![
            Vec2::new(-80.0, -80.0),
            Vec2::new(-60.0, -70.0),
            Vec2::new(-40.0, -20.0),
            Vec2::new(-10.0, -90.0),
            Vec2::new(-30.0, -30.0),
        ];
        let tree = Quadtree::build(&points, world(), config(4, 8, SplitPolicy::KeepDeposited));

        assert_eq!(tree.subdivisions(), 1);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 1);

        let mut all = tree.query(&world());
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn max_depth_bounds_clustered_inserts() {
        let points = vec![Vec2::new(1.0, 1.0); 50];
        let tree = Quadtree::build(&points, world(), config(2, 3, SplitPolicy::Redistribute));
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.query(&world()).len(), 50);
    }

    #[test]
    fn out_of_region_and_non_finite_points_are_rejected() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(500.0, 0.0),
            Vec2::new(f64::NAN, 1.0),
            Vec2::new(100.0, 100.0),
        ];
        let tree = Quadtree::build(&points, world(), QuadtreeConfig::default());
        assert_eq!(tree.rejected(), 2);
        assert_eq!(tree.stored_count(), 2);
    }

    #[test]
    fn empty_or_malformed_rect_yields_nothing() {
        let points = vec![Vec2::new(0.0, 0.0)];
        let tree = Quadtree::build(&points, world(), QuadtreeConfig::default());

        assert!(tree.query(&Aabb2::new([5.0, 5.0], [-5.0, -5.0])).is_empty());
        assert!(tree.query(&Aabb2::new([f64::NAN, 0.0], [1.0, 1.0])).is_empty());
    }

    #[test]
    fn empty_index_answers_queries() {
        let tree = Quadtree::build(&[], world(), QuadtreeConfig::default());
        assert!(tree.query(&world()).is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn config_normalizes_and_deserializes_with_defaults() {
        let cfg: QuadtreeConfig =
            serde_json::from_str(r#"{"capacity":0,"split_policy":"redistribute"}"#).expect("parse");
        let cfg = cfg.normalized();
        assert_eq!(cfg.capacity, 1);
        assert_eq!(cfg.max_depth, 12);
        assert_eq!(cfg.split_policy, SplitPolicy::Redistribute);
    }

    #[test]
    fn coincident_points_stop_at_the_depth_limit() {
        let positions = vec![Vec2::new(0.25, 0.25); 6];
        let region = Aabb2::new([0.0, 0.0], [1.0, 1.0]);
        for split_policy in [SplitPolicy::KeepDeposited, SplitPolicy::Redistribute] {
            let config = QuadtreeConfig {
                capacity: 1,
                max_depth: u32::MAX,
                split_policy,
            };
            let tree = Quadtree::build(&positions, region, config);
            assert_eq!(tree.config().max_depth, MAX_DEPTH_LIMIT);
            assert!(tree.depth() <= MAX_DEPTH_LIMIT);
            assert!(tree.node_count() <= 1 + 4 * MAX_DEPTH_LIMIT as usize);
            assert_eq!(tree.stored_count(), 6);
            assert_eq!(tree.query(&region).len(), 6);
        }
    }
}
