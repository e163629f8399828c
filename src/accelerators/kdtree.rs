//! SAH-built 3D kd-tree accelerator. Built in two phases: a transient tree
//! is grown in a `typed_arena::Arena`, then flattened into a single
//! contiguous node array. The split rule is an exact edge-sweep SAH search
//! over three axes (not bucketed).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use typed_arena::Arena;

use crate::core::bounds::BoundingBox;
use crate::core::error::{Error, Result};
use crate::core::geometry::{Axis, Point3, Ray3};
use crate::core::pbrt::Float;

/// An external object: `id` indexes into the caller's own primitive array,
/// `bbox` bounds its extent. Boxes are consumed during build and are not
/// retained — hit/contains hooks re-fetch geometry externally by id.
#[derive(Debug, Clone, Copy)]
pub struct Item {
    pub id: u32,
    pub bbox: BoundingBox,
}

/// A transient, build-time-only candidate split position.
struct Edge {
    value: Float,
    is_upper: bool,
}

/// One slot of the flattened node array. `Branch`'s `axis` field doubles as
/// the node's type discriminant; the lower child is always implicit at
/// `self_index + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KdNode {
    Leaf {
        items: SmallVec<[u32; 4]>,
    },
    Branch {
        axis: Axis,
        split: Float,
        upper: u32,
    },
}

/// Build parameters. `max_depth == 0` at construction means "derive from
/// item count" (`ceil(8 + 1.3 * ln(N))`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KdTreeConfig {
    pub max_depth: u32,
    pub min_items: usize,
    pub hit_cost: Float,
    pub empty_bonus: Float,
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        KdTreeConfig {
            max_depth: 0,
            min_items: 1,
            hit_cost: 1.0,
            empty_bonus: 0.5,
        }
    }
}

/// Hooks a caller implements to connect leaves back to real geometry. Item
/// ids are handed to the hook directly, rather than requiring the hook to
/// look the leaf back up in the tree.
pub trait LeafHandler {
    fn hit_leaf(&mut self, node_id: u32, items: &[u32], ray: &Ray3, t_max: Float) -> bool;
    fn contains_leaf(&mut self, node_id: u32, items: &[u32], point: &Point3) -> SmallVec<[u32; 4]>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdTree {
    bounds: BoundingBox,
    nodes: Vec<KdNode>,
    config: KdTreeConfig,
}

/// The recursive, arena-owned build tree. Discarded once flattened; see
/// `flatten`.
enum BuildNode<'a> {
    Leaf(SmallVec<[u32; 4]>),
    Branch {
        axis: Axis,
        split: Float,
        lower: &'a BuildNode<'a>,
        upper: &'a BuildNode<'a>,
    },
}

impl KdTree {
    pub fn build(items: Vec<Item>, mut config: KdTreeConfig) -> Result<KdTree> {
        if items.is_empty() {
            return Err(Error::InvalidArgument(
                "kd-tree requires at least one item".into(),
            ));
        }
        if config.min_items < 1 {
            return Err(Error::InvalidArgument("min_items must be >= 1".into()));
        }
        if config.hit_cost < 1.0 {
            return Err(Error::InvalidArgument("hit_cost must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&config.empty_bonus) {
            return Err(Error::InvalidArgument(
                "empty_bonus must lie in [0, 1]".into(),
            ));
        }
        if config.max_depth == 0 {
            config.max_depth = (8.0 + 1.3 * (items.len() as Float).ln()).ceil() as u32;
            log::debug!(
                "kd-tree max_depth not set, derived {} from {} items",
                config.max_depth,
                items.len()
            );
        }

        let mut bounds = BoundingBox::default();
        for item in &items {
            bounds.union(&item.bbox);
        }

        let arena: Arena<BuildNode> = Arena::new();
        let root = recursive_build(&arena, &items, bounds, 0, &config);
        let mut nodes = Vec::with_capacity(128);
        flatten(root, &mut nodes);
        log::debug!("kd-tree build produced {} nodes", nodes.len());

        Ok(KdTree {
            bounds,
            nodes,
            config,
        })
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn config(&self) -> &KdTreeConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Entry point for ray queries.
    pub fn hit<H: LeafHandler>(&self, ray: &Ray3, handler: &mut H) -> bool {
        let (hit, t_min, t_max) = self.bounds.full_intersection(ray);
        if !hit {
            return false;
        }
        self.hit_node(0, ray, t_min, t_max, handler)
    }

    fn hit_node<H: LeafHandler>(
        &self,
        node_id: u32,
        ray: &Ray3,
        t_min: Float,
        t_max: Float,
        handler: &mut H,
    ) -> bool {
        match &self.nodes[node_id as usize] {
            KdNode::Leaf { items } => handler.hit_leaf(node_id, items, ray, t_max),
            KdNode::Branch { axis, split, upper } => {
                let lower_id = node_id + 1;
                let upper_id = *upper;
                let o = ray.origin.get(*axis);
                let d = ray.direction.get(*axis);
                if d == 0.0 {
                    return if o < *split {
                        self.hit_node(lower_id, ray, t_min, t_max, handler)
                    } else {
                        self.hit_node(upper_id, ray, t_min, t_max, handler)
                    };
                }
                let t_split = (*split - o) / d;
                let below = o < *split || (o == *split && d < 0.0);
                let (near, far) = if below {
                    (lower_id, upper_id)
                } else {
                    (upper_id, lower_id)
                };
                if t_split > t_max || t_split <= 0.0 {
                    self.hit_node(near, ray, t_min, t_max, handler)
                } else if t_split < t_min {
                    self.hit_node(far, ray, t_min, t_max, handler)
                } else {
                    let near_hit = self.hit_node(near, ray, t_min, t_split, handler);
                    if near_hit {
                        true
                    } else {
                        self.hit_node(far, ray, t_split, t_max, handler)
                    }
                }
            }
        }
    }

    /// Point-location query. Duplicate ids may surface if
    /// an item straddles a split plane and is filtered by more than one
    /// leaf; callers deduplicate if that matters to them.
    pub fn contains<H: LeafHandler>(&self, point: &Point3, handler: &mut H) -> SmallVec<[u32; 4]> {
        if !self.bounds.contains(point) {
            return SmallVec::new();
        }
        self.contains_node(0, point, handler)
    }

    fn contains_node<H: LeafHandler>(
        &self,
        node_id: u32,
        point: &Point3,
        handler: &mut H,
    ) -> SmallVec<[u32; 4]> {
        match &self.nodes[node_id as usize] {
            KdNode::Leaf { items } => handler.contains_leaf(node_id, items, point),
            KdNode::Branch { axis, split, upper } => {
                let lower_id = node_id + 1;
                if point.get(*axis) < *split {
                    self.contains_node(lower_id, point, handler)
                } else {
                    self.contains_node(*upper, point, handler)
                }
            }
        }
    }

    /// Serialise `(bounds, nodes, settings)` to JSON.
    pub fn persist(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::AllocationFailure(e.to_string()))
    }

    /// Rebuild the node array in order without re-running the builder.
    pub fn restore(data: &str) -> Result<KdTree> {
        serde_json::from_str(data).map_err(|e| Error::InvalidArgument(e.to_string()))
    }
}

fn recursive_build<'a>(
    arena: &'a Arena<BuildNode<'a>>,
    items: &[Item],
    bounds: BoundingBox,
    depth: u32,
    config: &KdTreeConfig,
) -> &'a BuildNode<'a> {
    if depth == config.max_depth || items.len() <= config.min_items {
        return arena.alloc(BuildNode::Leaf(items.iter().map(|it| it.id).collect()));
    }

    match find_sah_split(items, &bounds, config) {
        None => arena.alloc(BuildNode::Leaf(items.iter().map(|it| it.id).collect())),
        Some((axis, split)) => {
            let lower_items: Vec<Item> = items
                .iter()
                .copied()
                .filter(|it| it.bbox.get_index(axis, false) < split)
                .collect();
            let upper_items: Vec<Item> = items
                .iter()
                .copied()
                .filter(|it| it.bbox.get_index(axis, true) > split)
                .collect();

            let mut lower_bounds = bounds;
            lower_bounds.set_index(axis, true, split);
            let mut upper_bounds = bounds;
            upper_bounds.set_index(axis, false, split);

            // Obtain this slot's index only after both recursive builds
            // complete (see `flatten`) — here, in the arena-owned build
            // tree, that constraint is moot: `arena.alloc` returns a
            // reference that never moves regardless of later allocations,
            // so no stale-pointer hazard exists to guard against in the
            // first place, unlike a `Vec` that might reallocate.
            let lower = recursive_build(arena, &lower_items, lower_bounds, depth + 1, config);
            let upper = recursive_build(arena, &upper_items, upper_bounds, depth + 1, config);
            arena.alloc(BuildNode::Branch {
                axis,
                split,
                lower,
                upper,
            })
        }
    }
}

/// SAH split search. Tries axes in
/// `[longest, longest+1, longest+2] % 3` order, stopping at the first axis
/// with any split strictly inside `bounds`; returns `None` (emit a leaf)
/// when that axis's best candidate doesn't beat the leaf cost, or when
/// every axis is degenerate.
fn find_sah_split(items: &[Item], bounds: &BoundingBox, config: &KdTreeConfig) -> Option<(Axis, Float)> {
    let n = items.len();
    let leaf_cost = n as Float * config.hit_cost;
    let area = bounds.surface_area();
    if area <= 0.0 {
        return None;
    }

    let longest = bounds.largest_axis().index();
    let axes = [
        Axis::from_index(longest as u8),
        Axis::from_index(((longest + 1) % 3) as u8),
        Axis::from_index(((longest + 2) % 3) as u8),
    ];

    for axis in axes {
        let axis_lo = bounds.get_index(axis, false);
        let axis_hi = bounds.get_index(axis, true);

        let mut edges: Vec<Edge> = Vec::with_capacity(2 * n);
        for item in items {
            edges.push(Edge {
                value: item.bbox.get_index(axis, false),
                is_upper: false,
            });
            edges.push(Edge {
                value: item.bbox.get_index(axis, true),
                is_upper: true,
            });
        }
        // Ties sort the upper edge of a coincident pair first, closing a
        // straddling interval before opening a new one.
        edges.sort_by(|a, b| {
            a.value
                .partial_cmp(&b.value)
                .unwrap()
                .then_with(|| b.is_upper.cmp(&a.is_upper))
        });

        let mut lower_count = 0usize;
        let mut upper_count = n;
        let mut best: Option<(Float, Float)> = None;

        for edge in &edges {
            if edge.is_upper {
                upper_count -= 1;
            }
            if edge.value > axis_lo && edge.value < axis_hi {
                let n_lo = lower_count;
                let n_hi = upper_count;
                let mut lo_bounds = *bounds;
                lo_bounds.set_index(axis, true, edge.value);
                let mut hi_bounds = *bounds;
                hi_bounds.set_index(axis, false, edge.value);
                let a_lo = lo_bounds.surface_area();
                let a_hi = hi_bounds.surface_area();
                let bonus = if n_lo == 0 || n_hi == 0 {
                    1.0 - config.empty_bonus
                } else {
                    1.0
                };
                let cost = 1.0
                    + bonus * (a_lo * n_lo as Float + a_hi * n_hi as Float) / area * config.hit_cost;
                if best.map_or(true, |(c, _)| cost < c) {
                    best = Some((cost, edge.value));
                }
            }
            if !edge.is_upper {
                lower_count += 1;
            }
        }

        if let Some((cost, split)) = best {
            return if cost < leaf_cost { Some((axis, split)) } else { None };
        }
    }
    None
}

/// Writes the build tree into `nodes` depth-first, lower child immediately
/// after its branch. `my_offset` is captured once, before recursing into
/// either child; the branch's final `upper` field is written only after
/// both children (and therefore any reallocation their pushes could cause)
/// have completed, so no reference into `nodes` is held across a push.
fn flatten(node: &BuildNode, nodes: &mut Vec<KdNode>) -> u32 {
    let my_offset = nodes.len() as u32;
    match node {
        BuildNode::Leaf(items) => {
            nodes.push(KdNode::Leaf {
                items: items.clone(),
            });
        }
        BuildNode::Branch {
            axis,
            split,
            lower,
            upper,
        } => {
            nodes.push(KdNode::Branch {
                axis: *axis,
                split: *split,
                upper: 0,
            });
            flatten(lower, nodes);
            let upper_offset = flatten(upper, nodes);
            nodes[my_offset as usize] = KdNode::Branch {
                axis: *axis,
                split: *split,
                upper: upper_offset,
            };
        }
    }
    my_offset
}
