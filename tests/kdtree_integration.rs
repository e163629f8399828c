//! A kd-tree over a large random item set must survive a serialise/restore
//! round trip with identical hit behaviour for many random rays.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use lumetrace::accelerators::kdtree::{Item, KdTree, KdTreeConfig, LeafHandler};
use lumetrace::core::bounds::BoundingBox;
use lumetrace::core::geometry::{Point3, Ray3, Vector3};
use lumetrace::core::pbrt::Float;

struct BoxRegistry {
    boxes: HashMap<u32, BoundingBox>,
}

impl LeafHandler for BoxRegistry {
    fn hit_leaf(&mut self, _node_id: u32, items: &[u32], ray: &Ray3, t_max: Float) -> bool {
        items.iter().any(|id| {
            let (hit, t_min, _) = self.boxes[id].full_intersection(ray);
            hit && t_min <= t_max
        })
    }

    fn contains_leaf(
        &mut self,
        _node_id: u32,
        items: &[u32],
        point: &Point3,
    ) -> smallvec::SmallVec<[u32; 4]> {
        items
            .iter()
            .copied()
            .filter(|id| self.boxes[id].contains(point))
            .collect()
    }
}

fn random_unit_cube_items(rng: &mut StdRng, n: usize) -> (Vec<Item>, HashMap<u32, BoundingBox>) {
    let mut items = Vec::with_capacity(n);
    let mut boxes = HashMap::with_capacity(n);
    for i in 0..n {
        let x: Float = rng.gen_range(-100.0..100.0);
        let y: Float = rng.gen_range(-100.0..100.0);
        let z: Float = rng.gen_range(-100.0..100.0);
        let bbox = BoundingBox::new(Point3::new(x, y, z), Point3::new(x + 1.0, y + 1.0, z + 1.0));
        items.push(Item { id: i as u32, bbox });
        boxes.insert(i as u32, bbox);
    }
    (items, boxes)
}

fn random_ray(rng: &mut StdRng) -> Ray3 {
    let origin = Point3::new(
        rng.gen_range(-150.0..150.0),
        rng.gen_range(-150.0..150.0),
        rng.gen_range(-150.0..150.0),
    );
    let direction = Vector3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
    .normalise();
    Ray3::new(origin, direction)
}

#[test]
fn serialisation_round_trip_preserves_hit_behaviour_over_many_random_rays() {
    let mut rng = StdRng::seed_from_u64(0xC0FF_EE42);
    let (items, boxes) = random_unit_cube_items(&mut rng, 1000);

    let tree = KdTree::build(items, KdTreeConfig::default()).unwrap();
    let persisted = tree.persist().unwrap();
    let restored = KdTree::restore(&persisted).unwrap();

    assert_eq!(persisted, restored.persist().unwrap());

    for _ in 0..10_000 {
        let ray = random_ray(&mut rng);
        let mut original_handler = BoxRegistry {
            boxes: boxes.clone(),
        };
        let mut restored_handler = BoxRegistry {
            boxes: boxes.clone(),
        };
        assert_eq!(
            tree.hit(&ray, &mut original_handler),
            restored.hit(&ray, &mut restored_handler)
        );
    }
}

#[test]
fn every_item_box_is_covered_by_the_tree_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let (items, _) = random_unit_cube_items(&mut rng, 200);
    let tree = KdTree::build(items.clone(), KdTreeConfig::default()).unwrap();
    for item in &items {
        assert!(tree.bounds().contains(&item.bbox.lower));
        assert!(tree.bounds().contains(&item.bbox.upper));
    }
}
