// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small tree (capacity 3), then remove every box in insertion order,
//! printing the structure level by level after each step.

use understory_rtree::{Aabb, NodeRef, RTree, RTreeConfig};

const BOXES: [([f64; 2], [f64; 2]); 10] = [
    ([5.0, 30.0], [25.0, 35.0]),
    ([15.0, 38.0], [23.0, 50.0]),
    ([10.0, 23.0], [30.0, 28.0]),
    ([13.0, 10.0], [18.0, 15.0]),
    ([23.0, 10.0], [28.0, 20.0]),
    ([28.0, 30.0], [33.0, 40.0]),
    ([38.0, 13.0], [43.0, 30.0]),
    ([35.0, 37.0], [40.0, 43.0]),
    ([45.0, 8.0], [50.0, 50.0]),
    ([23.0, 55.0], [28.0, 70.0]),
];

fn print_tree(tree: &RTree) {
    let mut level: Vec<NodeRef<'_>> = vec![tree.root()];
    while !level.is_empty() {
        let depth = level[0].level();
        let nodes: Vec<String> = level
            .iter()
            .map(|n| {
                let entries: Vec<String> = n.entries().map(ToString::to_string).collect();
                format!("{{{}}}", entries.join(" "))
            })
            .collect();
        println!("  level {depth}: {}", nodes.join("  "));
        level = level.iter().flat_map(|n| n.children()).collect();
    }
}

fn main() {
    let config = RTreeConfig::default()
        .with_capacity(3)
        .with_fill_factor(0.4);
    let mut tree = RTree::new(config).expect("valid config");
    let boxes: Vec<Aabb> = BOXES
        .iter()
        .map(|(lo, hi)| Aabb::from_corners(lo, hi).expect("2D corners"))
        .collect();

    for b in &boxes {
        tree.insert(b.clone()).expect("2D box");
    }
    println!(
        "built {} boxes, height {}, min entries {}",
        tree.len(),
        tree.height(),
        tree.min_entries()
    );
    print_tree(&tree);

    for b in &boxes {
        match tree.remove(b).expect("2D box") {
            Some(slot) => println!("removed {b} from leaf slot {slot}; height {}", tree.height()),
            None => println!("{b} not found"),
        }
        print_tree(&tree);
    }
    assert!(tree.is_empty());
}
