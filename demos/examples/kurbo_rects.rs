// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feed Kurbo rectangles into the tree and read them back.

use kurbo::Rect;
use understory_rtree::{Aabb, RTree};

fn main() {
    let rects = [
        Rect::new(0.0, 0.0, 10.0, 10.0),
        Rect::new(5.0, 5.0, 15.0, 15.0),
        // Flipped corners are normalized on conversion.
        Rect::new(40.0, 40.0, 30.0, 30.0),
    ];

    let mut tree = RTree::default();
    for r in rects {
        tree.insert(Aabb::from(r)).expect("2D box");
    }

    if let Some(bounds) = tree.root().bbox() {
        let bounds = Rect::try_from(&bounds).expect("2D tree");
        println!("bounds: {bounds:?}");
    }
    for b in &tree {
        let r = Rect::try_from(b).expect("2D tree");
        println!("stored {b} -> area {}", r.area());
    }

    let removed = tree.remove(&Aabb::from(Rect::new(30.0, 30.0, 40.0, 40.0)));
    println!("removed flipped rect: {removed:?}");
}
