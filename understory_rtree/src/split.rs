// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic split (Guttman).
//!
//! An overflowing node holds `C` entries and must admit one more. The split
//! takes the `C + 1` entries, picks the pair that would waste the most area if
//! forced together as seeds, then assigns the rest one at a time, always
//! choosing the entry with the strongest preference for one group. Once a
//! group needs every remaining entry to reach the minimum fill, the rest are
//! assigned to it wholesale.

use alloc::vec;
use alloc::vec::Vec;

use crate::types::{Aabb, area_increment, union_aabb};

/// One of the two halves produced by a split.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Group {
    A,
    B,
}

/// Split `entries` plus the `pending` entry into two groups of at least
/// `min_entries` each.
///
/// `bbox_of` maps an entry to the box used for the area metrics; it lets leaf
/// boxes and index children share the same algorithm.
pub(crate) fn split_overflow<E, F>(
    mut entries: Vec<E>,
    pending: E,
    min_entries: usize,
    bbox_of: F,
) -> (Vec<E>, Vec<E>)
where
    F: Fn(&E) -> &Aabb,
{
    entries.push(pending);
    let (group_a, group_b) = quadratic_partition(&entries, min_entries, &bbox_of);
    let mut slots: Vec<Option<E>> = entries.into_iter().map(Some).collect();
    let mut take = |positions: Vec<usize>| -> Vec<E> {
        positions
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect()
    };
    let a = take(group_a);
    let b = take(group_b);
    (a, b)
}

/// Partition positions of `entries` into two groups.
pub(crate) fn quadratic_partition<E, F>(
    entries: &[E],
    min_entries: usize,
    bbox_of: F,
) -> (Vec<usize>, Vec<usize>)
where
    F: Fn(&E) -> &Aabb,
{
    debug_assert!(
        entries.len() >= 2 * min_entries,
        "too few entries to split at this minimum fill"
    );
    let (seed_a, seed_b) = pick_seeds(entries, &bbox_of);
    let mut group_a = vec![seed_a];
    let mut group_b = vec![seed_b];
    let mut bbox_a = bbox_of(&entries[seed_a]).clone();
    let mut bbox_b = bbox_of(&entries[seed_b]).clone();
    let mut unassigned: Vec<usize> = (0..entries.len())
        .filter(|&i| i != seed_a && i != seed_b)
        .collect();

    while !unassigned.is_empty() {
        let remaining = unassigned.len();
        if group_a.len() + remaining <= min_entries {
            group_a.append(&mut unassigned);
            break;
        }
        if group_b.len() + remaining <= min_entries {
            group_b.append(&mut unassigned);
            break;
        }

        // Pick the entry whose increments differ the most between the groups.
        let mut next = 0;
        let mut max_diff = f64::NEG_INFINITY;
        for (pos, &i) in unassigned.iter().enumerate() {
            let bbox = bbox_of(&entries[i]);
            let diff = abs_diff(
                area_increment(&bbox_a, bbox),
                area_increment(&bbox_b, bbox),
            );
            if diff > max_diff {
                max_diff = diff;
                next = pos;
            }
        }
        let i = unassigned.remove(next);
        let bbox = bbox_of(&entries[i]);
        let group = choose_group(
            area_increment(&bbox_a, bbox),
            area_increment(&bbox_b, bbox),
            (bbox_a.area(), group_a.len()),
            (bbox_b.area(), group_b.len()),
        );
        match group {
            Group::A => {
                bbox_a = union_aabb(&bbox_a, bbox);
                group_a.push(i);
            }
            Group::B => {
                bbox_b = union_aabb(&bbox_b, bbox);
                group_b.push(i);
            }
        }
    }

    (group_a, group_b)
}

/// The pair maximizing `area(union(a, b)) - area(a) - area(b)`. First pair wins ties.
pub(crate) fn pick_seeds<E, F>(entries: &[E], bbox_of: F) -> (usize, usize)
where
    F: Fn(&E) -> &Aabb,
{
    let mut seeds = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;
    for (i, a) in entries.iter().enumerate() {
        let a = bbox_of(a);
        for (j, b) in entries.iter().enumerate().skip(i + 1) {
            let b = bbox_of(b);
            let waste = union_aabb(a, b).area() - a.area() - b.area();
            if waste > max_waste {
                max_waste = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Smaller increment wins, then smaller group area, then fewer entries, then A.
fn choose_group(
    increment_a: f64,
    increment_b: f64,
    (area_a, len_a): (f64, usize),
    (area_b, len_b): (f64, usize),
) -> Group {
    if increment_a > increment_b {
        Group::B
    } else if increment_a < increment_b {
        Group::A
    } else if area_a > area_b {
        Group::B
    } else if area_a < area_b {
        Group::A
    } else if len_a > len_b {
        Group::B
    } else {
        Group::A
    }
}

fn abs_diff(a: f64, b: f64) -> f64 {
    if a > b { a - b } else { b - a }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Aabb {
        Aabb::from_corners(&[min_x, min_y], &[max_x, max_y]).unwrap()
    }

    fn id(b: &Aabb) -> &Aabb {
        b
    }

    #[test]
    fn seeds_are_the_most_wasteful_pair() {
        let boxes = [
            bx(0.0, 0.0, 1.0, 1.0),
            bx(1.0, 1.0, 2.0, 2.0),
            bx(50.0, 50.0, 51.0, 51.0),
            bx(0.5, 0.5, 1.5, 1.5),
        ];
        assert_eq!(pick_seeds(&boxes, id), (0, 2));
    }

    #[test]
    fn seeds_include_the_pending_entry() {
        let existing = vec![
            bx(0.0, 0.0, 1.0, 1.0),
            bx(1.0, 0.0, 2.0, 1.0),
            bx(2.0, 0.0, 3.0, 1.0),
        ];
        let pending = bx(100.0, 100.0, 101.0, 101.0);
        let mut all = existing.clone();
        all.push(pending.clone());
        assert_eq!(pick_seeds(&all, id), (0, 3));

        let (a, b) = split_overflow(existing, pending.clone(), 2, id);
        assert_eq!(a.len() + b.len(), 4);
        assert!(a.contains(&pending) || b.contains(&pending));
    }

    #[test]
    fn clusters_end_up_in_separate_groups() {
        let boxes = vec![
            bx(0.0, 0.0, 1.0, 1.0),
            bx(100.0, 100.0, 101.0, 101.0),
            bx(1.0, 1.0, 2.0, 2.0),
            bx(101.0, 101.0, 102.0, 102.0),
            bx(0.0, 1.0, 1.0, 2.0),
        ];
        let pending = bx(100.0, 101.0, 101.0, 102.0);
        let (a, b) = split_overflow(boxes, pending, 2, id);
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 3);
        assert!(a.iter().all(|e| e.max().coords()[0] <= 2.0));
        assert!(b.iter().all(|e| e.min().coords()[0] >= 100.0));
    }

    #[test]
    fn forced_assignment_keeps_minimum_fill() {
        // One outlier seed; every other entry prefers the crowded group.
        let mut boxes = Vec::new();
        for i in 0..6_i32 {
            let x = f64::from(i);
            boxes.push(bx(x, 0.0, x + 1.0, 1.0));
        }
        let pending = bx(1000.0, 1000.0, 1001.0, 1001.0);
        let (a, b) = split_overflow(boxes, pending, 3, id);
        assert!(a.len() >= 3, "group a under-filled: {}", a.len());
        assert!(b.len() >= 3, "group b under-filled: {}", b.len());
        assert_eq!(a.len() + b.len(), 7);
    }

    #[test]
    fn every_entry_is_assigned_exactly_once() {
        let boxes: Vec<Aabb> = (0..9_i32)
            .map(|i| {
                let x = f64::from(i * 7 % 5);
                let y = f64::from(i * 3 % 4);
                bx(x, y, x + 2.0, y + 1.0)
            })
            .collect();
        let (ga, gb) = quadratic_partition(&boxes, 4, id);
        let mut all: Vec<usize> = ga.iter().chain(gb.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..9).collect::<Vec<_>>());
        assert!(ga.len() >= 4 && gb.len() >= 4, "groups {ga:?} / {gb:?}");
    }

    #[test]
    fn group_tie_breaks() {
        assert_eq!(choose_group(2.0, 1.0, (0.0, 0), (0.0, 0)), Group::B);
        assert_eq!(choose_group(1.0, 2.0, (0.0, 0), (0.0, 0)), Group::A);
        assert_eq!(choose_group(1.0, 1.0, (5.0, 1), (3.0, 1)), Group::B);
        assert_eq!(choose_group(1.0, 1.0, (3.0, 1), (5.0, 1)), Group::A);
        assert_eq!(choose_group(1.0, 1.0, (3.0, 2), (3.0, 1)), Group::B);
        assert_eq!(choose_group(1.0, 1.0, (3.0, 1), (3.0, 2)), Group::A);
        assert_eq!(choose_group(1.0, 1.0, (3.0, 1), (3.0, 1)), Group::A);
    }
}
