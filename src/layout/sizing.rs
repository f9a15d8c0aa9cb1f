//! Length arithmetic for splitting a group's space among its children.
//!
//! These functions work on plain slices so the arrange pass can feed them
//! whatever the tree reports; they never touch the tree themselves.

use crate::constants::LENGTH_EPSILON;
use crate::model::GridLength;

/// One visible child along the split axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildLength {
    /// Effective length (absolute lengths already reflect any shrink).
    pub length: GridLength,
    pub min: f64,
}

/// One child as seen by [`fit_fixed_lengths`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedChild {
    pub nominal: GridLength,
    /// Current effective size of a fixed child; ignored for star children.
    pub current: f64,
    pub min: f64,
}

/// Split `available` among `children` with a splitter of `splitter` between
/// neighbours.
///
/// Fixed children get their length (never below their minimum). Star
/// children share what remains by weight; a star child whose share would
/// fall below its minimum is pinned there and the rest is shared again. When
/// no child is a star, the last one takes the remainder.
pub fn distribute(children: &[ChildLength], available: f64, splitter: f64) -> Vec<f64> {
    let count = children.len();
    if count == 0 {
        return Vec::new();
    }
    let mut remaining = (available - splitter * (count - 1) as f64).max(0.0);
    let implicit_star = !children.iter().any(|child| child.length.is_star());

    let mut sizes = vec![0.0; count];
    let mut stars: Vec<(usize, f64)> = Vec::new();
    for (index, child) in children.iter().enumerate() {
        match child.length {
            _ if implicit_star && index + 1 == count => stars.push((index, 1.0)),
            GridLength::Star(weight) => stars.push((index, weight.max(LENGTH_EPSILON))),
            GridLength::Absolute(length) => {
                sizes[index] = length.max(child.min);
                remaining -= sizes[index];
            }
        }
    }

    loop {
        let space = remaining.max(0.0);
        let total_weight: f64 = stars.iter().map(|(_, weight)| weight).sum();
        let pinned = stars.iter().position(|(index, weight)| {
            space * weight / total_weight < children[*index].min
        });
        match pinned {
            Some(position) => {
                let (index, _) = stars.remove(position);
                sizes[index] = children[index].min;
                remaining -= sizes[index];
            }
            None => {
                for (index, weight) in &stars {
                    sizes[*index] = space * weight / total_weight;
                }
                break;
            }
        }
    }
    sizes
}

/// New resizable lengths for the fixed children of a group so they fit
/// `available` alongside the star children's minimums.
///
/// Returns one entry per child; `None` for star children.
pub fn fit_fixed_lengths(children: &[FixedChild], available: f64, splitter: f64) -> Vec<Option<f64>> {
    let count = children.len();
    let mut fitted = vec![None; count];
    if count == 0 {
        return fitted;
    }
    let splitters = splitter * (count - 1) as f64;
    let fixed: Vec<usize> = (0..count)
        .filter(|index| children[*index].nominal.is_absolute())
        .collect();
    let star_min: f64 = (0..count)
        .filter(|index| !children[*index].nominal.is_absolute())
        .map(|index| children[index].min)
        .sum();
    let minimum: f64 = children.iter().map(|child| child.min).sum::<f64>() + splitters;
    let preferred: f64 = fixed
        .iter()
        .map(|index| children[*index].nominal.value().max(children[*index].min))
        .sum::<f64>()
        + star_min
        + splitters;

    if minimum >= available {
        for index in fixed {
            fitted[index] = Some(children[index].min);
        }
        return fitted;
    }
    if preferred <= available {
        for index in fixed {
            let child = &children[index];
            fitted[index] = Some(child.nominal.value().max(child.min));
        }
        return fitted;
    }

    let target = available - splitters - star_min;
    let current: f64 = fixed.iter().map(|index| children[*index].current).sum();
    let delta = current - target;
    let shrinking = delta > 0.0;
    let weights: Vec<f64> = fixed
        .iter()
        .map(|index| {
            let child = &children[*index];
            if shrinking {
                (child.current - child.min).max(0.0)
            } else {
                child.nominal.value()
            }
        })
        .collect();
    let total_weight: f64 = weights.iter().sum();

    let mut carry = 0.0;
    for (index, weight) in fixed.into_iter().zip(weights) {
        let child = &children[index];
        let share = if total_weight > 0.0 {
            delta * weight / total_weight
        } else {
            0.0
        };
        let mut next = child.current - share - carry;
        carry = 0.0;
        if next < child.min {
            carry = child.min - next;
            next = child.min;
        }
        fitted[index] = Some(next);
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(weight: f64, min: f64) -> ChildLength {
        ChildLength {
            length: GridLength::Star(weight),
            min,
        }
    }

    fn fixed(length: f64, min: f64) -> ChildLength {
        ChildLength {
            length: GridLength::Absolute(length),
            min,
        }
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn stars_share_after_fixed_and_splitters() {
        let sizes = distribute(
            &[fixed(200.0, 25.0), star(1.0, 25.0), star(2.0, 25.0)],
            500.0,
            6.0,
        );
        assert!(close(&sizes, &[200.0, 96.0, 192.0]));
        assert!((sizes.iter().sum::<f64>() + 12.0 - 500.0).abs() < 1e-9);
    }

    #[test]
    fn star_below_minimum_is_pinned() {
        let sizes = distribute(&[star(1.0, 80.0), star(9.0, 10.0)], 206.0, 6.0);
        assert!(close(&sizes, &[80.0, 120.0]));
    }

    #[test]
    fn last_child_absorbs_when_no_star() {
        let sizes = distribute(&[fixed(100.0, 10.0), fixed(50.0, 10.0)], 300.0, 0.0);
        assert!(close(&sizes, &[100.0, 200.0]));
    }

    #[test]
    fn fixed_child_never_below_minimum() {
        let sizes = distribute(&[fixed(5.0, 40.0), star(1.0, 0.0)], 100.0, 0.0);
        assert!(close(&sizes, &[40.0, 60.0]));
    }

    fn child(nominal: GridLength, current: f64, min: f64) -> FixedChild {
        FixedChild {
            nominal,
            current,
            min,
        }
    }

    #[test]
    fn fixed_lengths_restore_nominal_when_room() {
        let fitted = fit_fixed_lengths(
            &[
                child(GridLength::Absolute(200.0), 120.0, 25.0),
                child(GridLength::Star(1.0), 0.0, 25.0),
            ],
            600.0,
            6.0,
        );
        assert_eq!(fitted, vec![Some(200.0), None]);
    }

    #[test]
    fn fixed_lengths_drop_to_minimum_when_cramped() {
        let fitted = fit_fixed_lengths(
            &[
                child(GridLength::Absolute(200.0), 200.0, 30.0),
                child(GridLength::Star(1.0), 0.0, 25.0),
            ],
            40.0,
            6.0,
        );
        assert_eq!(fitted, vec![Some(30.0), None]);
    }

    #[test]
    fn fixed_lengths_shrink_by_slack() {
        // target for fixed = 300 - 6*2 - 28 = 260; current 400, delta 140.
        // slack 150 and 50 -> shares 105 and 35.
        let fitted = fit_fixed_lengths(
            &[
                child(GridLength::Absolute(200.0), 200.0, 50.0),
                child(GridLength::Star(1.0), 0.0, 28.0),
                child(GridLength::Absolute(200.0), 200.0, 150.0),
            ],
            300.0,
            6.0,
        );
        assert_eq!(fitted[1], None);
        let first = fitted[0].unwrap();
        let last = fitted[2].unwrap();
        assert!((first - 95.0).abs() < 1e-9);
        assert!((last - 165.0).abs() < 1e-9);
    }

    #[test]
    fn clamped_child_carries_to_next() {
        // First child sits below its minimum with no slack; raising it is
        // taken from the second.
        let fitted = fit_fixed_lengths(
            &[
                child(GridLength::Absolute(100.0), 20.0, 30.0),
                child(GridLength::Absolute(100.0), 200.0, 10.0),
            ],
            150.0,
            0.0,
        );
        assert_eq!(fitted, vec![Some(30.0), Some(120.0)]);
    }
}
