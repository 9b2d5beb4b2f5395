//! Operations on vertex sets represented as sorted, deduplicated slices.

use std::cmp::Ordering;

use crate::index::Vertex;

pub(crate) fn is_subset(a: &[Vertex], b: &[Vertex]) -> bool {
    if a.len() > b.len() {
        return false;
    }
    let mut b = b.iter();
    'outer: for x in a {
        for y in b.by_ref() {
            match y.cmp(x) {
                Ordering::Less => continue,
                Ordering::Equal => continue 'outer,
                Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

pub(crate) fn intersects(a: &[Vertex], b: &[Vertex]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => return true,
        }
    }
    false
}

pub(crate) fn intersection(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

pub(crate) fn union(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

pub(crate) fn difference(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    a.iter().copied().filter(|x| b.binary_search(x).is_err()).collect()
}

/// Collects vertices into a sorted, deduplicated vector.
pub(crate) fn collect_sorted(vertices: impl IntoIterator<Item = Vertex>) -> Vec<Vertex> {
    let mut vertices: Vec<_> = vertices.into_iter().collect();
    vertices.sort_unstable();
    vertices.dedup();
    vertices
}

#[cfg(test)]
mod test {
    use super::*;

    fn set(xs: &[u32]) -> Vec<Vertex> {
        collect_sorted(xs.iter().copied().map(Vertex::new))
    }

    #[test]
    fn subset() {
        assert!(is_subset(&set(&[]), &set(&[1, 2])));
        assert!(is_subset(&set(&[2, 5]), &set(&[1, 2, 3, 5])));
        assert!(!is_subset(&set(&[2, 4]), &set(&[1, 2, 3, 5])));
        assert!(!is_subset(&set(&[6]), &set(&[1, 2, 3, 5])));
        assert!(!is_subset(&set(&[1, 2, 3]), &set(&[1, 2])));
    }

    #[test]
    fn set_operations() {
        let a = set(&[1, 3, 5, 7]);
        let b = set(&[3, 4, 5, 8]);
        assert_eq!(intersection(&a, &b), set(&[3, 5]));
        assert_eq!(union(&a, &b), set(&[1, 3, 4, 5, 7, 8]));
        assert_eq!(difference(&a, &b), set(&[1, 7]));
        assert!(intersects(&a, &b));
        assert!(!intersects(&a, &set(&[2, 4, 6])));
        assert_eq!(set(&[5, 1, 5, 3]), set(&[1, 3, 5]));
    }
}
