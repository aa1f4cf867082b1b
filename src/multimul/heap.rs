//! Fixed-capacity binary max-heap of (scalar, point) terms.
//!
//! Slots are addressed 1-based internally (parent `i / 2`, children `2i` and
//! `2i + 1`) and stored in a plain array on the stack. Terms are moved on swap.

use core::cmp::Ordering;

use super::MAX_TERMS;
use crate::algebra::{PointArith, ScalarArith};

/// One `scalar * point` summand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term<S, P> {
    pub scalar: S,
    pub point: P,
}

impl<S, P> Term<S, P> {
    pub const fn new(scalar: S, point: P) -> Self {
        Self { scalar, point }
    }
}

pub struct TermHeap<S, P> {
    slots: [Term<S, P>; MAX_TERMS],
    len: usize,
}

impl<S: ScalarArith, P: PointArith> TermHeap<S, P> {
    pub fn new() -> Self {
        Self {
            slots: [Term::new(S::zero(), P::infinity()); MAX_TERMS],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a term. Panics when the heap already holds `MAX_TERMS` terms.
    pub fn push(&mut self, term: Term<S, P>) {
        assert!(self.len < MAX_TERMS, "term heap capacity exceeded");
        self.len += 1;
        let slot = self.len;
        *self.at_mut(slot) = term;
        self.sift_up(slot);
    }

    /// Removes and returns the term with the largest scalar. Panics when empty.
    pub fn pop_max(&mut self) -> Term<S, P> {
        assert!(self.len > 0, "pop_max on an empty term heap");
        let root = *self.at(1);
        let last = *self.at(self.len);
        *self.at_mut(1) = last;
        self.len -= 1;
        self.sift_down(1);
        root
    }

    pub fn peek_max(&self) -> Option<&Term<S, P>> {
        if self.is_empty() { None } else { Some(self.at(1)) }
    }

    /// Scalar of the root term. Panics when empty.
    pub fn max_scalar(&self) -> S {
        assert!(self.len > 0, "max_scalar on an empty term heap");
        self.at(1).scalar
    }

    /// Point of the root term. The key stays read-only so the order holds.
    /// Panics when empty.
    pub fn max_point_mut(&mut self) -> &mut P {
        assert!(self.len > 0, "max_point_mut on an empty term heap");
        &mut self.at_mut(1).point
    }

    /// Occupied slots in storage order, not sorted.
    pub fn iter(&self) -> impl Iterator<Item = &Term<S, P>> {
        self.slots[..self.len].iter()
    }

    /// Checks the max-heap property over all occupied slots.
    pub fn is_heap(&self) -> bool {
        (2..=self.len).all(|i| !self.less(i / 2, i))
    }

    #[inline]
    fn at(&self, i: usize) -> &Term<S, P> {
        &self.slots[i - 1]
    }

    #[inline]
    fn at_mut(&mut self, i: usize) -> &mut Term<S, P> {
        &mut self.slots[i - 1]
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.at(i).scalar.cmp_var(&self.at(j).scalar) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 1 && self.less(i / 2, i) {
            self.slots.swap(i / 2 - 1, i - 1);
            i /= 2;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        while 2 * i <= self.len {
            let mut largest = i;
            if self.less(largest, 2 * i) {
                largest = 2 * i;
            }
            if 2 * i + 1 <= self.len && self.less(largest, 2 * i + 1) {
                largest = 2 * i + 1;
            }
            if largest == i {
                break;
            }
            self.slots.swap(i - 1, largest - 1);
            i = largest;
        }
    }
}

impl<S: ScalarArith, P: PointArith> Default for TermHeap<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use curve25519_dalek::ristretto::RistrettoPoint;
    use curve25519_dalek::scalar::Scalar;

    fn term(value: u64) -> Term<Scalar, RistrettoPoint> {
        Term::new(Scalar::from(value), RISTRETTO_BASEPOINT_POINT)
    }

    #[test]
    fn test_push_pop_keeps_heap_property() {
        let values = [17u64, 3, 99, 42, 42, 1, 250, 8, 64, 5, 77, 13];
        let mut heap = TermHeap::new();

        for (count, &v) in values.iter().enumerate() {
            heap.push(term(v));
            assert_eq!(heap.len(), count + 1);
            assert!(heap.is_heap());
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));

        for (popped, expected) in sorted.iter().enumerate() {
            let before = heap.len();
            let top = heap.pop_max();
            assert_eq!(top.scalar, Scalar::from(*expected));
            assert_eq!(heap.len(), before - 1);
            assert!(heap.is_heap(), "heap property broken after pop {popped}");
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_interleaved_operations() {
        let mut heap = TermHeap::new();
        heap.push(term(10));
        heap.push(term(30));
        assert_eq!(heap.pop_max().scalar, Scalar::from(30u64));
        heap.push(term(20));
        heap.push(term(5));
        assert_eq!(heap.peek_max().map(|t| t.scalar), Some(Scalar::from(20u64)));
        assert_eq!(heap.pop_max().scalar, Scalar::from(20u64));
        assert_eq!(heap.pop_max().scalar, Scalar::from(10u64));
        assert_eq!(heap.pop_max().scalar, Scalar::from(5u64));
        assert!(heap.peek_max().is_none());
    }

    #[test]
    fn test_max_point_mut_updates_root_only() {
        let mut heap = TermHeap::new();
        heap.push(term(1));
        heap.push(term(2));
        let doubled = RISTRETTO_BASEPOINT_POINT + RISTRETTO_BASEPOINT_POINT;
        assert_eq!(heap.max_scalar(), Scalar::from(2u64));
        *heap.max_point_mut() = doubled;
        let top = heap.pop_max();
        assert_eq!(top.scalar, Scalar::from(2u64));
        assert_eq!(top.point, doubled);
        assert_eq!(heap.pop_max().point, RISTRETTO_BASEPOINT_POINT);
    }

    #[test]
    fn test_fills_to_capacity() {
        let mut heap = TermHeap::new();
        for v in 0..MAX_TERMS as u64 {
            heap.push(term(v + 1));
        }
        assert_eq!(heap.len(), MAX_TERMS);
        assert!(heap.is_heap());
        assert_eq!(heap.pop_max().scalar, Scalar::from(MAX_TERMS as u64));
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_push_past_capacity_panics() {
        let mut heap = TermHeap::new();
        for v in 0..=MAX_TERMS as u64 {
            heap.push(term(v + 1));
        }
    }

    #[test]
    #[should_panic(expected = "empty term heap")]
    fn test_pop_empty_panics() {
        let mut heap: TermHeap<Scalar, RistrettoPoint> = TermHeap::new();
        heap.pop_max();
    }
}
