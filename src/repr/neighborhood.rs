use std::{iter::Copied, slice::Iter};

use itertools::Itertools;
use smallvec::{Array, SmallVec};

use super::*;

/// Basic Neighborhood-Impl. using `Vec<(Node, Weight)>`
#[derive(Default, Clone, Debug)]
pub struct ArrNeighborhood(pub Vec<(Node, Weight)>);

impl Neighborhood for ArrNeighborhood {
    fn new(_n: NumNodes) -> Self {
        Self(Default::default())
    }

    fn num_of_neighbors(&self) -> NumNodes {
        self.0.len() as NumNodes
    }

    type NeighborhoodIter<'a>
        = Copied<Iter<'a, (Node, Weight)>>
    where
        Self: 'a;

    fn neighbors(&self) -> Self::NeighborhoodIter<'_> {
        self.0.iter().copied()
    }

    fn weight_to(&self, v: Node) -> Option<Weight> {
        self.0.iter().find(|(x, _)| *x == v).map(|(_, w)| *w)
    }

    fn add_neighbor(&mut self, v: Node, w: Weight) {
        self.0.push((v, w));
    }

    fn set_weight(&mut self, v: Node, w: Weight) -> Option<Weight> {
        match self.0.iter_mut().find(|(x, _)| *x == v) {
            Some((_, weight)) => Some(std::mem::replace(weight, w)),
            None => {
                self.0.push((v, w));
                None
            }
        }
    }

    fn try_remove_neighbor(&mut self, v: Node) -> Option<Weight> {
        let (pos, _) = self.0.iter().find_position(|(x, _)| *x == v)?;
        Some(self.0.swap_remove(pos).1)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Like [`ArrNeighborhood`] but uses `SmallVec<[(Node, Weight); N]>` instead.
/// Prefer this if the graph is known to be sparse.
#[derive(Default, Clone, Debug)]
pub struct SparseNeighborhood<const N: usize = 8>(pub SmallVec<[(Node, Weight); N]>)
where
    [(Node, Weight); N]: Array<Item = (Node, Weight)>;

impl<const N: usize> Neighborhood for SparseNeighborhood<N>
where
    [(Node, Weight); N]: Array<Item = (Node, Weight)>,
{
    fn new(_n: NumNodes) -> Self {
        Self(Default::default())
    }

    fn num_of_neighbors(&self) -> NumNodes {
        self.0.len() as NumNodes
    }

    type NeighborhoodIter<'a>
        = Copied<Iter<'a, (Node, Weight)>>
    where
        Self: 'a;

    fn neighbors(&self) -> Self::NeighborhoodIter<'_> {
        self.0.iter().copied()
    }

    fn weight_to(&self, v: Node) -> Option<Weight> {
        self.0.iter().find(|(x, _)| *x == v).map(|(_, w)| *w)
    }

    fn add_neighbor(&mut self, v: Node, w: Weight) {
        self.0.push((v, w));
    }

    fn set_weight(&mut self, v: Node, w: Weight) -> Option<Weight> {
        match self.0.iter_mut().find(|(x, _)| *x == v) {
            Some((_, weight)) => Some(std::mem::replace(weight, w)),
            None => {
                self.0.push((v, w));
                None
            }
        }
    }

    fn try_remove_neighbor(&mut self, v: Node) -> Option<Weight> {
        let (pos, _) = self.0.iter().find_position(|(x, _)| *x == v)?;
        Some(self.0.swap_remove(pos).1)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// A Neighborhood represented by a dense row of optional weights.
/// Lookups are `O(1)`, iteration is `O(n)` and yields neighbors in ascending order.
#[derive(Default, Clone, Debug)]
pub struct MatrixNeighborhood {
    row: Vec<Option<Weight>>,
    degree: NumNodes,
}

fn present_entry((v, w): (usize, &Option<Weight>)) -> Option<(Node, Weight)> {
    w.map(|w| (v as Node, w))
}

impl Neighborhood for MatrixNeighborhood {
    fn new(n: NumNodes) -> Self {
        Self {
            row: vec![None; n as usize],
            degree: 0,
        }
    }

    fn num_of_neighbors(&self) -> NumNodes {
        self.degree
    }

    type NeighborhoodIter<'a>
        = std::iter::FilterMap<
        std::iter::Enumerate<Iter<'a, Option<Weight>>>,
        fn((usize, &Option<Weight>)) -> Option<(Node, Weight)>,
    >
    where
        Self: 'a;

    fn neighbors(&self) -> Self::NeighborhoodIter<'_> {
        self.row
            .iter()
            .enumerate()
            .filter_map(present_entry as fn((usize, &Option<Weight>)) -> Option<(Node, Weight)>)
    }

    fn weight_to(&self, v: Node) -> Option<Weight> {
        self.row[v as usize]
    }

    fn add_neighbor(&mut self, v: Node, w: Weight) {
        self.set_weight(v, w);
    }

    fn set_weight(&mut self, v: Node, w: Weight) -> Option<Weight> {
        let prev = self.row[v as usize].replace(w);
        if prev.is_none() {
            self.degree += 1;
        }
        prev
    }

    fn try_remove_neighbor(&mut self, v: Node) -> Option<Weight> {
        let prev = self.row[v as usize].take();
        if prev.is_some() {
            self.degree -= 1;
        }
        prev
    }

    fn clear(&mut self) {
        self.row.iter_mut().for_each(|w| *w = None);
        self.degree = 0;
    }
}
