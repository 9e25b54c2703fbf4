pub mod merge;

use std::collections::HashMap;
use petgraph::unionfind::UnionFind;
use rstar::{RTree, RTreeObject, AABB};
use crate::types::Buffer;

///
/// Square boolean adjacency matrix over the records of one group
///
#[derive(Debug, PartialEq, Clone)]
pub struct Adjacency {
    size: usize,
    cells: Vec<bool>
}

impl Adjacency {
    pub fn new(size: usize) -> Self {
        Adjacency {
            size,
            cells: vec![false; size * size]
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize) {
        self.cells[i * self.size + j] = true;
    }

    ///
    /// Indexes adjacent to i, in ascending order
    ///
    pub fn neighbours(&self, i: usize) -> Vec<usize> {
        (0..self.size).filter(|j| self.get(i, *j)).collect()
    }
}

struct Envelope {
    aabb: AABB<[f64; 2]>,
    index: usize
}

impl RTreeObject for Envelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

///
/// Build the overlap graph of a list of buffers
///
/// Cell (i, j) is set when buffer i intersects buffer j, including i == j.
/// Candidate pairs come from an R-tree over the buffer envelopes so only pairs with
/// touching envelopes are tested exactly.
///
pub fn overlaps(buffers: &[Buffer<'_>]) -> Adjacency {
    let mut adjacency = Adjacency::new(buffers.len());

    let envelopes: Vec<Envelope> = buffers.iter().enumerate().filter_map(|(index, buffer)| {
        buffer.envelope().map(|rect| Envelope {
            aabb: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
            index
        })
    }).collect();

    let tree = RTree::bulk_load(envelopes);

    for (i, buffer) in buffers.iter().enumerate() {
        let rect = match buffer.envelope() {
            Some(rect) => rect,
            None => continue
        };

        let aabb = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

        for candidate in tree.locate_in_envelope_intersecting(&aabb) {
            let j = candidate.index;

            // intersection is symmetric, test each pair once
            if j < i {
                continue;
            }

            if buffer.intersects(&buffers[j]) {
                adjacency.set(i, j);
                adjacency.set(j, i);
            }
        }
    }

    adjacency
}

///
/// Partition an undirected graph into connected components
///
/// Components are ordered by their smallest index and list their members in
/// ascending order, so the first member is always the earliest record.
///
pub fn components(adjacency: &Adjacency) -> Vec<Vec<usize>> {
    let mut sets: UnionFind<usize> = UnionFind::new(adjacency.len());

    for i in 0..adjacency.len() {
        for j in adjacency.neighbours(i) {
            sets.union(i, j);
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut slot: HashMap<usize, usize> = HashMap::new();

    for i in 0..adjacency.len() {
        let root = sets.find_mut(i);

        match slot.get(&root) {
            Some(group) => groups[*group].push(i),
            None => {
                slot.insert(root, groups.len());
                groups.push(vec![i]);
            }
        };
    }

    groups
}

///
/// True if every buffer is transitively connected to every other one
///
pub fn is_connected(buffers: &[Buffer<'_>]) -> bool {
    components(&overlaps(buffers)).len() == 1
}
