use std::collections::HashSet;
use std::iter::FromIterator;

///
/// Ordered set of unique canonical street names. Iteration order is insertion
/// order, which fixes the fuzzy tie-break
///
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Vocabulary {
    names: Vec<String>
}

impl Vocabulary {
    pub fn new(names: Vec<String>) -> Self {
        let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
        let mut unique: Vec<String> = Vec::with_capacity(names.len());

        for name in names {
            if seen.insert(name.clone()) {
                unique.push(name);
            }
        }

        Vocabulary {
            names: unique
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Vocabulary::new(iter.into_iter().collect())
    }
}
