use std::str::FromStr;
use crate::graph::merge::{MergeStrategy, FirstGeometry, LineMerge};

///
/// Grouping key used when partitioning street segments
///
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Scope {
    /// Group on the street name alone
    Name,

    /// Group on the street name and the first observation year
    NameYear
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Scope::Name),
            "name-year" => Ok(Scope::NameYear),
            _ => Err(format!("Invalid scope: {} (expected name or name-year)", s))
        }
    }
}

///
/// Geometry strategy used when collapsing a connected component
///
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MergeKind {
    First,
    LineMerge
}

impl FromStr for MergeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(MergeKind::First),
            "line-merge" => Ok(MergeKind::LineMerge),
            _ => Err(format!("Invalid merge strategy: {} (expected first or line-merge)", s))
        }
    }
}

///
/// Property names read from input features
///
#[derive(Debug, PartialEq, Clone)]
pub struct Keys {
    pub id: String,
    pub name: String,
    pub year: String
}

impl Default for Keys {
    fn default() -> Self {
        Keys {
            id: String::from("id"),
            name: String::from("name"),
            year: String::from("year")
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Context {
    /// Buffer tolerance in working CRS units
    pub tolerance: f64,

    /// Minimum fuzzy score (0-100) a candidate must reach
    pub cutoff: u8,

    /// Worker pool size
    pub threads: usize,

    pub scope: Scope,

    /// Repeat component merging until no group shrinks
    pub iterate: bool,

    pub merge: MergeKind,

    pub keys: Keys
}

impl Context {
    pub fn new(tolerance: f64, cutoff: u8, threads: usize) -> Result<Self, String> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(format!("Invalid buffer tolerance: {}", tolerance));
        }

        if cutoff > 100 {
            return Err(format!("Invalid score cutoff: {} (must be 0-100)", cutoff));
        }

        if threads == 0 {
            return Err(String::from("Worker pool must have at least 1 thread"));
        }

        Ok(Context {
            tolerance: tolerance,
            cutoff: cutoff,
            threads: threads,
            scope: Scope::Name,
            iterate: false,
            merge: MergeKind::First,
            keys: Keys::default()
        })
    }

    pub fn strategy(&self) -> Box<dyn MergeStrategy> {
        match self.merge {
            MergeKind::First => Box::new(FirstGeometry),
            MergeKind::LineMerge => Box::new(LineMerge)
        }
    }
}
