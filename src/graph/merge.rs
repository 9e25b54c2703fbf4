use geo::{Coord, Geometry, LineString};
use crate::types::Street;

///
/// Computes the geometry of a representative record from the geometries of the
/// members of its component, in component order
///
/// An Err makes the merger fall back to the first member's geometry.
///
pub trait MergeStrategy: Send + Sync {
    fn merge(&self, geoms: &[&Geometry<f64>]) -> Result<Geometry<f64>, String>;
}

///
/// Keep the geometry of the first member unchanged
///
#[derive(Debug, Clone, Copy)]
pub struct FirstGeometry;

impl MergeStrategy for FirstGeometry {
    fn merge(&self, geoms: &[&Geometry<f64>]) -> Result<Geometry<f64>, String> {
        match geoms.first() {
            Some(geom) => Ok((*geom).clone()),
            None => Err(String::from("No geometry to merge"))
        }
    }
}

///
/// Join lines end to end into one simple line. Fails if the members are disjoint,
/// branch, or are not lines at all
///
#[derive(Debug, Clone, Copy)]
pub struct LineMerge;

impl MergeStrategy for LineMerge {
    fn merge(&self, geoms: &[&Geometry<f64>]) -> Result<Geometry<f64>, String> {
        let mut lines: Vec<Vec<Coord<f64>>> = Vec::new();

        for geom in geoms {
            match geom {
                Geometry::LineString(ln) => lines.push(ln.0.clone()),
                Geometry::MultiLineString(mln) => {
                    for ln in mln.0.iter() {
                        lines.push(ln.0.clone());
                    }
                },
                _ => { return Err(String::from("Only (Multi)LineString geometries can be line-merged")); }
            };
        }

        let merged = line_merge(lines);

        match merged.len() {
            0 => Err(String::from("No geometry to merge")),
            1 => Ok(Geometry::LineString(LineString::from(merged.into_iter().next().unwrap_or_default()))),
            n => Err(format!("line-merge left {} unconnected pieces", n))
        }
    }
}

///
/// Repeatedly join pairs of lines sharing an endpoint, reversing as needed
///
pub fn line_merge(mut lines: Vec<Vec<Coord<f64>>>) -> Vec<Vec<Coord<f64>>> {
    lines.retain(|line| !line.is_empty());

    'search: loop {
        for i in 0..lines.len() {
            for j in (i + 1)..lines.len() {
                if let Some(joined) = join(&lines[i], &lines[j]) {
                    lines[i] = joined;
                    lines.remove(j);
                    continue 'search;
                }
            }
        }

        break;
    }

    lines
}

fn join(a: &[Coord<f64>], b: &[Coord<f64>]) -> Option<Vec<Coord<f64>>> {
    let (a_start, a_end) = (a[0], a[a.len() - 1]);
    let (b_start, b_end) = (b[0], b[b.len() - 1]);

    let mut joined: Vec<Coord<f64>> = Vec::with_capacity(a.len() + b.len() - 1);

    if a_end == b_start {
        joined.extend_from_slice(a);
        joined.extend_from_slice(&b[1..]);
    } else if b_end == a_start {
        joined.extend_from_slice(b);
        joined.extend_from_slice(&a[1..]);
    } else if a_end == b_end {
        joined.extend_from_slice(a);
        joined.extend(b.iter().rev().skip(1));
    } else if a_start == b_start {
        joined.extend(a.iter().rev());
        joined.extend_from_slice(&b[1..]);
    } else {
        return None;
    }

    Some(joined)
}

///
/// Collapse the members of one connected component into a single representative
///
/// Identifier lists and years are concatenated in member order; every other
/// attribute comes from the first member. When the strategy fails the first
/// member's geometry is kept and a warning is printed.
///
pub fn merge(mut members: Vec<Street>, strategy: &dyn MergeStrategy) -> Option<Street> {
    if members.is_empty() {
        return None;
    }

    let mut matching: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();

    for member in members.iter() {
        matching.extend(member.identifiers());
        years.extend(member.years.iter().cloned());
    }

    let geom = {
        let geoms: Vec<&Geometry<f64>> = members.iter().map(|member| &member.geom).collect();
        strategy.merge(&geoms)
    };

    let mut representative = members.swap_remove(0);

    match geom {
        Ok(geom) => {
            representative.geom = geom;
        },
        Err(err) => {
            eprintln!("warn - {} ({}): {}, keeping first geometry", representative.name, representative.id, err);
        }
    };

    representative.matching = matching;
    representative.years = years;

    Some(representative)
}
