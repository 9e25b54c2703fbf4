use std::convert::TryFrom;
use geo::{BoundingRect, EuclideanDistance, Geometry, LineString, Polygon, Rect};
use serde_json::Value;
use super::{AsFeat, Keys};

///
/// A single digitized street segment
///
#[derive(Debug, PartialEq, Clone)]
pub struct Street {
    /// Source system key of the segment
    pub id: String,

    /// Normalized street name, used as the grouping key
    pub name: String,

    /// Planar (Multi)LineString or (Multi)Polygon geometry
    pub geom: Geometry<f64>,

    /// Every year this segment is attested in
    pub years: Vec<i32>,

    /// Identifiers collapsed into this record, empty until it represents a merge
    pub matching: Vec<String>,

    /// Pass-through properties
    pub props: serde_json::Map<String, Value>
}

impl Street {
    pub fn new(feat: geojson::GeoJson, keys: &Keys) -> Result<Self, String> {
        let feat = match feat {
            geojson::GeoJson::Feature(feat) => feat,
            _ => { return Err(String::from("Not a GeoJSON Feature")); }
        };

        let mut props = match feat.properties {
            Some(props) => props,
            None => { return Err(String::from("Feature has no properties")); }
        };

        let name = match props.remove(&keys.name) {
            Some(Value::String(name)) => name,
            _ => { return Err(format!("Feature must have a string {} property", keys.name)); }
        };

        if name.trim().is_empty() {
            return Err(String::from("Feature has an empty name"));
        }

        let id = match props.remove(&keys.id) {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => match feat.id {
                Some(geojson::feature::Id::String(id)) => id,
                Some(geojson::feature::Id::Number(id)) => id.to_string(),
                None => { return Err(format!("Feature {} has no {} property or id", name, keys.id)); }
            }
        };

        let years = match props.remove(&keys.year) {
            Some(year) => parse_years(&year)?,
            None => { return Err(format!("Feature {} has no {} property", id, keys.year)); }
        };

        // Scratch state is never read from input
        props.remove("matching");

        let geom = match feat.geometry {
            Some(geom) => match geom.value {
                geojson::Value::LineString(_)
                | geojson::Value::MultiLineString(_)
                | geojson::Value::Polygon(_)
                | geojson::Value::MultiPolygon(_) => geom,
                _ => { return Err(format!("Feature {} must have (Multi)LineString or (Multi)Polygon geometry", id)); }
            },
            None => { return Err(format!("Feature {} must have geometry", id)); }
        };

        let geom: Geometry<f64> = match Geometry::try_from(geom) {
            Ok(geom) => geom,
            Err(err) => {
                return Err(format!("Invalid GeoJSON geometry: {}", err));
            }
        };

        if geom.bounding_rect().is_none() {
            return Err(format!("Feature {} has empty geometry", id));
        }

        Ok(Street {
            id,
            name,
            geom,
            years,
            matching: Vec::new(),
            props
        })
    }

    ///
    /// Build a street directly from its parts, used when records do not originate
    /// from a GeoJSON stream
    ///
    pub fn from_parts(id: impl ToString, name: impl ToString, geom: impl Into<Geometry<f64>>, year: i32) -> Self {
        Street {
            id: id.to_string(),
            name: name.to_string(),
            geom: geom.into(),
            years: vec![year],
            matching: Vec::new(),
            props: serde_json::Map::new()
        }
    }

    ///
    /// The overlap buffer of this street. Always derived from the current geometry
    ///
    pub fn buffer(&self, tolerance: f64) -> Buffer<'_> {
        Buffer {
            geom: &self.geom,
            radius: tolerance
        }
    }

    ///
    /// Every source identifier this record stands for
    ///
    pub fn identifiers(&self) -> Vec<String> {
        if self.matching.is_empty() {
            vec![self.id.clone()]
        } else {
            self.matching.clone()
        }
    }
}

impl AsFeat for Street {
    fn as_feat(self, keys: &Keys) -> geojson::Feature {
        let mut props = self.props;

        props.insert(keys.id.clone(), Value::from(self.id));
        props.insert(keys.name.clone(), Value::from(self.name));
        props.insert(keys.year.clone(), Value::from(self.years));
        props.insert(String::from("matching"), Value::from(self.matching));

        geojson::Feature {
            id: None,
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::from(&self.geom))),
            properties: Some(props),
            foreign_members: None
        }
    }
}

fn parse_years(value: &Value) -> Result<Vec<i32>, String> {
    fn year(value: &Value) -> Result<i32, String> {
        let parsed = match value {
            Value::Number(num) => num.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None
        };

        match parsed {
            Some(year) if year >= std::i32::MIN as i64 && year <= std::i32::MAX as i64 => Ok(year as i32),
            _ => Err(format!("Invalid year: {}", value))
        }
    }

    match value {
        Value::Array(years) => {
            if years.is_empty() {
                return Err(String::from("Year list must not be empty"));
            }

            years.iter().map(year).collect()
        },
        value => Ok(vec![year(value)?])
    }
}

///
/// A geometry inflated by a fixed tolerance. Only used for overlap testing
///
#[derive(Debug, Clone, Copy)]
pub struct Buffer<'a> {
    geom: &'a Geometry<f64>,
    radius: f64
}

enum Part<'a> {
    Line(&'a LineString<f64>),
    Area(&'a Polygon<f64>)
}

impl<'a> Buffer<'a> {
    pub fn new(geom: &'a Geometry<f64>, radius: f64) -> Self {
        Buffer {
            geom,
            radius
        }
    }

    ///
    /// Two round buffers intersect exactly when their source geometries are no
    /// further apart than the sum of both radii
    ///
    pub fn intersects(&self, other: &Buffer<'_>) -> bool {
        let limit = self.radius + other.radius;

        for a in parts(self.geom) {
            for b in parts(other.geom) {
                if part_distance(&a, &b) <= limit {
                    return true;
                }
            }
        }

        false
    }

    ///
    /// Bounding box of the inflated geometry
    ///
    pub fn envelope(&self) -> Option<Rect<f64>> {
        let rect = self.geom.bounding_rect()?;

        Some(Rect::new(
            geo::coord! { x: rect.min().x - self.radius, y: rect.min().y - self.radius },
            geo::coord! { x: rect.max().x + self.radius, y: rect.max().y + self.radius }
        ))
    }
}

fn parts(geom: &Geometry<f64>) -> Vec<Part<'_>> {
    match geom {
        Geometry::LineString(ln) => vec![Part::Line(ln)],
        Geometry::MultiLineString(mln) => mln.0.iter().map(Part::Line).collect(),
        Geometry::Polygon(py) => vec![Part::Area(py)],
        Geometry::MultiPolygon(mpy) => mpy.0.iter().map(Part::Area).collect(),
        _ => Vec::new()
    }
}

fn part_distance(a: &Part<'_>, b: &Part<'_>) -> f64 {
    match (a, b) {
        (Part::Line(a), Part::Line(b)) => a.euclidean_distance(*b),
        (Part::Line(a), Part::Area(b)) => a.euclidean_distance(*b),
        (Part::Area(a), Part::Line(b)) => a.euclidean_distance(*b),
        (Part::Area(a), Part::Area(b)) => a.euclidean_distance(*b)
    }
}
