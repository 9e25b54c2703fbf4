pub mod geo;
pub mod street;
pub mod table;

pub use self::geo::GeoStream;
pub use self::street::StreetStream;
pub use self::table::Table;
