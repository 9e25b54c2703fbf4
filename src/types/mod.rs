pub mod context;
pub mod directory;
pub mod street;
pub mod vocabulary;

pub use context::{Context, Keys, Scope};
pub use directory::{AlignMethod, DirectoryRecord, Row};
pub use street::{Buffer, Street};
pub use vocabulary::Vocabulary;

pub trait AsFeat {
    fn as_feat(self, keys: &Keys) -> geojson::Feature;
}
