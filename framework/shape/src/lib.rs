mod file;
mod shape;

pub mod prelude {
    pub use crate::file::ShapeDocument;
    pub use crate::shape::{LoadShape, ShapeError, Stage, StagedShape, TickData};
}
