pub mod cache;
pub mod reference;
pub mod result;
pub mod status;
pub mod tree;

pub use cache::LatestCache;
pub use reference::{ReferenceKey, resolve};
pub use result::{Release, ResultSeries, ResultSnapshot};
pub use tree::{AccordionPolicy, ResultsTree, Row, TestRow, TreeOptions};
