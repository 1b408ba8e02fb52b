//! In-memory graph of related claim clusters, used to surface neighbors
//! of a claim and to predict when a dormant claim is likely to resurface.

mod graph;
mod prediction;
mod types;

pub use graph::{GraphError, MemoryGraph};
pub use prediction::predict_reemergence;
pub use types::{Edge, Prediction};
