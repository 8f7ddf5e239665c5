//! End-to-end analyses built from the crate's stages.
//!
//! Each workflow exposes its column names, a [`Schema`](crate::Schema) to
//! validate the loaded frame against, an `explore` step that renders the
//! frame summaries, and a `run` step that returns a serializable report.

pub mod car_price;
pub mod diabetes;
