//! Column type inference.
//!
//! Every sampled cell is classified on its own (`type_detection`), then the
//! observations of each column are reduced to a single winning type
//! (`column_types`).

pub mod column_types;
pub mod regexes;
pub mod type_detection;
