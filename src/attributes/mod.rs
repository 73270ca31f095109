//! The attribute rule engine: hierarchical `.gitattributes`-style
//! attribute resolution, including macro expansion.

mod engine;

pub use engine::AttributesEngine;
