//! The wildmatch pattern compiler and matcher.
//!
//! A pattern is compiled once, at rule-file parse time, into a [`Matcher`];
//! matching a path against it afterwards touches no heap beyond a small,
//! reusable segment buffer.

mod classes;
mod matcher;
mod segment;

pub use classes::{CharClass, PosixClass};
pub use matcher::{Compiled, Matcher, PatternKind};
pub use segment::{GlobToken, SegmentGlob};
