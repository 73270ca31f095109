//! A gitignore/gitattributes-compatible pattern compiler, hierarchical
//! rule engine, and attribute macro expander.
//!
//! This crate implements the *core* semantics — compiling a wildmatch
//! pattern, walking a directory's rule-file stack in the right priority
//! order, and expanding attribute macros — without touching a filesystem
//! or a working tree itself. A caller supplies rule-file text through the
//! [`RuleSource`](source::RuleSource) trait; everything about discovering
//! and reading those files is left to the caller.
//!
//! The two engines built on top of the shared pattern/rule machinery are:
//!
//! - [`ignore::IgnoreEngine`] — `.gitignore`-style decisions: is this path
//!   ignored?
//! - [`attributes::AttributesEngine`] — `.gitattributes`-style resolution:
//!   which attributes, with which values, apply to this path?
//!
//! ```
//! use pathrules::{ignore::IgnoreEngine, source::StaticRuleSource};
//!
//! let source = StaticRuleSource::new().with_dir("", "*.log\n!keep.log\n");
//! let engine = IgnoreEngine::new(&source);
//! assert!(engine.is_ignored("debug.log", false).unwrap());
//! assert!(!engine.is_ignored("keep.log", false).unwrap());
//! ```
//!
//! This crate does not itself use `unsafe`.

#![warn(clippy::unwrap_used)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod attributes;
pub mod error;
pub mod ignore;
pub mod macros;
pub mod path;
pub mod pattern;
pub mod rule;
pub mod rulefile;
pub mod source;

#[doc(inline)]
pub use attributes::AttributesEngine;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use ignore::IgnoreEngine;
