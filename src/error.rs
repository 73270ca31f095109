//! Error types for the core.
//!
//! Parsing is tolerant by design (see [`crate::rulefile`]): a malformed
//! pattern, attribute key, or line never produces an `Error`, it is simply
//! dropped. The only failures that reach callers originate upstream, at the
//! [`RuleSource`](crate::source::RuleSource) boundary.

use thiserror::Error;

/// Errors that can occur while resolving ignore or attribute decisions.
///
/// This core has a very small fallible surface: almost everything described
/// in the pattern grammar and rule-file format degrades silently rather than
/// erroring. The only way an `Error` reaches a caller is if the
/// [`RuleSource`](crate::source::RuleSource) supplying rule-file text fails.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// A generic I/O failure surfaced by a [`RuleSource`](crate::source::RuleSource).
	#[error("io({about}): {err}")]
	Io {
		/// What the failing operation was about.
		about: &'static str,

		/// The underlying I/O error.
		#[source]
		err: std::io::Error,
	},

	/// An opaque failure from a [`RuleSource`](crate::source::RuleSource)
	/// implementation that isn't naturally an I/O error.
	#[error("rule source: {0}")]
	Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}
