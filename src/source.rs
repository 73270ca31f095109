//! The boundary between this crate and the filesystem (or whatever else
//! holds rule-file text).
//!
//! This crate never touches a filesystem itself — walking a working tree,
//! watching for changes, deciding which files exist — is explicitly out of
//! scope. A [`RuleSource`] is how a caller hands rule-file text in.

use std::collections::BTreeMap;

use crate::error::Error;

/// Supplies rule-file text on demand.
///
/// Implementations are free to read from disk, a VFS, an in-memory tree, a
/// network store, or anything else; this crate only ever calls these three
/// methods and never assumes anything about how they're backed.
pub trait RuleSource: std::fmt::Debug {
	/// The contents of the rule file declared in directory `dir` (a
	/// repository-relative, `/`-joined path with no leading or trailing
	/// slash; the empty string denotes the repository root), or `None` if
	/// no such file exists there.
	fn rules_in(&self, dir: &str) -> Result<Option<String>, Error>;

	/// The contents of the highest-priority "info" rule source (e.g. a
	/// VCS's `info/exclude`/`info/attributes`), or `None` if there is none.
	fn info_rules(&self) -> Result<Option<String>, Error> {
		Ok(None)
	}

	/// The contents of the lowest-priority, user- or system-scoped global
	/// rule source, or `None` if there is none.
	fn global_rules(&self) -> Result<Option<String>, Error> {
		Ok(None)
	}
}

/// A [`RuleSource`] backed by an in-memory map, mainly useful for tests and
/// for small embedded rule sets that don't warrant touching a filesystem.
#[derive(Debug, Clone, Default)]
pub struct StaticRuleSource {
	dirs: BTreeMap<String, String>,
	info: Option<String>,
	global: Option<String>,
}

impl StaticRuleSource {
	/// An empty source: no per-directory, info, or global rules.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add (or replace) the rule-file text for directory `dir`.
	pub fn with_dir(mut self, dir: impl Into<String>, text: impl Into<String>) -> Self {
		self.dirs.insert(dir.into(), text.into());
		self
	}

	/// Set the info rule-file text.
	pub fn with_info(mut self, text: impl Into<String>) -> Self {
		self.info = Some(text.into());
		self
	}

	/// Set the global rule-file text.
	pub fn with_global(mut self, text: impl Into<String>) -> Self {
		self.global = Some(text.into());
		self
	}
}

impl RuleSource for StaticRuleSource {
	fn rules_in(&self, dir: &str) -> Result<Option<String>, Error> {
		Ok(self.dirs.get(dir).cloned())
	}

	fn info_rules(&self) -> Result<Option<String>, Error> {
		Ok(self.info.clone())
	}

	fn global_rules(&self) -> Result<Option<String>, Error> {
		Ok(self.global.clone())
	}
}
