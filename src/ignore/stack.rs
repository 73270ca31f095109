//! Caches parsed rule files per directory so a long-lived engine doesn't
//! re-read and re-parse the same rule-file text for every query.
//!
//! A `BTreeMap` keyed by directory, shared between the ignore and the
//! attributes engine.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::Error;
use crate::rule::RuleKind;
use crate::rulefile::RuleFile;
use crate::source::RuleSource;

/// A memoizing cache from directory path to that directory's parsed rule
/// file (or `None`, if it has none).
pub struct RuleFileCache<'s> {
	source: &'s dyn RuleSource,
	kind: RuleKind,
	cache: RefCell<BTreeMap<String, Option<Rc<RuleFile>>>>,
}

impl<'s> RuleFileCache<'s> {
	/// Build a cache reading through `source`, parsing whatever it returns
	/// as `kind`.
	pub fn new(source: &'s dyn RuleSource, kind: RuleKind) -> Self {
		Self {
			source,
			kind,
			cache: RefCell::new(BTreeMap::new()),
		}
	}

	/// The parsed rule file declared in `dir`, reading and parsing it (and
	/// recording the result) on first access.
	pub fn get(&self, dir: &str) -> Result<Option<Rc<RuleFile>>, Error> {
		if let Some(hit) = self.cache.borrow().get(dir) {
			return Ok(hit.clone());
		}

		let parsed = self
			.source
			.rules_in(dir)?
			.map(|text| Rc::new(RuleFile::parse(&text, self.kind)));

		self.cache.borrow_mut().insert(dir.to_string(), parsed.clone());
		Ok(parsed)
	}
}
