//! The attribute resolution engine: given a path, answers which attributes
//! apply and with what values.

use tracing::{debug, trace, trace_span};

use crate::attribute::AttributeMap;
use crate::error::Error;
use crate::ignore::RuleFileCache;
use crate::macros::{self, MacroTable};
use crate::path::{directory_chain, parent_dir, RepoPath};
use crate::rule::RuleKind;
use crate::rulefile::RuleFile;
use crate::source::RuleSource;

/// Resolves attribute rules from a [`RuleSource`] into a fully-expanded
/// [`AttributeMap`] for queried paths.
///
/// Unlike [`crate::ignore::IgnoreEngine`], this does not stop at the first
/// matching file: every consulted file contributes, info rules first, then
/// each directory from the query's containing directory up to the
/// repository root, then the global rules. Within a file, rules are walked
/// in reverse declaration order, and within a matching rule, its
/// assignments are walked in reverse order; the first assignment seen for a
/// given key — by this walk order, so the highest-priority one — wins.
pub struct AttributesEngine<'s> {
	cache: RuleFileCache<'s>,
	source: &'s dyn RuleSource,
}

impl<'s> AttributesEngine<'s> {
	/// Build an engine reading attribute rules through `source`.
	pub fn new(source: &'s dyn RuleSource) -> Self {
		debug!("constructing attributes engine");
		Self {
			cache: RuleFileCache::new(source, RuleKind::Attribute),
			source,
		}
	}

	/// The resolved attributes for `path`.
	pub fn attributes_for(&self, path: &str, is_directory: bool) -> Result<AttributeMap, Error> {
		let _span = trace_span!("attributes_for", %path, is_directory).entered();
		let repo_path = RepoPath::new(path);

		let mut table = MacroTable::with_defaults();
		let mut out = AttributeMap::new();

		if let Some(info) = self.source.info_rules()? {
			let file = RuleFile::parse(&info, RuleKind::Attribute);
			apply_file(&file, repo_path.as_str(), is_directory, &mut table, &mut out);
		}

		for dir in directory_chain(parent_dir(repo_path.as_str())) {
			let Some(file) = self.cache.get(dir)? else { continue };
			let Some(rel) = repo_path.strip_dir(dir) else { continue };
			apply_file(&file, rel.as_str(), is_directory, &mut table, &mut out);
		}

		if let Some(global) = self.source.global_rules()? {
			let file = RuleFile::parse(&global, RuleKind::Attribute);
			apply_file(&file, repo_path.as_str(), is_directory, &mut table, &mut out);
		}

		out.erase_unspecified();
		trace!(count = out.len(), "attributes resolved");
		Ok(out)
	}
}

fn apply_file(
	file: &RuleFile,
	path: &str,
	is_directory: bool,
	table: &mut MacroTable,
	out: &mut AttributeMap,
) {
	for (name, assignments) in file.macro_defs() {
		table.define_if_absent(name, assignments.to_vec());
	}

	for rule in file.rules().rev() {
		if !rule.matches(path, is_directory) {
			continue;
		}
		for assignment in rule.assignments().iter().rev() {
			macros::expand_into(assignment, table, out);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::StaticRuleSource;

	#[test]
	fn last_write_and_unspecified_erasure() {
		let source = StaticRuleSource::new().with_dir("", "*.txt text\n*.txt -text eol=lf\n");
		let engine = AttributesEngine::new(&source);
		let attrs = engine.attributes_for("readme.txt", false).unwrap();
		// Reverse rule order: the second line is consulted first and wins.
		assert!(attrs.is_unset("text"));
		assert_eq!(attrs.value("eol"), Some("lf"));
	}

	#[test]
	fn predefined_binary_macro() {
		let source = StaticRuleSource::new().with_dir("", "*.png binary\n");
		let engine = AttributesEngine::new(&source);
		let attrs = engine.attributes_for("logo.png", false).unwrap();
		assert!(attrs.is_unset("diff"));
		assert!(attrs.is_unset("merge"));
		assert!(attrs.is_unset("text"));
	}

	#[test]
	fn user_macro_with_negated_polarity() {
		let source = StaticRuleSource::new().with_dir("", "[attr]cpp text diff=cpp\n*.hpp -cpp\n");
		let engine = AttributesEngine::new(&source);
		let attrs = engine.attributes_for("header.hpp", false).unwrap();
		assert!(attrs.is_unset("text"));
		// Only Set/Unset targets invert under a negated macro trigger; a
		// custom-valued target like `diff=cpp` passes through unchanged.
		assert_eq!(attrs.value("diff"), Some("cpp"));
	}

	#[test]
	fn deeper_directory_overrides_root() {
		let source = StaticRuleSource::new()
			.with_dir("", "*.txt eol=lf\n")
			.with_dir("docs", "*.txt eol=crlf\n");
		let engine = AttributesEngine::new(&source);
		let attrs = engine.attributes_for("docs/readme.txt", false).unwrap();
		assert_eq!(attrs.value("eol"), Some("crlf"));
	}

	#[test]
	fn info_rules_outrank_everything() {
		let source = StaticRuleSource::new()
			.with_dir("", "*.txt eol=crlf\n")
			.with_info("*.txt eol=lf\n");
		let engine = AttributesEngine::new(&source);
		let attrs = engine.attributes_for("readme.txt", false).unwrap();
		assert_eq!(attrs.value("eol"), Some("lf"));
	}
}
