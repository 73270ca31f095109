//! The ignore decision engine: given a path, answers whether it is ignored.

use tracing::{debug, trace, trace_span};

use crate::error::Error;
use crate::path::{directory_chain, parent_dir, RepoPath};
use crate::rule::RuleKind;
use crate::rulefile::RuleFile;
use crate::source::RuleSource;

use super::stack::RuleFileCache;

/// Resolves ignore rules from a [`RuleSource`] into ignored/not-ignored
/// verdicts for queried paths.
///
/// Consults, in decreasing priority, the info rules, then each directory
/// from the query's containing directory up to the repository root, then
/// the global rules. The first rule file with a decisive match (searched in
/// reverse declaration order within that file) determines the result; a
/// path nothing matches is not ignored.
pub struct IgnoreEngine<'s> {
	cache: RuleFileCache<'s>,
	source: &'s dyn RuleSource,
}

impl<'s> IgnoreEngine<'s> {
	/// Build an engine reading ignore rules through `source`.
	pub fn new(source: &'s dyn RuleSource) -> Self {
		debug!("constructing ignore engine");
		Self {
			cache: RuleFileCache::new(source, RuleKind::Ignore),
			source,
		}
	}

	/// Is `path` ignored?
	pub fn is_ignored(&self, path: &str, is_directory: bool) -> Result<bool, Error> {
		let _span = trace_span!("is_ignored", %path, is_directory).entered();
		let repo_path = RepoPath::new(path);

		if let Some(info) = self.source.info_rules()? {
			let file = RuleFile::parse(&info, RuleKind::Ignore);
			if let Some(result) = decide(&file, repo_path.as_str(), is_directory) {
				trace!(result, "decided by info rules");
				return Ok(result);
			}
		}

		for dir in directory_chain(parent_dir(repo_path.as_str())) {
			let Some(file) = self.cache.get(dir)? else { continue };
			let Some(rel) = repo_path.strip_dir(dir) else { continue };
			if let Some(result) = decide(&file, rel.as_str(), is_directory) {
				trace!(result, dir, "decided by directory rule file");
				return Ok(result);
			}
		}

		if let Some(global) = self.source.global_rules()? {
			let file = RuleFile::parse(&global, RuleKind::Ignore);
			if let Some(result) = decide(&file, repo_path.as_str(), is_directory) {
				trace!(result, "decided by global rules");
				return Ok(result);
			}
		}

		trace!("no rule matched, not ignored");
		Ok(false)
	}
}

/// The verdict from one rule file, searching its rules in reverse
/// declaration order and stopping at the first match.
fn decide(file: &RuleFile, path: &str, is_directory: bool) -> Option<bool> {
	file.rules()
		.rev()
		.find(|rule| rule.matches(path, is_directory))
		.map(|rule| rule.ignore_result())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::StaticRuleSource;

	#[test]
	fn unmatched_path_is_not_ignored() {
		let source = StaticRuleSource::new();
		let engine = IgnoreEngine::new(&source);
		assert!(!engine.is_ignored("a/b.txt", false).unwrap());
	}

	#[test]
	fn directory_pattern_ignores_its_contents() {
		let source = StaticRuleSource::new().with_dir("", "build/\n");
		let engine = IgnoreEngine::new(&source);
		assert!(engine.is_ignored("build/a.o", false).unwrap());
		assert!(engine.is_ignored("build", true).unwrap());
	}

	#[test]
	fn nested_negation_reclaims_a_subtree() {
		let source = StaticRuleSource::new().with_dir("", "build/\n!build/keep/\n");
		let engine = IgnoreEngine::new(&source);
		assert!(engine.is_ignored("build/a.o", false).unwrap());
		assert!(!engine.is_ignored("build/keep/x.txt", false).unwrap());
	}

	#[test]
	fn anchored_pattern_only_matches_from_its_directory() {
		let source = StaticRuleSource::new().with_dir("", "/bar\n");
		let engine = IgnoreEngine::new(&source);
		assert!(engine.is_ignored("bar", false).unwrap());
		assert!(!engine.is_ignored("a/bar", false).unwrap());
	}

	#[test]
	fn deeper_directory_file_overrides_shallower() {
		let source = StaticRuleSource::new()
			.with_dir("", "*.log\n")
			.with_dir("a", "!keep.log\n");
		let engine = IgnoreEngine::new(&source);
		assert!(engine.is_ignored("other.log", false).unwrap());
		assert!(!engine.is_ignored("a/keep.log", false).unwrap());
	}

	#[test]
	fn info_rules_outrank_everything() {
		let source = StaticRuleSource::new()
			.with_dir("", "!important.log\n")
			.with_info("*.log\n");
		let engine = IgnoreEngine::new(&source);
		assert!(engine.is_ignored("important.log", false).unwrap());
	}
}
