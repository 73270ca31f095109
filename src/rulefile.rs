//! Parsing a whole ignore or attribute file into an ordered sequence of
//! lines, some of which compile to rules.

use crate::attribute::Assignment;
use crate::rule::{Rule, RuleKind};

/// One physical line of a rule file, after parsing.
#[derive(Debug, Clone)]
pub enum SourceLine {
	/// A blank or comment line, or an attribute line this file's kind
	/// rejects outright (e.g. one beginning with `!`). Kept only so
	/// [`RuleFile::to_text`] can round-trip the original file.
	Verbatim(String),
	/// A compiled pattern rule.
	Rule(Rule),
	/// An attribute macro definition (`[attr]name attr1 attr2 ...`).
	MacroDef {
		raw: String,
		name: String,
		assignments: Vec<Assignment>,
	},
}

/// A parsed rule file: an ordered list of [`SourceLine`]s.
///
/// Parsing never fails. Blank lines, `#` comments, and malformed rules are
/// all preserved as inert entries so the file's line structure survives a
/// parse/[`RuleFile::to_text`] round trip.
#[derive(Debug, Clone)]
pub struct RuleFile {
	kind: RuleKind,
	lines: Vec<SourceLine>,
}

impl RuleFile {
	/// Parse `text` (the full contents of one rule file) as `kind`.
	pub fn parse(text: &str, kind: RuleKind) -> Self {
		let mut lines = Vec::new();

		for raw_line in text.split('\n') {
			let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

			if line.is_empty()
				|| line.starts_with('#')
				|| line.starts_with("<<<<<<<")
				|| line.starts_with("=======")
				|| line.starts_with(">>>>>>>")
			{
				lines.push(SourceLine::Verbatim(line.to_string()));
				continue;
			}

			match kind {
				RuleKind::Ignore => {
					lines.push(SourceLine::Rule(Rule::parse_ignore(line)));
				}
				RuleKind::Attribute => {
					if let Some(name) = first_field(line).and_then(|f| f.strip_prefix("[attr]").map(str::to_string)) {
						let assignments = fields(line)
							.skip(1)
							.filter_map(|tok| Assignment::parse_token(tok))
							.collect();
						lines.push(SourceLine::MacroDef {
							raw: line.to_string(),
							name,
							assignments,
						});
						continue;
					}

					match Rule::parse_attribute(line) {
						Some(rule) => lines.push(SourceLine::Rule(rule)),
						None => lines.push(SourceLine::Verbatim(line.to_string())),
					}
				}
			}
		}

		RuleFile { kind, lines }
	}

	/// The kind of rule file this is.
	pub fn kind(&self) -> RuleKind {
		self.kind
	}

	/// All valid, non-comment rules, in file order.
	pub fn rules(&self) -> impl DoubleEndedIterator<Item = &Rule> {
		self.lines.iter().filter_map(|line| match line {
			SourceLine::Rule(rule) => Some(rule),
			_ => None,
		})
	}

	/// All macro definitions, in file order.
	pub fn macro_defs(&self) -> impl Iterator<Item = (&str, &[Assignment])> {
		self.lines.iter().filter_map(|line| match line {
			SourceLine::MacroDef { name, assignments, .. } => Some((name.as_str(), assignments.as_slice())),
			_ => None,
		})
	}

	/// The lines of this file, in order, for callers that need the full
	/// structure (e.g. a future line-aware diagnostic).
	pub fn lines(&self) -> &[SourceLine] {
		&self.lines
	}

	/// Reconstruct the original file text.
	pub fn to_text(&self) -> String {
		let mut out = String::new();
		for (i, line) in self.lines.iter().enumerate() {
			if i > 0 {
				out.push('\n');
			}
			match line {
				SourceLine::Verbatim(text) => out.push_str(text),
				SourceLine::Rule(rule) => out.push_str(rule.raw()),
				SourceLine::MacroDef { raw, .. } => out.push_str(raw),
			}
		}
		out
	}
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
	line.split_whitespace()
}

fn first_field(line: &str) -> Option<&str> {
	fields(line).next()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_and_comment_lines_round_trip() {
		let text = "foo\n\n# a comment\nbar\n";
		let file = RuleFile::parse(text, RuleKind::Ignore);
		assert_eq!(file.to_text(), text.trim_end_matches('\n'));
	}

	#[test]
	fn conflict_marker_lines_are_inert() {
		let text = "foo\n<<<<<<< HEAD\nbar\n=======\nbaz\n>>>>>>> branch\n";
		let file = RuleFile::parse(text, RuleKind::Ignore);
		let names: Vec<&str> = file.rules().map(Rule::raw).collect();
		assert_eq!(names, vec!["foo", "bar", "baz"]);
		assert_eq!(file.to_text(), text.trim_end_matches('\n'));
	}

	#[test]
	fn ignore_rules_preserve_order() {
		let file = RuleFile::parse("a\nb\nc\n", RuleKind::Ignore);
		let names: Vec<&str> = file.rules().map(Rule::raw).collect();
		assert_eq!(names, vec!["a", "b", "c"]);
	}

	#[test]
	fn reverse_iteration_matches_reverse_order() {
		let file = RuleFile::parse("a\nb\nc", RuleKind::Ignore);
		let names: Vec<&str> = file.rules().rev().map(Rule::raw).collect();
		assert_eq!(names, vec!["c", "b", "a"]);
	}

	#[test]
	fn macro_definition_is_separated_from_rules() {
		let file = RuleFile::parse("[attr]mymacro -diff -merge\n*.bin mymacro\n", RuleKind::Attribute);
		let macros: Vec<_> = file.macro_defs().collect();
		assert_eq!(macros.len(), 1);
		assert_eq!(macros[0].0, "mymacro");
		assert_eq!(file.rules().count(), 1);
	}

	#[test]
	fn attribute_line_starting_with_bang_is_dropped() {
		let file = RuleFile::parse("!foo text\n", RuleKind::Attribute);
		assert_eq!(file.rules().count(), 0);
	}
}
