//! Compilation and matching of a single path segment's glob (the part of a
//! wildmatch pattern between two `/`s, i.e. never containing a literal `/`
//! itself).

use super::classes::{parse_class, CharClass};

/// One token of a compiled single-segment glob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GlobToken {
	/// A single literal byte.
	Literal(u8),
	/// `?` — exactly one byte, not `/`.
	AnyChar,
	/// `*` — zero or more bytes, none of which are `/`.
	AnyRun,
	/// `[...]` — one byte from a character class.
	Class(CharClass),
}

/// A compiled single segment: either a plain literal (the common case, fast
/// path) or a token sequence requiring glob evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentGlob {
	Literal(Vec<u8>),
	Tokens(Vec<GlobToken>),
}

impl SegmentGlob {
	/// Compile the glob for one path segment (no `/` allowed in `pattern`).
	/// Returns `None` if the pattern is malformed (unterminated class or a
	/// trailing, dangling backslash).
	pub fn compile(pattern: &str) -> Option<Self> {
		if !pattern.as_bytes().iter().any(|&b| matches!(b, b'*' | b'?' | b'[' | b'\\')) {
			return Some(SegmentGlob::Literal(pattern.as_bytes().to_vec()));
		}

		let bytes = pattern.as_bytes();
		let mut tokens = Vec::new();
		let mut i = 0;
		while i < bytes.len() {
			match bytes[i] {
				b'?' => {
					tokens.push(GlobToken::AnyChar);
					i += 1;
				}
				b'*' => {
					tokens.push(GlobToken::AnyRun);
					i += 1;
				}
				b'[' => {
					let (class, consumed) = parse_class(&bytes[i + 1..])?;
					tokens.push(GlobToken::Class(class));
					i += 1 + consumed;
				}
				b'\\' => {
					let escaped = *bytes.get(i + 1)?; // dangling backslash -> invalid
					tokens.push(GlobToken::Literal(escaped));
					i += 2;
				}
				b => {
					tokens.push(GlobToken::Literal(b));
					i += 1;
				}
			}
		}

		Some(SegmentGlob::Tokens(tokens))
	}

	/// Whether this compiled segment matches `segment` in full.
	pub fn matches(&self, segment: &str) -> bool {
		match self {
			SegmentGlob::Literal(lit) => lit.as_slice() == segment.as_bytes(),
			SegmentGlob::Tokens(tokens) => match_tokens(tokens, segment.as_bytes()),
		}
	}
}

fn match_tokens(tokens: &[GlobToken], input: &[u8]) -> bool {
	match tokens.first() {
		None => input.is_empty(),
		Some(GlobToken::AnyRun) => {
			// Zero-or-more: try every split point, short-circuiting on first match.
			for split in 0..=input.len() {
				if match_tokens(&tokens[1..], &input[split..]) {
					return true;
				}
			}
			false
		}
		Some(GlobToken::AnyChar) => {
			!input.is_empty() && match_tokens(&tokens[1..], &input[1..])
		}
		Some(GlobToken::Literal(b)) => {
			input.first() == Some(b) && match_tokens(&tokens[1..], &input[1..])
		}
		Some(GlobToken::Class(class)) => {
			input.first().map_or(false, |&b| class.matches(b)) && match_tokens(&tokens[1..], &input[1..])
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn compiles(p: &str) -> SegmentGlob {
		SegmentGlob::compile(p).expect("should compile")
	}

	#[test]
	fn literal_fast_path() {
		assert!(matches!(compiles("foo"), SegmentGlob::Literal(_)));
		assert!(compiles("foo").matches("foo"));
		assert!(!compiles("foo").matches("foobar"));
	}

	#[test]
	fn question_mark_matches_one_byte_not_slash() {
		assert!(compiles("f?o").matches("foo"));
		assert!(!compiles("f?o").matches("fo"));
		assert!(!compiles("f?o").matches("foOo"));
	}

	#[test]
	fn star_matches_any_run_within_segment() {
		assert!(compiles("*.rs").matches("lib.rs"));
		assert!(compiles("a*b").matches("ab"));
		assert!(compiles("a*b").matches("aXXXb"));
		assert!(!compiles("a*b").matches("aXXXc"));
	}

	#[test]
	fn class_matching() {
		assert!(compiles("[abc]").matches("a"));
		assert!(!compiles("[abc]").matches("d"));
		assert!(compiles("[!abc]").matches("d"));
	}

	#[test]
	fn escape_sequences() {
		assert!(compiles("a\\*b").matches("a*b"));
		assert!(!compiles("a\\*b").matches("aXb"));
	}

	#[test]
	fn dangling_escape_is_invalid() {
		assert!(SegmentGlob::compile("a\\").is_none());
	}

	#[test]
	fn unterminated_class_is_invalid() {
		assert!(SegmentGlob::compile("a[bc").is_none());
	}

	#[test]
	fn case_sensitive() {
		assert!(!compiles("FOO").matches("foo"));
	}
}
