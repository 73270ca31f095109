//! The compiled pattern matcher: turns a single wildmatch pattern string
//! into an object that answers `matches(path, is_directory, full_path_match)`
//! in constant extra memory per query.

use crate::path::RepoPath;

use super::segment::SegmentGlob;

/// Whether a pattern came from an ignore file (where a leading `!` negates)
/// or an attribute file (where a leading `!` is never special to the
/// matcher itself — attribute rule parsing rejects such lines before a
/// `Matcher` is ever compiled for them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
	Ignore,
	Attribute,
}

/// One segment of an anchored pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AnchoredSegment {
	Glob(SegmentGlob),
	/// `**` — zero or more whole path segments.
	DoubleStar,
}

/// A compiled pattern.
///
/// Construct with [`Matcher::compile`]. Once built, a `Matcher` is immutable
/// and matching is side-effect-free, as required by the invariants of the
/// rule engine that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
	valid: bool,
	dir_only: bool,
	anchored: bool,
	/// Set when the pattern ended with a `**` segment (equivalently, with
	/// `/**`): the prefix before it must match, and a non-empty remainder
	/// must follow.
	trailing_star: bool,
	anchored_segments: Vec<AnchoredSegment>,
	name_glob: Option<SegmentGlob>,
}

/// Result of compiling a pattern: the matcher plus the ignore-only negation
/// flag extracted from a leading `!`.
#[derive(Debug, Clone)]
pub struct Compiled {
	pub matcher: Matcher,
	pub negation: bool,
}

impl Matcher {
	fn invalid() -> Self {
		Matcher {
			valid: false,
			dir_only: false,
			anchored: false,
			trailing_star: false,
			anchored_segments: Vec::new(),
			name_glob: None,
		}
	}

	/// Compile `raw` (one pattern line's pattern text, already separated
	/// from any attribute payload and from a trailing `\r`/`\n`) into a
	/// `Matcher`, applying the normalisation rules of the pattern grammar.
	///
	/// Never fails: a malformed pattern compiles to a matcher that rejects
	/// everything (see [`Matcher::is_valid`]).
	pub fn compile(raw: &str, kind: PatternKind) -> Compiled {
		let mut negation = false;
		let mut pattern = raw;

		if kind == PatternKind::Ignore {
			if let Some(rest) = pattern.strip_prefix('!') {
				negation = true;
				pattern = rest;
			}
		}

		if pattern.starts_with("\\#") || pattern.starts_with("\\!") {
			pattern = &pattern[1..];
		}

		if pattern.is_empty() || pattern.starts_with('#') || pattern == "/" {
			return Compiled {
				matcher: Matcher::invalid(),
				negation,
			};
		}

		let trimmed = trim_trailing_unescaped_whitespace(pattern);
		let (body, dir_only) = strip_trailing_slashes(&trimmed);

		if body.is_empty() {
			return Compiled {
				matcher: Matcher::invalid(),
				negation,
			};
		}

		let anchored = body.contains('/');
		let matcher = if anchored {
			let body = body.strip_prefix('/').unwrap_or(&body);
			let mut parts: Vec<&str> = body.split('/').collect();

			let trailing_star = parts.len() > 1 && parts.last() == Some(&"**");
			if trailing_star {
				parts.pop();
			}

			let mut segments = Vec::with_capacity(parts.len());
			let mut ok = true;
			for part in parts {
				if part == "**" {
					segments.push(AnchoredSegment::DoubleStar);
				} else {
					match SegmentGlob::compile(part) {
						Some(glob) => segments.push(AnchoredSegment::Glob(glob)),
						None => {
							ok = false;
							break;
						}
					}
				}
			}

			if ok {
				Matcher {
					valid: true,
					dir_only,
					anchored: true,
					trailing_star,
					anchored_segments: segments,
					name_glob: None,
				}
			} else {
				Matcher::invalid()
			}
		} else {
			match SegmentGlob::compile(&body) {
				Some(glob) => Matcher {
					valid: true,
					dir_only,
					anchored: false,
					trailing_star: false,
					anchored_segments: Vec::new(),
					name_glob: Some(glob),
				},
				None => Matcher::invalid(),
			}
		};

		Compiled { matcher, negation }
	}

	/// Whether this matcher was compiled from well-formed pattern text.
	pub fn is_valid(&self) -> bool {
		self.valid
	}

	/// Whether this pattern only matches directories (had a trailing `/`).
	pub fn is_dir_only(&self) -> bool {
		self.dir_only
	}

	/// Whether this pattern is anchored to its declaring directory (as
	/// opposed to name-only, matching any segment).
	pub fn is_anchored(&self) -> bool {
		self.anchored
	}

	/// Does `path` match this pattern?
	///
	/// `full_path_match = true` requires the matcher to consume the entire
	/// path; `false` additionally accepts the case where the matcher
	/// consumes a prefix of the path terminated by a segment boundary (the
	/// "an ancestor directory is matched" case used by the rule engines).
	pub fn matches(&self, path: &str, is_directory: bool, full_path_match: bool) -> bool {
		if !self.valid {
			return false;
		}

		let repo_path = RepoPath::new(path);
		let segments: Vec<&str> = repo_path.segments().collect();
		let total = segments.len();

		let mut ends = if self.anchored {
			let candidates = match_ends(&self.anchored_segments, &segments);
			if self.trailing_star {
				candidates.into_iter().filter(|&k| k < total).collect()
			} else {
				candidates
			}
		} else {
			let glob = self.name_glob.as_ref().expect("name-only matcher has a glob");
			if full_path_match {
				if total == 1 && glob.matches(segments[0]) {
					vec![1]
				} else {
					Vec::new()
				}
			} else {
				(0..total).filter(|&i| glob.matches(segments[i])).map(|i| i + 1).collect()
			}
		};

		if self.anchored && full_path_match {
			ends.retain(|&k| k == total);
		}

		if self.dir_only && !is_directory {
			return ends.iter().any(|&k| k < total);
		}

		!ends.is_empty()
	}
}

/// All lengths `k` (0..=path.len()) at which `segs` fully matches `path[..k]`.
fn match_ends(segs: &[AnchoredSegment], path: &[&str]) -> Vec<usize> {
	(0..=path.len()).filter(|&k| match_full(segs, &path[..k])).collect()
}

fn match_full(segs: &[AnchoredSegment], path: &[&str]) -> bool {
	match segs.first() {
		None => path.is_empty(),
		Some(AnchoredSegment::DoubleStar) => {
			(0..=path.len()).any(|skip| match_full(&segs[1..], &path[skip..]))
		}
		Some(AnchoredSegment::Glob(glob)) => {
			!path.is_empty() && glob.matches(path[0]) && match_full(&segs[1..], &path[1..])
		}
	}
}

/// Strip trailing unescaped whitespace. An escaped trailing space (`\ ` at
/// end of line) collapses to a single preserved literal space rather than
/// being trimmed away.
fn trim_trailing_unescaped_whitespace(s: &str) -> String {
	let bytes = s.as_bytes();
	let mut end = bytes.len();
	while end > 0 && matches!(bytes[end - 1], b' ' | b'\t') {
		end -= 1;
	}

	if end < bytes.len() && end > 0 && bytes[end - 1] == b'\\' {
		let mut preserved = bytes[..end - 1].to_vec();
		preserved.push(b' ');
		String::from_utf8(preserved).expect("input was valid utf-8")
	} else {
		String::from_utf8(bytes[..end].to_vec()).expect("input was valid utf-8")
	}
}

/// Strip one or more trailing, unescaped `/` characters, reporting whether
/// any were found (the `dir_only` flag).
fn strip_trailing_slashes(s: &str) -> (String, bool) {
	let mut body = s;
	let mut dir_only = false;
	while let Some(stripped) = body.strip_suffix('/') {
		dir_only = true;
		body = stripped;
	}
	(body.to_string(), dir_only)
}
