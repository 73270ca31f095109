//! Attribute values and the insertion-ordered map that holds resolved
//! attributes for a query.

use std::fmt;

/// The syntax rule for an attribute key: non-empty, drawn from
/// `[A-Za-z0-9._-]`, and not starting with `-` (that prefix is reserved for
/// the `UNSET` serialisation form).
pub fn is_valid_key(key: &str) -> bool {
	if key.is_empty() || key.starts_with('-') {
		return false;
	}
	key.bytes()
		.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// One of the four states an attribute assignment can hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum State {
	/// `key` — the attribute is set.
	Set,
	/// `-key` — the attribute is unset.
	Unset,
	/// `!key` — erases any previous assignment of this key.
	Unspecified,
	/// `key=value` — the attribute carries an explicit string value.
	Custom(String),
}

impl State {
	/// True for [`State::Set`].
	pub fn is_set(&self) -> bool {
		matches!(self, State::Set)
	}

	/// True for [`State::Unset`].
	pub fn is_unset(&self) -> bool {
		matches!(self, State::Unset)
	}

	/// True for [`State::Unspecified`].
	pub fn is_unspecified(&self) -> bool {
		matches!(self, State::Unspecified)
	}

	/// True for [`State::Custom`].
	pub fn is_custom(&self) -> bool {
		matches!(self, State::Custom(_))
	}

	/// The carried value, if this is [`State::Custom`].
	pub fn value(&self) -> Option<&str> {
		match self {
			State::Custom(v) => Some(v),
			_ => None,
		}
	}
}

impl fmt::Display for State {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			State::Set => f.write_str("set"),
			State::Unset => f.write_str("unset"),
			State::Unspecified => f.write_str("unspecified"),
			State::Custom(v) => write!(f, "custom({v})"),
		}
	}
}

/// A single `key := state` assignment, as parsed from one token of an
/// attribute rule's payload, or produced by macro expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
	/// The attribute key.
	pub key: String,
	/// The state assigned to the key.
	pub state: State,
}

impl Assignment {
	/// Construct a new assignment. Does not validate the key; callers should
	/// check [`is_valid_key`] first if the key comes from untrusted text.
	pub fn new(key: impl Into<String>, state: State) -> Self {
		Self {
			key: key.into(),
			state,
		}
	}

	/// Parse a single attribute token (`name`, `-name`, `!name`, or
	/// `name=value`) into an assignment, returning `None` if the resulting
	/// key fails [`is_valid_key`].
	pub fn parse_token(token: &str) -> Option<Self> {
		let (key, state) = if let Some(rest) = token.strip_prefix('-') {
			(rest, State::Unset)
		} else if let Some(rest) = token.strip_prefix('!') {
			(rest, State::Unspecified)
		} else if let Some((name, value)) = token.split_once('=') {
			(name, State::Custom(value.to_string()))
		} else {
			(token, State::Set)
		};

		if !is_valid_key(key) {
			return None;
		}

		Some(Assignment::new(key, state))
	}

	/// Render this assignment back to its serialisation form.
	pub fn to_token(&self) -> String {
		match &self.state {
			State::Set => self.key.clone(),
			State::Unset => format!("-{}", self.key),
			State::Unspecified => format!("!{}", self.key),
			State::Custom(v) => format!("{}={}", self.key, v),
		}
	}
}

/// An insertion-ordered mapping from attribute key to its resolved
/// `Assignment`, with at most one entry per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
	order: Vec<String>,
	entries: std::collections::HashMap<String, Assignment>,
}

impl AttributeMap {
	/// An empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert `assignment` only if `key` is not already present.
	///
	/// Returns `true` if the assignment was recorded (the key was new).
	pub fn insert_if_absent(&mut self, assignment: Assignment) -> bool {
		if self.entries.contains_key(&assignment.key) {
			return false;
		}
		self.order.push(assignment.key.clone());
		self.entries.insert(assignment.key.clone(), assignment);
		true
	}

	/// Whether `key` already has an entry.
	pub fn contains(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Look up the state (and value, if custom) for `key`.
	pub fn get(&self, key: &str) -> Option<&State> {
		self.entries.get(key).map(|a| &a.state)
	}

	/// True if `key` is set to [`State::Set`].
	pub fn is_set(&self, key: &str) -> bool {
		self.get(key).map_or(false, State::is_set)
	}

	/// True if `key` is set to [`State::Unset`].
	pub fn is_unset(&self, key: &str) -> bool {
		self.get(key).map_or(false, State::is_unset)
	}

	/// True if `key` is set to [`State::Custom`].
	pub fn is_custom(&self, key: &str) -> bool {
		self.get(key).map_or(false, State::is_custom)
	}

	/// The custom value for `key`, if any.
	pub fn value(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(State::value)
	}

	/// Remove every entry whose state is [`State::Unspecified`].
	///
	/// Called once, after all contributing rule files have written into the
	/// map: `UNSPECIFIED` entries exist only to shield a key from
	/// lower-priority assignments while resolution is in progress.
	pub fn erase_unspecified(&mut self) {
		let doomed: Vec<String> = self
			.entries
			.iter()
			.filter(|(_, a)| a.state.is_unspecified())
			.map(|(k, _)| k.clone())
			.collect();
		for key in doomed {
			self.entries.remove(&key);
			self.order.retain(|k| k != &key);
		}
	}

	/// Iterate entries in the order their keys were first assigned.
	pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
		self.order.iter().map(move |k| &self.entries[k])
	}

	/// Number of entries currently in the map.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether the map has no entries.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}
}
