//! Attribute macros: `[attr]name attr1 attr2 ...` definitions, and the
//! expansion of a macro assignment into the assignments it stands for.

use std::collections::HashMap;

use crate::attribute::{Assignment, State};

/// The set of known macros, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
	macros: HashMap<String, Vec<Assignment>>,
}

impl MacroTable {
	/// An empty table, with no macros defined (not even `binary`).
	pub fn new() -> Self {
		Self::default()
	}

	/// A table seeded with the predefined `binary` macro, equivalent to
	/// `[attr]binary -diff -merge -text`.
	pub fn with_defaults() -> Self {
		let mut table = Self::new();
		table.define(
			"binary",
			vec![
				Assignment::new("diff", State::Unset),
				Assignment::new("merge", State::Unset),
				Assignment::new("text", State::Unset),
			],
		);
		table
	}

	/// Define (or redefine) a macro. A later definition of the same name
	/// replaces the earlier one, matching the last-one-wins behaviour of
	/// everything else in a rule file's macro-definition lines.
	pub fn define(&mut self, name: impl Into<String>, assignments: Vec<Assignment>) {
		self.macros.insert(name.into(), assignments);
	}

	/// Define a macro only if `name` isn't already known. Used when
	/// collecting macro definitions across several rule files in priority
	/// order, so a higher-priority file's definition wins.
	pub fn define_if_absent(&mut self, name: impl Into<String>, assignments: Vec<Assignment>) -> bool {
		let name = name.into();
		if self.macros.contains_key(&name) {
			return false;
		}
		self.macros.insert(name, assignments);
		true
	}

	/// The assignments a macro named `name` stands for, if any.
	pub fn get(&self, name: &str) -> Option<&[Assignment]> {
		self.macros.get(name).map(Vec::as_slice)
	}
}

/// Expand `assignment` into `out`, recursively rewriting any macro
/// references it names.
///
/// `out` doubles as the cycle guard: a key is recorded in `out` before its
/// macro body (if any) is expanded, so a macro that (directly or
/// transitively) refers back to itself finds its own key already resolved
/// and stops there, same as any other already-resolved key.
pub fn expand_into(assignment: &Assignment, table: &MacroTable, out: &mut crate::attribute::AttributeMap) {
	if !out.insert_if_absent(assignment.clone()) {
		return;
	}

	if let Some(targets) = table.get(&assignment.key) {
		for target in targets.to_vec() {
			let rewritten = rewrite_polarity(&target, &assignment.state);
			expand_into(&rewritten, table, out);
		}
	}
}

/// Rewrite a macro target's defined state according to the polarity the
/// macro itself was triggered with.
///
/// - Triggered `Set` (`binary`): targets expand as defined.
/// - Triggered `Unset` (`-binary`): each target's `Set`/`Unset` polarity is
///   flipped (`-diff` becomes `diff` and vice versa).
/// - Triggered `Unspecified` (`!binary`): every target becomes
///   `Unspecified`, erasing any earlier assignment to it.
/// - Triggered `Custom(v)` (`binary=v`): `Set`/`Unset`/`Unspecified` targets
///   expand as defined, but a `Custom` target's own value is overridden by
///   the trigger's value `v`, not kept as written in the macro body.
fn rewrite_polarity(target: &Assignment, trigger: &State) -> Assignment {
	let state = match trigger {
		State::Set => target.state.clone(),
		State::Unset => invert(&target.state),
		State::Unspecified => State::Unspecified,
		State::Custom(v) => match &target.state {
			State::Custom(_) => State::Custom(v.clone()),
			other => other.clone(),
		},
	};
	Assignment::new(target.key.clone(), state)
}

fn invert(state: &State) -> State {
	match state {
		State::Set => State::Unset,
		State::Unset => State::Set,
		other => other.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::attribute::AttributeMap;

	#[test]
	fn binary_macro_expands_to_three_unsets() {
		let table = MacroTable::with_defaults();
		let mut out = AttributeMap::new();
		expand_into(&Assignment::new("binary", State::Set), &table, &mut out);
		assert!(out.is_unset("diff"));
		assert!(out.is_unset("merge"));
		assert!(out.is_unset("text"));
		assert!(out.is_set("binary"));
	}

	#[test]
	fn negated_macro_inverts_polarity() {
		let table = MacroTable::with_defaults();
		let mut out = AttributeMap::new();
		expand_into(&Assignment::new("binary", State::Unset), &table, &mut out);
		assert!(out.is_set("diff"));
		assert!(out.is_set("merge"));
		assert!(out.is_set("text"));
	}

	#[test]
	fn unspecified_macro_erases_targets() {
		let table = MacroTable::with_defaults();
		let mut out = AttributeMap::new();
		expand_into(&Assignment::new("binary", State::Unspecified), &table, &mut out);
		assert!(out.get("diff").unwrap().is_unspecified());
	}

	#[test]
	fn self_referential_macro_does_not_recurse_forever() {
		let mut table = MacroTable::new();
		table.define("loopy", vec![Assignment::new("loopy", State::Set), Assignment::new("text", State::Set)]);
		let mut out = AttributeMap::new();
		expand_into(&Assignment::new("loopy", State::Set), &table, &mut out);
		// The self-reference is absorbed by the cycle guard; the sibling
		// assignment after it still expands normally.
		assert!(out.is_set("text"));
	}

	#[test]
	fn custom_trigger_overrides_custom_targets_but_not_others() {
		let mut table = MacroTable::new();
		table.define(
			"m",
			vec![Assignment::new("text", State::Custom("a".into())), Assignment::new("diff", State::Set)],
		);
		let mut out = AttributeMap::new();
		expand_into(&Assignment::new("m", State::Custom("b".into())), &table, &mut out);
		// The trigger's own value replaces the body's Custom value...
		assert_eq!(out.value("text"), Some("b"));
		// ...but a non-Custom target still expands as written.
		assert!(out.is_set("diff"));
	}

	#[test]
	fn first_seen_wins_across_macro_expansion() {
		let table = MacroTable::with_defaults();
		let mut out = AttributeMap::new();
		out.insert_if_absent(Assignment::new("diff", State::Set));
		expand_into(&Assignment::new("binary", State::Set), &table, &mut out);
		// diff was already resolved before the macro ran, so it is untouched.
		assert!(out.is_set("diff"));
		assert!(out.is_unset("merge"));
	}
}
