//! Display names inferred from identifiers.

/// Splits an identifier into words and capitalizes the first letter.
///
/// Word boundaries: lower-to-upper case transitions, letter/digit transitions,
/// the last capital of an acronym run when followed by a lowercase letter, and
/// `_`/`-` separators.
///
/// `CustomerOrder` -> `Customer Order`, `HTTPServer` -> `HTTP Server`,
/// `first_name` -> `First name`.
pub fn natural_name(ident: &str) -> String {
	let chars: Vec<char> = ident.chars().collect();
	let mut out = String::with_capacity(ident.len() + 4);

	for (i, &c) in chars.iter().enumerate() {
		if matches!(c, '_' | '-' | ' ') {
			if !out.is_empty() && !out.ends_with(' ') {
				out.push(' ');
			}
			continue;
		}
		if i > 0 && !out.is_empty() && !out.ends_with(' ') {
			let prev = chars[i - 1];
			let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
			let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
				|| (c.is_uppercase() && prev.is_uppercase() && next_is_lower)
				|| (c.is_ascii_digit() && prev.is_alphabetic())
				|| (c.is_alphabetic() && prev.is_ascii_digit());
			if boundary {
				out.push(' ');
			}
		}
		out.push(c);
	}

	let trimmed = out.trim_end();
	let mut chars = trimmed.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Pluralizes the last word of a display name.
///
/// Consonant + `y` becomes `ies`; `s`, `x`, `z`, `ch` and `sh` take `es`;
/// everything else takes `s`.
pub fn plural_name(name: &str) -> String {
	if name.is_empty() {
		return String::new();
	}
	let lower = name.to_lowercase();

	if let Some(stem) = lower.strip_suffix('y') {
		let vowel_before = stem.chars().last().is_some_and(|c| "aeiou".contains(c));
		if !stem.is_empty() && !vowel_before {
			let cut = name.len() - 1;
			return format!("{}ies", &name[..cut]);
		}
	}

	if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
		return format!("{name}es");
	}

	format!("{name}s")
}
