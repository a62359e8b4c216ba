/// Quote a word for a POSIX shell.
///
/// Words made only of safe characters are returned unchanged; everything
/// else is wrapped in single quotes with embedded quotes escaped.
pub fn shell_quote(word: &str) -> String {
	if word.is_empty() {
		return "''".to_string();
	}

	if word
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.' | ':' | '=' | '@' | ','))
	{
		return word.to_string();
	}

	let mut quoted = String::with_capacity(word.len() + 2);
	quoted.push('\'');
	for c in word.chars() {
		if c == '\'' {
			quoted.push_str("'\\''");
		} else {
			quoted.push(c);
		}
	}
	quoted.push('\'');
	quoted
}

/// Quote each word and join them into one command line.
pub fn join_words<S: AsRef<str>>(words: &[S]) -> String {
	words
		.iter()
		.map(|w| shell_quote(w.as_ref()))
		.collect::<Vec<_>>()
		.join(" ")
}
