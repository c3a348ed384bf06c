//! Best-effort LaTeX to plain text. Not a parser: nested braces and
//! unusual macros can leave residual markup.

use std::sync::LazyLock;

use regex::Regex;

/// A command token, optionally starred, with at most one `[...]` option
/// group and one `{...}` argument group.
static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[a-zA-Z]+\*?(\[[^\]]*\])?(\{[^}]*\})?").unwrap());

static BRACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[{}]").unwrap());

/// Removes commands (with their option and argument groups), then any
/// leftover brace characters.
pub fn strip_latex(source: &str) -> String {
    let without_commands = COMMAND.replace_all(source, "");
    BRACES.replace_all(&without_commands, "").into_owned()
}
