//! Scope name resolution.

use oauthkit_service::ScopeTable;

/// Constant name a requested scope is looked up under: `SCOPE_<SCOPE>`,
/// ASCII-uppercased.
pub fn scope_constant(scope: &str) -> String {
    format!("SCOPE_{}", scope).to_ascii_uppercase()
}

/// Translate requested scopes into provider scope identifiers.
///
/// Each scope whose `SCOPE_<NAME>` constant is declared in `table` is
/// replaced by the constant's value; any other scope passes through
/// unchanged. The output has the same length and order as the input.
pub fn resolve_scopes<S: AsRef<str>>(table: &ScopeTable, requested: &[S]) -> Vec<String> {
    requested
        .iter()
        .map(|scope| {
            let scope = scope.as_ref();
            table
                .get(&scope_constant(scope))
                .map(str::to_string)
                .unwrap_or_else(|| scope.to_string())
        })
        .collect()
}
