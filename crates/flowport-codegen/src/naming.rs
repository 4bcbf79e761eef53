// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Deterministic name generation for synthesized declarations.
//!
//! Counters start at 0 for every key and are owned by a single conversion run,
//! so the same model always yields the same names.

use std::collections::HashMap;

/// Kind of synthesized declaration. Each scope has its own prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameScope {
    /// Listener variables backing an HTTP endpoint
    Listener,
    /// Services generated from a listener configuration
    Service,
}

impl NameScope {
    /// Prefix prepended to every name allocated in this scope.
    pub fn prefix(self) -> &'static str {
        match self {
            NameScope::Listener => "_LISTENER_",
            NameScope::Service => "_SERVICE_",
        }
    }
}

/// Allocates `prefix + base + counter` names, one counter per `(scope, base)`.
#[derive(Debug, Default)]
pub struct NameGenerator {
    counters: HashMap<(NameScope, String), usize>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next unique name for `base_name` in `scope`.
    pub fn next(&mut self, scope: NameScope, base_name: &str) -> String {
        let counter = self
            .counters
            .entry((scope, base_name.to_string()))
            .or_insert(0);
        let name = format!("{}{}{}", scope.prefix(), base_name, counter);
        *counter += 1;
        name
    }

    /// Shorthand for [`NameScope::Listener`].
    pub fn listener_name(&mut self, base_name: &str) -> String {
        self.next(NameScope::Listener, base_name)
    }

    /// Shorthand for [`NameScope::Service`].
    pub fn service_name(&mut self, base_name: &str) -> String {
        self.next(NameScope::Service, base_name)
    }
}

/// Identity of the package a compilation unit belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const SERVICE_TYPE_SEPARATOR: &str = "$$service$";

/// Allocates keys for anonymous service types, one counter per package.
#[derive(Debug, Default)]
pub struct AnonymousNames {
    service_types: HashMap<PackageId, usize>,
}

impl AnonymousNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `service_name + "$$service$" + n` where `n` counts every service
    /// type allocated so far in `package`.
    pub fn next_service_type_key(&mut self, package: &PackageId, service_name: &str) -> String {
        let counter = self.service_types.entry(package.clone()).or_insert(0);
        let key = format!("{}{}{}", service_name, SERVICE_TYPE_SEPARATOR, counter);
        *counter += 1;
        key
    }
}

/// Turn a context path into a name fragment by replacing `/` with `_`.
///
/// `"/test/testpath"` becomes `"_test_testpath"`.
pub fn cleanup_path(path: &str) -> String {
    path.replace('/', "_")
}

/// Map arbitrary source text onto identifier characters.
///
/// Anything outside `[A-Za-z0-9_]` becomes `_`, a leading digit gets a `_`
/// prefix, and empty input yields `_empty`. The result is a name fragment; use
/// [`target_ident`] for a name that is declared on its own.
pub fn sanitize_ident(s: &str) -> String {
    let mut result: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match result.chars().next() {
        None => result.push_str("_empty"),
        Some(c) if c.is_ascii_digit() => result.insert(0, '_'),
        Some(_) => {}
    }
    result
}

/// Ballerina keywords, sorted for binary search.
const RESERVED_WORDS: &[&str] = &[
    "abort", "abstract", "annotation", "any", "anydata", "as", "base16", "base64", "boolean",
    "break", "byte", "catch", "channel", "check", "checkpanic", "class", "client", "commit",
    "configurable", "const", "continue", "decimal", "distinct", "do", "else", "enum", "equals",
    "error", "external", "fail", "false", "final", "float", "flush", "foreach", "fork", "from",
    "function", "future", "handle", "if", "import", "in", "int", "is", "isolated", "join", "json",
    "let", "limit", "listener", "lock", "map", "match", "never", "new", "null", "object", "on",
    "order", "outer", "panic", "private", "public", "readonly", "record", "remote", "resource",
    "retry", "return", "returns", "rollback", "select", "service", "source", "start", "stream",
    "string", "table", "transaction", "transactional", "trap", "true", "type", "typedesc",
    "typeof", "var", "version", "wait", "where", "while", "worker", "xml", "xmlns",
];

pub fn is_reserved_word(ident: &str) -> bool {
    RESERVED_WORDS.binary_search(&ident).is_ok()
}

/// Sanitize `s` into a standalone declaration name. Keywords are quoted as
/// `'word`.
pub fn target_ident(s: &str) -> String {
    let ident = sanitize_ident(s);
    if is_reserved_word(&ident) {
        format!("'{}", ident)
    } else {
        ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_names_per_base() {
        let mut names = NameGenerator::new();
        let generated: Vec<String> = (0..5)
            .map(|_| names.next(NameScope::Listener, "cfg"))
            .collect();
        let expected: Vec<String> = (0..5).map(|k| format!("_LISTENER_cfg{}", k)).collect();
        assert_eq!(generated, expected);

        let unique: HashSet<&String> = generated.iter().collect();
        assert_eq!(unique.len(), generated.len());
    }

    #[test]
    fn test_independent_counters() {
        let mut names = NameGenerator::new();
        assert_eq!(names.service_name("_a"), "_SERVICE__a0");
        assert_eq!(names.service_name("_b"), "_SERVICE__b0");
        assert_eq!(names.service_name("_a"), "_SERVICE__a1");
        // Same base, other scope
        assert_eq!(names.listener_name("_a"), "_LISTENER__a0");
    }

    #[test]
    fn test_fresh_generator_restarts() {
        let mut first = NameGenerator::new();
        first.listener_name("x");
        first.listener_name("x");
        let mut second = NameGenerator::new();
        assert_eq!(second.listener_name("x"), "_LISTENER_x0");
    }

    #[test]
    fn test_service_type_keys_per_package() {
        let mut anon = AnonymousNames::new();
        let hello = PackageId::new("hello");
        let other = PackageId::new("other");

        assert_eq!(anon.next_service_type_key(&hello, "svcA"), "svcA$$service$0");
        assert_eq!(anon.next_service_type_key(&hello, "svcB"), "svcB$$service$1");
        assert_eq!(anon.next_service_type_key(&other, "svcA"), "svcA$$service$0");
        assert_eq!(anon.next_service_type_key(&hello, "svcA"), "svcA$$service$2");
    }

    #[test]
    fn test_cleanup_path() {
        assert_eq!(cleanup_path("/test/testpath"), "_test_testpath");
        assert_eq!(cleanup_path("plain"), "plain");
    }

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("hello"), "hello");
        assert_eq!(sanitize_ident("hello-world"), "hello_world");
        assert_eq!(sanitize_ident("123abc"), "_123abc");
        assert_eq!(sanitize_ident(""), "_empty");
        assert_eq!(sanitize_ident("flow.v2"), "flow_v2");
        assert_eq!(sanitize_ident("9"), "_9");
    }

    #[test]
    fn test_reserved_words_are_sorted() {
        assert!(RESERVED_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_target_ident_quotes_keywords() {
        assert_eq!(target_ident("listener"), "'listener");
        assert_eq!(target_ident("service"), "'service");
        assert_eq!(target_ident("get-order"), "get_order");
        assert_eq!(target_ident("listeners"), "listeners");
        assert!(!is_reserved_word("helloFlow"));
    }
}
