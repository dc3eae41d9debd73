// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Message catalogs: the per-request store and positional formatting.

use crate::error::Result;
use indexmap::IndexMap;
use serde::Deserialize;

/// A message catalog as supplied in a module definition: either an
/// inline key→text map or the same map as serialized JSON text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageCatalog {
    /// Inline key→text map
    Inline(IndexMap<String, String>),
    /// Serialized JSON text, decoded at merge time
    Text(String),
}

/// The per-request message store. Keys keep their insertion order;
/// later merges overwrite earlier keys with the same name.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: IndexMap<String, String>,
}

impl MessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` is present.
    pub fn exists(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Returns the raw text for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    /// Merges a catalog into the store. Serialized text is decoded
    /// first; a later key overwrites an earlier one with the same name.
    pub fn merge(&mut self, catalog: &MessageCatalog) -> Result<()> {
        match catalog {
            MessageCatalog::Inline(map) => {
                for (key, text) in map {
                    self.messages.insert(key.clone(), text.clone());
                }
            }
            MessageCatalog::Text(raw) => {
                let decoded: IndexMap<String, String> = serde_json::from_str(raw)?;
                for (key, text) in decoded {
                    self.messages.insert(key, text);
                }
            }
        }
        Ok(())
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Replaces `$N` tokens (1-indexed) with `args[N-1]`. A token with no
/// matching argument stays literal, as does a bare `$`.
pub fn format_message(text: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
            digits.push(*d);
            chars.next();
        }
        match digits.parse::<usize>() {
            Ok(n) if n >= 1 && n <= args.len() => out.push_str(&args[n - 1]),
            _ => {
                out.push('$');
                out.push_str(&digits);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_substitutes_positional_tokens() {
        assert_eq!(
            format_message("Hello $1", &["World".to_string()]),
            "Hello World"
        );
    }

    #[test]
    fn format_leaves_unmatched_tokens_literal() {
        assert_eq!(format_message("$1 $2", &["x".to_string()]), "x $2");
        assert_eq!(format_message("cost: $5", &[]), "cost: $5");
        assert_eq!(format_message("a $ b", &[]), "a $ b");
    }

    #[test]
    fn format_is_one_indexed() {
        assert_eq!(
            format_message("$0 $1", &["first".to_string()]),
            "$0 first"
        );
    }

    #[test]
    fn merge_overwrites_and_keeps_insertion_order() {
        let mut store = MessageStore::new();
        let mut first = IndexMap::new();
        first.insert("greet".to_string(), "hi".to_string());
        first.insert("bye".to_string(), "later".to_string());
        store.merge(&MessageCatalog::Inline(first)).unwrap();

        let mut second = IndexMap::new();
        second.insert("greet".to_string(), "hello".to_string());
        store.merge(&MessageCatalog::Inline(second)).unwrap();

        assert_eq!(store.get("greet"), Some("hello"));
        assert_eq!(store.get("bye"), Some("later"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn merge_decodes_serialized_text() {
        let mut store = MessageStore::new();
        store
            .merge(&MessageCatalog::Text(r#"{"k": "v"}"#.to_string()))
            .unwrap();
        assert!(store.exists("k"));
        assert_eq!(store.get("k"), Some("v"));
    }

    #[test]
    fn merge_rejects_malformed_text() {
        let mut store = MessageStore::new();
        assert!(store
            .merge(&MessageCatalog::Text("not json".to_string()))
            .is_err());
    }
}
