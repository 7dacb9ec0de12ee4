//! Open-ended extra parameters carried alongside the typed configuration
//! fields.
//!
//! Persisted descriptors evolve faster than the typed records in this crate.
//! [`ExtraParams`] keeps unrecognized descriptor entries so that loading and
//! re-saving a descriptor does not discard them.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Keys owned by the typed configuration records. These must never appear in
/// an extra-parameter map, or serialized descriptors would carry duplicate
/// keys.
const RESERVED_KEYS: &[&str] = &[
    "model_type",
    // text encoder record
    "vocab_size",
    "hidden_size",
    "num_hidden_layers",
    "num_attention_heads",
    "intermediate_size",
    "hidden_act",
    "hidden_dropout_prob",
    "attention_probs_dropout_prob",
    "max_position_embeddings",
    "type_vocab_size",
    "initializer_range",
    "layer_norm_eps",
    "pad_token_id",
    "gradient_checkpointing",
    // layout and image record
    "max_2d_position_embeddings",
    "max_rel_pos",
    "rel_pos_bins",
    "fast_qkv",
    "max_rel_2d_pos",
    "rel_2d_pos_bins",
    "convert_sync_batchnorm",
    "image_feature_pool_shape",
    "coordinate_size",
    "shape_size",
];

/// String-keyed escape hatch for descriptor entries that have no typed field.
///
/// Entries whose key collides with a typed field or with the fixed
/// `model_type` tag are dropped on insertion and on deserialization, keeping
/// the typed records the single source of truth for those values. Keys are
/// stored in sorted order so serialized descriptors are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraParams(BTreeMap<String, Value>);

impl ExtraParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` belongs to a typed configuration field.
    pub fn is_reserved(key: &str) -> bool {
        RESERVED_KEYS.contains(&key)
    }

    /// Inserts a parameter, returning the previous value for `key` if any.
    ///
    /// Reserved keys are ignored with a warning; the typed setters on the
    /// configuration records are the only channel for those values.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if Self::is_reserved(&key) {
            warn!(key = %key, "ignoring reserved key passed as an extra parameter");
            return None;
        }
        self.0.insert(key, value)
    }

    /// Looks up a parameter by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the map holds a value for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of stored parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no parameters are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the stored parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for ExtraParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ExtraParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut entries = BTreeMap::<String, Value>::deserialize(deserializer)?;
        entries.retain(|key, _| !Self::is_reserved(key));
        Ok(Self(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reserved_keys_are_dropped_on_insert() {
        let mut extra = ExtraParams::new();
        assert!(extra.insert("model_type", json!("bert")).is_none());
        assert!(extra.insert("hidden_size", json!(4096)).is_none());
        assert!(extra.is_empty());
    }

    #[test]
    fn unrecognized_keys_are_kept() {
        let mut extra = ExtraParams::new();
        extra.insert("output_past", json!(true));
        extra.insert("tokenizer_class", json!("LayoutLMv2Tokenizer"));

        assert_eq!(extra.len(), 2);
        assert_eq!(extra.get("output_past"), Some(&json!(true)));
        assert!(extra.contains_key("tokenizer_class"));
    }

    #[test]
    fn deserialization_strips_reserved_keys() {
        let extra: ExtraParams = serde_json::from_value(json!({
            "model_type": "layoutlmv2",
            "vocab_size": 1,
            "tie_word_embeddings": false,
        }))
        .unwrap();

        assert_eq!(extra.len(), 1);
        assert!(extra.contains_key("tie_word_embeddings"));
        assert!(!extra.contains_key("model_type"));
    }

    #[test]
    fn iteration_is_key_ordered() {
        let mut extra = ExtraParams::new();
        extra.insert("zeta", json!(1));
        extra.insert("alpha", json!(2));

        let keys: Vec<&str> = extra.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
