//! Base text-encoder configuration shared by the layout-aware model records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activation::HiddenAct;
use crate::extra::ExtraParams;

/// Hyperparameters of the bidirectional text encoder underlying the
/// layout-aware models.
///
/// Defaults match the published base checkpoint. The record performs no range
/// validation; callers own the values they pass in, and model-construction
/// code reads the fields as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEncoderConfig {
    /// Number of distinct token ids the embedding table covers.
    #[serde(default = "TextEncoderConfig::default_vocab_size")]
    pub vocab_size: usize,

    /// Dimensionality of the encoder layers and the pooler.
    #[serde(default = "TextEncoderConfig::default_hidden_size")]
    pub hidden_size: usize,

    /// Number of stacked encoder blocks.
    #[serde(default = "TextEncoderConfig::default_num_hidden_layers")]
    pub num_hidden_layers: usize,

    /// Attention heads per encoder block.
    #[serde(default = "TextEncoderConfig::default_num_attention_heads")]
    pub num_attention_heads: usize,

    /// Width of the feed-forward layer inside each encoder block.
    #[serde(default = "TextEncoderConfig::default_intermediate_size")]
    pub intermediate_size: usize,

    /// Activation used by the encoder and pooler.
    #[serde(default)]
    pub hidden_act: HiddenAct,

    /// Dropout probability for embeddings and fully connected layers.
    #[serde(default = "TextEncoderConfig::default_hidden_dropout_prob")]
    pub hidden_dropout_prob: f64,

    /// Dropout probability applied to the attention weights.
    #[serde(default = "TextEncoderConfig::default_attention_probs_dropout_prob")]
    pub attention_probs_dropout_prob: f64,

    /// Longest token sequence the position embeddings can cover.
    #[serde(default = "TextEncoderConfig::default_max_position_embeddings")]
    pub max_position_embeddings: usize,

    /// Number of segment types distinguished by the token type embeddings.
    #[serde(default = "TextEncoderConfig::default_type_vocab_size")]
    pub type_vocab_size: usize,

    /// Standard deviation of the truncated normal weight initializer.
    #[serde(default = "TextEncoderConfig::default_initializer_range")]
    pub initializer_range: f64,

    /// Epsilon used by the layer normalization layers.
    #[serde(default = "TextEncoderConfig::default_layer_norm_eps")]
    pub layer_norm_eps: f64,

    /// Token id used for padding.
    #[serde(default = "TextEncoderConfig::default_pad_token_id")]
    pub pad_token_id: u32,

    /// Recompute activations during the backward pass to reduce memory use.
    #[serde(default = "TextEncoderConfig::default_gradient_checkpointing")]
    pub gradient_checkpointing: bool,

    /// Entries accepted for forward compatibility and kept verbatim.
    #[serde(flatten)]
    pub extra: ExtraParams,
}

impl TextEncoderConfig {
    /// Creates a configuration with the base-checkpoint defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vocabulary size.
    pub fn with_vocab_size(mut self, vocab_size: usize) -> Self {
        self.vocab_size = vocab_size;
        self
    }

    /// Sets the encoder hidden dimension.
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    /// Sets the number of encoder blocks.
    pub fn with_num_hidden_layers(mut self, num_hidden_layers: usize) -> Self {
        self.num_hidden_layers = num_hidden_layers;
        self
    }

    /// Sets the number of attention heads per block.
    pub fn with_num_attention_heads(mut self, num_attention_heads: usize) -> Self {
        self.num_attention_heads = num_attention_heads;
        self
    }

    /// Sets the feed-forward layer width.
    pub fn with_intermediate_size(mut self, intermediate_size: usize) -> Self {
        self.intermediate_size = intermediate_size;
        self
    }

    /// Sets the encoder activation function.
    pub fn with_hidden_act(mut self, hidden_act: HiddenAct) -> Self {
        self.hidden_act = hidden_act;
        self
    }

    /// Sets the dropout probability for embeddings and dense layers.
    pub fn with_hidden_dropout_prob(mut self, hidden_dropout_prob: f64) -> Self {
        self.hidden_dropout_prob = hidden_dropout_prob;
        self
    }

    /// Sets the dropout probability for attention weights.
    pub fn with_attention_probs_dropout_prob(mut self, attention_probs_dropout_prob: f64) -> Self {
        self.attention_probs_dropout_prob = attention_probs_dropout_prob;
        self
    }

    /// Sets the maximum sequence length.
    pub fn with_max_position_embeddings(mut self, max_position_embeddings: usize) -> Self {
        self.max_position_embeddings = max_position_embeddings;
        self
    }

    /// Sets the token type vocabulary size.
    pub fn with_type_vocab_size(mut self, type_vocab_size: usize) -> Self {
        self.type_vocab_size = type_vocab_size;
        self
    }

    /// Sets the weight initializer standard deviation.
    pub fn with_initializer_range(mut self, initializer_range: f64) -> Self {
        self.initializer_range = initializer_range;
        self
    }

    /// Sets the layer normalization epsilon.
    pub fn with_layer_norm_eps(mut self, layer_norm_eps: f64) -> Self {
        self.layer_norm_eps = layer_norm_eps;
        self
    }

    /// Sets the padding token id.
    pub fn with_pad_token_id(mut self, pad_token_id: u32) -> Self {
        self.pad_token_id = pad_token_id;
        self
    }

    /// Enables or disables gradient checkpointing.
    pub fn with_gradient_checkpointing(mut self, gradient_checkpointing: bool) -> Self {
        self.gradient_checkpointing = gradient_checkpointing;
        self
    }

    /// Adds an extra parameter with no typed field.
    ///
    /// Reserved keys are ignored, see [`ExtraParams::insert`].
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key, value);
        self
    }

    fn default_vocab_size() -> usize {
        30522
    }

    fn default_hidden_size() -> usize {
        768
    }

    fn default_num_hidden_layers() -> usize {
        12
    }

    fn default_num_attention_heads() -> usize {
        12
    }

    fn default_intermediate_size() -> usize {
        3072
    }

    fn default_hidden_dropout_prob() -> f64 {
        0.1
    }

    fn default_attention_probs_dropout_prob() -> f64 {
        0.1
    }

    fn default_max_position_embeddings() -> usize {
        512
    }

    fn default_type_vocab_size() -> usize {
        2
    }

    fn default_initializer_range() -> f64 {
        0.02
    }

    fn default_layer_norm_eps() -> f64 {
        1e-12
    }

    fn default_pad_token_id() -> u32 {
        0
    }

    fn default_gradient_checkpointing() -> bool {
        false
    }
}

impl Default for TextEncoderConfig {
    fn default() -> Self {
        Self {
            vocab_size: Self::default_vocab_size(),
            hidden_size: Self::default_hidden_size(),
            num_hidden_layers: Self::default_num_hidden_layers(),
            num_attention_heads: Self::default_num_attention_heads(),
            intermediate_size: Self::default_intermediate_size(),
            hidden_act: HiddenAct::default(),
            hidden_dropout_prob: Self::default_hidden_dropout_prob(),
            attention_probs_dropout_prob: Self::default_attention_probs_dropout_prob(),
            max_position_embeddings: Self::default_max_position_embeddings(),
            type_vocab_size: Self::default_type_vocab_size(),
            initializer_range: Self::default_initializer_range(),
            layer_norm_eps: Self::default_layer_norm_eps(),
            pad_token_id: Self::default_pad_token_id(),
            gradient_checkpointing: Self::default_gradient_checkpointing(),
            extra: ExtraParams::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_base_checkpoint() {
        let config = TextEncoderConfig::new();

        assert_eq!(config.vocab_size, 30522);
        assert_eq!(config.hidden_size, 768);
        assert_eq!(config.num_hidden_layers, 12);
        assert_eq!(config.num_attention_heads, 12);
        assert_eq!(config.intermediate_size, 3072);
        assert_eq!(config.hidden_act, HiddenAct::Gelu);
        assert_eq!(config.hidden_dropout_prob, 0.1);
        assert_eq!(config.attention_probs_dropout_prob, 0.1);
        assert_eq!(config.max_position_embeddings, 512);
        assert_eq!(config.type_vocab_size, 2);
        assert_eq!(config.initializer_range, 0.02);
        assert_eq!(config.layer_norm_eps, 1e-12);
        assert_eq!(config.pad_token_id, 0);
        assert!(!config.gradient_checkpointing);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn override_leaves_other_fields_at_defaults() {
        let config = TextEncoderConfig::new().with_intermediate_size(4096);

        assert_eq!(config.intermediate_size, 4096);
        assert_eq!(config.hidden_size, 768);
        assert_eq!(config.vocab_size, 30522);
    }

    #[test]
    fn extra_parameters_are_forwarded() {
        let config = TextEncoderConfig::new().with_extra("use_cache", json!(false));

        assert_eq!(config.extra.get("use_cache"), Some(&json!(false)));
    }

    #[test]
    fn partial_descriptor_fills_defaults() {
        let config: TextEncoderConfig =
            serde_json::from_value(json!({ "num_attention_heads": 16 })).unwrap();

        assert_eq!(config.num_attention_heads, 16);
        assert_eq!(config.hidden_size, 768);
        assert_eq!(config.hidden_act, HiddenAct::Gelu);
    }
}
