//! Configuration record for the layout-aware multimodal encoder.
//!
//! [`LayoutLMv2Config`] extends the base [`TextEncoderConfig`] with the 2-D
//! position, relative-position, and image-feature settings of the
//! layout-aware variant, and knows how to load and save the flat JSON
//! descriptors that pretrained checkpoints ship with.

use std::path::Path;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::activation::HiddenAct;
use crate::error::ConfigError;
use crate::extra::ExtraParams;
use crate::text::TextEncoderConfig;

fn serialize_model_type<S>(_marker: &(), serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(LayoutLMv2Config::MODEL_TYPE)
}

/// Hyperparameters of the multimodal document encoder.
///
/// The record embeds [`TextEncoderConfig`] by value and adds the fields
/// specific to the 2-D/image-aware variant. In the serialized form the base
/// fields are flattened, so a persisted descriptor is a single flat JSON
/// object. Construction never fails and performs no range validation; a
/// record is created once, then read by model-construction code.
///
/// # Examples
///
/// ```
/// use layoutlmv2_config::LayoutLMv2Config;
///
/// let config = LayoutLMv2Config::new().with_coordinate_size(64);
///
/// assert_eq!(config.coordinate_size, 64);
/// assert_eq!(config.max_2d_position_embeddings, 1024);
/// assert_eq!(config.model_type(), "layoutlmv2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLMv2Config {
    // Fixed architecture tag. Written on every save, never read from input;
    // a descriptor's own tag is checked in `from_value` instead.
    #[serde(
        rename = "model_type",
        serialize_with = "serialize_model_type",
        skip_deserializing
    )]
    model_type: (),

    /// Text-encoder settings shared with the base architecture.
    #[serde(flatten)]
    pub text: TextEncoderConfig,

    /// Largest coordinate value the 2-D position embeddings can represent.
    #[serde(default = "LayoutLMv2Config::default_max_2d_position_embeddings")]
    pub max_2d_position_embeddings: usize,

    /// Maximum 1-D relative distance considered by the relative attention
    /// bias.
    #[serde(default = "LayoutLMv2Config::default_max_rel_pos")]
    pub max_rel_pos: usize,

    /// Number of buckets for the 1-D relative position bias.
    #[serde(default = "LayoutLMv2Config::default_rel_pos_bins")]
    pub rel_pos_bins: usize,

    /// Use a single fused projection for queries, keys, and values.
    #[serde(default = "LayoutLMv2Config::default_fast_qkv")]
    pub fast_qkv: bool,

    /// Maximum 2-D relative distance considered by the relative attention
    /// bias.
    #[serde(default = "LayoutLMv2Config::default_max_rel_2d_pos")]
    pub max_rel_2d_pos: usize,

    /// Number of buckets for the 2-D relative position bias.
    #[serde(default = "LayoutLMv2Config::default_rel_2d_pos_bins")]
    pub rel_2d_pos_bins: usize,

    /// Convert the visual backbone's batch normalization layers to their
    /// synchronized form under distributed training.
    #[serde(default = "LayoutLMv2Config::default_convert_sync_batchnorm")]
    pub convert_sync_batchnorm: bool,

    /// Output height, width, and channel count of the visual feature pooling
    /// stage.
    #[serde(default = "LayoutLMv2Config::default_image_feature_pool_shape")]
    pub image_feature_pool_shape: [usize; 3],

    /// Embedding width of each bounding-box coordinate.
    #[serde(default = "LayoutLMv2Config::default_coordinate_size")]
    pub coordinate_size: usize,

    /// Embedding width of the bounding-box width and height features.
    #[serde(default = "LayoutLMv2Config::default_shape_size")]
    pub shape_size: usize,
}

impl LayoutLMv2Config {
    /// Identification tag of this record type, used by registry code to
    /// select it when dispatching a persisted descriptor.
    pub const MODEL_TYPE: &'static str = "layoutlmv2";

    /// Creates a configuration with the base-checkpoint defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the architecture tag, identical for every instance.
    pub fn model_type(&self) -> &'static str {
        Self::MODEL_TYPE
    }

    /// Returns the extra parameters kept from unrecognized descriptor
    /// entries.
    pub fn extra(&self) -> &ExtraParams {
        &self.text.extra
    }

    /// Sets the largest representable 2-D coordinate value.
    pub fn with_max_2d_position_embeddings(mut self, max_2d_position_embeddings: usize) -> Self {
        self.max_2d_position_embeddings = max_2d_position_embeddings;
        self
    }

    /// Sets the maximum 1-D relative distance.
    pub fn with_max_rel_pos(mut self, max_rel_pos: usize) -> Self {
        self.max_rel_pos = max_rel_pos;
        self
    }

    /// Sets the number of 1-D relative position buckets.
    pub fn with_rel_pos_bins(mut self, rel_pos_bins: usize) -> Self {
        self.rel_pos_bins = rel_pos_bins;
        self
    }

    /// Enables or disables the fused query/key/value projection.
    pub fn with_fast_qkv(mut self, fast_qkv: bool) -> Self {
        self.fast_qkv = fast_qkv;
        self
    }

    /// Sets the maximum 2-D relative distance.
    pub fn with_max_rel_2d_pos(mut self, max_rel_2d_pos: usize) -> Self {
        self.max_rel_2d_pos = max_rel_2d_pos;
        self
    }

    /// Sets the number of 2-D relative position buckets.
    pub fn with_rel_2d_pos_bins(mut self, rel_2d_pos_bins: usize) -> Self {
        self.rel_2d_pos_bins = rel_2d_pos_bins;
        self
    }

    /// Enables or disables synchronized batch normalization conversion.
    pub fn with_convert_sync_batchnorm(mut self, convert_sync_batchnorm: bool) -> Self {
        self.convert_sync_batchnorm = convert_sync_batchnorm;
        self
    }

    /// Sets the visual feature pooling shape as height, width, channels.
    pub fn with_image_feature_pool_shape(mut self, image_feature_pool_shape: [usize; 3]) -> Self {
        self.image_feature_pool_shape = image_feature_pool_shape;
        self
    }

    /// Sets the bounding-box coordinate embedding width.
    pub fn with_coordinate_size(mut self, coordinate_size: usize) -> Self {
        self.coordinate_size = coordinate_size;
        self
    }

    /// Sets the bounding-box shape embedding width.
    pub fn with_shape_size(mut self, shape_size: usize) -> Self {
        self.shape_size = shape_size;
        self
    }

    // Setters forwarded to the embedded text-encoder record.

    /// Sets the vocabulary size.
    pub fn with_vocab_size(mut self, vocab_size: usize) -> Self {
        self.text = self.text.with_vocab_size(vocab_size);
        self
    }

    /// Sets the encoder hidden dimension.
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.text = self.text.with_hidden_size(hidden_size);
        self
    }

    /// Sets the number of encoder blocks.
    pub fn with_num_hidden_layers(mut self, num_hidden_layers: usize) -> Self {
        self.text = self.text.with_num_hidden_layers(num_hidden_layers);
        self
    }

    /// Sets the number of attention heads per block.
    pub fn with_num_attention_heads(mut self, num_attention_heads: usize) -> Self {
        self.text = self.text.with_num_attention_heads(num_attention_heads);
        self
    }

    /// Sets the feed-forward layer width.
    pub fn with_intermediate_size(mut self, intermediate_size: usize) -> Self {
        self.text = self.text.with_intermediate_size(intermediate_size);
        self
    }

    /// Sets the encoder activation function.
    pub fn with_hidden_act(mut self, hidden_act: HiddenAct) -> Self {
        self.text = self.text.with_hidden_act(hidden_act);
        self
    }

    /// Sets the dropout probability for embeddings and dense layers.
    pub fn with_hidden_dropout_prob(mut self, hidden_dropout_prob: f64) -> Self {
        self.text = self.text.with_hidden_dropout_prob(hidden_dropout_prob);
        self
    }

    /// Sets the dropout probability for attention weights.
    pub fn with_attention_probs_dropout_prob(mut self, attention_probs_dropout_prob: f64) -> Self {
        self.text = self
            .text
            .with_attention_probs_dropout_prob(attention_probs_dropout_prob);
        self
    }

    /// Sets the maximum sequence length.
    pub fn with_max_position_embeddings(mut self, max_position_embeddings: usize) -> Self {
        self.text = self.text.with_max_position_embeddings(max_position_embeddings);
        self
    }

    /// Sets the token type vocabulary size.
    pub fn with_type_vocab_size(mut self, type_vocab_size: usize) -> Self {
        self.text = self.text.with_type_vocab_size(type_vocab_size);
        self
    }

    /// Sets the weight initializer standard deviation.
    pub fn with_initializer_range(mut self, initializer_range: f64) -> Self {
        self.text = self.text.with_initializer_range(initializer_range);
        self
    }

    /// Sets the layer normalization epsilon.
    pub fn with_layer_norm_eps(mut self, layer_norm_eps: f64) -> Self {
        self.text = self.text.with_layer_norm_eps(layer_norm_eps);
        self
    }

    /// Sets the padding token id.
    pub fn with_pad_token_id(mut self, pad_token_id: u32) -> Self {
        self.text = self.text.with_pad_token_id(pad_token_id);
        self
    }

    /// Enables or disables gradient checkpointing.
    pub fn with_gradient_checkpointing(mut self, gradient_checkpointing: bool) -> Self {
        self.text = self.text.with_gradient_checkpointing(gradient_checkpointing);
        self
    }

    /// Adds an extra parameter, forwarded to the embedded text record.
    ///
    /// Unrecognized keys are accepted without error; keys colliding with a
    /// typed field or with the architecture tag are dropped.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.text = self.text.with_extra(key, value);
        self
    }

    /// Builds a configuration from a descriptor value.
    ///
    /// Fields missing from the descriptor take their defaults, and entries
    /// with no typed field are retained in the extra-parameter map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ModelTypeMismatch`] if the descriptor declares
    /// a tag other than [`Self::MODEL_TYPE`], or [`ConfigError::Parse`] if a
    /// field has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        if let Some(found) = value.get("model_type").and_then(Value::as_str) {
            if found != Self::MODEL_TYPE {
                return Err(ConfigError::ModelTypeMismatch {
                    expected: Self::MODEL_TYPE,
                    found: found.to_string(),
                });
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Builds a configuration from descriptor JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, otherwise the same
    /// errors as [`Self::from_value`].
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(contents)?;
        Self::from_value(value)
    }

    /// Loads a configuration from a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the same errors as [`Self::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), "loaded model configuration descriptor");
        Ok(config)
    }

    /// Serializes the configuration to a descriptor value, including the
    /// architecture tag.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes the configuration to pretty-printed descriptor JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Saves the configuration to a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_json_string()?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    fn default_max_2d_position_embeddings() -> usize {
        1024
    }

    fn default_max_rel_pos() -> usize {
        128
    }

    fn default_rel_pos_bins() -> usize {
        32
    }

    fn default_fast_qkv() -> bool {
        true
    }

    fn default_max_rel_2d_pos() -> usize {
        256
    }

    fn default_rel_2d_pos_bins() -> usize {
        64
    }

    fn default_convert_sync_batchnorm() -> bool {
        true
    }

    fn default_image_feature_pool_shape() -> [usize; 3] {
        [7, 7, 256]
    }

    fn default_coordinate_size() -> usize {
        128
    }

    fn default_shape_size() -> usize {
        128
    }
}

impl Default for LayoutLMv2Config {
    fn default() -> Self {
        Self {
            model_type: (),
            text: TextEncoderConfig::default(),
            max_2d_position_embeddings: Self::default_max_2d_position_embeddings(),
            max_rel_pos: Self::default_max_rel_pos(),
            rel_pos_bins: Self::default_rel_pos_bins(),
            fast_qkv: Self::default_fast_qkv(),
            max_rel_2d_pos: Self::default_max_rel_2d_pos(),
            rel_2d_pos_bins: Self::default_rel_2d_pos_bins(),
            convert_sync_batchnorm: Self::default_convert_sync_batchnorm(),
            image_feature_pool_shape: Self::default_image_feature_pool_shape(),
            coordinate_size: Self::default_coordinate_size(),
            shape_size: Self::default_shape_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_base_checkpoint() {
        let config = LayoutLMv2Config::new();

        assert_eq!(config.max_2d_position_embeddings, 1024);
        assert_eq!(config.max_rel_pos, 128);
        assert_eq!(config.rel_pos_bins, 32);
        assert!(config.fast_qkv);
        assert_eq!(config.max_rel_2d_pos, 256);
        assert_eq!(config.rel_2d_pos_bins, 64);
        assert!(config.convert_sync_batchnorm);
        assert_eq!(config.image_feature_pool_shape, [7, 7, 256]);
        assert_eq!(config.coordinate_size, 128);
        assert_eq!(config.shape_size, 128);

        assert_eq!(config.text.vocab_size, 30522);
        assert_eq!(config.text.max_position_embeddings, 512);
    }

    #[test]
    fn overrides_leave_other_fields_at_defaults() {
        let config = LayoutLMv2Config::new()
            .with_hidden_size(1024)
            .with_num_hidden_layers(24);

        assert_eq!(config.text.hidden_size, 1024);
        assert_eq!(config.text.num_hidden_layers, 24);
        assert_eq!(config.text.vocab_size, 30522);
        assert_eq!(config.image_feature_pool_shape, [7, 7, 256]);
    }

    #[test]
    fn model_type_is_fixed() {
        let config = LayoutLMv2Config::new();
        assert_eq!(config.model_type(), "layoutlmv2");

        let value = config.to_value().unwrap();
        assert_eq!(value["model_type"], "layoutlmv2");
    }

    #[test]
    fn model_type_cannot_be_overridden_via_extras() {
        let config = LayoutLMv2Config::new().with_extra("model_type", json!("bert"));

        assert!(config.extra().is_empty());
        assert_eq!(config.model_type(), "layoutlmv2");
        assert_eq!(config.to_value().unwrap()["model_type"], "layoutlmv2");
    }

    #[test]
    fn identical_arguments_compare_equal() {
        let a = LayoutLMv2Config::new()
            .with_coordinate_size(64)
            .with_extra("output_past", json!(true));
        let b = LayoutLMv2Config::new()
            .with_coordinate_size(64)
            .with_extra("output_past", json!(true));

        assert_eq!(a, b);
    }

    #[test]
    fn unrecognized_extra_parameters_are_accepted() {
        let config = LayoutLMv2Config::new().with_extra("custom_pipeline_flag", json!(true));

        assert_eq!(
            config.extra().get("custom_pipeline_flag"),
            Some(&json!(true))
        );
    }

    #[test]
    fn descriptor_value_round_trips_unknown_keys() {
        let config = LayoutLMv2Config::from_value(json!({
            "model_type": "layoutlmv2",
            "hidden_size": 1024,
            "fast_qkv": false,
            "custom_pipeline_flag": true,
        }))
        .unwrap();

        assert_eq!(config.text.hidden_size, 1024);
        assert!(!config.fast_qkv);
        assert_eq!(config.extra().get("custom_pipeline_flag"), Some(&json!(true)));
        assert!(!config.extra().contains_key("model_type"));
    }

    #[test]
    fn partial_descriptor_fills_defaults() {
        let config = LayoutLMv2Config::from_json_str(r#"{ "num_attention_heads": 16 }"#).unwrap();

        assert_eq!(config.text.num_attention_heads, 16);
        assert_eq!(config.text.hidden_size, 768);
        assert_eq!(config.rel_2d_pos_bins, 64);
    }

    #[test]
    fn foreign_model_type_is_rejected() {
        let err = LayoutLMv2Config::from_value(json!({ "model_type": "bert" })).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::ModelTypeMismatch { expected: "layoutlmv2", .. }
        ));
    }

    #[test]
    fn descriptor_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = LayoutLMv2Config::new()
            .with_hidden_size(1024)
            .with_extra("torchscript", json!(true));
        config.to_file(&path).unwrap();

        let loaded = LayoutLMv2Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
