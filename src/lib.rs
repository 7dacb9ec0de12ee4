//! # layoutlmv2-config
//!
//! Configuration records for layout-aware document understanding models.
//!
//! This crate holds the hyperparameters needed to construct a multimodal
//! encoder that jointly attends over text, token layout, and page image
//! features: [`LayoutLMv2Config`], the base [`TextEncoderConfig`] record it
//! extends, and helpers for loading and saving persisted JSON descriptors.
//! The records are plain data with defaults; the model math lives elsewhere.
//!
//! ## Module Structure
//!
//! - `activation` - Activation function names understood by the encoder
//! - `error` - Descriptor loading and saving errors
//! - `extra` - Open-ended extra parameters kept for forward compatibility
//! - `layoutlmv2` - The multimodal configuration record
//! - `pretrained` - Published descriptor locations for pretrained checkpoints
//! - `text` - The base text-encoder record
//!
//! ## Example
//!
//! ```
//! use layoutlmv2_config::LayoutLMv2Config;
//!
//! let config = LayoutLMv2Config::new()
//!     .with_hidden_size(1024)
//!     .with_num_hidden_layers(24);
//!
//! assert_eq!(config.text.hidden_size, 1024);
//! assert_eq!(config.text.vocab_size, 30522);
//! assert_eq!(config.image_feature_pool_shape, [7, 7, 256]);
//! ```

pub mod activation;
pub mod error;
pub mod extra;
pub mod layoutlmv2;
pub mod pretrained;
pub mod text;

pub use activation::HiddenAct;
pub use error::ConfigError;
pub use extra::ExtraParams;
pub use layoutlmv2::LayoutLMv2Config;
pub use pretrained::{pretrained_config_names, pretrained_config_url};
pub use text::TextEncoderConfig;
