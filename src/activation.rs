//! Activation functions supported by the encoder feed-forward stack.

use serde::{Deserialize, Serialize};

/// Non-linear activation applied inside the encoder and pooler layers.
///
/// Serialized with the lowercase names persisted descriptors use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAct {
    /// Gaussian error linear unit, erf form.
    #[default]
    Gelu,
    /// Rectified linear unit.
    Relu,
    /// Sigmoid linear unit.
    Silu,
    /// Tanh approximation of the gaussian error linear unit.
    GeluNew,
}

impl HiddenAct {
    /// Returns the descriptor name of the activation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenAct::Gelu => "gelu",
            HiddenAct::Relu => "relu",
            HiddenAct::Silu => "silu",
            HiddenAct::GeluNew => "gelu_new",
        }
    }
}

impl std::fmt::Display for HiddenAct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
