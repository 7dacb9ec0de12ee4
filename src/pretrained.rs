//! Published descriptor locations for pretrained checkpoints.
//!
//! The URLs are plain constants consumed by external loading code as default
//! fetch locations. This crate performs no network access itself.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static PRETRAINED_CONFIG_URLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "layoutlmv2-base-uncased",
            "https://huggingface.co/microsoft/layoutlmv2-base-uncased/resolve/main/config.json",
        ),
        (
            "layoutlmv2-large-uncased",
            "https://huggingface.co/microsoft/layoutlmv2-large-uncased/resolve/main/config.json",
        ),
    ])
});

/// Returns the descriptor URL for a published checkpoint name, if known.
pub fn pretrained_config_url(name: &str) -> Option<&'static str> {
    PRETRAINED_CONFIG_URLS.get(name).copied()
}

/// Iterates over the published checkpoint names.
pub fn pretrained_config_names() -> impl Iterator<Item = &'static str> {
    PRETRAINED_CONFIG_URLS.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_names_resolve() {
        assert!(
            pretrained_config_url("layoutlmv2-base-uncased")
                .is_some_and(|url| url.ends_with("config.json"))
        );
        assert!(pretrained_config_url("layoutlmv2-large-uncased").is_some());
        assert_eq!(pretrained_config_url("layoutlmv3-base"), None);
    }

    #[test]
    fn name_listing_covers_both_checkpoints() {
        let mut names: Vec<&str> = pretrained_config_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["layoutlmv2-base-uncased", "layoutlmv2-large-uncased"]
        );
    }
}
