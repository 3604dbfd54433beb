use anyhow::{Context, Result};
use hoverpad_core::{Anchor, PadConfig};
use std::path::Path;

/// Load the pad configuration: TOML file (if given), then `HOVERPAD_*`
/// environment overrides.
pub fn load(path: Option<&Path>) -> Result<PadConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PadConfig::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Apply `HOVERPAD_*` overrides read through `lookup`.
///
/// Unparseable numbers are ignored like unset variables; an unknown
/// anchor is an error.
pub fn apply_env(config: &mut PadConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = env_parse(&lookup, "HOVERPAD_DEVICE") {
        config.device_id = v;
    }
    if let Some(v) = env_parse(&lookup, "HOVERPAD_WIDTH") {
        config.size.width = v;
    }
    if let Some(v) = env_parse(&lookup, "HOVERPAD_HEIGHT") {
        config.size.height = v;
    }
    if let Some(v) = env_parse(&lookup, "HOVERPAD_RATIO") {
        config.ratio = v;
    }
    if let Some(v) = env_parse(&lookup, "HOVERPAD_MAX_FPS") {
        config.max_fps = Some(v);
    }
    if let Some(v) = lookup("HOVERPAD_VERBOSE") {
        config.verbose = v != "0";
    }
    if let Some(v) = lookup("HOVERPAD_ANCHOR") {
        config.anchor = v
            .parse::<Anchor>()
            .context("HOVERPAD_ANCHOR")?;
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoverpad_core::Size;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PadConfig::default();
        apply_env(
            &mut config,
            env(&[
                ("HOVERPAD_DEVICE", "2"),
                ("HOVERPAD_WIDTH", "640"),
                ("HOVERPAD_HEIGHT", "480"),
                ("HOVERPAD_ANCHOR", "br"),
                ("HOVERPAD_VERBOSE", "1"),
                ("HOVERPAD_MAX_FPS", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(config.device_id, 2);
        assert_eq!(config.size, Size::new(640, 480));
        assert_eq!(config.anchor, Anchor::BottomRight);
        assert!(config.verbose);
        assert_eq!(config.max_fps, Some(30));
    }

    #[test]
    fn test_bad_number_is_ignored() {
        let mut config = PadConfig::default();
        apply_env(&mut config, env(&[("HOVERPAD_WIDTH", "wide")])).unwrap();
        assert_eq!(config.size, Size::default());
    }

    #[test]
    fn test_bad_anchor_is_error() {
        let mut config = PadConfig::default();
        let err = apply_env(&mut config, env(&[("HOVERPAD_ANCHOR", "center")])).unwrap_err();
        assert!(format!("{err:#}").contains("invalid anchor"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config.ratio, PadConfig::default().ratio);
    }
}
