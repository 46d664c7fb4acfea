use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use attn_census::{AnalysisConfig, ElementPair, load_config};

use crate::cli::{CommonOptions, CurveArgs};

/// Loads the settings file named by `--config`, or the built-in defaults.
pub fn load_settings(common: &CommonOptions) -> Result<AnalysisConfig> {
    match common.config.as_deref() {
        Some(path) => load_settings_file(path),
        None => Ok(load_config(None)?),
    }
}

fn load_settings_file(path: &Path) -> Result<AnalysisConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    load_config(Some(&text))
        .with_context(|| format!("Invalid settings file: {}", path.display()))
}

/// Applies `curve` command-line overrides on top of the loaded settings.
pub fn build_curve_config(args: &CurveArgs) -> Result<AnalysisConfig> {
    let mut config = load_settings(&args.common)?;

    if let Some(pair) = &args.pair {
        config.curve.pair = pair
            .parse::<ElementPair>()
            .with_context(|| format!("Invalid --pair '{}'", pair))?;
    }
    if let Some(window) = args.window {
        if window == 0 {
            bail!("--window must be at least 1");
        }
        config.curve.window = window;
    }
    if let Some(bins) = args.bins {
        if bins == 0 {
            bail!("--bins must be at least 1");
        }
        config.curve.bins = bins;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attn_census::Element;
    use std::path::PathBuf;

    fn curve_args(pair: Option<&str>, window: Option<usize>) -> CurveArgs {
        CurveArgs {
            input: PathBuf::from("snap.bin"),
            output: None,
            pair: pair.map(str::to_string),
            window,
            bins: None,
            common: CommonOptions {
                config: None,
                quiet: true,
            },
        }
    }

    #[test]
    fn defaults_without_overrides() {
        let config = build_curve_config(&curve_args(None, None)).unwrap();
        assert_eq!(config.curve.pair, ElementPair::new(Element::H, Element::C));
        assert_eq!(config.curve.window, 1000);
    }

    #[test]
    fn flags_override_settings() {
        let config = build_curve_config(&curve_args(Some("N-O"), Some(10))).unwrap();
        assert_eq!(config.curve.pair, ElementPair::new(Element::N, Element::O));
        assert_eq!(config.curve.window, 10);
    }

    #[test]
    fn rejects_bad_pair_and_zero_window() {
        assert!(build_curve_config(&curve_args(Some("H-Zn"), None)).is_err());
        assert!(build_curve_config(&curve_args(None, Some(0))).is_err());
    }

    #[test]
    fn reads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[curve]\nwindow = 7\n").unwrap();

        let mut args = curve_args(None, None);
        args.common.config = Some(path);
        assert_eq!(build_curve_config(&args).unwrap().curve.window, 7);
    }

    #[test]
    fn missing_settings_file_is_an_error() {
        let mut args = curve_args(None, None);
        args.common.config = Some(PathBuf::from("/nonexistent/settings.toml"));
        assert!(build_curve_config(&args).is_err());
    }
}
