//! HFB CLI Library
//!
//! Rule profile resolution and scenario replay behind the `hfb` binary.

use anyhow::{Context, Result};
use std::path::Path;

use hfb_core::{RefereeConfig, Scenario, ScenarioReport};

/// Output format for rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RulesFormat {
    #[default]
    Json,
    Yaml,
}

/// Rules from a file, a named preset, or `HFB_RULES_PROFILE`, in that order.
pub fn resolve_rules(profile: Option<&str>, file: Option<&Path>) -> Result<RefereeConfig> {
    if let Some(path) = file {
        return RefereeConfig::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display()));
    }

    match profile {
        Some(name) => RefereeConfig::preset(name)
            .with_context(|| format!("unknown rules profile '{}'", name)),
        None => Ok(RefereeConfig::from_env_or_default()),
    }
}

pub fn render_rules(config: &RefereeConfig, format: RulesFormat) -> Result<String> {
    let text = match format {
        RulesFormat::Json => serde_json::to_string_pretty(config)?,
        RulesFormat::Yaml => serde_yaml::to_string(config)?,
    };
    Ok(text)
}

/// Loads and validates a rules file.
pub fn validate_rules(path: &Path) -> Result<RefereeConfig> {
    let config = RefereeConfig::load(path)
        .with_context(|| format!("invalid rules file {}", path.display()))?;
    tracing::info!("rules file {} is valid", path.display());
    Ok(config)
}

/// Replays a scenario file. `rules` replaces the scenario's own rules.
pub fn run_scenario(path: &Path, rules: Option<&Path>) -> Result<ScenarioReport> {
    let mut scenario = Scenario::load(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;

    if let Some(rules_path) = rules {
        scenario.rules = Some(resolve_rules(None, Some(rules_path))?);
    }

    let report = scenario
        .run()
        .with_context(|| format!("scenario '{}' failed", scenario.name))?;

    tracing::info!(
        scenario = %report.name,
        rulings = report.rulings.len(),
        red = report.state.score.red,
        blue = report.state.score.blue,
        "scenario finished"
    );
    Ok(report)
}

pub fn render_report(report: &ScenarioReport, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(text)
}
