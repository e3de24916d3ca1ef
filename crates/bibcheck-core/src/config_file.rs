use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::checker::{CheckConfig, EntryOrder};
use crate::rules::{Convention, RuleToggles};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub check: Option<CheckSection>,
    pub rules: Option<RulesSection>,
    pub report: Option<ReportSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSection {
    pub convention: Option<Convention>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSection {
    pub required_fields: Option<bool>,
    pub suspicious_proceedings: Option<bool>,
    pub abbreviated_journal: Option<bool>,
    pub booktitle_format: Option<bool>,
    pub title_capitalization: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    pub output: Option<String>,
    pub literature_dir: Option<String>,
    pub escape_links: Option<bool>,
    pub sort_by_id: Option<bool>,
}

impl ConfigFile {
    /// Check settings with defaults filled in.
    pub fn check_config(&self) -> CheckConfig {
        let defaults = RuleToggles::default();
        let rules = self.rules.clone().unwrap_or_default();
        let sort = self
            .report
            .as_ref()
            .and_then(|r| r.sort_by_id)
            .unwrap_or(false);

        CheckConfig {
            convention: self
                .check
                .as_ref()
                .and_then(|c| c.convention)
                .unwrap_or_default(),
            rules: RuleToggles {
                required_fields: rules.required_fields.unwrap_or(defaults.required_fields),
                suspicious_proceedings: rules
                    .suspicious_proceedings
                    .unwrap_or(defaults.suspicious_proceedings),
                abbreviated_journal: rules
                    .abbreviated_journal
                    .unwrap_or(defaults.abbreviated_journal),
                booktitle_format: rules.booktitle_format.unwrap_or(defaults.booktitle_format),
                title_capitalization: rules
                    .title_capitalization
                    .unwrap_or(defaults.title_capitalization),
            },
            order: if sort {
                EntryOrder::ById
            } else {
                EntryOrder::Encounter
            },
        }
    }
}

/// Platform config directory path: `<config_dir>/bibcheck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bibcheck").join("config.toml"))
}

/// Load config by cascading CWD `.bibcheck.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".bibcheck.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        check: Some(CheckSection {
            convention: overlay
                .check
                .as_ref()
                .and_then(|c| c.convention)
                .or_else(|| base.check.as_ref().and_then(|c| c.convention)),
        }),
        rules: Some(RulesSection {
            required_fields: overlay
                .rules
                .as_ref()
                .and_then(|r| r.required_fields)
                .or_else(|| base.rules.as_ref().and_then(|r| r.required_fields)),
            suspicious_proceedings: overlay
                .rules
                .as_ref()
                .and_then(|r| r.suspicious_proceedings)
                .or_else(|| base.rules.as_ref().and_then(|r| r.suspicious_proceedings)),
            abbreviated_journal: overlay
                .rules
                .as_ref()
                .and_then(|r| r.abbreviated_journal)
                .or_else(|| base.rules.as_ref().and_then(|r| r.abbreviated_journal)),
            booktitle_format: overlay
                .rules
                .as_ref()
                .and_then(|r| r.booktitle_format)
                .or_else(|| base.rules.as_ref().and_then(|r| r.booktitle_format)),
            title_capitalization: overlay
                .rules
                .as_ref()
                .and_then(|r| r.title_capitalization)
                .or_else(|| base.rules.as_ref().and_then(|r| r.title_capitalization)),
        }),
        report: Some(ReportSection {
            output: overlay
                .report
                .as_ref()
                .and_then(|r| r.output.clone())
                .or_else(|| base.report.as_ref().and_then(|r| r.output.clone())),
            literature_dir: overlay
                .report
                .as_ref()
                .and_then(|r| r.literature_dir.clone())
                .or_else(|| {
                    base.report
                        .as_ref()
                        .and_then(|r| r.literature_dir.clone())
                }),
            escape_links: overlay
                .report
                .as_ref()
                .and_then(|r| r.escape_links)
                .or_else(|| base.report.as_ref().and_then(|r| r.escape_links)),
            sort_by_id: overlay
                .report
                .as_ref()
                .and_then(|r| r.sort_by_id)
                .or_else(|| base.report.as_ref().and_then(|r| r.sort_by_id)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_round_trip_toml() {
        let config = ConfigFile {
            check: Some(CheckSection {
                convention: Some(Convention::BibLaTeX),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("biblatex"));
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.check.unwrap().convention.unwrap(),
            Convention::BibLaTeX
        );
    }

    #[test]
    fn absent_sections_fall_back_to_defaults() {
        let parsed: ConfigFile = toml::from_str("[rules]\ntitle_capitalization = true\n").unwrap();
        let check = parsed.check_config();
        assert_eq!(check.convention, Convention::BibTeX);
        assert!(check.rules.title_capitalization);
        assert!(check.rules.required_fields);
        assert!(!check.rules.booktitle_format);
        assert_eq!(check.order, EntryOrder::Encounter);
    }

    #[test]
    fn sort_by_id_selects_order() {
        let parsed: ConfigFile = toml::from_str("[report]\nsort_by_id = true\n").unwrap();
        assert_eq!(parsed.check_config().order, EntryOrder::ById);
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            report: Some(ReportSection {
                output: Some("base.html".to_string()),
                escape_links: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            report: Some(ReportSection {
                output: Some("overlay.html".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let report = merged.report.unwrap();
        assert_eq!(report.output.unwrap(), "overlay.html");
        assert_eq!(report.escape_links, Some(true));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            rules: Some(RulesSection {
                abbreviated_journal: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(merged.rules.unwrap().abbreviated_journal, Some(false));
    }

    #[test]
    fn load_from_missing_path_is_none() {
        assert!(load_from_path(Path::new("/nonexistent/bibcheck.toml")).is_none());
    }
}
