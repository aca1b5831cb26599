// src/config/validate.rs

use globset::Glob;
use lightningcss::targets::Browsers;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::cli::WATCH_TASK;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SitepipeError};
use crate::types::AssetClass;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SitepipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_patterns(cfg)?;
    validate_style(cfg)?;
    validate_serve(cfg)?;
    validate_alias_members(cfg)?;
    validate_alias_graph(cfg)?;
    Ok(())
}

fn validate_patterns(cfg: &RawConfigFile) -> Result<()> {
    let patterns = [
        ("style", &cfg.style.pattern),
        ("script", &cfg.script.pattern),
        ("template", &cfg.template.pattern),
        ("image", &cfg.image.pattern),
    ];

    for (section, pattern) in patterns {
        Glob::new(pattern).map_err(|e| {
            SitepipeError::ConfigError(format!(
                "[{section}].pattern '{pattern}' is not a valid glob: {e}"
            ))
        })?;
    }
    Ok(())
}

fn validate_style(cfg: &RawConfigFile) -> Result<()> {
    if let Some(compiler) = &cfg.style.compiler {
        if compiler.is_empty() || compiler[0].trim().is_empty() {
            return Err(SitepipeError::ConfigError(
                "[style].compiler must name a program when set".to_string(),
            ));
        }
    }

    Browsers::from_browserslist(cfg.style.browsers.iter().map(String::as_str)).map_err(|e| {
        SitepipeError::ConfigError(format!(
            "[style].browsers {:?} is not a valid browserslist query: {e}",
            cfg.style.browsers
        ))
    })?;

    Ok(())
}

fn validate_serve(cfg: &RawConfigFile) -> Result<()> {
    if cfg.serve.port == 0 || cfg.serve.reload_port == 0 {
        return Err(SitepipeError::ConfigError(
            "[serve].port and [serve].reload_port must be >= 1".to_string(),
        ));
    }
    if cfg.serve.port == cfg.serve.reload_port {
        return Err(SitepipeError::ConfigError(format!(
            "[serve].port and [serve].reload_port must differ (both {})",
            cfg.serve.port
        )));
    }
    Ok(())
}

fn is_builtin(name: &str) -> bool {
    AssetClass::from_task_name(name).is_some()
}

fn validate_alias_members(cfg: &RawConfigFile) -> Result<()> {
    for (name, members) in cfg.alias.iter() {
        if is_builtin(name) || name == WATCH_TASK {
            return Err(SitepipeError::ConfigError(format!(
                "alias '{}' shadows a built-in task",
                name
            )));
        }
        if members.is_empty() {
            return Err(SitepipeError::ConfigError(format!(
                "alias '{}' must list at least one task",
                name
            )));
        }
        for member in members.iter() {
            if member == name {
                return Err(SitepipeError::ConfigError(format!(
                    "alias '{}' cannot include itself",
                    name
                )));
            }
            if !is_builtin(member) && !cfg.alias.contains_key(member) {
                return Err(SitepipeError::ConfigError(format!(
                    "alias '{}' has unknown task '{}'",
                    name, member
                )));
            }
        }
    }
    Ok(())
}

fn validate_alias_graph(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: alias -> member.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for (name, members) in cfg.alias.iter() {
        graph.add_node(name.as_str());
        for member in members.iter() {
            graph.add_edge(name.as_str(), member.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(SitepipeError::TaskCycle(format!(
            "cycle detected in [alias] involving '{}'",
            cycle.node_id()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_alias(entries: &[(&str, &[&str])]) -> RawConfigFile {
        let mut raw = RawConfigFile::default();
        for (name, members) in entries {
            raw.alias.insert(
                name.to_string(),
                members.iter().map(|m| m.to_string()).collect(),
            );
        }
        raw
    }

    #[test]
    fn default_alias_is_filled_in() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(
            cfg.aliases()["default"],
            vec!["styles", "scripts", "templates", "images"]
        );
    }

    #[test]
    fn rejects_alias_cycle() {
        let raw = raw_with_alias(&[("a", &["b"]), ("b", &["a"])]);
        match ConfigFile::try_from(raw) {
            Err(SitepipeError::TaskCycle(msg)) => assert!(msg.contains("cycle detected")),
            other => panic!("expected TaskCycle, got {other:?}"),
        }
    }

    #[test]
    fn rejects_shadowing_builtin() {
        let raw = raw_with_alias(&[("styles", &["scripts"])]);
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(SitepipeError::ConfigError(_))
        ));

        let raw = raw_with_alias(&[("watch", &["scripts"])]);
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn rejects_same_ports() {
        let mut raw = RawConfigFile::default();
        raw.serve.reload_port = raw.serve.port;
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn rejects_bad_glob() {
        let mut raw = RawConfigFile::default();
        raw.image.pattern = "[".to_string();
        match ConfigFile::try_from(raw) {
            Err(SitepipeError::ConfigError(msg)) => assert!(msg.contains("[image].pattern")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_compiler() {
        let mut raw = RawConfigFile::default();
        raw.style.compiler = Some(vec![]);
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
