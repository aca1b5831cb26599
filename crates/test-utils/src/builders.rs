#![allow(dead_code)]

use sitepipe::config::{ConfigFile, ProjectSection, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the same defaults an empty `Sitepipe.toml` gets, with the
/// copyright year pinned so outputs are reproducible.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.project.year = Some(2024);
        Self { config }
    }

    pub fn project(mut self, project: ProjectSection) -> Self {
        self.config.project = project;
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.config.project.year = Some(year);
        self
    }

    pub fn alias(mut self, name: &str, members: &[&str]) -> Self {
        self.config.alias.insert(
            name.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    pub fn style_compiler(mut self, argv: &[&str]) -> Self {
        self.config.style.compiler = Some(argv.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn style_pattern(mut self, pattern: &str) -> Self {
        self.config.style.pattern = pattern.to_string();
        self
    }

    pub fn browsers(mut self, queries: &[&str]) -> Self {
        self.config.style.browsers = queries.iter().map(|q| q.to_string()).collect();
        self
    }

    pub fn script_minify(mut self, val: bool) -> Self {
        self.config.script.minify = val;
        self
    }

    pub fn script_lint(mut self, val: bool) -> Self {
        self.config.script.lint = val;
        self
    }

    pub fn serve_ports(mut self, port: u16, reload_port: u16) -> Self {
        self.config.serve.port = port;
        self.config.serve.reload_port = reload_port;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Project metadata used across tests.
pub fn homepage_project() -> ProjectSection {
    ProjectSection {
        title: "Jane's Homepage".to_string(),
        url: "https://jane.example".to_string(),
        author: "Jane Doe".to_string(),
        version: "1.4.0".to_string(),
        license: "MIT".to_string(),
        year: Some(2024),
    }
}
