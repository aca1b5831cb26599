// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::AssetClass;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [project]
/// title = "Homepage"
/// url = "https://example.com"
/// author = "Jane Doe"
/// version = "1.2.0"
/// license = "MIT"
///
/// [style]
/// browsers = ["last 4 versions"]
///
/// [alias]
/// default = ["styles", "scripts", "templates"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub style: StyleSection,

    #[serde(default)]
    pub script: ScriptSection,

    #[serde(default)]
    pub template: TemplateSection,

    #[serde(default)]
    pub image: ImageSection,

    #[serde(default)]
    pub serve: ServeSection,

    /// Composite tasks: alias name -> member task names, in run order.
    #[serde(default)]
    pub alias: BTreeMap<String, Vec<String>>,
}

/// Validated configuration.
///
/// Construct via `ConfigFile::try_from(RawConfigFile)` (see `validate.rs`),
/// which also fills in the built-in `default` alias when it is missing.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub paths: PathsSection,
    pub style: StyleSection,
    pub script: ScriptSection,
    pub template: TemplateSection,
    pub image: ImageSection,
    pub serve: ServeSection,
    alias: BTreeMap<String, Vec<String>>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        let mut alias = raw.alias;
        alias
            .entry(crate::cli::DEFAULT_TASK.to_string())
            .or_insert_with(|| {
                AssetClass::ALL
                    .iter()
                    .map(|c| c.task_name().to_string())
                    .collect()
            });

        Self {
            project: raw.project,
            paths: raw.paths,
            style: raw.style,
            script: raw.script,
            template: raw.template,
            image: raw.image,
            serve: raw.serve,
            alias,
        }
    }

    /// Composite tasks, always including `default`.
    pub fn aliases(&self) -> &BTreeMap<String, Vec<String>> {
        &self.alias
    }

    /// Source subdirectory and glob for a class.
    pub fn class_source(&self, class: AssetClass) -> (&str, &str) {
        match class {
            AssetClass::Style => (&self.style.dir, &self.style.pattern),
            AssetClass::Script => (&self.script.dir, &self.script.pattern),
            AssetClass::Template => (&self.template.dir, &self.template.pattern),
            AssetClass::Image => (&self.image.dir, &self.image.pattern),
        }
    }

    /// Resolve `[paths]` against the directory holding the config file.
    pub fn layout(&self, base: &Path) -> Layout {
        Layout {
            src: base.join(&self.paths.src),
            build: base.join(&self.paths.build),
            root: base.join(&self.paths.root),
        }
    }
}

/// Absolute (or base-relative) directories the pipeline reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub src: PathBuf,
    pub build: PathBuf,
    pub root: PathBuf,
}

impl Layout {
    /// Source directory of a class, e.g. `src/styles`.
    pub fn class_dir(&self, cfg: &ConfigFile, class: AssetClass) -> PathBuf {
        self.src.join(cfg.class_source(class).0)
    }

    /// Where a class writes its outputs.
    ///
    /// Templates are written to the project root, everything else to a
    /// per-class directory under the build tree.
    pub fn dest_dir(&self, class: AssetClass) -> PathBuf {
        match class {
            AssetClass::Style => self.build.join("styles"),
            AssetClass::Script => self.build.join("scripts"),
            AssetClass::Image => self.build.join("images"),
            AssetClass::Template => self.root.clone(),
        }
    }
}

/// `[project]` section: metadata rendered into the banner.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub license: String,
    /// Pin the copyright year for reproducible output.
    #[serde(default)]
    pub year: Option<i32>,
}

/// `[paths]` section, relative to the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_src")]
    pub src: PathBuf,
    #[serde(default = "default_build")]
    pub build: PathBuf,
    /// Where compiled templates land (and what the dev server serves).
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_src() -> PathBuf {
    PathBuf::from("src")
}

fn default_build() -> PathBuf {
    PathBuf::from("build")
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            src: default_src(),
            build: default_build(),
            root: default_root(),
        }
    }
}

/// `[style]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleSection {
    #[serde(default = "default_style_dir")]
    pub dir: String,
    #[serde(default = "default_style_pattern")]
    pub pattern: String,
    /// Browserslist queries used for vendor prefixing.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,
    #[serde(default = "default_true")]
    pub minify: bool,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// External compiler; reads the source on stdin and prints CSS on stdout.
    ///
    /// When unset, sources are compiled as SCSS in-process.
    #[serde(default)]
    pub compiler: Option<Vec<String>>,
}

fn default_style_dir() -> String {
    "styles".to_string()
}

fn default_style_pattern() -> String {
    "*.scss".to_string()
}

fn default_browsers() -> Vec<String> {
    vec!["last 4 versions".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_suffix() -> String {
    ".min".to_string()
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            dir: default_style_dir(),
            pattern: default_style_pattern(),
            browsers: default_browsers(),
            minify: true,
            suffix: default_suffix(),
            compiler: None,
        }
    }
}

/// `[script]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptSection {
    #[serde(default = "default_script_dir")]
    pub dir: String,
    #[serde(default = "default_script_pattern")]
    pub pattern: String,
    #[serde(default = "default_true")]
    pub lint: bool,
    #[serde(default = "default_true")]
    pub minify: bool,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_script_dir() -> String {
    "scripts".to_string()
}

fn default_script_pattern() -> String {
    "*.js".to_string()
}

impl Default for ScriptSection {
    fn default() -> Self {
        Self {
            dir: default_script_dir(),
            pattern: default_script_pattern(),
            lint: true,
            minify: true,
            suffix: default_suffix(),
        }
    }
}

/// `[template]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSection {
    #[serde(default = "default_template_dir")]
    pub dir: String,
    #[serde(default = "default_template_pattern")]
    pub pattern: String,
}

fn default_template_dir() -> String {
    "views".to_string()
}

fn default_template_pattern() -> String {
    "**/*.tera".to_string()
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            pattern: default_template_pattern(),
        }
    }
}

/// `[image]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSection {
    #[serde(default = "default_image_dir")]
    pub dir: String,
    #[serde(default = "default_image_pattern")]
    pub pattern: String,
}

fn default_image_dir() -> String {
    "images".to_string()
}

fn default_image_pattern() -> String {
    "**/*".to_string()
}

impl Default for ImageSection {
    fn default() -> Self {
        Self {
            dir: default_image_dir(),
            pattern: default_image_pattern(),
        }
    }
}

/// `[serve]` section: development server and live reload in `watch` mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_reload_port")]
    pub reload_port: u16,
}

fn default_port() -> u16 {
    3000
}

fn default_reload_port() -> u16 {
    35729
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_port(),
            reload_port: default_reload_port(),
        }
    }
}
