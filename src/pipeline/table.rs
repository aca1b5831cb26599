// src/pipeline/table.rs

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use globset::GlobMatcher;

use crate::config::{ConfigFile, Layout};
use crate::types::{AssetClass, ReloadKind};

use super::common::{Header, Rename};
use super::script::{LintScript, MinifyScript};
use super::sources::compile_class_glob;
use super::style::{CompileStyle, ProcessCss};
use super::template::RenderTemplate;
use super::{Banner, Transform};

/// Everything needed to compile one asset class.
pub struct ClassPipeline {
    pub class: AssetClass,
    pub source_dir: PathBuf,
    pub pattern: String,
    pub matcher: GlobMatcher,
    pub dest_dir: PathBuf,
    pub transforms: Vec<Box<dyn Transform>>,
    pub reload: ReloadKind,
}

impl fmt::Debug for ClassPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain: Vec<&str> = self.transforms.iter().map(|t| t.name()).collect();
        f.debug_struct("ClassPipeline")
            .field("class", &self.class)
            .field("source_dir", &self.source_dir)
            .field("pattern", &self.pattern)
            .field("dest_dir", &self.dest_dir)
            .field("chain", &chain)
            .field("reload", &self.reload)
            .finish()
    }
}

impl ClassPipeline {
    /// Names of the transforms, in order.
    pub fn chain_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

/// Build the class table from config, one entry per [`AssetClass`].
///
/// | class    | chain                                              | dest             |
/// |----------|----------------------------------------------------|------------------|
/// | style    | compile, prefix/minify, rename, header             | `build/styles`   |
/// | script   | lint?, minify?, header, rename                     | `build/scripts`  |
/// | template | render, rename to `.html`                          | project root     |
/// | image    | (none, bytes copied)                               | `build/images`   |
pub fn build_class_table(
    cfg: &ConfigFile,
    layout: &Layout,
    banner: &Banner,
) -> Result<Vec<ClassPipeline>> {
    let mut table = Vec::with_capacity(AssetClass::ALL.len());

    for class in AssetClass::ALL {
        let (_, pattern) = cfg.class_source(class);
        let matcher = compile_class_glob(pattern)
            .with_context(|| format!("building source glob for {class}"))?;

        let transforms: Vec<Box<dyn Transform>> = match class {
            AssetClass::Style => vec![
                Box::new(CompileStyle::new(cfg.style.compiler.clone())),
                Box::new(ProcessCss::new(&cfg.style.browsers, cfg.style.minify)?),
                Box::new(Rename::new(cfg.style.suffix.clone(), Some("css"))),
                Box::new(Header::new(banner.clone())),
            ],
            AssetClass::Script => {
                let mut chain: Vec<Box<dyn Transform>> = Vec::new();
                if cfg.script.lint {
                    chain.push(Box::new(LintScript));
                }
                if cfg.script.minify {
                    chain.push(Box::new(MinifyScript));
                }
                // After minification, which drops comments.
                chain.push(Box::new(Header::new(banner.clone())));
                chain.push(Box::new(Rename::new(cfg.script.suffix.clone(), None)));
                chain
            }
            AssetClass::Template => vec![
                Box::new(RenderTemplate),
                Box::new(Rename::new("", Some("html"))),
            ],
            AssetClass::Image => Vec::new(),
        };

        table.push(ClassPipeline {
            class,
            source_dir: layout.class_dir(cfg, class),
            pattern: pattern.to_string(),
            matcher,
            dest_dir: layout.dest_dir(class),
            transforms,
            reload: class.reload_kind(),
        });
    }

    Ok(table)
}
