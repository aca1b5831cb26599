// src/pipeline/common.rs

//! Transforms shared by several classes.

use std::path::PathBuf;

use super::{Asset, Banner, Transform, TransformContext, TransformError};

/// Rename the output: insert `suffix` before the extension and optionally
/// swap the extension, e.g. `main.scss` -> `main.min.css`.
#[derive(Debug, Clone)]
pub struct Rename {
    suffix: String,
    extension: Option<&'static str>,
}

impl Rename {
    pub fn new(suffix: impl Into<String>, extension: Option<&'static str>) -> Self {
        Self {
            suffix: suffix.into(),
            extension,
        }
    }

    pub fn renamed(&self, rel_path: &std::path::Path) -> PathBuf {
        let stem = rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = match self.extension {
            Some(ext) => Some(ext.to_string()),
            None => rel_path
                .extension()
                .map(|e| e.to_string_lossy().into_owned()),
        };

        let file_name = match ext {
            Some(ext) => format!("{stem}{}.{ext}", self.suffix),
            None => format!("{stem}{}", self.suffix),
        };
        rel_path.with_file_name(file_name)
    }
}

impl Transform for Rename {
    fn name(&self) -> &'static str {
        "rename"
    }

    fn apply(&self, asset: Asset, _ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        Ok(Asset {
            rel_path: self.renamed(&asset.rel_path),
            contents: asset.contents,
        })
    }
}

/// Prepend the project banner.
#[derive(Debug, Clone)]
pub struct Header {
    banner: Banner,
}

impl Header {
    pub fn new(banner: Banner) -> Self {
        Self { banner }
    }
}

impl Transform for Header {
    fn name(&self) -> &'static str {
        "header"
    }

    fn apply(&self, asset: Asset, _ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let banner = self.banner.as_str().as_bytes();
        let mut contents = Vec::with_capacity(banner.len() + asset.contents.len());
        contents.extend_from_slice(banner);
        contents.extend_from_slice(&asset.contents);
        Ok(Asset {
            rel_path: asset.rel_path,
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn rename_with_suffix_and_extension() {
        let r = Rename::new(".min", Some("css"));
        assert_eq!(r.renamed(Path::new("main.scss")), PathBuf::from("main.min.css"));
        assert_eq!(r.renamed(Path::new("a/b.scss")), PathBuf::from("a/b.min.css"));
    }

    #[test]
    fn rename_keeps_extension_when_unset() {
        let r = Rename::new(".min", None);
        assert_eq!(r.renamed(Path::new("scripts.js")), PathBuf::from("scripts.min.js"));

        let plain = Rename::new("", Some("html"));
        assert_eq!(plain.renamed(Path::new("blog/index.tera")), PathBuf::from("blog/index.html"));
    }
}
