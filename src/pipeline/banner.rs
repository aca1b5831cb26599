// src/pipeline/banner.rs

use chrono::Datelike;

use crate::config::ProjectSection;

/// The metadata comment prepended to compiled styles and scripts.
///
/// ```text
/// /*!
///  * Homepage
///  * https://example.com
///  * @author Jane Doe
///  * @version 1.2.0
///  * Copyright 2018. MIT licensed.
///  */
/// ```
///
/// The `/*!` opener marks the comment as one minifiers must keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
}

impl Banner {
    pub fn render(meta: &ProjectSection, year: i32) -> Self {
        let text = format!(
            "/*!\n * {title}\n * {url}\n * @author {author}\n * @version {version}\n * Copyright {year}. {license} licensed.\n */\n",
            title = meta.title,
            url = meta.url,
            author = meta.author,
            version = meta.version,
            license = meta.license,
        );
        Self { text }
    }

    /// Render with `meta.year`, or the current local year when unset.
    pub fn for_project(meta: &ProjectSection) -> Self {
        let year = meta.year.unwrap_or_else(|| chrono::Local::now().year());
        Self::render(meta, year)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
