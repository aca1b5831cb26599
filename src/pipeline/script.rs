// src/pipeline/script.rs

//! Script transforms built on `oxc`: lint (advisory) and minify.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use tracing::warn;

use super::{Asset, Transform, TransformContext, TransformError};

/// Page scripts are classic `<script>` files: their top-level bindings are
/// globals other scripts and inline handlers may use.
const PAGE_SCRIPT: SourceType = SourceType::script();

/// Parse diagnostics for `source`, one message per problem.
pub fn lint_diagnostics(source: &str) -> Vec<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, PAGE_SCRIPT).parse();
    ret.errors.iter().map(|e| e.to_string()).collect()
}

/// Minify JavaScript, or report the first syntax error.
///
/// Top-level names are neither renamed nor dropped.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, PAGE_SCRIPT).parse();
    if let Some(first) = ret.errors.first() {
        return Err(first.to_string());
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(false),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Report parse problems as warnings. Never fails the file.
#[derive(Debug, Clone, Default)]
pub struct LintScript;

impl Transform for LintScript {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let Ok(source) = std::str::from_utf8(&asset.contents) else {
            warn!(file = %ctx.source.display(), "lint: not valid UTF-8");
            return Ok(asset);
        };

        for message in lint_diagnostics(source) {
            warn!(file = %ctx.source.display(), "lint: {message}");
        }
        Ok(asset)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MinifyScript;

impl MinifyScript {
    fn minify(&self, source: &str, path: &Path) -> Result<String, TransformError> {
        minify_js(source).map_err(|message| TransformError::Syntax {
            path: path.to_path_buf(),
            message,
        })
    }
}

impl Transform for MinifyScript {
    fn name(&self) -> &'static str {
        "minify-script"
    }

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let code = self.minify(asset.text(ctx.source)?, ctx.source)?;
        Ok(Asset {
            rel_path: asset.rel_path,
            contents: code.into_bytes(),
        })
    }
}
