// src/pipeline/template.rs

use std::error::Error as _;

use tera::{Context, Tera};

use super::{Asset, Transform, TransformContext, TransformError};

/// Render a template to HTML with an empty context.
///
/// Every file of the class (partials included) is registered under its
/// class-relative path, so templates can `{% include "_head.tera" %}` or
/// `{% extends "_layouts/base.tera" %}`.
#[derive(Debug, Clone, Default)]
pub struct RenderTemplate;

impl Transform for RenderTemplate {
    fn name(&self) -> &'static str {
        "render-template"
    }

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let render_err = |message: String| TransformError::Render {
            path: ctx.source.to_path_buf(),
            message,
        };

        let name = super::sources::rel_to_str(ctx.source_rel);

        let mut templates = Vec::with_capacity(ctx.includes.len() + 1);
        for include in ctx.includes {
            if include.rel_path == ctx.source_rel {
                continue;
            }
            let body = String::from_utf8(include.contents.clone()).map_err(|_| {
                TransformError::Encoding {
                    path: include.path.clone(),
                }
            })?;
            templates.push((include.rel_str(), body));
        }
        templates.push((name.clone(), asset.text(ctx.source)?.to_string()));

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| render_err(error_chain(&e)))?;

        let html = tera
            .render(&name, &Context::new())
            .map_err(|e| render_err(error_chain(&e)))?;

        Ok(Asset {
            rel_path: asset.rel_path,
            contents: html.into_bytes(),
        })
    }
}

/// Tera nests the useful message in `source()`; flatten the chain.
fn error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
