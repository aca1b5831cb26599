// src/pipeline/style.rs

//! Stylesheet transforms: SCSS compilation (`grass` in-process, or an
//! external compiler), then `lightningcss` for vendor prefixing and
//! minification.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use tracing::debug;

use super::{Asset, SourceFile, Transform, TransformContext, TransformError};

/// Compile SCSS to CSS.
///
/// Without a configured command the source is compiled in-process by
/// `grass`; `@import`s resolve against the class's sources first, then the
/// disk. A configured command reads the source on stdin and writes CSS to
/// stdout, running in the class directory.
#[derive(Debug, Clone, Default)]
pub struct CompileStyle {
    command: Option<Vec<String>>,
}

/// Import resolution for `grass`: the file being compiled and the other
/// sources of its class, falling back to the real filesystem.
#[derive(Debug)]
struct ClassImports<'a> {
    current: &'a Path,
    current_contents: &'a [u8],
    sources: &'a [SourceFile],
}

impl ClassImports<'_> {
    fn lookup(&self, path: &Path) -> Option<&[u8]> {
        if path == self.current {
            return Some(self.current_contents);
        }
        self.sources
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.contents.as_slice())
    }
}

impl grass::Fs for ClassImports<'_> {
    fn is_dir(&self, path: &Path) -> bool {
        self.sources.iter().any(|s| s.path.starts_with(path) && s.path != path) || path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lookup(path).is_some() || path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.lookup(path) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => std::fs::read(path),
        }
    }
}

/// Compile `scss` as if it were stored at `source`.
pub fn compile_scss(
    scss: &[u8],
    source: &Path,
    sources: &[SourceFile],
) -> Result<Vec<u8>, TransformError> {
    let imports = ClassImports {
        current: source,
        current_contents: scss,
        sources,
    };
    let options = grass::Options::default()
        .fs(&imports)
        .style(grass::OutputStyle::Expanded);

    grass::from_path(source, &options)
        .map(String::into_bytes)
        .map_err(|e| TransformError::Compile {
            path: source.to_path_buf(),
            message: e.to_string(),
        })
}

impl CompileStyle {
    pub fn new(command: Option<Vec<String>>) -> Self {
        Self { command }
    }

    fn run_command(
        &self,
        argv: &[String],
        input: Vec<u8>,
        class_dir: &Path,
        source: &Path,
    ) -> Result<Vec<u8>, TransformError> {
        let program = &argv[0];
        let resolved = which::which(program).map_err(|e| TransformError::Command {
            program: program.clone(),
            message: format!("not found on PATH: {e}"),
        })?;

        debug!(program = %resolved.display(), file = %source.display(), "running style compiler");

        let mut child = Command::new(&resolved)
            .args(&argv[1..])
            .current_dir(class_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TransformError::Command {
                program: program.clone(),
                message: e.to_string(),
            })?;

        // Feed stdin from a separate thread so a large output cannot
        // deadlock against a full input pipe.
        let stdin = child.stdin.take();
        let writer = std::thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                let _ = stdin.write_all(&input);
            }
        });

        let output = child.wait_with_output().map_err(|e| TransformError::Command {
            program: program.clone(),
            message: e.to_string(),
        })?;
        let _ = writer.join();

        if !output.status.success() {
            return Err(TransformError::Compile {
                path: source.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

impl Transform for CompileStyle {
    fn name(&self) -> &'static str {
        "compile-style"
    }

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let contents = match &self.command {
            None => compile_scss(&asset.contents, ctx.source, ctx.includes)?,
            Some(argv) => self.run_command(argv, asset.contents, ctx.class_dir, ctx.source)?,
        };
        Ok(Asset {
            rel_path: asset.rel_path,
            contents,
        })
    }
}

/// Parse the CSS, add vendor prefixes for `browsers`, optionally minify.
#[derive(Debug, Clone, Default)]
pub struct ProcessCss {
    browsers: Option<Browsers>,
    minify: bool,
}

impl ProcessCss {
    /// `queries` are browserslist queries such as `"last 4 versions"`.
    pub fn new(queries: &[String], minify: bool) -> anyhow::Result<Self> {
        let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
            .map_err(|e| anyhow::anyhow!("invalid browserslist query {queries:?}: {e}"))?;
        Ok(Self { browsers, minify })
    }

    pub fn process(&self, css: &str, filename: &Path) -> Result<String, TransformError> {
        let targets = Targets {
            browsers: self.browsers,
            ..Targets::default()
        };

        let compile_err = |message: String| TransformError::Compile {
            path: filename.to_path_buf(),
            message,
        };

        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: filename.display().to_string(),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| compile_err(e.to_string()))?;

        stylesheet
            .minify(MinifyOptions {
                targets,
                ..MinifyOptions::default()
            })
            .map_err(|e| compile_err(e.to_string()))?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| compile_err(e.to_string()))?;

        Ok(result.code)
    }
}

impl Transform for ProcessCss {
    fn name(&self) -> &'static str {
        "process-css"
    }

    fn apply(&self, asset: Asset, ctx: &TransformContext<'_>) -> Result<Asset, TransformError> {
        let css = self.process(asset.text(ctx.source)?, ctx.source)?;
        Ok(Asset {
            rel_path: asset.rel_path,
            contents: css.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn last_versions() -> Vec<String> {
        vec!["last 4 versions".to_string()]
    }

    #[test]
    fn minifies_rules() {
        let css = ProcessCss::new(&last_versions(), true).unwrap();
        let out = css
            .process(".a {\n  color: red;\n}\n", Path::new("a.scss"))
            .unwrap();
        assert_eq!(out, ".a{color:red}");
    }

    #[test]
    fn empty_sheet_stays_empty() {
        let css = ProcessCss::new(&last_versions(), true).unwrap();
        assert_eq!(css.process("", Path::new("empty.scss")).unwrap(), "");
    }

    #[test]
    fn adds_vendor_prefixes_for_old_browsers() {
        let css = ProcessCss::new(&["safari 5".to_string()], true).unwrap();
        let out = css
            .process(".a { user-select: none; }", Path::new("a.scss"))
            .unwrap();
        assert!(out.contains("-webkit-user-select:none"), "got {out}");
    }

    #[test]
    fn parse_error_is_compile_error() {
        let css = ProcessCss::new(&last_versions(), true).unwrap();
        let err = css
            .process("..a { color: red }", Path::new("broken.scss"))
            .unwrap_err();
        assert!(matches!(err, TransformError::Compile { .. }));
        assert!(err.to_string().starts_with("broken.scss: "));
    }

    fn source(dir: &str, rel: &str, body: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(dir).join(rel),
            rel_path: PathBuf::from(rel),
            contents: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn scss_compiles_in_process() {
        let dir = "sitepipe-virtual/styles";
        let main = source(
            dir,
            "main.scss",
            "@import \"variables\";\n// note\n.a { color: $accent; .b { color: blue } }\n",
        );
        let sources = vec![source(dir, "_variables.scss", "$accent: red;\n"), main.clone()];
        let ctx = TransformContext {
            source: &main.path,
            source_rel: &main.rel_path,
            class_dir: Path::new(dir),
            includes: &sources,
        };

        let compiled = CompileStyle::new(None)
            .apply(Asset::new("main.scss", main.contents.clone()), &ctx)
            .unwrap();
        let css = String::from_utf8(compiled.contents).unwrap();
        let out = ProcessCss::new(&last_versions(), true)
            .unwrap()
            .process(&css, &main.path)
            .unwrap();
        assert!(out.starts_with(".a{color:red}"), "got {out}");
        assert!(out.contains(".a .b{color:"), "got {out}");
        assert!(!out.contains('$'), "got {out}");
    }

    #[test]
    fn missing_import_is_compile_error() {
        let main = source("sitepipe-virtual/styles", "main.scss", "@import \"nowhere\";");
        let err = compile_scss(&main.contents, &main.path, &[]).unwrap_err();
        assert!(matches!(err, TransformError::Compile { .. }), "got {err}");
    }

    #[test]
    fn plain_css_compiles_unchanged_in_meaning() {
        let main = source("sitepipe-virtual/styles", "main.scss", "a { color: red; }");
        let css = compile_scss(&main.contents, &main.path, &[]).unwrap();
        let out = ProcessCss::new(&last_versions(), true)
            .unwrap()
            .process(std::str::from_utf8(&css).unwrap(), &main.path)
            .unwrap();
        assert_eq!(out, "a{color:red}");
    }

    #[test]
    fn missing_compiler_is_command_error() {
        let compile = CompileStyle::new(Some(vec!["sitepipe-no-such-compiler".to_string()]));
        let ctx = TransformContext {
            source: Path::new("src/styles/a.scss"),
            source_rel: Path::new("a.scss"),
            class_dir: Path::new("."),
            includes: &[],
        };
        let err = compile.apply(Asset::new("a.scss", "a{}"), &ctx).unwrap_err();
        assert!(matches!(err, TransformError::Command { .. }));
    }
}
