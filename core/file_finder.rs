use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ignore::overrides::OverrideBuilder;
use ignore::{DirEntry, WalkBuilder};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    about = "Comment remover (main arguments)",
    long_about = "These are the main arguments for comment removal."
)]
pub struct DecommentArgs {
    #[clap(help = "Path to the file or directory to process", default_value = ".")]
    pub path: PathBuf,

    #[clap(
        long = "single-line",
        help = "Remove single-line comments only (no-op for languages without them)",
        group = "granularity"
    )]
    pub single_line: bool,

    #[clap(
        long = "multi-line",
        help = "Remove block comments only",
        group = "granularity"
    )]
    pub multi_line: bool,

    #[clap( long, value_name = "LANG", help = "Restrict to specific language ids [multiple allowed]", action = clap::ArgAction::Append )]
    pub lang: Vec<String>,
    #[clap( long, value_name = "PATTERN", help = "Glob pattern for files to include [multiple allowed]", action = clap::ArgAction::Append )]
    pub include: Vec<String>,
    #[clap( long, value_name = "PATTERN", help = "Glob pattern for files/directories to exclude [multiple allowed]", action = clap::ArgAction::Append )]
    pub exclude: Vec<String>,
    #[clap(long, help = "Skip the confirmation prompt")]
    pub no_confirm: bool,
    #[clap(
        long,
        help = "Only report files that would change; exit 1 if any would"
    )]
    pub check: bool,
    #[clap(
        long,
        value_name = "LANG",
        help = "Read from stdin, write the result to stdout, treating input as LANG"
    )]
    pub stdin: Option<String>,
    #[clap(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

impl Default for DecommentArgs {
    fn default() -> Self {
        DecommentArgs {
            path: PathBuf::from("."),
            single_line: false,
            multi_line: false,
            lang: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            no_confirm: false,
            check: false,
            stdin: None,
            verbose: 0,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
    #[clap(about = "List the language ids with a dedicated strategy")]
    Languages,
    #[clap(about = "Show which removal capabilities a language id has")]
    Info(InfoArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser, Clone)]
pub struct InfoArgs {
    #[clap(value_name = "LANG")]
    pub lang: String,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "decomment",
    version = "0.1.0",
    about = "Strip comments from source files",
    long_about = "Removes comments from source files, choosing a strategy per language.\nStrings, template literals and docstring assignments are left intact.",
    propagate_version = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub main_opts: DecommentArgs,
}

const JAVASCRIPT_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];
const JAVASCRIPTREACT_EXTENSIONS: &[&str] = &["jsx"];
const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "mts", "cts"];
const TYPESCRIPTREACT_EXTENSIONS: &[&str] = &["tsx"];
const JAVA_EXTENSIONS: &[&str] = &["java"];
const C_EXTENSIONS: &[&str] = &["c", "h"];
const CPP_EXTENSIONS: &[&str] = &["cpp", "cxx", "cc", "hpp", "hh"];
const CSHARP_EXTENSIONS: &[&str] = &["cs"];
const PHP_EXTENSIONS: &[&str] = &["php"];
const GO_EXTENSIONS: &[&str] = &["go"];
const RUST_EXTENSIONS: &[&str] = &["rs"];
const SWIFT_EXTENSIONS: &[&str] = &["swift"];
const KOTLIN_EXTENSIONS: &[&str] = &["kt", "kts"];
const SCALA_EXTENSIONS: &[&str] = &["scala", "sc"];
const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
const XML_EXTENSIONS: &[&str] = &["xml", "svg"];
const XHTML_EXTENSIONS: &[&str] = &["xhtml"];
const CSS_EXTENSIONS: &[&str] = &["css"];
const SCSS_EXTENSIONS: &[&str] = &["scss"];
const SASS_EXTENSIONS: &[&str] = &["sass"];
const LESS_EXTENSIONS: &[&str] = &["less"];

fn build_language_extension_map() -> HashMap<&'static str, &'static [&'static str]> {
    let mut m = HashMap::new();
    m.insert("javascript", JAVASCRIPT_EXTENSIONS);
    m.insert("javascriptreact", JAVASCRIPTREACT_EXTENSIONS);
    m.insert("typescript", TYPESCRIPT_EXTENSIONS);
    m.insert("typescriptreact", TYPESCRIPTREACT_EXTENSIONS);
    m.insert("java", JAVA_EXTENSIONS);
    m.insert("c", C_EXTENSIONS);
    m.insert("cpp", CPP_EXTENSIONS);
    m.insert("csharp", CSHARP_EXTENSIONS);
    m.insert("php", PHP_EXTENSIONS);
    m.insert("go", GO_EXTENSIONS);
    m.insert("rust", RUST_EXTENSIONS);
    m.insert("swift", SWIFT_EXTENSIONS);
    m.insert("kotlin", KOTLIN_EXTENSIONS);
    m.insert("scala", SCALA_EXTENSIONS);
    m.insert("python", PYTHON_EXTENSIONS);
    m.insert("html", HTML_EXTENSIONS);
    m.insert("xml", XML_EXTENSIONS);
    m.insert("xhtml", XHTML_EXTENSIONS);
    m.insert("css", CSS_EXTENSIONS);
    m.insert("scss", SCSS_EXTENSIONS);
    m.insert("sass", SASS_EXTENSIONS);
    m.insert("less", LESS_EXTENSIONS);
    m
}

/// Language id for a file, by extension (case-insensitive).
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    build_language_extension_map()
        .into_iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(lang, _)| lang)
}

pub fn find_files(args: &DecommentArgs) -> Result<Vec<PathBuf>> {
    let r = &args.path;
    if !r.exists() {
        anyhow::bail!("Path not found: {}", r.display());
    }
    let l = build_language_extension_map();
    let k: HashSet<&str> = l.keys().copied().collect();
    let t: Vec<String> = if args.lang.is_empty() {
        k.iter().map(|&s_val| s_val.to_string()).collect()
    } else {
        let mut v = Vec::new();
        for i in &args.lang {
            if k.contains(i.as_str()) {
                v.push(i.clone());
            } else {
                tracing::warn!(lang = %i, "no file extensions known for language, skipping");
            }
        }
        if v.is_empty() {
            anyhow::bail!("No valid languages specified: {:?}", args.lang);
        }
        v
    };
    let ts: HashSet<&str> = t.iter().map(String::as_str).collect();

    if r.is_file() {
        return Ok(match language_for_path(r) {
            Some(lang) if ts.contains(lang) => vec![r.clone()],
            _ => Vec::new(),
        });
    }

    let mut w = WalkBuilder::new(r);
    w.standard_filters(true);
    w.hidden(false);
    let mut o = OverrideBuilder::new(r);
    for p in &args.exclude {
        let q = format!("!{}", p);
        o.add(&q).with_context(|| format!("Exclude: {}", p))?;
    }
    for p in &args.include {
        o.add(p).with_context(|| format!("Include: {}", p))?;
    }
    let v = o.build().context("Overrides")?;
    w.overrides(v);
    let mut f = Vec::new();
    for i in w.build() {
        match i {
            Ok(e) => {
                if e.file_type().is_some_and(|ft| ft.is_file()) && is_target_entry(&e, &ts) {
                    f.push(e.into_path());
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
            }
        }
    }
    f.sort();
    Ok(f)
}

fn is_target_entry(e: &DirEntry, t: &HashSet<&str>) -> bool {
    language_for_path(e.path()).is_some_and(|lang| t.contains(lang))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn maps_extensions_to_language_ids() {
        assert_eq!(language_for_path(Path::new("a/b.tsx")), Some("typescriptreact"));
        assert_eq!(language_for_path(Path::new("x.PY")), Some("python"));
        assert_eq!(language_for_path(Path::new("x.hpp")), Some("cpp"));
        assert_eq!(language_for_path(Path::new("Makefile")), None);
        assert_eq!(language_for_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn every_mapped_language_is_registered() {
        let manager = crate::CommentManager::default();
        for lang in build_language_extension_map().keys() {
            assert!(manager.is_supported(lang), "{lang}");
        }
    }

    #[test]
    fn walks_and_filters_by_language() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("src"))?;
        fs::write(dir.path().join("src/a.js"), "// a\n")?;
        fs::write(dir.path().join("src/b.py"), "# b\n")?;
        fs::write(dir.path().join("README.md"), "# readme\n")?;

        let args = DecommentArgs {
            path: dir.path().to_path_buf(),
            ..DecommentArgs::default()
        };
        let found = find_files(&args)?;
        assert_eq!(
            found,
            vec![dir.path().join("src/a.js"), dir.path().join("src/b.py")]
        );

        let only_python = DecommentArgs {
            lang: vec!["python".to_string()],
            ..args.clone()
        };
        assert_eq!(find_files(&only_python)?, vec![dir.path().join("src/b.py")]);

        let excluded = DecommentArgs {
            exclude: vec!["src/a.js".to_string()],
            ..args
        };
        assert_eq!(find_files(&excluded)?, vec![dir.path().join("src/b.py")]);
        Ok(())
    }

    #[test]
    fn single_file_path_is_accepted() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("style.css");
        fs::write(&file, "/* c */")?;
        let args = DecommentArgs {
            path: file.clone(),
            ..DecommentArgs::default()
        };
        assert_eq!(find_files(&args)?, vec![file]);
        Ok(())
    }

    #[test]
    fn unknown_languages_are_rejected() {
        let args = DecommentArgs {
            lang: vec!["cobol".to_string()],
            ..DecommentArgs::default()
        };
        assert!(find_files(&args).is_err());
    }
}
