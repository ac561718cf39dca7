//! Vellum CLI
//!
//! A headless driver for the cascade engine and the text-language/
//! hyphenation engine, for testing and debugging without a host reader.

mod tree;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use vellum_common::{EngineConfig, StyleError};
use vellum_css::atrule::{MediaContext, StylesheetLoader};
use vellum_css::{compute_style, parse_stylesheet, ComputedStyle};
use vellum_css::values::Color;
use vellum_lang::hyphenate::{HyphMethod, NullDictionaryLoader, PatternHyphMethod};
use vellum_lang::LangRegistry;

use tree::DemoTree;

/// Vellum CLI - inspect the CSS cascade and the hyphenation engine
#[derive(Parser, Debug)]
#[command(name = "vellum-cli")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Cascade a stylesheet against a synthetic <body><section><p> tree
    vellum-cli style rules.css

    # ...and print every node in the chain, not just the innermost <p>
    vellum-cli style rules.css --all

    # Resolve quotes, line-break rules and hyphenation for a language tag
    vellum-cli hyphenate vocabulary --lang de

    # Hyphenate against a loaded TeX/Liang pattern or legacy PDB dictionary
    vellum-cli hyphenate encyclopedia --lang en --dict English_US.pattern
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a stylesheet and print the cascaded style of a demo document.
    Style {
        /// Path to a `.css` file.
        css: PathBuf,

        /// Print every element in the demo chain instead of only the
        /// innermost one.
        #[arg(long)]
        all: bool,

        /// Viewport width in CSS pixels, for `@media` evaluation.
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Viewport height in CSS pixels.
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
    /// Resolve a language's quotes/line-break config and hyphenate a word.
    Hyphenate {
        /// The word to hyphenate.
        word: String,

        /// BCP-47 language tag (e.g. `en`, `de`, `ja`).
        #[arg(long, default_value = "en")]
        lang: String,

        /// Path to a hyphenation dictionary (TeX/Liang XML, or legacy PDB)
        /// to load for `lang` instead of using the algorithmic fallback.
        #[arg(long)]
        dict: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Style { css, all, width, height } => run_style(&css, all, width, height),
        Command::Hyphenate { word, lang, dict } => run_hyphenate(&word, &lang, dict.as_deref()),
    }
}

/// A loader that parses `@import` for brace balance but never resolves it;
/// this CLI only ever looks at one file at a time.
struct NoImports;

impl StylesheetLoader for NoImports {
    fn load(&self, _base: &str, url: &str) -> Result<String, StyleError> {
        Err(StyleError::StylesheetLoad {
            url: url.to_string(),
            reason: "vellum-cli does not resolve @import".to_string(),
        })
    }
}

fn run_style(css_path: &Path, all: bool, width: u32, height: u32) -> Result<()> {
    let source =
        fs::read_to_string(css_path).with_context(|| format!("reading {}", css_path.display()))?;

    let mut demo = DemoTree::build(width, height);
    let media_ctx = MediaContext {
        viewport_width: width,
        viewport_height: height,
        screen_width: width,
        screen_height: height,
        render_dpi: 96,
    };

    let sheet = parse_stylesheet(
        &source,
        demo.tree.names_mut_for_test(),
        vellum_dom::DocumentFormat::Flat,
        &media_ctx,
        Some(&NoImports),
        &css_path.to_string_lossy(),
    )
    .with_context(|| format!("parsing {}", css_path.display()))?;

    println!("{}", "=== Computed styles ===".bold());
    let deepest_tag = demo.deepest().0;
    let mut parent_style: Option<ComputedStyle> = None;
    for &(tag, node) in &demo.chain {
        let style = compute_style(&demo.tree, node, &sheet, parent_style.as_ref());
        if all || tag == deepest_tag {
            print_style(tag, &style);
        }
        parent_style = Some(style);
    }
    Ok(())
}

fn print_style(tag: &str, style: &ComputedStyle) {
    println!("  {}", format!("<{tag}>").cyan());
    println!("    display: {:?}", style.display);
    println!("    color: {}", hex(style.color));
    println!("    background-color: {}", hex(style.background_color));
    println!("    font-size: {:?}  font-weight: {:?}", style.font_size, style.font_weight);
    println!("    text-align: {:?}", style.text_align);
    println!("    margin: {:?}", style.margin);
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn run_hyphenate(word: &str, lang: &str, dict: Option<&Path>) -> Result<()> {
    let config = EngineConfig::default();
    let mut registry = LangRegistry::new(Box::new(NullDictionaryLoader));
    let cfg = registry.get(lang, lang, &config, true);

    let method: Rc<dyn HyphMethod> = match dict {
        Some(path) => {
            let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let id = path.to_string_lossy();
            let loaded: Box<dyn HyphMethod> = if bytes.starts_with(b"<") {
                Box::new(PatternHyphMethod::load_xml(&id, &String::from_utf8_lossy(&bytes))?)
            } else {
                Box::new(PatternHyphMethod::load_pdb(&id, &bytes)?)
            };
            Rc::from(loaded)
        }
        None => registry.hyph_method_for(&cfg, &config),
    };

    println!("{}", format!("=== {lang} ===").bold());
    println!("  opening quote: {}", cfg.opening_quote());
    println!("  closing quote: {}", cfg.closing_quote());
    println!("  hyphenation method: {}", method.id());

    let chars: Vec<char> = word.chars().collect();
    match method.hyphenate(&chars, &config, None) {
        Some(flags) => println!("  {}", render_breaks(&chars, &flags).green()),
        None => println!("  {}", "(no hyphenation opportunities)".yellow()),
    }
    Ok(())
}

fn render_breaks(word: &[char], flags: &[bool]) -> String {
    let mut out = String::new();
    for (i, ch) in word.iter().enumerate() {
        out.push(*ch);
        if flags.get(i).copied().unwrap_or(false) {
            out.push('-');
        }
    }
    out
}
