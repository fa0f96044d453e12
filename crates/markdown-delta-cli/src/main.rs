use anyhow::{Context, Result};
use clap::Parser;
use markdown_delta_config::Config;
use markdown_delta_engine::{Converter, Op, ParseOptions, plain_text, tree_from_json};
use std::{
    io::{self, Read, Write},
    path::PathBuf,
};

/// Convert markdown into rich-text delta operations, printed as JSON.
#[derive(Debug, Parser)]
#[command(name = "markdown-delta", version, about)]
struct Cli {
    /// Markdown file to convert. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Treat the input as an mdast JSON tree instead of markdown.
    #[arg(long)]
    tree: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pretty: bool,

    /// Config file to use instead of ~/.config/markdown-delta/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(log_level(cli.verbose))
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;
    log::debug!("Using config: {config:?}");

    let source = read_input(cli.input.as_ref())?;
    let ops = convert(&source, cli.tree, &config)?;
    log::info!("{}", summarize(&ops));

    let output = render(&ops, cli.pretty || config.pretty)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").context("Failed to write output")?;
    Ok(())
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            log::info!("Reading {}", path.display());
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

fn parse_options(config: &Config) -> ParseOptions {
    ParseOptions {
        tables: config.extensions.tables,
        strikethrough: config.extensions.strikethrough,
        tasklists: config.extensions.tasklists,
    }
}

fn convert(source: &str, is_tree: bool, config: &Config) -> Result<Vec<Op>> {
    let converter = Converter::new();
    if is_tree {
        let tree = tree_from_json(source).context("Failed to read document tree")?;
        Ok(converter.convert_tree(tree))
    } else {
        Ok(converter.convert_markdown_with(source, &parse_options(config)))
    }
}

fn summarize(ops: &[Op]) -> String {
    format!(
        "Produced {} operations, {} characters of text",
        ops.len(),
        plain_text(ops).chars().count()
    )
}

fn render(ops: &[Op], pretty: bool) -> Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(ops)?
    } else {
        serde_json::to_string(ops)?
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_delta_config::Extensions;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["markdown-delta", "notes.md", "--pretty", "-vv"]);
        assert_eq!(cli.input, Some(PathBuf::from("notes.md")));
        assert!(cli.pretty);
        assert!(!cli.tree);
        assert_eq!(log_level(cli.verbose), log::LevelFilter::Debug);
    }

    #[test]
    fn test_convert_markdown_to_compact_json() {
        let ops = convert("**hi**", false, &Config::default()).unwrap();
        assert_eq!(
            render(&ops, false).unwrap(),
            r#"[{"insert":"hi","attributes":{"bold":true}},{"insert":"\n"}]"#
        );
    }

    #[test]
    fn test_convert_tree_input() {
        let tree = r#"{"type":"root","children":[{"type":"heading","depth":2,"children":[{"type":"text","value":"T"}]}]}"#;
        let ops = convert(tree, true, &Config::default()).unwrap();
        assert_eq!(
            render(&ops, false).unwrap(),
            r#"[{"insert":"T"},{"insert":"\n","attributes":{"header":2}}]"#
        );
    }

    #[test]
    fn test_summary_counts_text_but_not_embeds() {
        let ops = convert("h\u{e9} ![x](a.png)", false, &Config::default()).unwrap();
        assert_eq!(summarize(&ops), "Produced 3 operations, 4 characters of text");
    }

    #[test]
    fn test_invalid_tree_is_reported() {
        let err = convert("not json", true, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read document tree"));
    }

    #[test]
    fn test_disabled_extension_changes_parsing() {
        let config = Config {
            extensions: Extensions {
                strikethrough: false,
                ..Extensions::default()
            },
            ..Config::default()
        };
        let ops = convert("~~x~~", false, &config).unwrap();
        assert_eq!(ops[0], Op::text("~~x~~"));
    }
}
