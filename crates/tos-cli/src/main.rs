use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tos_cli::{RegisterReport, LOCAL_TREE};
use tos_core::TreeView;
use tos_tree::{ArticleBand, BandSummary};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn cli() -> Command {
    let config = Arg::new("config")
        .long("config")
        .global(true)
        .value_parser(value_parser!(PathBuf))
        .help("TOML config file");
    let json = Arg::new("json")
        .long("json")
        .global(true)
        .action(ArgAction::SetTrue)
        .help("Output as JSON");
    let sections = Arg::new("sections")
        .long("sections")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Classifier output (JSON with root, trunk and leaf arrays)");
    let only = Arg::new("only")
        .long("only")
        .value_parser(value_parser!(ArticleBand))
        .help("Show a single band: root, trunk or leaf");

    Command::new("tos")
        .version(tos_core::VERSION)
        .about("Tree of Science tools")
        .subcommand_required(true)
        .arg(config)
        .arg(json)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("register")
                .about("Register export files and show which fit the upload budget")
                .arg(
                    Arg::new("files")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("max-size")
                        .long("max-size")
                        .value_parser(value_parser!(f64))
                        .help("Upload budget in MiB (overrides the config file)"),
                ),
        )
        .subcommand(
            Command::new("keywords")
                .about("Summarize each band with its most common keywords")
                .arg(sections.clone())
                .arg(only.clone())
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_parser(value_parser!(usize))
                        .help("Keywords per band (overrides the config file)"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Render a tree, starring or unstarring articles")
                .arg(sections)
                .arg(only)
                .arg(
                    Arg::new("document")
                        .long("document")
                        .value_parser(value_parser!(PathBuf))
                        .help("Tree document JSON; star changes are written back"),
                )
                .arg(
                    Arg::new("star")
                        .long("star")
                        .action(ArgAction::Append)
                        .help("Toggle the star of the article with this label"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let config_path = matches.get_one::<PathBuf>("config").map(PathBuf::as_path);
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("register", args)) => {
            let files: Vec<PathBuf> = args
                .get_many::<PathBuf>("files")
                .map(|files| files.cloned().collect())
                .unwrap_or_default();
            let max_size = args.get_one::<f64>("max-size").copied();
            let config = tos_cli::resolve_config(config_path, max_size).await?;

            let report = tos_cli::register(&files, &config).await?;
            if json {
                print_json(&report)?;
            } else {
                print_register(&report);
            }
        }
        Some(("keywords", args)) => {
            let mut config = tos_cli::resolve_config(config_path, None).await?;
            if let Some(top) = args.get_one::<usize>("top") {
                config = config.with_top_keywords(*top);
                config.validate().context("--top")?;
            }
            let sections = tos_cli::read_sections(sections_arg(args)?).await?;

            let summaries = tos_cli::keywords(&sections, only_arg(args), &config);
            if json {
                print_json(&summaries)?;
            } else {
                summaries.iter().for_each(print_summary);
            }
        }
        Some(("tree", args)) => {
            let config = tos_cli::resolve_config(config_path, None).await?;
            let sections = tos_cli::read_sections(sections_arg(args)?).await?;
            let document_path = args.get_one::<PathBuf>("document");
            let document = match document_path {
                Some(path) => tos_cli::read_document(path).await?,
                None => tos_annotation::TreeDocument::new(),
            };
            let stars: Vec<String> = args
                .get_many::<String>("star")
                .map(|stars| stars.cloned().collect())
                .unwrap_or_default();

            let (view, document) =
                tos_cli::tree(sections, document, &stars, only_arg(args), &config).await?;

            if let Some(path) = document_path.filter(|_| !stars.is_empty()) {
                let body = serde_json::to_string_pretty(&document)?;
                tokio::fs::write(path, body)
                    .await
                    .with_context(|| format!("writing tree document {}", path.display()))?;
                tracing::info!(path = %path.display(), tree = LOCAL_TREE, "saved stars");
            }

            if json {
                print_json(&view)?;
            } else {
                print_tree(&view);
            }
        }
        _ => {}
    }
    Ok(())
}

fn sections_arg(args: &ArgMatches) -> Result<&Path> {
    args.get_one::<PathBuf>("sections")
        .map(PathBuf::as_path)
        .context("--sections is required")
}

fn only_arg(args: &ArgMatches) -> Option<ArticleBand> {
    args.get_one::<ArticleBand>("only").copied()
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_register(report: &RegisterReport) {
    println!(
        "Budget: {:.2} MiB",
        report.budget_bytes as f64 / tos_registry::MIB as f64
    );
    for card in &report.cards {
        let marker = if card.capped { "capped" } else { "ok" };
        println!(
            "  [{marker:>6}] {} {:.2} MiB ({})",
            card.name,
            card.size_mib,
            card.identity.short()
        );
    }
    for path in &report.duplicates {
        println!("  [  dup ] {}", path.display());
    }
    for path in &report.rejected {
        println!("  [ empty] {}", path.display());
    }
    println!("{} of {} files over budget", report.capped(), report.cards.len());
}

fn print_summary(summary: &BandSummary) {
    println!("{} ({})", summary.title, summary.count);
    if !summary.keywords.is_empty() {
        println!("  {}", summary.keywords.join(", "));
    }
}

fn print_tree(view: &TreeView) {
    for band in &view.bands {
        print_summary(&band.summary);
        for entry in &band.articles {
            let star = if entry.starred { '*' } else { ' ' };
            println!("  {star} {}", entry.article.label);
        }
    }
}
