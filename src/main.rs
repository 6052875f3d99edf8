mod config;

use std::path::PathBuf;

use anyhow::bail;
use sift_embed::OllamaEmbedder;
use sift_index::{InitOutcome, PdfLoader, Retriever, RetrievalError};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((cmd, rest)) if cmd == "build" => build(rest).await,
        Some((cmd, rest)) if cmd == "query" => query(rest).await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_usage() {
    println!(
        "sift - local corpus ingestion and similarity retrieval\n\n\
         Usage:\n  \
         sift build [--config <path>]          ingest the corpus and persist the index\n  \
         sift query <text> [-k N] [--config <path>]   search the index\n\n\
         Config defaults to sift.toml in the working directory."
    );
}

fn resolve_config_path(args: &[String]) -> PathBuf {
    if let Some(path) = args.windows(2).find(|w| w[0] == "--config").map(|w| &w[1]) {
        return PathBuf::from(path);
    }
    if let Ok(path) = std::env::var("SIFT_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from("sift.toml")
}

fn make_retriever(config: &Config) -> Retriever<OllamaEmbedder> {
    let embedder = OllamaEmbedder::new(&config.embedding.base_url, config.embedding.model.clone());
    Retriever::new(
        config.retriever_config(),
        embedder,
        Box::new(PdfLoader::default()),
    )
}

async fn build(args: &[String]) -> anyhow::Result<()> {
    let config = Config::load(&resolve_config_path(args))?;
    tracing::debug!(?config, "configuration loaded");
    let mut retriever = make_retriever(&config);

    match retriever.initialize().await {
        Ok(InitOutcome::Loaded) => {
            println!(
                "index already persisted at {}; delete it to rebuild",
                config.store_path.display()
            );
        }
        Ok(InitOutcome::Built(report)) => {
            println!(
                "indexed {} segments from {} files ({} failed) in {:.1}s{}",
                report.segments_indexed,
                report.files_scanned,
                report.files_failed,
                f64::from(u32::try_from(report.duration_ms).unwrap_or(u32::MAX)) / 1000.0,
                if report.persisted {
                    ""
                } else {
                    " [warning: index not persisted]"
                }
            );
        }
        Err(RetrievalError::EmptyCorpus) => {
            bail!(
                "no usable documents under {}; add PDF files and retry",
                config.corpus_path.display()
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn query(args: &[String]) -> anyhow::Result<()> {
    let Some(text) = args.iter().find(|a| !a.starts_with('-')).cloned() else {
        bail!("usage: sift query <text> [-k N]");
    };

    let config = Config::load(&resolve_config_path(args))?;
    let k = args
        .windows(2)
        .find(|w| w[0] == "-k")
        .and_then(|w| w[1].parse::<usize>().ok())
        .unwrap_or(config.top_k);

    let mut retriever = make_retriever(&config);
    match retriever.initialize().await {
        Ok(_) => {}
        Err(RetrievalError::EmptyCorpus) => {
            bail!(
                "no usable documents under {}; add PDF files and retry",
                config.corpus_path.display()
            );
        }
        Err(e) => return Err(e.into()),
    }

    let hits = retriever.search(&text, k).await?;
    if hits.is_empty() {
        println!("no results");
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        let excerpt: String = hit.segment.content.chars().take(200).collect();
        println!(
            "{}. {} (page {}, distance {:.4})\n   {}\n",
            rank + 1,
            hit.segment.metadata.source_file,
            hit.segment.metadata.page,
            hit.distance,
            excerpt.trim()
        );
    }
    Ok(())
}
