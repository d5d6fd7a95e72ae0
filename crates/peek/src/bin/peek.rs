// ABOUTME: CLI binary for linkpeek.
// ABOUTME: Peeks URLs or local HTML files and prints extracted text, optionally summarized.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use linkpeek::{
    engine_output_language, shared_context_for, Client, LeadSummarizer, PeekResult, Summarizer,
    SummarizeOptions, SummarizerCache,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "peek")]
#[command(about = "Extract and summarize the main article text of web pages")]
struct Args {
    /// Output full results as JSON instead of raw text
    #[arg(long = "json")]
    json_output: bool,

    /// Summarize the extracted text with the built-in extractive engine
    #[arg(short = 's', long = "summarize")]
    summarize: bool,

    /// Link title steering the summary; a question title asks the engine
    /// to answer it
    #[arg(long = "title")]
    title: Option<String>,

    /// Ceiling on extracted text length, in characters
    #[arg(long = "max-chars", default_value_t = linkpeek::DEFAULT_MAX_CHARS)]
    max_chars: usize,

    /// Fallback language when detection comes up empty
    #[arg(long = "fallback-lang")]
    fallback_lang: Option<String>,

    /// HTML file to peek (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL context for HTML file peeking (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// URLs to peek (fetch mode)
    #[arg()]
    urls: Vec<String>,
}

/// Summarize one peeked page with a per-language cached engine.
///
/// Question-form titles make the context link-specific, so those requests
/// get a one-off engine instead of the cached one.
async fn summarize_result(
    result: &PeekResult,
    title: Option<&str>,
    cache: &mut SummarizerCache<LeadSummarizer>,
) -> Option<String> {
    let text = result.text()?;
    let context = shared_context_for(&result.language, title);
    let engine = cache.engine_for(&result.language, &context, LeadSummarizer::default);
    let opts = SummarizeOptions {
        shared_context: context.text,
        output_language: engine_output_language(&result.language).to_string(),
        ..Default::default()
    };
    match engine.summarize(text, &opts).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            eprintln!("error summarizing {}: {}", result.url, e);
            None
        }
    }
}

fn format_output(results: &[PeekResult], json_output: bool) -> String {
    if json_output {
        if results.len() == 1 {
            serde_json::to_string_pretty(&results[0]).unwrap()
        } else {
            serde_json::to_string_pretty(results).unwrap()
        }
    } else {
        results
            .iter()
            .filter_map(|r| r.text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let mut builder = Client::builder()
        .max_chars(args.max_chars)
        .allow_private_networks(args.allow_private_networks);
    if let Some(ref lang) = args.fallback_lang {
        builder = builder.fallback_language(lang.clone());
    }
    let client = builder.build();

    let start = Instant::now();
    let mut results: Vec<PeekResult> = Vec::new();
    let mut had_error = false;

    if let Some(html_path) = &args.html {
        // HTML file mode
        let url = args.url.as_ref().unwrap();
        match fs::read_to_string(html_path) {
            Ok(html_content) => {
                results.push(client.peek_html(&html_content, url));
            }
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        // URL fetch mode
        for url in &args.urls {
            match client.peek(url).await {
                Ok(result) => {
                    results.push(result);
                }
                Err(e) => {
                    eprintln!("error peeking {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    for result in &results {
        if !result.has_content() {
            eprintln!("error: no readable content found in {}", result.url);
            had_error = true;
        }
    }

    let output_str = if args.summarize {
        let mut cache: SummarizerCache<LeadSummarizer> = SummarizerCache::new();
        let mut summaries = Vec::new();
        for result in &results {
            if let Some(summary) = summarize_result(result, args.title.as_deref(), &mut cache).await
            {
                summaries.push(summary);
            }
        }
        summaries.join("\n\n")
    } else {
        format_output(&results, args.json_output)
    };

    if !output_str.is_empty() {
        println!("{}", output_str);
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", start.elapsed().as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
