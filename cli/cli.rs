mod interaction;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use console::style;
use decomment_core::{
    CliArgs, Command as CoreCommand, CommentManager, DecommentArgs, FileOutcome, Granularity,
    ProcessedFileResult, find_files, process_files, process_text,
};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn determine_granularity(args: &DecommentArgs) -> Granularity {
    if args.single_line {
        Granularity::SingleLineOnly
    } else if args.multi_line {
        Granularity::MultiLineOnly
    } else {
        Granularity::All
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_stdin(manager: &CommentManager, lang: &str, granularity: Granularity) -> Result<ExitCode> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    match process_text(manager, &input, lang, granularity) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", style(format!("Rejected input: {}", e)).red());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_results(results: &[ProcessedFileResult], check: bool) -> ExitCode {
    let mut changed_count = 0;
    let mut unchanged_count = 0;
    let mut failure_count = 0;
    println!("\nProcessing complete.");
    for result in results {
        match result.outcome {
            FileOutcome::Changed => changed_count += 1,
            FileOutcome::WouldChange => {
                println!("  Would change: {}", style(result.path.display()).yellow());
                changed_count += 1;
            }
            FileOutcome::Unchanged | FileOutcome::Skipped => unchanged_count += 1,
            FileOutcome::Failed => {
                eprintln!(
                    "  {} Failed: {} - {}",
                    style("⚠️").yellow(),
                    style(result.path.display()).dim(),
                    style(result.error.as_deref().unwrap_or("unknown error")).red()
                );
                failure_count += 1;
            }
        }
    }
    println!(
        "Result: {} {} {}, {} unchanged, {} {} failed.",
        style(changed_count).green(),
        if changed_count == 1 { "file" } else { "files" },
        if check { "would change" } else { "changed" },
        style(unchanged_count).dim(),
        style(failure_count).red(),
        if failure_count == 1 { "file" } else { "files" }
    );
    if failure_count > 0 || (check && changed_count > 0) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();
    init_tracing(cli.main_opts.verbose);
    let manager = Arc::new(CommentManager::new());

    if let Some(command_enum_val) = cli.command {
        match command_enum_val {
            CoreCommand::Completion(args) => {
                print_completions_cli(args.shell);
            }
            CoreCommand::Languages => {
                for lang in manager.list_supported() {
                    println!("{}", lang);
                }
            }
            CoreCommand::Info(args) => {
                println!("{}", manager.describe_capabilities(&args.lang));
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let main_app_args = cli.main_opts;
    let granularity = determine_granularity(&main_app_args);

    if let Some(lang) = main_app_args.stdin.as_deref() {
        return run_stdin(&manager, lang, granularity);
    }

    let files_to_process = match find_files(&main_app_args) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{}", style(format!("Error finding files: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::debug!(count = files_to_process.len(), ?granularity, "files discovered");

    if files_to_process.is_empty() {
        println!("No files found matching the criteria.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Found {} files:", files_to_process.len());
    for file in files_to_process.iter().take(10) {
        println!("  {}", style(file.display()).dim());
    }
    if files_to_process.len() > 10 {
        println!("  ... and {} more.", files_to_process.len() - 10);
    }

    let skip_prompt = main_app_args.no_confirm || main_app_args.check;
    match interaction::confirm_processing(files_to_process.len(), skip_prompt) {
        Ok(true) => {}
        Ok(false) => return Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!(
                "{}",
                style(format!("Error during confirmation: {}", e)).red()
            );
            return Ok(ExitCode::FAILURE);
        }
    }

    let check = main_app_args.check;
    println!(
        "Processing files (Mode: {:?}{})...",
        granularity,
        if check { ", check only" } else { "" }
    );

    let worker_manager = Arc::clone(&manager);
    let processing_results = tokio::task::spawn_blocking(move || {
        process_files(files_to_process, &worker_manager, granularity, check)
    })
    .await
    .context("File processing task panicked")?;

    Ok(report_results(&processing_results, check))
}
