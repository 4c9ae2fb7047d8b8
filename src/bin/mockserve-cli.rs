use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use mockserve::behavior::{compile, parse};

#[derive(Parser)]
#[command(name = "mockserve-cli")]
#[command(about = "Inspect a running mockserve or check a behavior file", long_about = None)]
struct Cli {
    /// Admin API base URL
    #[arg(short, long, default_value = "http://127.0.0.1:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Server version, active generation and last reload result
    Status,
    /// Active behaviors with their remaining repeat budget
    Behaviors,
    /// Parse and compile a behavior file without serving it
    Check {
        path: PathBuf,

        /// Merge repeated section headers into the first occurrence
        #[arg(long)]
        merge_duplicate_sections: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/admin/status", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Behaviors => {
            let res = client.get(format!("{}/admin/behaviors", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Check {
            path,
            merge_duplicate_sections,
        } => check(&path, !merge_duplicate_sections)?,
    }

    Ok(())
}

fn check(path: &std::path::Path, allow_duplicate_sections: bool) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::open(path)?;
    let sections = parse(std::io::BufReader::new(file), allow_duplicate_sections)?;
    let set = compile(&sections)?;

    println!(
        "{}: ok ({} behaviors, default {})",
        path.display(),
        set.behaviors.len(),
        if set.default_behavior.is_some() { "set" } else { "unset" }
    );
    for behavior in &set.behaviors {
        match behavior.repeat {
            Some(n) => println!("  {} {} (repeat {n})", behavior.method, behavior.url),
            None => println!("  {} {}", behavior.method, behavior.url),
        }
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
