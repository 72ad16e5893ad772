//! Epiboard CLI
//!
//! Command-line client for a running Epiboard server:
//! - List countries and metrics
//! - Print chart series and the selection summary
//! - Check server status
//!
//! `check` and `config` work offline.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use epiboard::data::TableLoader;
use epiboard::views::format_grouped;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "epiboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Epiboard pandemic dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8050", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the countries in the loaded table
    Countries,

    /// List the selectable metrics
    Metrics,

    /// Bar and scatter series for a selection
    Views {
        /// Countries to select (repeatable; default: server defaults)
        #[arg(short, long = "country")]
        countries: Vec<String>,
        /// Select no countries at all
        #[arg(long, conflicts_with = "countries")]
        none: bool,
        /// Metric (Confirmed, Deaths, Recovered)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Summary sentence for a selection
    Summary {
        /// Countries to select (repeatable; default: server defaults)
        #[arg(short, long = "country")]
        countries: Vec<String>,
        /// Select no countries at all
        #[arg(long, conflicts_with = "countries")]
        none: bool,
        /// Metric (Confirmed, Deaths, Recovered)
        #[arg(short, long)]
        metric: Option<String>,
    },

    /// Choropleth values for every country
    Map {
        /// Metric (Confirmed, Deaths, Recovered)
        #[arg(short, long)]
        metric: Option<String>,
        /// Only show the N largest values
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Show server status
    Status,

    /// Validate a CSV file without starting a server
    Check {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Countries => {
            let data = get_json(&client, &format!("{}/api/v1/countries", cli.api_url)).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                for country in data["countries"].as_array().into_iter().flatten() {
                    println!("{}", country.as_str().unwrap_or("-"));
                }
                println!();
                println!("{} countries", data["count"].as_u64().unwrap_or(0));
            }
        }

        Commands::Metrics => {
            let data = get_json(&client, &format!("{}/api/v1/metrics", cli.api_url)).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                let default = data["default"].as_str().unwrap_or("");
                println!("{:<12} {:<18} {}", "Key", "Label", "Default");
                println!("{}", "-".repeat(40));
                for metric in data["metrics"].as_array().into_iter().flatten() {
                    let key = metric["key"].as_str().unwrap_or("-");
                    println!(
                        "{:<12} {:<18} {}",
                        key,
                        metric["label"].as_str().unwrap_or("-"),
                        if key == default { "*" } else { "" }
                    );
                }
            }
        }

        Commands::Views {
            countries,
            none,
            metric,
        } => {
            let body = selection_body(countries, none, metric);
            let data = post_json(&client, &format!("{}/api/v1/views", cli.api_url), &body).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_views(&data);
            }
        }

        Commands::Summary {
            countries,
            none,
            metric,
        } => {
            let body = selection_body(countries, none, metric);
            let data = post_json(
                &client,
                &format!("{}/api/v1/views/summary", cli.api_url),
                &body,
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{}", data["text"].as_str().unwrap_or(""));
            }
        }

        Commands::Map { metric, top } => {
            let mut request = client.get(format!("{}/api/v1/views/choropleth", cli.api_url));
            if let Some(metric) = &metric {
                request = request.query(&[("metric", metric)]);
            }
            let data = send_json(&client, request).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_map(&data, top);
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("Epiboard v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!("Countries loaded: {}", health["rows"].as_u64().unwrap_or(0));
                    if let Some(loaded_at) = health["loaded_at"].as_str() {
                        println!("Loaded at: {}", loaded_at);
                    }
                    println!(
                        "Dashboard sessions: {}",
                        health["ws_connections"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to Epiboard API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the Epiboard server is running:");
                    eprintln!("  cargo run --bin epiboard -- --data data/country_wise_latest.csv");
                    return Err(e.into());
                }
            }
        }

        Commands::Check { path } => {
            let table = TableLoader::new()
                .load(&path)
                .with_context(|| format!("{} is not a valid country table", path.display()))?;

            println!("{}: OK", path.display());
            println!("  Countries: {}", table.len());
            for &metric in epiboard::data::Metric::all() {
                let total: f64 = table.records().iter().map(|r| r.value(metric)).sum();
                println!("  Total {}: {}", metric.display_name(), format_grouped(total));
            }
        }

        Commands::Config { output } => {
            let config = epiboard::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Request body for the selection endpoints
///
/// Without `--country` or `--none` the field is left out and the server
/// applies its default countries.
fn selection_body(countries: Vec<String>, none: bool, metric: Option<String>) -> Value {
    let mut body = json!({});
    if none || !countries.is_empty() {
        body["countries"] = json!(countries);
    }
    if let Some(metric) = metric {
        body["metric"] = json!(metric);
    }
    body
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value> {
    send_json(client, client.get(url)).await
}

async fn post_json(client: &reqwest::Client, url: &str, body: &Value) -> Result<Value> {
    send_json(client, client.post(url).json(body)).await
}

async fn send_json(client: &reqwest::Client, request: reqwest::RequestBuilder) -> Result<Value> {
    let request = request.build()?;
    let url = request.url().to_string();
    let response = client
        .execute(request)
        .await
        .with_context(|| format!("request to {} failed", url))?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        bail!("Request failed ({}): {}", status, error_message(&text));
    }
    serde_json::from_str(&text).with_context(|| format!("invalid JSON from {}", url))
}

/// Message from an API error body, or the raw body when it is not one
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn print_views(data: &Value) {
    println!("{}", data["bar"]["title"].as_str().unwrap_or("Bar chart"));
    println!("{}", "-".repeat(40));
    let bars = data["bar"]["points"].as_array();
    if bars.map_or(true, |b| b.is_empty()) {
        println!("(no countries selected)");
    }
    for point in bars.into_iter().flatten() {
        println!(
            "{:<24} {:>14}",
            point["country"].as_str().unwrap_or("-"),
            format_grouped(point["value"].as_f64().unwrap_or(0.0))
        );
    }

    println!();
    println!("{}", data["scatter"]["title"].as_str().unwrap_or("Scatter plot"));
    println!("{}", "-".repeat(72));
    println!(
        "{:<24} {:>14} {:>14} {:>14}",
        "Country", "Confirmed", "Deaths", "Recovered"
    );
    for point in data["scatter"]["points"].as_array().into_iter().flatten() {
        println!(
            "{:<24} {:>14} {:>14} {:>14}",
            point["country"].as_str().unwrap_or("-"),
            format_grouped(point["confirmed"].as_f64().unwrap_or(0.0)),
            format_grouped(point["deaths"].as_f64().unwrap_or(0.0)),
            format_grouped(point["recovered"].as_f64().unwrap_or(0.0))
        );
    }

    println!();
    match data["summary"]["text"].as_str() {
        Some(text) => println!("{}", text),
        None => println!(
            "Summary unavailable: {}",
            data["summary_error"]["message"].as_str().unwrap_or("unknown")
        ),
    }
}

fn print_map(data: &Value, top: Option<usize>) {
    println!("{}", data["title"].as_str().unwrap_or("Map"));
    println!("{}", "-".repeat(40));

    let mut points: Vec<(&str, f64)> = data["points"]
        .as_array()
        .into_iter()
        .flatten()
        .map(|p| {
            (
                p["country"].as_str().unwrap_or("-"),
                p["value"].as_f64().unwrap_or(0.0),
            )
        })
        .collect();

    if let Some(n) = top {
        points.sort_by(|a, b| b.1.total_cmp(&a.1));
        points.truncate(n);
    }

    for (country, value) in points {
        println!("{:<24} {:>14}", country, format_grouped(value));
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
