use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gst-cli")]
#[command(about = "Operator CLI for the GST verification proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the proxy is up
    Health,
    /// Start a lookup: fetch a CAPTCHA and print its session id
    Captcha {
        /// Save the CAPTCHA image to this file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Finish a lookup with the solved CAPTCHA
    Details {
        #[arg(short, long)]
        session: String,
        #[arg(short, long)]
        gstin: String,
        #[arg(short, long)]
        captcha: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Captcha { out } => {
            let res = client
                .get(format!("{}/api/v1/getCaptcha", cli.url))
                .send()
                .await?;
            if !res.status().is_success() {
                return print_response(res).await;
            }

            let challenge: Value = res.json().await?;
            let session_id = challenge["sessionId"].as_str().unwrap_or_default();
            println!("Session: {}", session_id);

            if let Some(path) = out {
                let image = challenge["image"].as_str().unwrap_or_default();
                let encoded = image.split_once(',').map(|(_, b)| b).unwrap_or(image);
                std::fs::write(&path, STANDARD.decode(encoded)?)?;
                println!("CAPTCHA saved to {}", path.display());
            } else {
                println!(
                    "View it at {}/api/v1/captcha/{}",
                    cli.url, session_id
                );
            }
        }
        Commands::Details {
            session,
            gstin,
            captcha,
        } => {
            let res = client
                .post(format!("{}/api/v1/getGSTDetails", cli.url))
                .json(&json!({ "sessionId": session, "GSTIN": gstin, "captcha": captcha }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    if json.get("error").is_some() {
        eprintln!("Warning: the portal rejected the lookup");
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
