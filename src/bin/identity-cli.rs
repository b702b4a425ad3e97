use clap::Parser;
use reqwest::header::COOKIE;

use identity_hello::identity::OutputPayload;

#[derive(Parser)]
#[command(name = "identity-cli")]
#[command(about = "Query a running identity-hello service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Cookie header to send, e.g. "jedHTTPSession=..."
    #[arg(short, long)]
    cookie: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut request = client.get(&cli.url);
    if let Some(cookie) = &cli.cookie {
        request = request.header(COOKIE, cookie);
    }
    let res = request.send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let payload: OutputPayload = match serde_json::from_str(&text) {
        Ok(payload) => payload,
        Err(_) => {
            eprintln!("Error: service returned status {} with a non-identity body", status);
            eprintln!("Response: {}", text);
            return Ok(());
        }
    };

    println!("status: {}", status);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    match payload.classify() {
        Some(kind) => println!("outcome: {}", kind),
        None => println!("outcome: unrecognized payload shape"),
    }
    Ok(())
}
