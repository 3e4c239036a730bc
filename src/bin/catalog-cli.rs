use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Command line client for the Song Catalog API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all songs
    List,
    /// Show one song
    Get { id: String },
    /// Add a song; omitted fields are stored as null
    Create(SongArgs),
    /// Replace every field of a song
    Update {
        id: String,
        #[command(flatten)]
        song: SongArgs,
    },
    /// Remove a song
    Delete { id: String },
}

#[derive(Args)]
struct SongArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    /// Numeric years are sent as numbers, anything else as a string
    #[arg(long)]
    year: Option<String>,
}

impl SongArgs {
    fn to_json(&self) -> Value {
        let mut body = Map::new();
        if let Some(title) = &self.title {
            body.insert("title".into(), json!(title));
        }
        if let Some(author) = &self.author {
            body.insert("author".into(), json!(author));
        }
        if let Some(genre) = &self.genre {
            body.insert("genre".into(), json!(genre));
        }
        if let Some(year) = &self.year {
            let value = match year.parse::<i64>() {
                Ok(n) => json!(n),
                Err(_) => json!(year),
            };
            body.insert("year".into(), value);
        }
        Value::Object(body)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let songs_url = format!("{}/songs", cli.url.trim_end_matches('/'));

    let res = match &cli.command {
        Commands::List => client.get(&songs_url).send().await?,
        Commands::Get { id } => client.get(format!("{}/{}", songs_url, id)).send().await?,
        Commands::Create(song) => client.post(&songs_url).json(&song.to_json()).send().await?,
        Commands::Update { id, song } => {
            client
                .put(format!("{}/{}", songs_url, id))
                .json(&song.to_json())
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/{}", songs_url, id)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Catalog API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
