//! Figspec CLI - Figma design extraction and BDD scenario generation

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use figspec::config::{self, TransportConfig};
use figspec::error::{FigspecError, FixSuggestion};
use figspec::extract::normalize_document;
use figspec::figma::FigmaClient;
use figspec::model::{ClaudeModel, ScenarioModel};
use figspec::prompt::{build_prompt, ScenarioKind};
use figspec::render::{self, OutputFormat};

#[derive(Parser)]
#[command(name = "figspec")]
#[command(about = "Figspec - extract Figma designs and generate BDD scenarios")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract design data from Figma and save as JSON
    ExtractFigma {
        /// Figma file ID
        #[arg(short, long)]
        file_id: String,

        /// Output filename (without extension)
        #[arg(short, long, default_value = "figma_data")]
        output: String,

        /// Figma access token (overrides .env)
        #[arg(short, long)]
        token: Option<String>,

        /// Disable SSL verification
        #[arg(long)]
        no_ssl_verify: bool,
    },

    /// Generate BDD scenarios from extracted design data
    GenerateBdd {
        /// Input JSON file with extracted design data
        #[arg(short, long)]
        input: String,

        /// Output filename (without extension)
        #[arg(short, long, default_value = "bdd_scenarios")]
        output: String,

        /// Type of scenarios to generate
        #[arg(short = 'T', long = "type", value_enum, default_value_t = ScenarioKind::Functional)]
        kind: ScenarioKind,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Disable SSL verification
        #[arg(long)]
        no_ssl_verify: bool,
    },

    /// Complete pipeline: extract design data and generate BDD scenarios
    FullPipeline {
        /// Figma file ID
        #[arg(short, long)]
        file_id: String,

        /// Output filename (without extension)
        #[arg(short, long, default_value = "bdd_scenarios")]
        output: String,

        /// Type of scenarios to generate
        #[arg(short = 'T', long = "type", value_enum, default_value_t = ScenarioKind::Functional)]
        kind: ScenarioKind,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value_t = OutputFormat::All)]
        format: OutputFormat,

        /// Figma access token (overrides .env)
        #[arg(long)]
        figma_token: Option<String>,

        /// Disable SSL verification
        #[arg(long)]
        no_ssl_verify: bool,
    },

    /// Display setup instructions for API keys and configuration
    Setup,

    /// Test connections to the Figma and Anthropic APIs
    TestConnection {
        /// Figma access token (overrides .env)
        #[arg(long)]
        figma_token: Option<String>,

        /// Anthropic API key (overrides .env)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ExtractFigma {
            file_id,
            output,
            token,
            no_ssl_verify,
        } => extract_figma(&file_id, &output, token, no_ssl_verify).await,
        Commands::GenerateBdd {
            input,
            output,
            kind,
            format,
            no_ssl_verify,
        } => generate_bdd(&input, &output, kind, format, no_ssl_verify).await,
        Commands::FullPipeline {
            file_id,
            output,
            kind,
            format,
            figma_token,
            no_ssl_verify,
        } => full_pipeline(&file_id, &output, kind, format, figma_token, no_ssl_verify).await,
        Commands::Setup => {
            setup();
            Ok(())
        }
        Commands::TestConnection {
            figma_token,
            api_key,
        } => test_connection(figma_token, api_key).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn extract_figma(
    file_id: &str,
    output: &str,
    token: Option<String>,
    no_ssl_verify: bool,
) -> Result<(), FigspecError> {
    let token = config::figma_token(token)?;
    let transport = TransportConfig::new(config::verify_ssl(no_ssl_verify));

    println!(
        "{} Extracting Figma design data for file: {}",
        "→".cyan(),
        file_id.cyan().bold()
    );

    let client = FigmaClient::new(token, transport)?;
    let raw = client.get_file(file_id).await?;
    let design = normalize_document(&raw);

    let path = render::save_design_data(&design, output)?;
    println!("{} Design data saved to {}", "✓".green(), path.display());

    print_design_summary(&design);
    Ok(())
}

async fn generate_bdd(
    input: &str,
    output: &str,
    kind: ScenarioKind,
    format: OutputFormat,
    no_ssl_verify: bool,
) -> Result<(), FigspecError> {
    let api_key = config::anthropic_api_key(None)?;
    let transport = TransportConfig::new(config::verify_ssl(no_ssl_verify));

    let input_path = Path::new(input);
    if !input_path.exists() {
        return Err(FigspecError::InputNotFound {
            path: input_path.to_path_buf(),
        });
    }
    let design: Value = serde_json::from_str(&fs::read_to_string(input_path)?)?;

    let model = ClaudeModel::new(api_key, config::model_id(), transport)?;
    generate_and_render(&model, &design, kind, format, output).await
}

async fn full_pipeline(
    file_id: &str,
    output: &str,
    kind: ScenarioKind,
    format: OutputFormat,
    figma_token: Option<String>,
    no_ssl_verify: bool,
) -> Result<(), FigspecError> {
    let token = config::figma_token(figma_token)?;
    let api_key = config::anthropic_api_key(None)?;
    let transport = TransportConfig::new(config::verify_ssl(no_ssl_verify));

    println!(
        "{} Starting full pipeline for Figma file: {}",
        "→".cyan(),
        file_id.cyan().bold()
    );

    let client = FigmaClient::new(token, transport)?;
    let raw = client.get_file(file_id).await?;
    let design = normalize_document(&raw);
    print_design_summary(&design);

    let model = ClaudeModel::new(api_key, config::model_id(), transport)?;
    let design_value = serde_json::to_value(&design)?;
    generate_and_render(&model, &design_value, kind, format, output).await
}

async fn generate_and_render(
    model: &dyn ScenarioModel,
    design: &Value,
    kind: ScenarioKind,
    format: OutputFormat,
    output: &str,
) -> Result<(), FigspecError> {
    println!(
        "{} Generating {} scenarios with {}...",
        "→".cyan(),
        kind.label().cyan().bold(),
        model.name()
    );

    let prompt = build_prompt(kind, design);
    let scenarios = model.generate(&prompt).await?;

    let written = render::write_scenarios(format, &scenarios, design, output)?;
    println!("{} Scenarios generated:", "✓".green());
    for (fmt, path) in &written {
        println!("  {} {}: {}", "•".cyan(), fmt.label(), path.display());
    }
    Ok(())
}

fn print_design_summary(design: &figspec::DesignDocument) {
    println!("  Pages: {}", design.pages.len());
    for page in &design.pages {
        println!(
            "  {} {} ({} frames)",
            "•".cyan(),
            page.name.as_deref().unwrap_or("(unnamed)"),
            page.frames.len()
        );
    }
}

fn setup() {
    println!("{}", "Figspec setup".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "Step 1: Figma API".cyan());
    println!("  1. Go to https://www.figma.com/developers/api");
    println!("  2. Generate a personal access token for your account");
    println!("  3. Add it to your .env file: FIGMA_ACCESS_TOKEN=your_token");
    println!("  4. The file ID is in the file URL: https://www.figma.com/file/FILE_ID/...");

    println!("\n{}", "Step 2: Anthropic API".cyan());
    println!("  1. Go to https://console.anthropic.com/");
    println!("  2. Create an API key under Settings > API keys");
    println!("  3. Add it to your .env file: ANTHROPIC_API_KEY=your_key");
    println!("  4. Optionally pick a model: FIGSPEC_MODEL={}", config::DEFAULT_MODEL);

    println!("\n{}", "Step 3: SSL configuration".cyan());
    println!("  Production: VERIFY_SSL=true");
    println!("  Testing/dev behind a proxy: VERIFY_SSL=false or --no-ssl-verify");

    println!("\n{}", "Usage examples".cyan());
    println!("  figspec extract-figma -f YOUR_FILE_ID");
    println!("  figspec generate-bdd -i figma_data.json");
    println!("  figspec full-pipeline -f YOUR_FILE_ID");

    println!("\n{}", "Example .env".cyan());
    println!("  FIGMA_ACCESS_TOKEN=figd_...");
    println!("  ANTHROPIC_API_KEY=sk-ant-...");
    println!("  VERIFY_SSL=true");
}

async fn test_connection(
    figma_token: Option<String>,
    api_key: Option<String>,
) -> Result<(), FigspecError> {
    println!("{} Testing API connections...", "→".cyan());

    match config::figma_token(figma_token) {
        Ok(token) => {
            let client = FigmaClient::new(token, TransportConfig::default())?;
            match client.me().await {
                Ok(_) => println!("{} Figma API: connection successful", "✓".green()),
                Err(e) => println!("{} Figma API: connection failed - {}", "✗".red(), e),
            }
        }
        Err(_) => println!("{} Figma API: no token provided", "✗".red()),
    }

    match config::anthropic_api_key(api_key) {
        Ok(key) => {
            let model = ClaudeModel::new(key, config::model_id(), TransportConfig::default())?;
            if model.is_available() {
                println!("{} Anthropic API: credentials present", "✓".green());
            } else {
                println!("{} Anthropic API: credentials empty", "✗".red());
            }
        }
        Err(_) => println!("{} Anthropic API: no API key provided", "✗".red()),
    }

    Ok(())
}
