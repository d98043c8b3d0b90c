mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gengtu_client::navigator::LogNavigator;
use gengtu_client::{ClientConfig, GeneratorPage};
use gengtu_core::aspect::AspectMode;
use gengtu_core::auth::RegisterRequest;
use gengtu_core::generation::{GenerationForm, GenerationKind, ImageUpload};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line front end for the gengtu image-generation service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Account email; when given together with --password, logs in first
    #[arg(long, env = "GENGTU_EMAIL", global = true)]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "GENGTU_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the session and remaining credits
    Whoami,
    /// Generate a meme from a riddle answer
    Meme {
        /// Riddle answer, e.g. 东施效颦
        answer: String,
        /// vertical, horizontal or square
        #[arg(long, default_value = "vertical")]
        size: AspectMode,
    },
    /// Turn a photo into figurine artwork
    Figurine {
        /// Path to a PNG, JPEG or WebP photo
        image: PathBuf,
    },
    /// List past generations
    History {
        /// Only show figurine results
        #[arg(long)]
        figurine: bool,
    },
    /// Create an account
    Register {
        #[arg(long)]
        invitation_code: String,
    },
    /// End the session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gengtu_client=info,gengtu=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_env()?;
    tracing::debug!(api = %config.api_base_url, "Loaded client configuration");

    let kind = match &args.command {
        Command::Figurine { .. } | Command::History { figurine: true } => GenerationKind::Figurine,
        _ => GenerationKind::Meme,
    };
    let page = GeneratorPage::new(&config, kind, Arc::new(LogNavigator))?;

    if let Command::Register { invitation_code } = &args.command {
        let request = RegisterRequest {
            email: args.email.clone().context("--email is required to register")?,
            password: args
                .password
                .clone()
                .context("--password is required to register")?,
            invitation_code: invitation_code.clone(),
        };
        let message = page.auth().register(request).await?;
        println!("{}", message.as_deref().unwrap_or("Registered. You can log in now."));
        return Ok(());
    }

    if let (Some(email), Some(password)) = (&args.email, &args.password) {
        page.auth().login(email.as_str(), password.as_str()).await?;
    }

    if let Command::Logout = args.command {
        page.auth().logout().await;
        println!("Logged out.");
        return Ok(());
    }

    page.mount().await.context("session is not valid, log in with --email/--password")?;

    match args.command {
        Command::Whoami | Command::History { .. } => {}
        Command::Meme { answer, size } => {
            generate(&page, &config, GenerationForm::riddle(answer, size)).await?;
        }
        Command::Figurine { image } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("failed to read {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let upload = ImageUpload::sniff(file_name, bytes)?;
            generate(&page, &config, GenerationForm::figurine(Some(upload))).await?;
        }
        Command::Register { .. } | Command::Logout => return Ok(()),
    }

    render::page(&page);
    page.teardown();
    Ok(())
}

async fn generate(page: &GeneratorPage, config: &ClientConfig, form: GenerationForm) -> Result<()> {
    println!("{}", page.kind().pending_message());
    page.submit(form).await?;
    if let Some(path) = page.save_download(&config.download_dir).await? {
        println!("Saved {}", path.display());
    }
    Ok(())
}
