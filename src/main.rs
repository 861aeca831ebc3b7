use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use image::ImageFormat;

use photovault::app::{App, Services};
use photovault::cancel::CancelToken;
use photovault::config::Config;
use photovault::format::{format_file_size, relative_time};
use photovault::logging::{init_tracing, LogTarget};
use photovault::model::{Credentials, GalleryId, Registration};
use photovault::permissions::{can_edit, can_view, Privacy, ViewOptions};
use photovault::routes::{guard, RouteDecision, LOGIN_PATH};
use photovault::services::{ShareSettings, UploadFile};
use photovault::session::FileSessionStore;

#[derive(Parser)]
#[command(name = "photovault", version, about = "PhotoVault gallery client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log to stderr instead of the PHOTOVAULT_LOG file.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Config file (default: ~/.config/photovault/config.toml).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List galleries.
    Galleries,
    /// Show one gallery with its photos.
    Gallery { id: GalleryId },
    /// Create a share link for a gallery.
    Share {
        id: GalleryId,
        /// Link lifetime in seconds. Omit for a link that never expires.
        #[arg(long, value_name = "SECS")]
        expires: Option<u64>,
        /// User to share with; repeatable.
        #[arg(long = "recipient", value_name = "USER_ID")]
        recipients: Vec<u64>,
    },
    /// Upload image files into a gallery.
    Upload {
        gallery: GalleryId,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// public, unlisted, shared or private (default: private).
        #[arg(long)]
        privacy: Option<String>,
    },
    /// Check whether the current user may view a gallery.
    CanView {
        gallery: GalleryId,
        /// Share token granting access to unlisted galleries.
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose {
        LogTarget::Stderr
    } else {
        LogTarget::File
    });

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let session = Arc::new(FileSessionStore::new(config.storage.session_path()));
    let app = App::new(&config, Services::mock(&config.latency), session, None);
    app.bootstrap();

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    run(&app, cli.command, &cancel).await
}

async fn run(app: &App, command: Command, cancel: &CancelToken) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            app.auth
                .login(Credentials::new(email, password), cancel)
                .await;
            print_session(app)
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let data = Registration {
                name,
                email,
                password,
            };
            app.auth.register(data, cancel).await;
            print_session(app)
        }
        Command::Logout => {
            app.sign_out(cancel).await;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            match app.auth.current_user() {
                Some(user) => println!("{} <{}> (id {})", user.name, user.email, user.id),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Command::Galleries => {
            require_route(app, "/galleries")?;
            app.galleries.fetch_galleries(cancel).await;
            let state = app.galleries.state();
            if let Some(error) = state.error {
                bail!(error);
            }
            let now = Utc::now();
            for gallery in &state.galleries {
                println!(
                    "{:>4}  {:<20} {:>3} photos  {:<8} {}",
                    gallery.id,
                    gallery.name,
                    gallery.photo_count,
                    privacy_label(gallery.privacy),
                    relative_time(gallery.created_at, now)
                );
            }
            Ok(())
        }
        Command::Gallery { id } => {
            require_route(app, &format!("/galleries/{}", id))?;
            app.galleries.fetch_gallery(id, cancel).await;
            let state = app.galleries.state();
            if let Some(error) = state.error {
                bail!(error);
            }
            let Some(gallery) = state.current_gallery else {
                bail!("Gallery {} not loaded", id);
            };
            println!("{} - {}", gallery.name, gallery.description);
            for photo in gallery.photos.unwrap_or_default() {
                let size = photo
                    .metadata
                    .as_ref()
                    .and_then(|m| m.size.clone())
                    .unwrap_or_default();
                println!(
                    "{:>4}  {:<24} {:<8} {}",
                    photo.id,
                    photo.title,
                    privacy_label(photo.privacy),
                    size
                );
            }
            Ok(())
        }
        Command::Share {
            id,
            expires,
            recipients,
        } => {
            require_route(app, "/shared")?;
            let settings = ShareSettings {
                expires_in: expires,
                recipients,
            };
            app.galleries.share_gallery(id, settings, cancel).await;
            let state = app.galleries.state();
            if let Some(error) = state.error {
                bail!(error);
            }
            let Some(share) = state.last_share else {
                bail!("Share was cancelled");
            };
            println!("{}?token={}", share.url, share.link.token);
            match share.link.expires_at {
                Some(at) => println!("Expires {}", at.to_rfc3339()),
                None => println!("Never expires"),
            }
            Ok(())
        }
        Command::Upload {
            gallery,
            files,
            privacy,
        } => {
            require_route(app, "/upload")?;
            let privacy = privacy
                .map(|p| Privacy::parse(&p).with_context(|| format!("Unknown privacy '{}'", p)))
                .transpose()?;
            let files = files
                .iter()
                .map(|path| read_upload(path))
                .collect::<Result<Vec<_>>>()?;
            let total: u64 = files.iter().map(UploadFile::size).sum();
            let result = app
                .upload_to_gallery(gallery, files, privacy, cancel)
                .await?;
            println!(
                "Uploaded {} photos ({}) as {}",
                result.uploaded_count,
                format_file_size(total, 2),
                result.upload_id
            );
            Ok(())
        }
        Command::CanView { gallery, token } => {
            app.galleries.fetch_gallery(gallery, cancel).await;
            let state = app.galleries.state();
            if let Some(error) = state.error {
                bail!(error);
            }
            let item = state.current_gallery.as_ref();
            let viewer = app.auth.current_user();
            let options = ViewOptions { share_token: token };
            println!("view: {}", can_view(item, viewer.as_ref(), &options));
            println!("edit: {}", can_edit(item, viewer.as_ref()));
            Ok(())
        }
    }
}

fn print_session(app: &App) -> Result<()> {
    let state = app.auth.state();
    if let Some(error) = state.error {
        bail!(error);
    }
    match state.user {
        Some(user) => println!("Signed in as {} <{}>", user.name, user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}

/// Apply the route guard the way a page would.
fn require_route(app: &App, path: &str) -> Result<()> {
    match guard(path, &app.auth.state()) {
        RouteDecision::Render(_) => Ok(()),
        RouteDecision::Redirect(LOGIN_PATH) => bail!("Not signed in; run `photovault login` first"),
        RouteDecision::Redirect(to) => bail!("{} is not available (redirected to {})", path, to),
        RouteDecision::Loading => bail!("Session is still loading"),
    }
}

fn privacy_label(privacy: Option<Privacy>) -> &'static str {
    privacy.map(|p| p.as_str()).unwrap_or("-")
}

fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime = ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    Ok(UploadFile::new(name, mime, bytes))
}
