use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    views::{
        create::{CreateAuthorView, Navigation},
        detail::load_author,
        list::{AuthorListView, DELETE_CONFIRMATION},
    },
    AuthorsApi, CascadeDeleter, DeleteOutcome,
};
use futures::future::join_all;
use shared::{domain::AuthorId, protocol::AuthorDraft};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "authors-admin", about = "Manage authors, books and prizes through the REST backend")]
struct Args {
    /// TOML settings file (defaults to ./authors-admin.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base url of the backend api, e.g. http://localhost:8080/api
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every author.
    List,
    /// Show one author with its current books and prizes.
    Show { id: i64 },
    /// Create an author, then show the list.
    Create {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        description: String,
    },
    /// Delete authors, detaching or deleting their books and prizes first.
    Delete {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref(), args.api_url.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let api = AuthorsApi::over_http(&settings.api_url)?;
    info!(api_url = %settings.api_url, "using backend");

    match args.command {
        Command::List => list(&api).await,
        Command::Show { id } => {
            let author = load_author(&api, AuthorId(id))
                .await
                .with_context(|| format!("failed to load author {id}"))?;
            print!("{}", render::render_author(&author));
            Ok(())
        }
        Command::Create {
            name,
            birth_date,
            image,
            description,
        } => {
            let mut view = CreateAuthorView::new(AuthorDraft {
                name,
                birth_date,
                image,
                description,
            });
            match view.submit(&api).await {
                Some(Navigation::Authors) => list(&api).await,
                None => bail!(
                    "{}",
                    view.error().unwrap_or("error creating author")
                ),
            }
        }
        Command::Delete { yes, ids } => {
            let deleter = CascadeDeleter::new(api.clone(), &settings.cascade);
            delete(&api, &deleter, &ids, yes).await
        }
    }
}

async fn list(api: &AuthorsApi) -> Result<()> {
    let mut view = AuthorListView::new();
    view.load(api).await;
    println!("{}", render::render_list(&view));
    Ok(())
}

/// Runs one cascade per confirmed id; the workflows proceed concurrently but
/// never share state beyond the list view's in-flight set.
async fn delete(api: &AuthorsApi, deleter: &CascadeDeleter, ids: &[i64], yes: bool) -> Result<()> {
    let mut view = AuthorListView::new();
    view.load(api).await;

    let mut confirmed = Vec::new();
    for id in ids.iter().copied().map(AuthorId) {
        if !yes && !confirm_delete(id)? {
            continue;
        }
        if view.begin_delete(id) {
            confirmed.push(id);
        }
    }
    if confirmed.is_empty() {
        return Ok(());
    }

    let results = join_all(confirmed.iter().map(|id| deleter.delete_author(*id))).await;

    let mut failures = 0;
    for (id, result) in confirmed.iter().copied().zip(results) {
        view.finish_delete(id, &result);
        match &result {
            Ok(DeleteOutcome::Direct) => println!("Deleted author {id}"),
            Ok(DeleteOutcome::Cascaded {
                books_removed,
                prizes_removed,
                prizes_skipped,
            }) => println!(
                "Deleted author {id} after removing {books_removed} book(s) and {prizes_removed} prize(s) ({prizes_skipped} skipped)"
            ),
            Err(err) => {
                failures += 1;
                eprintln!("Could not delete author {id}: {err}");
            }
        }
    }

    println!("\n{}", render::render_list(&view));
    if failures > 0 {
        bail!("{failures} author deletion(s) failed");
    }
    Ok(())
}

fn confirm_delete(id: AuthorId) -> Result<bool> {
    Ok(
        inquire::Confirm::new(&format!("Delete author {id}?\n{DELETE_CONFIRMATION}"))
            .with_default(false)
            .prompt()?,
    )
}
