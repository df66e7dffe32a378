//! Scripted walkthrough of the client against the mock gateway.
//!
//! Signs in, browses the catalogue, reads a chapter, records progress, and
//! signs out again, printing what a page would render at each step.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use serde::de::DeserializeOwned;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use flutterpage::api::{ApiResponse, BookPage, LoginData, SearchResults};
use flutterpage::domain::ports::Navigator;
use flutterpage::domain::{ChapterSummary, ChapterView, Role, SearchScope};
use flutterpage::{AppSettings, ClientRuntime};

/// `flutterpage` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "flutterpage",
    about = "Walk through a reading session against the mock FlutterPage gateway",
    version
)]
struct CliArgs {
    /// Username or email to sign in with.
    #[arg(long, default_value = "alice")]
    user: String,
    /// Password to sign in with.
    #[arg(long, default_value = "secret1")]
    password: String,
    /// Role to sign in as (`reader`, `author`, or `admin`).
    #[arg(long, default_value = "reader")]
    role: Role,
    /// Administrator UID, required with `--role admin`.
    #[arg(long)]
    uid: Option<String>,
    /// Text searched for in the catalogue.
    #[arg(long, default_value = "星")]
    query: String,
    /// Leave the session stored instead of logging out at the end.
    #[arg(long)]
    keep_session: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = AppSettings::load_from_iter([OsString::from("flutterpage")])
        .map_err(|error| eyre!("failed to load configuration: {error}"))?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(walkthrough(args, settings))
}

async fn walkthrough(args: CliArgs, settings: AppSettings) -> Result<()> {
    let runtime = ClientRuntime::from_settings(settings).wrap_err("failed to start the client")?;
    let page = runtime.open_page().await;

    if page.current_user().is_none() {
        let credentials = runtime
            .session()
            .login(&args.user, &args.password, args.role, args.uid.as_deref())
            .wrap_err("login rejected")?;
        let login: LoginData = expect_data(runtime.client().user().login(&credentials).await?, "login")?;
        write_line(&format!("signed_in={} role={}", login.user.username, login.role));
    }
    if !page.require(Role::Reader).await {
        return Err(eyre!("reader access denied"));
    }
    if let Some(welcome) = page.welcome_message() {
        write_line(&welcome);
    }

    let listing: BookPage = expect_data(runtime.client().book().list(1, None).await?, "list books")?;
    write_line(&format!(
        "books page={} total={} has_more={}",
        listing.pagination.page, listing.pagination.total, listing.pagination.has_more
    ));
    for book in &listing.books {
        write_line(&format!("  #{} {} by {} ({})", book.id, book.title, book.author_name, book.tags.join("/")));
    }

    let found: SearchResults = expect_data(
        runtime.client().book().search(&args.query, SearchScope::All).await?,
        "search",
    )?;
    write_line(&format!("search query={} hits={}", args.query, found.total));

    let book = listing
        .books
        .first()
        .ok_or_else(|| eyre!("the catalogue is empty"))?;
    let router = page.router();
    router.go_to_book_detail(book.id);
    let chapters: Vec<ChapterSummary> =
        expect_data(runtime.client().chapter().list(book.id).await?, "list chapters")?;
    let first = chapters
        .first()
        .ok_or_else(|| eyre!("book {} has no chapters", book.id))?;

    router.go_to_reading_page(book.id, Some(first.id));
    write_line(&format!("location={}", runtime.navigator().current_location()));
    let view: ChapterView = expect_data(
        runtime.client().chapter().content(book.id, first.id).await?,
        "read chapter",
    )?;
    write_line(&format!(
        "reading {} ({} characters) next={}",
        view.chapter.title,
        view.chapter.word_count,
        view.next.map_or_else(|| "none".to_owned(), |id| id.to_string())
    ));

    let saved = runtime
        .client()
        .reading()
        .save_progress(book.id, first.id, 100)
        .await?;
    if let Some(error) = saved.error() {
        return Err(eyre!("saving progress failed: {error}"));
    }
    if let Some(progress) = runtime.session().reading_progress(book.id) {
        write_line(&format!(
            "progress book={} chapter={} percent={} at={}",
            book.id,
            progress.chapter_id,
            progress.progress.get(),
            progress.timestamp.to_rfc3339()
        ));
    }

    if args.keep_session {
        page.close();
    } else {
        page.logout().await;
        write_line(&format!("location={}", runtime.navigator().current_location()));
    }
    Ok(())
}

fn expect_data<T: DeserializeOwned>(response: ApiResponse, action: &str) -> Result<T> {
    if let Some(error) = response.error() {
        return Err(eyre!("{action} failed: {error}"));
    }
    response
        .data_as()
        .wrap_err_with(|| format!("{action} returned an unexpected payload"))
}

fn write_line(message: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}
