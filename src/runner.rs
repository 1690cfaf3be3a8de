//! Command execution for the `tidyhaus` binary.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{ContentSource, HttpClient, LocalQuestionBank, QuestionBankApi};
use crate::cli::{ChecklistArgs, Cli, Command, ContentCommand, FaqArgs};
use crate::config::AppConfig;
use crate::disclosure::FaqDisclosure;
use crate::documents::{FaqPageDocument, load_or_default};
use crate::error::{CmsError, Result};
use crate::explorer::ChecklistSession;
use crate::model::CategoryFilter;
use crate::output;
use crate::scroll_lock::{ScrollLock, VirtualDocument};
use crate::server;
use crate::store::{ContentStore, FileContentStore};

/// Defaults, then the config file, then command-line overrides.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.content_dir {
        config.server.content_dir = dir.clone();
    }
    match &cli.command {
        Command::Serve(args) => {
            if let Some(bind) = args.bind {
                config.server.bind = bind;
            }
        }
        Command::Faq(args) => {
            if let Some(size) = args.page_size {
                config.disclosure.page_size = size;
            }
        }
        _ => {}
    }
    config.validate()?;
    Ok(config)
}

pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    match &cli.command {
        Command::Serve(_) => serve(&config).await,
        Command::Init { output } => init(&config, output).await,
        Command::Faq(args) => match &args.server {
            Some(url) => faq(HttpClient::new(url.as_str())?, &config, args).await,
            None => faq(open_local(&config)?, &config, args).await,
        },
        Command::Checklist(args) => match &args.server {
            Some(url) => checklist(&HttpClient::new(url.as_str())?, &config, args).await,
            None => checklist(&open_local(&config)?, &config, args).await,
        },
        Command::Content(cmd) => content(&config, cmd),
    }
}

fn open_store(config: &AppConfig) -> Result<Arc<dyn ContentStore>> {
    let store: Arc<dyn ContentStore> = Arc::new(FileContentStore::open(&config.server.content_dir)?);
    Ok(store)
}

fn open_local(config: &AppConfig) -> Result<LocalQuestionBank> {
    LocalQuestionBank::open(open_store(config)?)
}

async fn serve(config: &AppConfig) -> Result<()> {
    let local = open_local(config)?;
    info!(
        content_dir = %config.server.content_dir.display(),
        questions = local.bank().read().await.len(),
        "content store opened"
    );
    let listener = TcpListener::bind(config.server.bind).await?;
    server::serve(listener, local, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
        info!("shutting down");
    })
    .await
}

async fn init(config: &AppConfig, format: &str) -> Result<()> {
    let local = open_local(config)?;
    let outcome = local.initialize().await?;
    output::print_initialize(format, &outcome)
}

async fn faq<A>(api: A, config: &AppConfig, args: &FaqArgs) -> Result<()>
where
    A: QuestionBankApi + ContentSource + Clone + 'static,
{
    let page: FaqPageDocument = load_or_default(&api).await;
    let faq = FaqDisclosure::new(api, config.disclosure.clone(), config.timings.clone());
    faq.mount().await;

    if args.search.is_some() || args.category.is_some() {
        if let Some(search) = &args.search {
            faq.set_search(search.as_str());
        }
        if let Some(category) = &args.category {
            faq.set_category(category.parse::<CategoryFilter>()?);
        }
        faq.flush().await;
    }

    for click in 0..args.load_more {
        if !faq.load_more().await {
            info!(click, "no more questions to load");
            break;
        }
    }

    if args.hide {
        let surface = VirtualDocument::new(0.0);
        if !faq.hide(&surface, 0.0).await {
            warn!(
                clicks = faq.state().load_more_clicks(),
                "hide needs at least two load more clicks"
            );
        }
    }

    output::print_faq(&args.output, &page, &faq.state())
}

async fn checklist<S>(source: &S, config: &AppConfig, args: &ChecklistArgs) -> Result<()>
where
    S: ContentSource + ?Sized,
{
    let lock = ScrollLock::new(
        Arc::new(VirtualDocument::new(0.0)),
        config.timings.scroll_restore_fallback,
    );
    let session = ChecklistSession::load(source, lock, &config.timings).await;
    session.select_room(args.room);
    session.select_cleaning_type(args.cleaning_type);
    if let Some(room) = args.open {
        session.open_room(room);
        if let Some(cleaning_type) = args.modal_type {
            session.select_modal_cleaning_type(cleaning_type);
        }
    }
    output::print_checklist(&args.output, &session.explorer())
}

fn content(config: &AppConfig, cmd: &ContentCommand) -> Result<()> {
    let store = open_store(config)?;
    match cmd {
        ContentCommand::List => {
            for page in store.list_documents()? {
                println!("{page}");
            }
            Ok(())
        }
        ContentCommand::Get { page } => {
            let document = store
                .load_document(page)?
                .ok_or_else(|| CmsError::NotFound(format!("content page {page}")))?;
            output::print_document(&document)
        }
        ContentCommand::Put { page, file } => {
            let document = read_document(file)?;
            store.save_document(page, &document)?;
            info!(page = %page, "replaced content document");
            Ok(())
        }
    }
}

fn read_document(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&raw)?;
    if !document.is_object() {
        return Err(CmsError::InvalidArg(format!(
            "{} does not contain a JSON object",
            path.display()
        )));
    }
    Ok(document)
}
