use clap::{Parser, Subcommand};
use simple_cms::page::{Page, PageId};
use simple_cms::site::Site;
use simple_cms::store::MemoryStore;
use simple_cms::{config, hierarchy, output};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-cms")]
#[command(about = "Manage page trees with path-like slugs and translated titles")]
#[command(long_about = "\
Manage page trees with path-like slugs and translated titles

Every page has a full-path slug: a child of 'about' gets 'about/<leaf>'.
Moving a page or changing its slug rewrites the slugs of its whole subtree.
Titles are stored per language; reading a title in a language that has
none walks the configured fallback chain.

  simple-cms add \"About\"                     # slug: about
  simple-cms add \"Team\" --parent 1           # slug: about/team
  simple-cms --lang fr title 2 \"Équipe\"
  simple-cms move 2                          # back to the root: team
  simple-cms ascendants about/team

Run 'simple-cms gen-config' to generate a documented config.toml.
Set RUST_LOG=debug to see store queries.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Page store document (overrides [site].store)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Active language for reading and writing titles
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Show stored values only, without language fallbacks
    #[arg(long, global = true)]
    no_fallbacks: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a page
    Add {
        title: String,
        /// Parent page id
        #[arg(long)]
        parent: Option<u64>,
        /// Leaf slug, or a full custom slug containing '/'
        #[arg(long)]
        slug: Option<String>,
    },
    /// Move a page under another one, or to the root without --parent
    Move {
        id: u64,
        #[arg(long)]
        parent: Option<u64>,
    },
    /// Change a page's slug and rewrite its descendants
    Slug { id: u64, slug: String },
    /// Set a page's title in the active language
    Title { id: u64, title: String },
    /// Show a page by id or slug
    Show { page: String },
    /// List a page's ancestors, closest first
    Ascendants { page: String },
    /// Print the page tree
    Tree,
    /// Re-save every page, filling missing slugs and breadcrumb titles
    Resave,
    /// Delete a page without children
    Remove { id: u64 },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let cms_config = config::load_config(&cli.config)?;
    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| cms_config.store_path(&cli.config));
    let store = MemoryStore::load(&store_path)?;
    debug!(path = %store_path.display(), pages = store.len(), "loaded store");

    let mut ctx = cms_config.i18n.context();
    if let Some(lang) = &cli.lang {
        ctx.activate(lang);
    }
    let mut site = Site::new(store, ctx, cms_config.site.site_id());

    // Read-only views honour --no-fallbacks; writes always resolve normally.
    let mut changed = true;
    match cli.command {
        Command::Add {
            title,
            parent,
            slug,
        } => {
            let page = site.create_page(&title, parent.map(PageId), slug.as_deref())?;
            output::print_page(&page, site.language());
        }
        Command::Move { id, parent } => {
            let page = site.move_page(PageId(id), parent.map(PageId))?;
            output::print_page(&page, site.language());
        }
        Command::Slug { id, slug } => {
            let page = site.rename_slug(PageId(id), &slug)?;
            output::print_page(&page, site.language());
        }
        Command::Title { id, title } => {
            let ctx = site.language();
            let language = if ctx.translation_enabled() {
                ctx.language().to_string()
            } else {
                ctx.default_language().to_string()
            };
            let page = site.set_title(PageId(id), &language, &title)?;
            output::print_page(&page, site.language());
        }
        Command::Show { page } => {
            changed = false;
            let page = find_page(&site, &page)?;
            let no_fallbacks = cli.no_fallbacks;
            with_view_language(&mut site, no_fallbacks, |ctx| output::print_page(&page, ctx));
        }
        Command::Ascendants { page } => {
            changed = false;
            let mut page = find_page(&site, &page)?;
            site.store().reset_queries();
            let ascendants = hierarchy::get_ascendants(site.store(), &mut page)?.to_vec();
            debug!(queries = site.store().queries(), "resolved ascendants");
            with_view_language(&mut site, cli.no_fallbacks, |ctx| {
                output::print_ascendants(&page, &ascendants, ctx)
            });
        }
        Command::Tree => {
            changed = false;
            let pages = site.pages()?;
            with_view_language(&mut site, cli.no_fallbacks, |ctx| output::print_tree(&pages, ctx));
        }
        Command::Resave => {
            let summary = site.resave_all()?;
            println!("Saved {} pages", summary.saved);
            if !summary.stranded.is_empty() {
                let ids: Vec<String> = summary.stranded.iter().map(|id| id.to_string()).collect();
                println!("Skipped (no path to a root): {}", ids.join(", "));
            }
        }
        Command::Remove { id } => {
            site.remove_page(PageId(id))?;
            println!("Removed page {}", id);
        }
        Command::GenConfig => unreachable!("handled before loading config"),
    }

    if changed {
        site.store().write(&store_path)?;
        debug!(path = %store_path.display(), "wrote store");
    }

    Ok(())
}

fn find_page(site: &Site<MemoryStore>, arg: &str) -> Result<Page, Box<dyn std::error::Error>> {
    site.find_page(arg)?
        .ok_or_else(|| format!("No page with id or slug '{}'", arg).into())
}

fn with_view_language(
    site: &mut Site<MemoryStore>,
    no_fallbacks: bool,
    view: impl FnOnce(&simple_cms::translation::LanguageContext),
) {
    let ctx = site.language_mut();
    if no_fallbacks {
        ctx.without_fallbacks(|ctx| view(&*ctx));
    } else {
        view(&*ctx);
    }
}
