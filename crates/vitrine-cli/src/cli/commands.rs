//! # CLI Layer
//!
//! This module is **one possible UI client** for vitrine. It is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads user files (images, imports) and writes exports
//! - Installs a logger
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Open the data directory, apply `--pin`, pick styles
//! 3. **API Dispatch**: Call the appropriate `VitrineApi` method
//! 4. **Output Formatting**: Hand the results to `render` and print them
//! 5. **Error Handling**: Turn library errors into messages a user can act on
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API, data directory and styles
//! - `handle_*()`: Per-command handlers that call the API and print output

use super::render::{
    render_category, render_category_list, render_item_list, render_preferences, render_search,
    render_success, render_warning, CategoryRow, ItemRow,
};
use super::setup::{
    CategoryCommands, Cli, Commands, ItemCommands, ItemFields, PinCommands, PrefSetting,
    PrefsCommands,
};
use super::styles::Styles;
use clap::Parser;
use log::{debug, LevelFilter};
use std::io::Write;
use std::path::{Path, PathBuf};
use vitrine::api::VitrineApi;
use vitrine::config::CONFIG_FILENAME;
use vitrine::error::{Result, VitrineError};
use vitrine::index::EntryRef;
use vitrine::init::initialize;
use vitrine::model::{data_uri, image_mime_for_extension, parse_tags, Archive, Category, ItemDraft};
use vitrine::prefs::PrefKey;
use vitrine::search::ItemQuery;
use vitrine::store::fs::FsStore;

struct AppContext {
    api: VitrineApi<FsStore>,
    data_dir: PathBuf,
    styles: Styles,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    let command = cli
        .command
        .unwrap_or(Commands::Categories { search: None });

    let result = match command {
        Commands::Categories { search } => handle_categories(&ctx, search),
        Commands::Category { action } => match action {
            CategoryCommands::Add { name, description } => {
                handle_category_add(&mut ctx, &name, description)
            }
            CategoryCommands::Edit {
                category,
                name,
                description,
            } => handle_category_edit(&mut ctx, &category, name, description),
            CategoryCommands::Rm { category } => handle_category_rm(&mut ctx, &category),
            CategoryCommands::Show { category } => handle_category_show(&ctx, &category),
        },
        Commands::Item { action } => match action {
            ItemCommands::Add {
                category,
                title,
                fields,
                favorite,
            } => handle_item_add(&mut ctx, &category, title.join(" "), fields, favorite),
            ItemCommands::Edit {
                category,
                item,
                title,
                fields,
                no_image,
            } => handle_item_edit(&mut ctx, &category, &item, title, fields, no_image),
            ItemCommands::Rm { category, item } => handle_item_rm(&mut ctx, &category, &item),
            ItemCommands::Fav { category, item } => handle_item_fav(&mut ctx, &category, &item),
            ItemCommands::List {
                category,
                search,
                favorites,
            } => handle_item_list(&ctx, &category, search, favorites),
        },
        Commands::Search { query } => handle_search(&ctx, &query),
        Commands::Export { path } => handle_export(&ctx, path),
        Commands::Import { path } => handle_import(&mut ctx, &path),
        Commands::Prefs { action } => handle_prefs(&mut ctx, action),
        Commands::Pin { action } => match action {
            PinCommands::Set { code } => handle_pin_set(&mut ctx, &code),
        },
        Commands::Unlock { code } => handle_unlock(&mut ctx, &code),
        Commands::Init => handle_init(&ctx),
    };
    result.map_err(user_facing)
}

/// `-v` raises the default level; `RUST_LOG` still wins when set.
fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let vitrine_ctx = initialize(cli.data.clone())?;
    let mut api = vitrine_ctx.api;
    debug!("Data directory: {}", vitrine_ctx.data_dir.display());

    if let Some(pin) = &cli.pin {
        if api.is_locked() && !api.unlock(pin)? {
            return Err(VitrineError::Api("Wrong PIN".to_string()));
        }
    }

    let styles = Styles::for_theme(&api.preferences().theme);
    Ok(AppContext {
        api,
        data_dir: vitrine_ctx.data_dir,
        styles,
    })
}

fn user_facing(err: VitrineError) -> VitrineError {
    match err {
        VitrineError::Locked => VitrineError::Api(
            "Archive is locked. Pass the PIN with --pin or VITRINE_PIN".to_string(),
        ),
        VitrineError::CategoryNotFound(r) => VitrineError::Api(format!(
            "Select a category first: nothing matches '{}'",
            r
        )),
        other => other,
    }
}

fn entry(raw: &str) -> Result<EntryRef> {
    raw.parse()
}

fn category_rows<'a>(
    archive: &'a Archive,
    categories: impl IntoIterator<Item = &'a Category>,
) -> Vec<CategoryRow<'a>> {
    categories
        .into_iter()
        .filter_map(|c| {
            archive
                .categories
                .iter()
                .position(|other| other.id == c.id)
                .map(|i| (i + 1, c))
        })
        .collect()
}

fn position_in(category: &Category, item_id: &vitrine::model::ItemId) -> usize {
    category
        .items
        .iter()
        .position(|it| &it.id == item_id)
        .map_or(0, |i| i + 1)
}

fn read_image(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        VitrineError::Api(format!("Could not read image {}: {}", path.display(), e))
    })?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    debug!("Read {} bytes of image data from {}", bytes.len(), path.display());
    Ok(data_uri(image_mime_for_extension(ext), &bytes))
}

// --- Categories ---

fn handle_categories(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let archive = ctx.api.archive()?;
    let rows = match search {
        Some(query) => category_rows(archive, ctx.api.search_categories(&query)?),
        None => category_rows(archive, &archive.categories),
    };
    println!("{}", ctx.styles.heading.apply_to(&archive.title));
    print!("{}", render_category_list(&rows, &ctx.styles));
    Ok(())
}

fn handle_category_add(
    ctx: &mut AppContext,
    name: &str,
    description: Option<String>,
) -> Result<()> {
    let category = ctx.api.create_category(name, description)?;
    let pos = ctx.api.archive()?.categories.len();
    print!(
        "{}",
        render_success(
            &format!("Created category {}. {}", pos, category.name),
            &ctx.styles
        )
    );
    Ok(())
}

fn handle_category_edit(
    ctx: &mut AppContext,
    category: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let target = entry(category)?;
    let current = ctx.api.category(&target)?;
    let name = name.unwrap_or_else(|| current.name.clone());
    let description = description.or_else(|| current.description.clone());
    let updated = ctx.api.rename_category(&target, &name, description)?;
    print!(
        "{}",
        render_success(&format!("Updated category {}", updated.name), &ctx.styles)
    );
    Ok(())
}

fn handle_category_rm(ctx: &mut AppContext, category: &str) -> Result<()> {
    let removed = ctx.api.delete_category(&entry(category)?)?;
    let count = removed.items.len();
    print!(
        "{}",
        render_success(
            &format!(
                "Deleted category {} and its {} {}",
                removed.name,
                count,
                if count == 1 { "item" } else { "items" }
            ),
            &ctx.styles
        )
    );
    Ok(())
}

fn handle_category_show(ctx: &AppContext, category: &str) -> Result<()> {
    let category = ctx.api.category(&entry(category)?)?;
    print!("{}", render_category(category, &ctx.styles));
    Ok(())
}

// --- Items ---

fn apply_fields(mut draft: ItemDraft, fields: ItemFields) -> Result<ItemDraft> {
    if let Some(desc) = fields.desc {
        draft.desc = Some(desc);
    }
    if let Some(url) = fields.url {
        draft.url = Some(url);
    }
    if let Some(tags) = fields.tags {
        draft.tags = parse_tags(&tags);
    }
    if let Some(path) = fields.image {
        draft.image = Some(read_image(&path)?);
    }
    Ok(draft)
}

fn handle_item_add(
    ctx: &mut AppContext,
    category: &str,
    title: String,
    fields: ItemFields,
    favorite: bool,
) -> Result<()> {
    let target = entry(category)?;
    let mut draft = apply_fields(ItemDraft::new(title), fields)?;
    if favorite {
        draft.favorite = Some(true);
    }
    let item = ctx.api.create_item(&target, draft)?;
    let category = ctx.api.category(&target)?;
    print!(
        "{}",
        render_success(
            &format!(
                "Added item {}. {} to {}",
                position_in(category, &item.id),
                item.title,
                category.name
            ),
            &ctx.styles
        )
    );
    Ok(())
}

fn handle_item_edit(
    ctx: &mut AppContext,
    category: &str,
    item: &str,
    title: Option<String>,
    fields: ItemFields,
    no_image: bool,
) -> Result<()> {
    let cat_ref = entry(category)?;
    let item_ref = entry(item)?;
    let (_, current) = ctx.api.item(&cat_ref, &item_ref)?;
    let mut draft = ItemDraft::from_item(current);
    if let Some(title) = title {
        draft.title = title;
    }
    let mut draft = apply_fields(draft, fields)?;
    if no_image {
        draft.image = None;
    }
    let updated = ctx.api.update_item(&cat_ref, &item_ref, draft)?;
    print!(
        "{}",
        render_success(&format!("Updated item {}", updated.title), &ctx.styles)
    );
    Ok(())
}

fn handle_item_rm(ctx: &mut AppContext, category: &str, item: &str) -> Result<()> {
    let removed = ctx.api.delete_item(&entry(category)?, &entry(item)?)?;
    print!(
        "{}",
        render_success(&format!("Deleted item {}", removed.title), &ctx.styles)
    );
    Ok(())
}

fn handle_item_fav(ctx: &mut AppContext, category: &str, item: &str) -> Result<()> {
    let cat_ref = entry(category)?;
    let item_ref = entry(item)?;
    let favorite = ctx.api.toggle_favorite(&cat_ref, &item_ref)?;
    let (_, item) = ctx.api.item(&cat_ref, &item_ref)?;
    let message = if favorite {
        format!("Added {} to favorites", item.title)
    } else {
        format!("Removed {} from favorites", item.title)
    };
    print!("{}", render_success(&message, &ctx.styles));
    Ok(())
}

fn handle_item_list(
    ctx: &AppContext,
    category: &str,
    search: Option<String>,
    favorites: bool,
) -> Result<()> {
    let target = entry(category)?;
    let query = ItemQuery {
        text: search,
        favorites_only: favorites,
    };
    let category = ctx.api.category(&target)?;
    let rows: Vec<ItemRow<'_>> = ctx
        .api
        .list_items(&target, &query)?
        .into_iter()
        .map(|item| (position_in(category, &item.id), item))
        .collect();
    println!("{}", ctx.styles.heading.apply_to(&category.name));
    print!("{}", render_item_list(&rows, &ctx.styles));
    Ok(())
}

fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let archive = ctx.api.archive()?;
    let categories = category_rows(archive, ctx.api.search_categories(query)?);
    let items: Vec<(CategoryRow<'_>, ItemRow<'_>)> = ctx
        .api
        .search_items(query)?
        .into_iter()
        .filter_map(|hit| {
            let cat_row = category_rows(archive, [hit.category]).pop()?;
            Some((cat_row, (position_in(hit.category, &hit.item.id), hit.item)))
        })
        .collect();
    print!("{}", render_search(&categories, &items, &ctx.styles));
    Ok(())
}

// --- Import / export ---

fn handle_export(ctx: &AppContext, path: Option<String>) -> Result<()> {
    let bytes = ctx.api.export_snapshot()?;
    let path = path.unwrap_or_else(|| ctx.api.config().export_file.clone());
    if path == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.write_all(b"\n")?;
        return Ok(());
    }
    std::fs::write(&path, &bytes)?;
    let archive = ctx.api.archive()?;
    print!(
        "{}",
        render_success(
            &format!(
                "Exported {} categories, {} items to {}",
                archive.categories.len(),
                archive.item_count(),
                path
            ),
            &ctx.styles
        )
    );
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| VitrineError::Api(format!("Could not read {}: {}", path.display(), e)))?;
    let summary = ctx.api.import_snapshot(&bytes).map_err(|e| match e {
        VitrineError::Parse(inner) => VitrineError::Api(format!("Invalid JSON file: {}", inner)),
        other => other,
    })?;
    print!(
        "{}",
        render_success(
            &format!(
                "Imported {} categories, {} items",
                summary.categories, summary.items
            ),
            &ctx.styles
        )
    );
    Ok(())
}

// --- Preferences and PIN ---

fn handle_prefs(ctx: &mut AppContext, action: Option<PrefsCommands>) -> Result<()> {
    match action {
        None => print!("{}", render_preferences(ctx.api.preferences(), &ctx.styles)),
        Some(PrefsCommands::Get { key }) => println!("{}", ctx.api.get_preference(&key)?),
        Some(PrefsCommands::Set { setting }) => {
            let key = match setting {
                PrefSetting::Theme { value } => {
                    ctx.api.set_theme(value.into())?;
                    PrefKey::Theme
                }
                PrefSetting::Anim { value } => {
                    ctx.api.set_anim(value.into())?;
                    PrefKey::Anim
                }
            };
            let current = ctx.api.preferences().get(key);
            print!(
                "{}",
                render_success(&format!("{} = {}", key.as_str(), current), &ctx.styles)
            );
        }
    }
    Ok(())
}

fn handle_pin_set(ctx: &mut AppContext, code: &str) -> Result<()> {
    ctx.api.set_pin(code)?;
    print!(
        "{}",
        render_success(
            "PIN set. Later runs need --pin or VITRINE_PIN to open the archive",
            &ctx.styles
        )
    );
    Ok(())
}

fn handle_unlock(ctx: &mut AppContext, code: &str) -> Result<()> {
    if !ctx.api.has_pin()? {
        print!("{}", render_warning("No PIN is set", &ctx.styles));
        return Ok(());
    }
    if !ctx.api.unlock(code)? {
        return Err(VitrineError::Api("Wrong PIN".to_string()));
    }
    print!("{}", render_success("PIN accepted", &ctx.styles));
    Ok(())
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    ctx.api.save_preferences()?;
    print!(
        "{}",
        render_success(
            &format!("Initialized vitrine in {}", ctx.data_dir.display()),
            &ctx.styles
        )
    );
    let store = ctx.api.store();
    for key in vitrine::store::StoreKey::ALL {
        let path = store.path_for(key);
        let state = if path.exists() { "" } else { " (not created yet)" };
        println!("  {}{}", path.display(), ctx.styles.muted.apply_to(state));
    }
    println!(
        "  {}{}",
        ctx.data_dir.join(CONFIG_FILENAME).display(),
        ctx.styles.muted.apply_to(" (optional config)")
    );
    Ok(())
}
