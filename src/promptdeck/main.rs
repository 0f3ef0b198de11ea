use std::fs;
use std::io::{self, Write as _};
use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use unicode_width::UnicodeWidthStr;

use promptdeck::api::{
    CheckpointUpdate, CmdMessage, DeckApi, Direction, ImportDiff, ListedGroup, MessageLevel,
    PromptUpdate, ResetMode,
};
use promptdeck::commands::insert::SETTLE_DELAY;
use promptdeck::composer::FileComposer;
use promptdeck::error::{DeckError, Result};
use promptdeck::model::{Family, LibraryCounts};
use promptdeck::store::fs::FileKv;

mod args;
use args::{CategoryCommands, CheckpointCommands, Cli, Commands, ResetArg, ToggleArg};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: DeckApi<FileKv>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context()?;

    match cli.command {
        Commands::List {
            checkpoints,
            category,
            search,
        } => handle_list(&mut ctx, checkpoints, category, search),
        Commands::Cat(command) => handle_cat(&mut ctx, command),
        Commands::Add {
            category,
            title,
            body,
        } => handle_add(&mut ctx, category, title, body),
        Commands::Edit {
            id,
            title,
            body,
            category,
        } => handle_edit(&mut ctx, id, title, body, category),
        Commands::Delete { id } => handle_delete(&mut ctx, id),
        Commands::Up { id } => handle_move(&mut ctx, id, Direction::Up),
        Commands::Down { id } => handle_move(&mut ctx, id, Direction::Down),
        Commands::Ckpt(command) => handle_ckpt(&mut ctx, command),
        Commands::Insert {
            id,
            into,
            checkpoint,
        } => handle_insert(&mut ctx, id, into, checkpoint),
        Commands::Export { path } => handle_export(&mut ctx, path),
        Commands::Import { path, yes } => handle_import(&mut ctx, path, yes),
        Commands::Reset { mode, yes } => handle_reset(&mut ctx, mode, yes),
        Commands::Autosend { state } => handle_autosend(&mut ctx, state),
    }
}

fn init_context() -> Result<AppContext> {
    let data_dir = match std::env::var_os("PROMPTDECK_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => ProjectDirs::from("com", "promptdeck", "promptdeck")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| DeckError::Store("Could not determine a data directory".to_string()))?,
    };
    Ok(AppContext {
        api: DeckApi::new(FileKv::new(data_dir)),
    })
}

fn family(checkpoints: bool) -> Family {
    if checkpoints {
        Family::Checkpoint
    } else {
        Family::Prompt
    }
}

fn handle_list(
    ctx: &mut AppContext,
    checkpoints: bool,
    category: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let family = family(checkpoints);
    // accept a category name too; an unresolvable reference is passed
    // through so the listing falls back to all categories with a warning
    let category = category.map(|reference| {
        ctx.api
            .resolve_category(family, &reference)
            .unwrap_or(reference)
    });
    let result = ctx
        .api
        .list(family, category.as_deref(), search.as_deref())?;
    print_groups(&result.groups);
    print_messages(&result.messages);
    Ok(())
}

fn handle_cat(ctx: &mut AppContext, command: CategoryCommands) -> Result<()> {
    let result = match command {
        CategoryCommands::Add { name, checkpoints } => {
            ctx.api.add_category(family(checkpoints), &name)?
        }
        CategoryCommands::Rename {
            id,
            name,
            checkpoints,
        } => {
            let family = family(checkpoints);
            let id = ctx.api.resolve_category(family, &id)?;
            ctx.api.rename_category(family, &id, &name)?
        }
        CategoryCommands::Up { id, checkpoints } => {
            let family = family(checkpoints);
            let id = ctx.api.resolve_category(family, &id)?;
            ctx.api.move_category(family, &id, Direction::Up)?
        }
        CategoryCommands::Down { id, checkpoints } => {
            let family = family(checkpoints);
            let id = ctx.api.resolve_category(family, &id)?;
            ctx.api.move_category(family, &id, Direction::Down)?
        }
        CategoryCommands::Delete { id, checkpoints } => {
            let family = family(checkpoints);
            let id = ctx.api.resolve_category(family, &id)?;
            ctx.api.delete_category(family, &id)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, category: String, title: String, body: String) -> Result<()> {
    let category_id = ctx.api.resolve_category(Family::Prompt, &category)?;
    let result = ctx.api.create_prompt(&category_id, &title, &body)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(
    ctx: &mut AppContext,
    id: String,
    title: Option<String>,
    body: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let id = ctx.api.resolve_item(Family::Prompt, &id)?;
    let category_id = match category {
        Some(reference) => Some(ctx.api.resolve_category(Family::Prompt, &reference)?),
        None => None,
    };
    let result = ctx.api.update_prompt(
        &id,
        PromptUpdate {
            title,
            body,
            category_id,
        },
    )?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, id: String) -> Result<()> {
    let id = ctx.api.resolve_item(Family::Prompt, &id)?;
    let result = ctx.api.delete_prompt(&id)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &mut AppContext, id: String, direction: Direction) -> Result<()> {
    let id = ctx.api.resolve_item(Family::Prompt, &id)?;
    let result = ctx.api.move_prompt(&id, direction)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_ckpt(ctx: &mut AppContext, command: CheckpointCommands) -> Result<()> {
    let result = match command {
        CheckpointCommands::Save {
            category,
            title,
            body,
            description,
        } => {
            let category_id = ctx.api.resolve_category(Family::Checkpoint, &category)?;
            ctx.api
                .create_checkpoint(&category_id, &title, &description, &body)?
        }
        CheckpointCommands::Edit {
            id,
            title,
            description,
            body,
            category,
        } => {
            let id = ctx.api.resolve_item(Family::Checkpoint, &id)?;
            let category_id = match category {
                Some(reference) => {
                    Some(ctx.api.resolve_category(Family::Checkpoint, &reference)?)
                }
                None => None,
            };
            ctx.api.update_checkpoint(
                &id,
                CheckpointUpdate {
                    title,
                    description,
                    body,
                    category_id,
                },
            )?
        }
        CheckpointCommands::Delete { id } => {
            let id = ctx.api.resolve_item(Family::Checkpoint, &id)?;
            ctx.api.delete_checkpoint(&id)?
        }
        CheckpointCommands::Up { id } => {
            let id = ctx.api.resolve_item(Family::Checkpoint, &id)?;
            ctx.api.move_checkpoint(&id, Direction::Up)?
        }
        CheckpointCommands::Down { id } => {
            let id = ctx.api.resolve_item(Family::Checkpoint, &id)?;
            ctx.api.move_checkpoint(&id, Direction::Down)?
        }
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_insert(
    ctx: &mut AppContext,
    id: String,
    into: PathBuf,
    checkpoint: bool,
) -> Result<()> {
    let family = family(checkpoint);
    let id = ctx.api.resolve_item(family, &id)?;
    let mut composer = FileComposer::new(into);
    let result = ctx.api.insert(&mut composer, family, &id, SETTLE_DELAY)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &mut AppContext, path: Option<PathBuf>) -> Result<()> {
    let result = ctx.api.export()?;
    let envelope = result
        .export
        .ok_or_else(|| DeckError::Store("export produced no envelope".to_string()))?;

    let path = path.unwrap_or_else(|| {
        let stamp = envelope.meta.exported_at.replace([':', '.'], "-");
        PathBuf::from(format!("promptdeck-{}.json", stamp))
    });
    let json = serde_json::to_string_pretty(&envelope).map_err(DeckError::Serialization)?;
    fs::write(&path, json).map_err(DeckError::Io)?;

    println!("{}", format!("Exported to {}", path.display()).green());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: PathBuf, yes: bool) -> Result<()> {
    let text = fs::read_to_string(&path).map_err(DeckError::Io)?;
    let plan = ctx.api.import_inspect(&text)?;

    print_diff(&plan.diff);
    if !yes && !confirm("Proceed?")? {
        println!("Import cancelled.");
        return Ok(());
    }

    let result = ctx.api.import_commit(plan)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reset(ctx: &mut AppContext, mode: ResetArg, yes: bool) -> Result<()> {
    let (mode, question) = match mode {
        ResetArg::Clear => (ResetMode::Clear, "Delete all categories and items?"),
        ResetArg::Sample => (ResetMode::Sample, "Replace the library with the sample?"),
    };
    if !yes && !confirm(question)? {
        println!("Reset cancelled.");
        return Ok(());
    }
    let result = ctx.api.reset(mode)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_autosend(ctx: &mut AppContext, state: Option<ToggleArg>) -> Result<()> {
    if let Some(state) = state {
        ctx.api.set_auto_send(matches!(state, ToggleArg::On));
    }
    let state = if ctx.api.auto_send() { "on" } else { "off" };
    println!("auto-send: {}", state);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush().map_err(DeckError::Io)?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(DeckError::Io)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_diff(diff: &ImportDiff) {
    println!("Import will REPLACE your current library.");
    println!("  Current:  {}", format_counts(&diff.current));
    println!("  Incoming: {}", format_counts(&diff.incoming));
}

fn format_counts(counts: &LibraryCounts) -> String {
    format!(
        "{} categories, {} prompts, {} checkpoint categories, {} checkpoints",
        counts.categories, counts.prompts, counts.checkpoint_categories, counts.checkpoints
    )
}

const LINE_WIDTH: usize = 100;

fn print_groups(groups: &[ListedGroup]) {
    if groups.is_empty() {
        println!("Nothing to list.");
        return;
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", group.category.name.bold());

        for item in &group.items {
            let mut line = item.title.clone();
            if !item.description.is_empty() {
                line.push_str(" - ");
                line.push_str(&item.description);
            }
            let preview: String = item
                .body
                .chars()
                .take(60)
                .map(|c| if c == '\n' { ' ' } else { c })
                .collect();
            if !preview.is_empty() {
                line.push(' ');
                line.push_str(&preview);
            }

            let trailer = match &item.saved_at {
                Some(saved_at) => format!("  {}", format_time_ago(saved_at)),
                None => String::new(),
            };

            let fixed = 2 + item.id.width() + 2 + trailer.width();
            let available = LINE_WIDTH.saturating_sub(fixed);
            let shown = truncate_to_width(&line, available);
            let padding = available.saturating_sub(shown.width());

            println!(
                "  {}{}  {}{}",
                shown,
                " ".repeat(padding),
                item.id.dimmed(),
                trailer.dimmed()
            );
        }
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(saved_at: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(saved_at) {
        Ok(timestamp) => {
            let duration = Utc::now().signed_duration_since(timestamp.with_timezone(&Utc));
            timeago::Formatter::new().convert(duration.to_std().unwrap_or_default())
        }
        Err(_) => saved_at.to_string(),
    }
}
