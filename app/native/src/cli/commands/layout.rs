//! Blueprint inspection and scripted layout sessions.

use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types;
use crate::cli::output;
use crate::config::GridtileConfig;
use crate::error::GridtileError;
use crate::modules::controller::{Feedback, LayoutController};
use crate::modules::effects::CommandApplier;
use crate::modules::input::{InputTranslator, KeyInput, translate_key};
use crate::modules::layout::{Blueprint, LayoutSession, LayoutSnapshot};
use crate::modules::persistence::{FileStore, LayoutStore, MemoryStore, PersistenceAdapter};

/// Options for [`execute_play`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayOptions<'a> {
    pub blueprint: Option<&'a str>,
    pub ephemeral: bool,
    pub json: bool,
}

/// One replayed key press.
#[derive(Debug, Serialize)]
struct PlayStep {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<String>,
    feedback: Vec<Feedback>,
}

#[derive(Serialize)]
struct PlayReport<'a> {
    steps: &'a [PlayStep],
    snapshot: &'a LayoutSnapshot,
}

// ============================================================================
// Blueprints
// ============================================================================

/// Execute the blueprints command.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn execute_blueprints(config: &GridtileConfig, json: bool) -> Result<(), GridtileError> {
    #[derive(Tabled)]
    struct BlueprintRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Grid")]
        grid: String,
        #[tabled(rename = "Frames")]
        frames: usize,
        #[tabled(rename = "Tiles")]
        tiles: usize,
        #[tabled(rename = "Overlap")]
        overlap: String,
    }

    let catalog = config.catalog();
    if json {
        return output::print_json(&catalog);
    }

    let rows: Vec<BlueprintRow> = catalog
        .iter()
        .map(|b| BlueprintRow {
            id: b.id.clone(),
            name: b.name.clone(),
            grid: format!("{}x{}", b.grid.rows, b.grid.cols),
            frames: b.frames.len(),
            tiles: b.tiles.len(),
            overlap: output::format_bool(b.gates.allow_overlap),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..6)).with(Alignment::center()))
        .to_string();

    println!("{}", format!("Blueprints ({})", catalog.len()).bold());
    println!("{table}");
    Ok(())
}

// ============================================================================
// Show
// ============================================================================

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the blueprint does not exist.
pub fn execute_show(
    config: &GridtileConfig,
    blueprint: Option<&str>,
    json: bool,
) -> Result<(), GridtileError> {
    let session = build_session(config, blueprint)?;
    let snapshot = session.snapshot();

    if json {
        return output::print_json(&snapshot);
    }

    print_layout(session.blueprint(), &snapshot);
    Ok(())
}

// ============================================================================
// Play
// ============================================================================

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if a key token is invalid, the blueprint does not exist,
/// or the async runtime cannot be created.
pub fn execute_play(
    config: &GridtileConfig,
    tokens: &[String],
    options: &PlayOptions<'_>,
) -> Result<(), GridtileError> {
    let keys = types::parse_keys(tokens)?;
    let session = build_session(config, options.blueprint)?;
    let namespace = config.persistence.namespace.clone();

    if options.ephemeral {
        let adapter = PersistenceAdapter::new(MemoryStore::new(), namespace);
        run_play(build_controller(config, session, adapter), &keys, options.json)
    } else {
        let store = FileStore::new(config.persistence.store_path());
        tracing::debug!(path = %store.path().display(), "using layouts file");
        let adapter = PersistenceAdapter::new(store, namespace);
        run_play(build_controller(config, session, adapter), &keys, options.json)
    }
}

fn build_session(
    config: &GridtileConfig,
    blueprint: Option<&str>,
) -> Result<LayoutSession, GridtileError> {
    let mut session = LayoutSession::new(config.catalog())?;
    if let Some(id) = blueprint {
        session.select_blueprint_by_id(id)?;
    }
    Ok(session)
}

fn build_controller<S: LayoutStore>(
    config: &GridtileConfig,
    session: LayoutSession,
    adapter: PersistenceAdapter<S>,
) -> LayoutController<S> {
    let controller = LayoutController::new(
        session,
        adapter,
        InputTranslator::new(config.input.gamepad_settings()),
        config.viewport.viewport(),
    );

    match &config.window_helper.program {
        Some(program) => controller.with_applier(std::sync::Arc::new(CommandApplier::new(program))),
        None => controller,
    }
}

fn run_play<S: LayoutStore>(
    mut controller: LayoutController<S>,
    keys: &[KeyInput],
    json: bool,
) -> Result<(), GridtileError> {
    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    let steps: Vec<PlayStep> = rt.block_on(async {
        let mut steps = Vec::with_capacity(keys.len());
        for key in keys {
            let mut feedback: Vec<Feedback> = controller.handle_key(key).into_iter().collect();
            feedback.extend(controller.wait_for_apply().await);

            steps.push(PlayStep {
                key: key.to_string(),
                command: translate_key(key).map(|command| command.to_string()),
                feedback,
            });
        }
        steps
    });

    let snapshot = controller.session().snapshot();

    if json {
        return output::print_json(&PlayReport { steps: &steps, snapshot: &snapshot });
    }

    for step in &steps {
        let command = step.command.as_deref().unwrap_or("(unbound)");
        let key = format!("{:>12}", step.key);
        let notes: Vec<String> = step
            .feedback
            .iter()
            .map(|feedback| {
                let text = feedback.to_string();
                if feedback.is_negative() { text.red() } else { text.green() }.to_string()
            })
            .collect();
        println!("{}  {}  {}", key.bold(), command.dimmed(), notes.join("  "));
    }

    if !steps.is_empty() {
        println!();
    }

    print_layout(controller.session().blueprint(), &snapshot);
    Ok(())
}

// ============================================================================
// Layout Output
// ============================================================================

fn print_layout(blueprint: &Blueprint, snapshot: &LayoutSnapshot) {
    #[derive(Tabled)]
    struct TileRow {
        #[tabled(rename = "")]
        label: char,
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Position")]
        position: String,
        #[tabled(rename = "Span")]
        span: String,
        #[tabled(rename = "Focused")]
        focused: String,
        #[tabled(rename = "Maximized")]
        maximized: String,
        #[tabled(rename = "Hidden")]
        hidden: String,
    }

    let grid = snapshot.grid;
    println!(
        "{} {}",
        blueprint.name.bold(),
        format!("({}, {}x{})", blueprint.id, grid.rows, grid.cols).dimmed()
    );

    for line in output::occupancy_map(snapshot) {
        println!("  {line}");
    }
    println!();

    if snapshot.tiles.is_empty() {
        println!("{}", "No tiles.".dimmed());
        return;
    }

    let rows: Vec<TileRow> = snapshot
        .tiles
        .iter()
        .enumerate()
        .map(|(index, tile)| TileRow {
            label: output::tile_label(index),
            id: tile.id.clone(),
            title: tile.title.clone(),
            position: format!("{}, {}", tile.rect.row, tile.rect.col),
            span: format!("{}x{}", tile.rect.row_span, tile.rect.col_span),
            focused: output::format_bool(tile.focused),
            maximized: output::format_bool(tile.maximized),
            hidden: output::format_bool(tile.hidden),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..5)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..8)).with(Alignment::center()))
        .to_string();

    println!("{table}");
}
