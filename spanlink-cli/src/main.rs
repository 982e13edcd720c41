//! Spanlink CLI - Terminal span labeling and relationship annotation

mod app;
mod cursor;
mod io;
mod ui;

use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use spanlink_core::{Annotator, AnnotatorConfig, AnnotatorInput, Intent, Label, Separator};

use app::{App, Focus, View};

/// Label spans of a text document and draw relationships between them
#[derive(Parser, Debug)]
#[command(name = "spanlink", version)]
struct Args {
    /// Plain-text document to annotate
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Resume from a session exported with `e`
    #[arg(long, value_name = "JSON")]
    session: Option<PathBuf>,

    /// Annotator settings (labels, separator, policies) as JSON
    #[arg(short, long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Separator regex used to split text into spans
    #[arg(long, value_name = "REGEX")]
    separator: Option<String>,

    /// Read-only view
    #[arg(long)]
    overview: bool,

    /// Only allow relationships between labeled spans
    #[arg(long)]
    constrain: bool,
}

fn default_config() -> AnnotatorConfig {
    AnnotatorConfig {
        entity_labels: ["PERSON", "ORG", "LOCATION", "DATE", "MISC"]
            .into_iter()
            .map(Label::new)
            .collect(),
        relationship_labels: ["RELATED_TO", "WORKS_FOR", "LOCATED_IN", "PART_OF"]
            .into_iter()
            .map(Label::new)
            .collect(),
        ..AnnotatorConfig::default()
    }
}

fn build_config(args: &Args) -> Result<AnnotatorConfig> {
    let mut config = match &args.config {
        Some(path) => io::load_config(path)?,
        None => default_config(),
    };
    if let Some(pattern) = &args.separator {
        config.separator = Separator::new(pattern).context("Invalid --separator")?;
    }
    config.overview_mode |= args.overview;
    config.constraint_relationships |= args.constrain;
    Ok(config)
}

fn build_app(args: &Args) -> Result<App> {
    let config = build_config(args)?;

    let input = match (&args.session, &args.file) {
        (Some(session), _) => io::load_session(session)?.into_input(),
        (None, Some(path)) => AnnotatorInput::document(io::load_file(path)?),
        (None, None) => AnnotatorInput::default(),
    };

    let mut app = App::new(Annotator::new(config, input));
    app.source_path = args.file.clone();
    match &args.file {
        Some(path) => app.set_status(&format!("Loaded {}", path.display())),
        None if args.session.is_none() => app.set_status("No file loaded. Pass a file path as argument."),
        None => {}
    }
    Ok(app)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = io::init_logging() {
        eprintln!("Logging disabled: {}", e);
    }
    log::info!("spanlink v{} starting", env!("CARGO_PKG_VERSION"));

    let mut app = build_app(&args)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        log::error!("{:#}", e);
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Clear status on any key
            app.clear_status();

            match app.view {
                View::Normal => handle_normal_view(app, key.code),
                View::Visual => handle_visual_view(app, key.code),
                View::Help => {
                    app.view = View::Normal;
                }
            }
        }
    }
    Ok(())
}

fn handle_movement(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('h') | KeyCode::Left => app.move_left(),
        KeyCode::Char('l') | KeyCode::Right => app.move_right(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),
        _ => return false,
    }
    true
}

fn label_number(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

fn handle_normal_view(app: &mut App, code: KeyCode) {
    if app.focus == Focus::Sidebar {
        match code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char(']') => {
                app.next_relationship();
                return;
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('[') => {
                app.prev_relationship();
                return;
            }
            _ => {}
        }
    } else if handle_movement(app, code) {
        return;
    }

    if let Some(n) = label_number(code) {
        app.pick_label(n);
        return;
    }

    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.view = View::Help,

        KeyCode::Tab => app.toggle_mode(),
        KeyCode::Char('s') => app.toggle_focus(),
        KeyCode::Esc => {
            app.dispatch(Intent::ClearSelection);
        }

        // Entity actions
        KeyCode::Char('v') => app.enter_visual_mode(),
        KeyCode::Char('x') => app.remove_label_at_cursor(),

        // Relationship actions
        KeyCode::Enter | KeyCode::Char(' ') => app.pair_at_cursor(),
        KeyCode::Char(']') => app.next_relationship(),
        KeyCode::Char('[') => app.prev_relationship(),
        KeyCode::Char('d') => {
            app.delete_selected_relationship();
        }

        // File
        KeyCode::Char('e') => export(app),
        KeyCode::Char('r') => reload(app),

        _ => {}
    }
}

fn handle_visual_view(app: &mut App, code: KeyCode) {
    if handle_movement(app, code) {
        return;
    }
    if let Some(n) = label_number(code) {
        app.pick_label(n);
        return;
    }
    if code == KeyCode::Esc {
        app.exit_visual_mode();
    }
}

fn export(app: &mut App) {
    let stem = app
        .source_path
        .as_ref()
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "session".to_string());

    match io::export_session(&app.annotator, &stem) {
        Ok(path) => {
            log::info!("exported session to {}", path.display());
            app.dirty = false;
            app.set_status(&format!("Exported to {}", path.display()));
        }
        Err(e) => app.set_status(&format!("Export failed: {}", e)),
    }
}

fn reload(app: &mut App) {
    let Some(path) = app.source_path.clone() else {
        app.set_status("No source file to reload");
        return;
    };
    match io::load_file(&path) {
        Ok(text) => app.replace_document(text),
        Err(e) => app.set_status(&format!("Error: {}", e)),
    }
}
