mod hooks;
mod logger;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use hooks::GreedyHooks;
use labyrinth_core::{Coords, loader::load_labyrinth_from_string, map::Labyrinth};
use log::LevelFilter;
use logger::MemoryLogger;
use ratatui::{
    crossterm::{
        self,
        event::{self, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use render::{Canvas, Glyph};
use std::{
    collections::HashSet,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Labyrinth map file to load
    #[arg(short, long, value_name = "MAP_FILE", default_value = "maps/labyrinth01.txt")]
    map: PathBuf,

    /// Total weight the expedition can carry
    #[arg(short, long, default_value_t = 10.0)]
    capacity: f32,

    /// Where to write the expedition plan
    #[arg(short, long, value_name = "REPORT_FILE", default_value = "expedition_plan.txt")]
    report: PathBuf,

    /// Print the route and exit instead of opening the viewer
    #[arg(long)]
    headless: bool,

    /// Print the route as JSON (headless only)
    #[arg(long, requires = "headless")]
    json: bool,

    /// Print the labyrinth in map format after the expedition (headless only)
    #[arg(long, requires = "headless")]
    dump: bool,

    /// Log verbosity: off, error, warn, info, debug or trace
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

struct App {
    /// The labyrinth after the expedition: treasures collected, passages cleared.
    labyrinth: Labyrinth,
    /// The route the explorer follows, starting at the origin.
    route: Vec<labyrinth_core::Direction>,
    /// Number of steps of `route` already walked.
    step: usize,
    position: Coords,
    /// Treasures picked up by this expedition that the explorer has not reached yet.
    pending: HashSet<Coords>,
    /// Value carried so far.
    carried: f32,
    capacity: f32,
    logger: &'static MemoryLogger,
    /// Flag to control the main loop.
    should_quit: bool,
    /// Flag set once the explorer is back home.
    finished: bool,
}

impl App {
    fn new(
        labyrinth: Labyrinth,
        route: Vec<labyrinth_core::Direction>,
        collected_before: &HashSet<Coords>,
        capacity: f32,
        logger: &'static MemoryLogger,
    ) -> Self {
        let pending = labyrinth
            .iter()
            .filter(|(c, t)| t.is_collected() && !collected_before.contains(c))
            .map(|(c, _)| c)
            .collect();
        App {
            labyrinth,
            route,
            step: 0,
            position: Coords::ORIGIN,
            pending,
            carried: 0.0,
            capacity,
            logger,
            should_quit: false,
            finished: false,
        }
    }

    /// Moves the explorer one step along the route.
    fn tick(&mut self) {
        if self.finished {
            return;
        }
        let Some(&direction) = self.route.get(self.step) else {
            self.finished = true;
            log::info!("explorer is back home carrying {}", self.carried);
            return;
        };

        self.position = self.position.go(direction);
        self.step += 1;

        if self.pending.remove(&self.position) {
            if let Some(treasure) = self.labyrinth.get(self.position).and_then(|t| t.treasure()) {
                self.carried += treasure.value;
                log::info!(
                    "picked up treasure worth {} at {}",
                    treasure.value,
                    self.position
                );
            }
        }
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let logger = logger::init(args.log_level).context("Failed to install logger")?;

    let result = run(&args, logger);
    if args.headless || result.is_err() {
        for line in logger.drain() {
            eprintln!("{line}");
        }
    }
    result
}

fn run(args: &Args, logger: &'static MemoryLogger) -> Result<()> {
    if !args.map.exists() {
        return Err(anyhow::anyhow!(
            "Map file does not exist: {}",
            args.map.display()
        ));
    }
    let source = std::fs::read_to_string(&args.map)
        .with_context(|| format!("Failed to read map file {}", args.map.display()))?;
    let mut labyrinth = load_labyrinth_from_string(&source)
        .with_context(|| format!("Failed to load labyrinth from {}", args.map.display()))?;
    log::info!(
        "loaded {} tiles from {}",
        labyrinth.len(),
        args.map.display()
    );

    let collected_before: HashSet<Coords> = labyrinth
        .iter()
        .filter(|(_, t)| t.is_collected())
        .map(|(c, _)| c)
        .collect();

    let mut hooks = GreedyHooks::new();
    let route = labyrinth
        .explore(&mut hooks, args.capacity, &args.report)
        .context("Expedition failed")?;

    if args.headless {
        if args.json {
            println!("{}", serde_json::to_string(&route)?);
        } else {
            let symbols: String = route.iter().map(|d| d.symbol()).collect();
            println!("{symbols}");
        }
        if args.dump {
            println!("{}", labyrinth.to_map_string());
        }
        return Ok(());
    }

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Create the application state
    let mut app = App::new(labyrinth, route, &collected_before, args.capacity, logger);

    // Run the main application loop
    let outcome = run_app(&mut terminal, &mut app);

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    outcome
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into) // Map io::Error to anyhow::Error
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250); // One step per tick
    let mut last_tick = Instant::now();

    loop {
        // Draw the UI
        terminal.draw(|f| ui(f, app))?;

        // Calculate timeout for event polling
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        // Poll for events (keyboard, mouse, etc.)
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Area for the map
            Constraint::Length(4),      // Area for the expedition status
            Constraint::Min(3),         // Area for the log
            Constraint::Length(2),      // Area for help
        ])
        .split(frame.area());

    render_map(frame, main_layout[0], app);
    render_status(frame, main_layout[1], app);
    render_log(frame, main_layout[2], app);

    let help_text = Paragraph::new("Press 'q' or 'Esc' to quit.")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[3]);
}

/// Renders the labyrinth with the walked trail and the explorer.
fn render_map(frame: &mut Frame, area: Rect, app: &App) {
    let mut canvas = Canvas::draw(&app.labyrinth, &app.route[..app.step]);
    canvas.place_explorer(app.position);

    let lines: Vec<Line> = canvas
        .rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|glyph| {
                    let style = match glyph {
                        Glyph::Wall => Style::default().fg(Color::DarkGray),
                        Glyph::Origin => Style::default().fg(Color::Cyan).bold(),
                        Glyph::Treasure => Style::default().fg(Color::Yellow).bold(),
                        Glyph::Collected => Style::default().fg(Color::Green),
                        Glyph::Trail => Style::default().fg(Color::Blue),
                        Glyph::Explorer => Style::default().fg(Color::Red).bold(),
                        Glyph::Void | Glyph::Floor | Glyph::Passage => Style::default(),
                    };
                    Span::styled(glyph.symbol().to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let map_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Labyrinth").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(map_paragraph, area);
}

/// Renders position, progress and carried value.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let state = if app.finished {
        Span::styled("back home", Style::default().fg(Color::Green))
    } else {
        Span::styled("exploring", Style::default().fg(Color::Yellow))
    };
    let lines = vec![
        Line::from(vec![
            Span::raw(format!(
                "Position: {}  Step: {}/{}  ",
                app.position,
                app.step,
                app.route.len()
            )),
            state,
        ]),
        Line::from(format!(
            "Carried value: {}  Capacity: {}  Treasures ahead: {}",
            app.carried,
            app.capacity,
            app.pending.len()
        )),
    ];

    let status = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Expedition"));
    frame.render_widget(status, area);
}

/// Renders the most recent log lines.
fn render_log(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .logger
        .recent(visible)
        .into_iter()
        .map(ListItem::new)
        .collect();

    let log_widget = List::new(items).block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(log_widget, area);
}
