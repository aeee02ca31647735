use anyhow::{Context, Result, bail};
use boardgraph_core::{
    BoardSummary, Dataset, EdgeSpec, EngineSettings, ExplorationMode, NodeId, NodeKind,
};
use boardgraph_events::{Event, EventBus, NavigationKey};
use boardgraph_graph::{GraphEngine, GraphModel, RenderService};
use clap::Parser;
use crossbeam_channel::{RecvTimeoutError, bounded};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the dataset JSON file
    dataset: PathBuf,

    /// Path to an engine settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Exploration mode to start in (overrides settings)
    #[arg(short, long)]
    mode: Option<ExplorationMode>,
}

const HELP: &str = "\
commands:
  click <id>          click a node
  hover <id>          show the tooltip of a node
  unhover             hide the tooltip
  crumb <id>          click a breadcrumb entry
  clear               clear the breadcrumb
  input <text>        type into the search box
  search <text>       submit a search
  key up|down|enter|esc
  pick <n>            pick suggestion n
  mode visual|list    switch exploration mode
  reset               back to the seed companies
  summary <company>   directors of a company that sit on other boards
  stats               print the current view
  edges               list the visible edges
  dismiss             dismiss an alert
  quit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Event(Event),
    Summary(String),
    Show,
    Edges,
    Dismiss,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let id = || -> Result<NodeId> {
        if rest.is_empty() {
            bail!("`{word}` needs a node id");
        }
        Ok(NodeId::from(rest))
    };

    let command = match word {
        "click" => Command::Event(Event::NodeClick { id: id()? }),
        "hover" => Command::Event(Event::HoverStart { id: id()? }),
        "unhover" => Command::Event(Event::HoverEnd),
        "crumb" => Command::Event(Event::BreadcrumbClick { id: id()? }),
        "clear" => Command::Event(Event::ClearBreadcrumb),
        "input" => Command::Event(Event::SearchInput {
            query: rest.to_string(),
        }),
        "search" => Command::Event(Event::SearchSubmit {
            query: rest.to_string(),
        }),
        "key" => {
            let key = match rest {
                "up" => NavigationKey::Up,
                "down" => NavigationKey::Down,
                "enter" => NavigationKey::Enter,
                "esc" | "escape" => NavigationKey::Escape,
                other => bail!("Unknown key: {other:?}"),
            };
            Command::Event(Event::SuggestionKey(key))
        }
        "pick" => {
            let index = rest
                .parse::<usize>()
                .with_context(|| format!("Invalid suggestion index: {rest:?}"))?;
            Command::Event(Event::SuggestionPick { index })
        }
        "mode" => Command::Event(Event::ModeChange(rest.parse()?)),
        "reset" => Command::Event(Event::ResetRequested),
        "summary" => Command::Summary(rest.to_string()),
        "stats" => Command::Show,
        "edges" => Command::Edges,
        "dismiss" => Command::Dismiss,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command: {other:?} (try `help`)"),
    };
    Ok(Some(command))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let dataset = Dataset::load(&args.dataset)
        .with_context(|| format!("Failed to load dataset {:?}", args.dataset))?;
    tracing::info!(
        "Loaded {} nodes from {:?}",
        dataset.nodes().len(),
        args.dataset
    );
    let mut settings = match &args.settings {
        Some(path) => EngineSettings::load(path)
            .with_context(|| format!("Failed to load settings {path:?}"))?,
        None => EngineSettings::default(),
    };
    if let Some(mode) = args.mode {
        settings.initial_mode = mode;
    }

    let mut engine =
        GraphEngine::in_memory(dataset, settings).context("Failed to start graph engine")?;
    let warnings = engine
        .consistency()
        .display_lines(engine.settings().warning_display_limit);
    if !warnings.is_empty() {
        println!("Data consistency warnings:");
        for line in warnings {
            println!("  {line}");
        }
    }
    print_view(&engine);

    // Stdin is read on its own thread so pending suggestions can fire while
    // the user is idle.
    let (tx, rx) = bounded::<String>(16);
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let bus = EventBus::new();
    loop {
        let line = match engine.suggestions_due_in(Instant::now()) {
            Some(wait) => match rx.recv_timeout(wait) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };

        let Some(line) = line else {
            if engine.poll_suggestions(Instant::now()) {
                print_suggestions(&engine);
            }
            continue;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };

        match command {
            Command::Event(event) => {
                bus.publish(event);
                bus.dispatch_to(&mut engine);
                print_view(&engine);
            }
            Command::Summary(query) => print_summary(engine.dataset(), &query),
            Command::Show => print_view(&engine),
            Command::Edges => print_edges(&engine),
            Command::Dismiss => {
                engine.dismiss_notice();
                print_view(&engine);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn print_view(engine: &GraphEngine<GraphModel>) {
    match engine.breadcrumb() {
        Some(crumb) => {
            println!("breadcrumb: {crumb}");
            for entry in crumb.entries.iter().filter(|e| e.muted) {
                if let Some(title) = &entry.title {
                    println!("  {} ({title})", entry.label);
                }
            }
        }
        None => println!("breadcrumb: -"),
    }
    println!("mode: {}", engine.mode());
    println!("stats: {}", engine.stats());
    if let Some(tooltip) = engine.tooltip() {
        println!("tooltip: {tooltip}");
    }
    if let Some(notice) = engine.notice(Instant::now()) {
        let prefix = if notice.is_blocking() { "alert" } else { "notice" };
        println!("{prefix}: {}", notice.message);
    }
    let expanded: Vec<&str> = engine
        .expansion()
        .visible_directors()
        .map(NodeId::as_str)
        .collect();
    if !expanded.is_empty() {
        println!("expanded: {}", expanded.join(", "));
    }
    let visible: Vec<String> = engine
        .render()
        .nodes()
        .into_iter()
        .filter(|n| !n.hidden)
        .map(|n| n.label)
        .collect();
    println!("visible: {}", visible.join(", "));
    print_suggestions(engine);
}

fn print_edges(engine: &GraphEngine<GraphModel>) {
    let edges = engine.render().edges(&|_| true);
    println!("edges (arrows: {}):", EdgeSpec::ARROWS);
    for edge in edges {
        let style = if edge.dashes { ", dashed" } else { "" };
        println!(
            "  {} -> {} ({}{style})",
            edge.from,
            edge.to,
            edge.color.as_str()
        );
    }
}

fn print_suggestions(engine: &GraphEngine<GraphModel>) {
    let suggestions = engine.suggestions();
    if !suggestions.is_visible() {
        return;
    }
    println!("suggestions:");
    for (idx, item) in suggestions.items().iter().enumerate() {
        let marker = if suggestions.selected() == Some(idx) {
            ">"
        } else {
            " "
        };
        let kind = match item.kind {
            NodeKind::Company => "company",
            NodeKind::Director => "director",
        };
        println!("{marker} {idx}: {} ({kind})", item.label);
    }
}

fn print_summary(dataset: &Dataset, query: &str) {
    match dataset.board_summary(query) {
        BoardSummary::EmptyQuery => println!("Enter a company name."),
        BoardSummary::UnknownCompany(name) => {
            println!("Company \"{name}\" not found.");
            let close = dataset.summary_suggestions(&name, 10);
            if !close.is_empty() {
                let names: Vec<&str> = close.iter().map(NodeId::as_str).collect();
                println!("Did you mean: {}", names.join(", "));
            }
        }
        BoardSummary::NoSharedDirectors(company) => {
            println!("{company}: no directors sit on other boards.");
        }
        BoardSummary::Shared { company, lines } => {
            println!("{company}:");
            for line in lines {
                let boards: Vec<&str> = line.boards.iter().map(NodeId::as_str).collect();
                println!("  {}: {}", line.director, boards.join(", "));
            }
        }
    }
}
