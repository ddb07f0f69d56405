use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use timetable_planner::{
    Day, FileSlotStore, Grid, HourSlot, MemorySlotStore, SlotStore, SqliteSlotStore, Subject,
    TimetablePlanner, default_log_level, init_logging, load_grid_from_csv, save_grid_to_csv,
};

const DB_ENV: &str = "TIMETABLE_DB";
const DIR_ENV: &str = "TIMETABLE_DIR";

#[derive(Debug, Parser)]
#[command(name = "timetable", about = "Weekly study timetable planner")]
struct Args {
    /// SQLite database holding the timetable [env: TIMETABLE_DB].
    #[arg(long, conflicts_with_all = ["dir", "memory"])]
    db: Option<PathBuf>,
    /// Directory for a file-backed store, one JSON file per slot [env: TIMETABLE_DIR].
    #[arg(long, conflicts_with = "memory")]
    dir: Option<PathBuf>,
    /// Keep the timetable in memory only.
    #[arg(long)]
    memory: bool,
    #[arg(long, env = "TIMETABLE_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[arg(long, env = "TIMETABLE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum StoreChoice {
    Memory,
    Dir(PathBuf),
    Db(PathBuf),
}

impl Args {
    /// Explicit flags win; the store env vars only apply when no store flag was given.
    fn store_choice(&self, env: impl Fn(&str) -> Option<String>) -> StoreChoice {
        if self.memory {
            return StoreChoice::Memory;
        }
        if let Some(dir) = &self.dir {
            return StoreChoice::Dir(dir.clone());
        }
        if let Some(db) = &self.db {
            return StoreChoice::Db(db.clone());
        }
        if let Some(dir) = env(DIR_ENV).filter(|v| !v.is_empty()) {
            return StoreChoice::Dir(PathBuf::from(dir));
        }
        let db = env(DB_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "timetable.db".to_string());
        StoreChoice::Db(PathBuf::from(db))
    }

    fn open_store(&self) -> Result<Box<dyn SlotStore>, Box<dyn std::error::Error>> {
        let store: Box<dyn SlotStore> = match self.store_choice(|key| std::env::var(key).ok()) {
            StoreChoice::Memory => Box::new(MemorySlotStore::new()),
            StoreChoice::Dir(dir) => Box::new(FileSlotStore::new(dir)?),
            StoreChoice::Db(path) => Box::new(SqliteSlotStore::new(path)?),
        };
        Ok(store)
    }
}

fn cell_text(grid: &Grid, day_index: usize, hour_index: usize) -> String {
    match grid.cell(day_index, hour_index) {
        Some(cell) if cell.glyph.is_empty() => cell.title.clone(),
        Some(cell) => format!("{} {}", cell.glyph, cell.title),
        None => String::new(),
    }
}

fn render_grid_as_text_table(grid: &Grid) -> String {
    let hours: Vec<HourSlot> = HourSlot::all().collect();
    let hour_labels: Vec<String> = hours.iter().map(ToString::to_string).collect();

    // Column 0 holds hour labels, columns 1..=7 the days.
    let mut widths = vec![hour_labels.iter().map(|s| s.chars().count()).max().unwrap_or(0)];
    for day in Day::ALL {
        let mut width = day.label().len();
        for hour_index in 0..hours.len() {
            width = width.max(cell_text(grid, day.index(), hour_index).chars().count());
        }
        widths.push(width);
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, values: &[String]| {
        out.push('|');
        for (value, width) in values.iter().zip(&widths) {
            out.push(' ');
            out.push_str(value);
            out.push_str(&" ".repeat(width.saturating_sub(value.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    let mut header = vec![String::new()];
    header.extend(Day::ALL.iter().map(|d| d.label().to_string()));
    push_row(&mut out, &header);
    out.push_str(&sep);
    out.push('\n');
    for (hour_index, label) in hour_labels.iter().enumerate() {
        let mut row = vec![label.clone()];
        row.extend(Day::ALL.iter().map(|d| cell_text(grid, d.index(), hour_index)));
        push_row(&mut out, &row);
    }
    out.push_str(&sep);
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                      Show this help\n  show                      Show the timetable\n  subjects                  List available subjects\n  select <day> <hour>       Select a slot (day Mon..Sun, 0-6 or today; hour 7-18)\n  subject <id>              Choose the subject for the next task\n  add <text...>             Add a task to the selected slot\n  clear <day> <hour>        Remove the task in a slot\n  clearall                  Remove every task (asks first)\n  sample                    Load the sample timetable\n  export <csv_path>         Write populated slots to CSV\n  import <csv_path>         Replace the timetable from CSV\n  quit|exit                 Exit"
    );
}

fn print_subjects(current: &Subject) {
    println!("Available subjects:");
    for subject in Subject::catalog() {
        let marker = if subject.id == current.id { "*" } else { " " };
        println!(" {marker} {:<6} {}", subject.id, subject);
    }
}

fn print_state<S: SlotStore>(planner: &TimetablePlanner<S>, subject: &Subject) {
    println!("{}", render_grid_as_text_table(planner.grid()));
    println!("Selected: {}   Subject: {}", planner.selected_label(), subject);
}

fn parse_day_index(input: &str) -> Option<usize> {
    if input.eq_ignore_ascii_case("today") {
        return Some(Day::today().index());
    }
    input
        .parse::<usize>()
        .ok()
        .or_else(|| input.parse::<Day>().ok().map(Day::index))
}

fn parse_hour_index(input: &str) -> Option<usize> {
    let hour = input.strip_suffix(":00").unwrap_or(input);
    hour.parse::<u8>()
        .ok()
        .and_then(HourSlot::from_hour)
        .map(HourSlot::index)
}

/// Parses `<day> <hour>`, printing a usage hint on failure.
fn parse_slot<'a>(
    cmd: &str,
    mut parts: impl Iterator<Item = &'a str>,
) -> Option<(usize, usize)> {
    let (Some(day_s), Some(hour_s)) = (parts.next(), parts.next()) else {
        println!("Usage: {cmd} <day> <hour>");
        return None;
    };
    let Some(day_index) = parse_day_index(day_s) else {
        println!("Invalid day (Mon..Sun or 0-6)");
        return None;
    };
    let Some(hour_index) = parse_hour_index(hour_s) else {
        println!("Invalid hour (7-18)");
        return None;
    };
    Some((day_index, hour_index))
}

fn main() {
    let args = Args::parse();

    if let Some(log_dir) = &args.log_dir {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Logging disabled: {err}");
        }
    }

    let store = match args.open_store() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Could not open timetable store: {err}");
            std::process::exit(1);
        }
    };
    let mut planner = TimetablePlanner::initialize(store);
    let mut subject = Subject::default_subject();

    println!("Study Timetable (CLI) - type 'help' for commands\n");
    print_state(&planner, subject);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = input
            .split_once(char::is_whitespace)
            .map(|(cmd, rest)| (cmd, rest.trim()))
            .unwrap_or((input, ""));
        let parts = rest.split_whitespace();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_state(&planner, subject),
            "subjects" => print_subjects(subject),
            "select" => {
                let Some((day_index, hour_index)) = parse_slot(cmd, parts) else {
                    continue;
                };
                match planner.select(day_index, hour_index) {
                    Ok(()) => println!("Selected {}.", planner.selected_label()),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "subject" => match Subject::lookup(rest) {
                Ok(found) => {
                    subject = found;
                    println!("Subject set to {}.", subject);
                }
                Err(e) => println!("Error: {} (see 'subjects')", e),
            },
            "add" => match planner.assign(rest, subject.id) {
                Ok(true) => {
                    println!("Added to {}.", planner.selected_label());
                    println!("{}", render_grid_as_text_table(planner.grid()));
                }
                Ok(false) => println!("Nothing to add: task text is empty."),
                Err(e) => println!("Error: {}", e),
            },
            "clear" => {
                let Some((day_index, hour_index)) = parse_slot(cmd, parts) else {
                    continue;
                };
                match planner.clear_slot(day_index, hour_index) {
                    Ok(()) => {
                        println!("Slot cleared.");
                        println!("{}", render_grid_as_text_table(planner.grid()));
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "clearall" => {
                let mut ask = |prompt: &str| {
                    print!("{prompt} [y/N] ");
                    let _ = io::stdout().flush();
                    let mut answer = String::new();
                    stdin.read_line(&mut answer).is_ok()
                        && matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
                };
                match planner.clear_all(&mut ask) {
                    Ok(true) => println!("Timetable cleared."),
                    Ok(false) => println!("Clear cancelled."),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "sample" => match planner.load_sample() {
                Ok(()) => {
                    println!("Sample timetable loaded.");
                    println!("{}", render_grid_as_text_table(planner.grid()));
                }
                Err(e) => println!("Error: {}", e),
            },
            "export" => {
                if rest.is_empty() {
                    println!("Usage: export <csv_path>");
                    continue;
                }
                match save_grid_to_csv(planner.grid(), rest) {
                    Ok(()) => println!("Timetable exported to {}.", rest),
                    Err(e) => println!("Error: {}", e),
                }
            }
            "import" => {
                if rest.is_empty() {
                    println!("Usage: import <csv_path>");
                    continue;
                }
                let grid = match load_grid_from_csv(rest) {
                    Ok(grid) => grid,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                match planner.replace_grid(grid) {
                    Ok(()) => {
                        println!("Timetable imported from {}.", rest);
                        println!("{}", render_grid_as_text_table(planner.grid()));
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(args: &[&str], env: &[(&str, &str)]) -> StoreChoice {
        let args = Args::try_parse_from(std::iter::once("cli").chain(args.iter().copied()))
            .expect("arguments should parse");
        args.store_choice(|key| {
            env.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn store_flags_override_store_env_vars() {
        let env = [(DB_ENV, "env.db"), (DIR_ENV, "env-dir")];
        assert_eq!(choice(&["--memory"], &env), StoreChoice::Memory);
        assert_eq!(choice(&["--dir", "d"], &env), StoreChoice::Dir("d".into()));
        assert_eq!(choice(&["--db", "x.db"], &env), StoreChoice::Db("x.db".into()));
    }

    #[test]
    fn store_env_vars_apply_without_flags() {
        assert_eq!(choice(&[], &[(DB_ENV, "env.db")]), StoreChoice::Db("env.db".into()));
        assert_eq!(
            choice(&[], &[(DB_ENV, "env.db"), (DIR_ENV, "env-dir")]),
            StoreChoice::Dir("env-dir".into())
        );
        assert_eq!(choice(&[], &[]), StoreChoice::Db("timetable.db".into()));
    }

    #[test]
    fn explicit_store_flags_still_conflict() {
        assert!(Args::try_parse_from(["cli", "--memory", "--db", "x.db"]).is_err());
    }
}
