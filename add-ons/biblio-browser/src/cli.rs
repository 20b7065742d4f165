use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "biblio")]
#[command(about = "Browse a library ontology from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the configured API base URL
    #[arg(long, global = true)]
    pub api: Option<String>,

    /// Locale for searches and labels (es, en, qu, fr, de)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the local ontology (or DBpedia with --online)
    Search {
        query: String,

        /// Restrict local results to one class (ignored online)
        #[arg(long, short)]
        category: Option<String>,

        #[arg(long)]
        online: bool,
    },
    /// Show one entity by id or DBpedia URI
    Show { id: String },
    /// List every individual of a class (libros, revistas, estudiantes, ...)
    List { class: String },
    /// Dashboard counts
    Stats,
    /// Interactive session over stdin
    Browse,
}

/// One line typed into the browse loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search { query: String, online: bool },
    Open(usize),
    Follow { relation: String, index: usize },
    Close,
    Results,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parses a browse-loop line. Indices are 1-based on the prompt and 0-based here.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let cmd = match head.to_lowercase().as_str() {
            "search" | "s" => Self::Search {
                query: non_empty(rest, "search needs a query")?,
                online: false,
            },
            "online" | "o" => Self::Search {
                query: non_empty(rest, "online needs a query")?,
                online: true,
            },
            "open" => Self::Open(position(rest)?),
            "follow" | "f" => {
                let (relation, n) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or_else(|| "usage: follow <relation> <n>".to_string())?;
                Self::Follow {
                    relation: relation.trim().to_string(),
                    index: position(n)?,
                }
            }
            "back" | "close" => Self::Close,
            "results" | "r" => Self::Results,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => match other.parse::<usize>() {
                Ok(_) => Self::Open(position(head)?),
                Err(_) => return Err(format!("unknown command '{}'; try 'help'", head)),
            },
        };
        Ok(Some(cmd))
    }
}

pub const BROWSE_HELP: &str = "\
commands:
  search <text>           search the local ontology
  online <text>           search local + DBpedia
  open <n> | <n>          inspect the n-th result
  follow <relation> <n>   follow the n-th value of a relation
  results                 show the current results again
  back | close            close the detail view
  quit";

fn non_empty(s: &str, msg: &str) -> Result<String, String> {
    if s.is_empty() {
        Err(msg.to_string())
    } else {
        Ok(s.to_string())
    }
}

fn position(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a position starting at 1, got '{}'", s.trim())),
    }
}
