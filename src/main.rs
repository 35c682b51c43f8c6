mod commands;

use clap::{Parser, Subcommand};

use feeddeck::{Endpoint, FeedStore, HttpFeedTransport};

/// Browse the profile deck from the terminal
#[derive(Parser)]
struct Args {
    /// Feed host, e.g. http://localhost:8080 (defaults to $FEEDDECK_HOST or the public sample)
    #[arg(long, global = true)]
    host: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the feed and list the deck
    Show,
    /// Fetch the feed and replay one vertical swipe
    Swipe {
        /// Y position where the drag started
        #[arg(long, allow_hyphen_values = true)]
        from: f64,
        /// Y position where the drag ended
        #[arg(long, allow_hyphen_values = true)]
        to: f64,
        /// User id of the swiped profile (defaults to the current one)
        #[arg(long)]
        item: Option<i64>,
    },
}

fn endpoint(host: Option<String>) -> Endpoint {
    match host.or_else(|| std::env::var("FEEDDECK_HOST").ok()) {
        Some(host) => Endpoint::default().with_host(host),
        None => Endpoint::default(),
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let transport = HttpFeedTransport::new(&endpoint(args.host))?;
    let store = FeedStore::new(transport);

    match args.command {
        Some(Command::Show) | None => commands::show::cmd_show(&store),
        Some(Command::Swipe { from, to, item }) => {
            commands::swipe::cmd_swipe(&store, from, to, item)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
