mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};
use items_core::{view, ItemClient, ItemContainer, UreqTransport};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "items")]
#[command(about = "Browse and edit a REST item collection")]
struct Args {
    /// Base URL of the API server
    #[arg(long, env = "ITEMS_BASE_URL", default_value = "http://127.0.0.1:3000", global = true)]
    base_url: String,

    /// Collection path under the base URL
    #[arg(long, env = "ITEMS_RESOURCE", default_value = "items", global = true)]
    resource: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every item
    List,

    /// Show one item
    Get {
        /// Item id
        id: String,
    },

    /// Create an item from a JSON object
    Create {
        /// Item fields, e.g. '{"title":"Walk dog"}'
        json: String,
    },

    /// Replace an item's fields
    Update {
        /// Item id
        id: String,
        /// New fields as a JSON object
        json: String,
    },

    /// Delete an item
    Delete {
        /// Item id
        id: String,
    },

    /// Read commands from stdin against one long-lived collection
    Session,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = ItemClient::new(&args.base_url).with_resource(&args.resource);
    let mut container = ItemContainer::new(client, UreqTransport::new());
    tracing::debug!(
        base_url = container.client().base_url(),
        resource = container.client().resource(),
        "client configured"
    );

    match args.command {
        Command::List => {
            let items = container.load_all()?;
            println!("{}", view::render_table(items));
        }
        Command::Get { id } => {
            let item = container.load_one(session::parse_id(&id)?)?;
            println!("{}", view::render_item(&item));
        }
        Command::Create { json } => {
            let item = container.create(&session::parse_fields(&json)?)?;
            println!("{}", view::render_item(&item));
        }
        Command::Update { id, json } => {
            let item = container.update(session::parse_id(&id)?, &session::parse_fields(&json)?)?;
            println!("{}", view::render_item(&item));
        }
        Command::Delete { id } => {
            let id = session::parse_id(&id)?;
            container.delete(id)?;
            println!("deleted {id}");
        }
        Command::Session => {
            let stdin = std::io::stdin();
            session::run(&mut container, stdin.lock(), std::io::stdout().lock())?;
        }
    }

    Ok(())
}
