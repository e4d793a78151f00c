mod backend;
mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sodapop_core::config::Settings;
use sodapop_core::feed::SwipeDirection;

#[derive(Parser)]
#[command(name = "sodapop")]
#[command(about = "Swipe through local events, save the ones you like and create your own")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the events you haven't swiped on yet
    Feed {
        /// Show every event again, including saved and passed ones
        #[arg(long)]
        start_over: bool,
    },
    /// Swipe right: save an event (defaults to the top of the feed)
    Save { id: Option<String> },
    /// Swipe left: pass on an event (defaults to the top of the feed)
    Pass { id: Option<String> },
    /// List your saved events
    Saved,
    /// Remove an event from your saved list
    Unsave { id: String },
    /// Show the full details of an event
    Show {
        id: String,

        /// Open the ticket link
        #[arg(long)]
        tickets: bool,

        /// Save the event, or remove it if it is already saved
        #[arg(long)]
        toggle_save: bool,
    },
    /// Create a new event
    New {
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Start time (e.g. "7:00 PM")
        #[arg(short, long)]
        time: String,

        /// Venue name
        #[arg(short, long)]
        venue: String,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Image URL, or 1-10 to pick one of the built-in images
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Show your profile and the events you created
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let app = backend::open(&settings).await?;

    let result = match cli.command {
        Commands::Feed { start_over } => commands::feed::run(&app, start_over).await,
        Commands::Save { id } => commands::swipe::run(&app, id, SwipeDirection::Right).await,
        Commands::Pass { id } => commands::swipe::run(&app, id, SwipeDirection::Left).await,
        Commands::Saved => commands::saved::run(&app).await,
        Commands::Unsave { id } => commands::saved::remove(&app, &id).await,
        Commands::Show {
            id,
            tickets,
            toggle_save,
        } => commands::show::run(&app, &id, tickets, toggle_save).await,
        Commands::New {
            title,
            date,
            time,
            venue,
            address,
            city,
            description,
            category,
            image,
        } => {
            let args = commands::new::NewEventArgs {
                title,
                date,
                time,
                venue,
                address,
                city,
                description,
                category,
                image,
            };
            commands::new::run(&app, args).await
        }
        Commands::Profile => commands::profile::run(&app).await,
    };

    app.shutdown();
    result
}
