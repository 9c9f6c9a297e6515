use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use scripted_chat::database::ConversationStore;
use scripted_chat::script::Script;
use scripted_chat::util::directories;
use scripted_chat::{
    get_app,
    logging,
    ui,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "scripted-chat", about = "A scripted question/answer chat for your terminal")]
struct Cli {
    /// Directory holding the conversation blob and logs (defaults to the
    /// platform data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON file with an alternative question/response table
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log level when SCRIPTED_CHAT_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => directories::data_dir()?,
    };

    let _guard = logging::init(&directories::logs_dir(&data_dir), &cli.log_level)?;

    let script = match &cli.script {
        Some(path) => Script::load(path).await?,
        None => Script::builtin(),
    };
    info!("loaded script with {} entries", script.len());

    let store = ConversationStore::new(directories::conversations_path(&data_dir));

    // The terminal must be restored even if a draw panics.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = ui::tui::restore();
        default_hook(info);
    }));

    let mut app = get_app(store, script);
    let result = app.run().await;

    ui::tui::restore()?;
    result
}
