//! `postboard` - CLI for creating and listing posts.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use postboard::cli::{AddCommand, Cli, Command, ConfigCommand, ListCommand};
use postboard::render::{render_form, render_posts};
use postboard::{init_logging, Config, Field, FormController, ImageFile, PostStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let mut form = FormController::new();
    form.set_field(Field::Title, cmd.title);
    form.set_field(Field::Description, cmd.description);
    form.set_field(Field::Content, cmd.content);
    if let Some(path) = &cmd.image {
        form.set_image(Some(ImageFile::open(path, &config.images).await?));
    }

    let mut store = PostStore::open_configured(config)?;
    match form.submit_or_err(&mut store).await {
        Ok(post) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                println!("Created post {} ({} posts total)", post.id, store.len());
            }
            Ok(())
        }
        Err(e) if e.is_validation_error() => {
            eprint!("{}", render_form(&form.view()));
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = PostStore::open_configured(config)?;
    print!("{}", render_posts(store.posts(), cmd.format, cmd.show_images)?);
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = PostStore::open_configured(config)?;
    let stats = store.repository().storage().stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "posts_key": store.repository().key(),
            "posts": store.len(),
            "stored_bytes": stats.total_value_bytes,
            "database_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("postboard status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Key:           {}", store.repository().key());
        println!("Posts:         {}", store.len());
        println!("Stored bytes:  {}", stats.total_value_bytes);
        println!("Database size: {}", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Posts key:      {}", config.storage.posts_key);
                println!();
                println!("[Images]");
                println!("  Accept:         {}", config.images.accept);
                println!("  Max bytes:      {}", config.images.max_bytes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
