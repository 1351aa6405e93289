use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use gddp_fetch::cli::{self, Cli, Command, FetchArgs};
use gddp_fetch::config::{self, Config};
use gddp_fetch::logging::{self, Component};
use gddp_fetch::{SelectionStore, catalog, request, submit, validate};

const EXIT_FAILURE: u8 = 1;
const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match config::load_config_with_env(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    if let Some(url) = cli.base_url {
        config.service.base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let level = match config.log_level() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);
    logging::debug(
        Component::System,
        None,
        &format!("gddp_fetch {} using {}", env!("CARGO_PKG_VERSION"), config.service.base_url),
    );

    let client = match config.http_client() {
        Ok(c) => c,
        Err(e) => {
            logging::error(Component::Config, None, &e.to_string());
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match cli.command {
        Command::Products => list_products(&client, &config),
        Command::Fetch(args) => fetch(&client, &config, args),
    }
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

fn list_products(client: &reqwest::blocking::Client, config: &Config) -> ExitCode {
    let products = catalog::load_products(client, &config.service.base_url);

    if products.is_empty() {
        println!("No products available from {}", config.service.base_url);
        return ExitCode::SUCCESS;
    }

    for p in &products {
        println!("\n{}", p.label);
        println!("  Valid: {} .. {}", p.valid_start_time, p.valid_end_time);
        if let Some([w, s, e, n]) = p.bbox_extent() {
            println!("  Extent: {:.3},{:.3},{:.3},{:.3}", w, s, e, n);
        }
        println!("  Variables:");
        for v in &p.variables {
            if v.description.is_empty() {
                println!("    - {}", v.key);
            } else {
                println!("    - {}: {}", v.key, v.description);
            }
        }
    }

    ExitCode::SUCCESS
}

// ---------------------------------------------------------------------------
// fetch
// ---------------------------------------------------------------------------

fn fetch(client: &reqwest::blocking::Client, config: &Config, args: FetchArgs) -> ExitCode {
    let products = catalog::load_products(client, &config.service.base_url);

    let mut store = SelectionStore::new();
    if let Err(e) = args.apply(&mut store, &products) {
        logging::error(Component::Selection, None, &e.to_string());
        return ExitCode::from(EXIT_FAILURE);
    }

    let snapshot = store.snapshot();
    let selection = match validate::validate(&snapshot) {
        Ok(s) => s,
        Err(reason) => {
            eprintln!("{}", reason);
            return ExitCode::from(EXIT_REJECTED);
        }
    };

    cli::warn_outside_interval(selection.product, &store);

    let payload = request::build(&selection);
    logging::debug(
        Component::Submit,
        Some(selection.product.id.as_str()),
        &serde_json::Value::Object(payload.clone()).to_string(),
    );

    if !args.yes && !confirm("Do you want to process?") {
        println!("Cancelled.");
        return ExitCode::SUCCESS;
    }

    let path = match args.output {
        Some(p) => p,
        None => Path::new(&config.output.directory).join(submit::default_file_name(&payload)),
    };

    let result = submit::submit(client, &config.service.base_url, &payload)
        .and_then(|bytes| submit::save_result(&path, &bytes).map(|_| bytes.len()));

    match result {
        Ok(len) => {
            logging::info(
                Component::Submit,
                Some(selection.product.id.as_str()),
                &format!("Saved {} bytes to {}", len, path.display()),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            logging::log_submit_failure(&selection.product.id, &e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
