use std::process;

use infra_funds_cli::cli::build_cli;
use infra_funds_cli::commands::config::handle_config;
use infra_funds_cli::commands::contractors::{handle_assign, handle_contractors, handle_create_contractor, handle_pay};
use infra_funds_cli::commands::expenses::handle_expense;
use infra_funds_cli::commands::menu::handle_menu;
use infra_funds_cli::commands::mirror::handle_mirror;
use infra_funds_cli::commands::projects::{
    handle_create_project, handle_dates, handle_fund, handle_project, handle_projects,
};
use infra_funds_cli::commands::roles::handle_roles;
use infra_funds_cli::commands::whoami::handle_whoami;
use infra_funds_cli::logging::{init_logging, install_panic_hook, log_error};

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    if let Err(e) = init_logging(matches.get_flag("verbose")) {
        eprintln!("Warning: could not initialise logging: {}", e);
    }
    install_panic_hook();

    let result = match matches.subcommand() {
        Some(("config", sub_matches)) => handle_config(sub_matches).await,
        Some(("whoami", sub_matches)) => handle_whoami(sub_matches).await,
        Some(("projects", sub_matches)) => handle_projects(sub_matches).await,
        Some(("project", sub_matches)) => handle_project(sub_matches).await,
        Some(("create", sub_matches)) => match sub_matches.subcommand() {
            Some(("project", project_matches)) => handle_create_project(project_matches).await,
            Some(("contractor", contractor_matches)) => handle_create_contractor(contractor_matches).await,
            _ => {
                eprintln!("Unknown create subcommand. Use 'infra-funds create --help' for available options.");
                process::exit(1);
            }
        },
        Some(("fund", sub_matches)) => handle_fund(sub_matches).await,
        Some(("dates", sub_matches)) => handle_dates(sub_matches).await,
        Some(("assign", sub_matches)) => handle_assign(sub_matches).await,
        Some(("pay", sub_matches)) => handle_pay(sub_matches).await,
        Some(("expense", sub_matches)) => handle_expense(sub_matches).await,
        Some(("contractors", sub_matches)) => handle_contractors(sub_matches).await,
        Some(("roles", sub_matches)) => handle_roles(sub_matches).await,
        Some(("mirror", sub_matches)) => handle_mirror(sub_matches).await,
        Some(("menu", sub_matches)) => handle_menu(sub_matches).await,
        _ => {
            eprintln!("Unknown command. Use 'infra-funds --help' for available commands.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        log_error(&e.to_string());
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
