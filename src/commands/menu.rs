use std::io::{self, BufReader};

use clap::ArgMatches;

use crate::cli_context::CliContext;
use crate::error::FundsResult;
use crate::menu::Menu;

pub async fn handle_menu(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_menu_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_menu_impl(matches: &ArgMatches) -> FundsResult<()> {
    let mut context = CliContext::from_matches(matches)?;
    let service = context.service()?;

    let mut menu = Menu::new(&service, BufReader::new(io::stdin()), io::stdout());
    menu.run().await
}
