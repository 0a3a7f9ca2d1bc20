use clap::ArgMatches;

use super::{print_receipt, required};
use crate::cli_context::CliContext;
use crate::error::{FundsError, FundsResult};

pub async fn handle_roles(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_roles_impl(matches).await.map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_roles_impl(matches: &ArgMatches) -> FundsResult<()> {
    let Some((action, sub_matches)) = matches.subcommand() else {
        return Err(FundsError::InvalidInput(
            "Unknown roles subcommand. Use 'infra-funds roles --help' for available options.".to_string(),
        ));
    };
    let user = required(sub_matches, "user")?;

    let mut context = CliContext::from_matches(sub_matches)?;
    let service = context.service()?;

    match action {
        "add-user" => {
            let receipt = service.add_user(user).await?;
            print_receipt(&format!("User added: {}", user), &receipt);
        }
        "assign" => {
            let role = required(sub_matches, "role")?;
            let receipt = service.assign_role(user, role).await?;
            print_receipt(&format!("Role {} assigned to user: {}", role, user), &receipt);
        }
        "revoke" => {
            let receipt = service.revoke_role(user).await?;
            print_receipt(&format!("Role revoked for user: {}", user), &receipt);
        }
        other => {
            return Err(FundsError::InvalidInput(format!("Unknown roles subcommand '{}'", other)));
        }
    }
    Ok(())
}
