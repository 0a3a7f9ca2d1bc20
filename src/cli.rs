use clap::{Arg, ArgAction, Command};

use crate::config::CONFIG_KEYS;

fn format_arg() -> Arg {
    Arg::new("format")
        .short('f')
        .long("format")
        .help("Output format")
        .value_parser(["simple", "table", "json"])
        .default_value("simple")
}

fn project_id_arg() -> Arg {
    Arg::new("project")
        .help("Project ID")
        .required(true)
        .index(1)
}

fn address_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).help(help).required(true).index(1)
}

pub fn build_cli() -> Command {
    Command::new("infra-funds")
        .about("Infrastructure funds CLI - Track public project funding on an EVM contract")
        .version("1.0.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("simulate")
                .long("simulate")
                .help("Use a fresh in-memory ledger instead of the deployed contract. State lasts one run, so this is meant for 'menu'")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Echo log lines to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change saved configuration")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Save a configuration value")
                        .arg(
                            Arg::new("key")
                                .help("Configuration key")
                                .required(true)
                                .value_parser(CONFIG_KEYS.to_vec())
                                .index(1),
                        )
                        .arg(Arg::new("value").help("Value to store").required(true).index(2)),
                )
                .subcommand(Command::new("path").about("Print the config file location")),
        )
        .subcommand(Command::new("whoami").about("Show the signing account and connection settings"))
        .subcommand(
            Command::new("projects")
                .about("List all projects")
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("project")
                .about("Show a project with its contractor and expenses")
                .arg(project_id_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Create projects or contractors")
                .subcommand_required(true)
                .subcommand(
                    Command::new("project")
                        .about("Create a new project")
                        .arg(Arg::new("name").help("Project name").required(true).index(1))
                        .arg(
                            Arg::new("budget")
                                .short('b')
                                .long("budget")
                                .help("Budget in ETH")
                                .required(true),
                        )
                        .arg(
                            Arg::new("description")
                                .short('d')
                                .long("description")
                                .help("Project description")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new("government")
                                .short('g')
                                .long("government")
                                .help("Government address (defaults to config, then the signer)"),
                        )
                        .arg(
                            Arg::new("no-mirror")
                                .long("no-mirror")
                                .help("Do not copy the project to the document store")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("contractor")
                        .about("Register a contractor")
                        .arg(Arg::new("name").help("Contractor name").required(true).index(1))
                        .arg(
                            Arg::new("wallet")
                                .short('w')
                                .long("wallet")
                                .help("Contractor wallet address")
                                .required(true),
                        )
                        .arg(
                            Arg::new("services")
                                .short('s')
                                .long("services")
                                .help("Services offered")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new("description")
                                .short('d')
                                .long("description")
                                .help("Contractor description")
                                .default_value(""),
                        ),
                ),
        )
        .subcommand(
            Command::new("fund")
                .about("Donate ETH to a project")
                .arg(project_id_arg())
                .arg(Arg::new("amount").help("Amount in ETH").required(true).index(2)),
        )
        .subcommand(
            Command::new("dates")
                .about("Set a project's start and end dates")
                .arg(project_id_arg())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("Start date (unix seconds, YYYY-MM-DD or RFC 3339)")
                        .required(true),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .help("End date (unix seconds, YYYY-MM-DD or RFC 3339)")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("assign")
                .about("Assign a contractor to a project")
                .arg(project_id_arg())
                .arg(
                    Arg::new("contractor")
                        .help("Contractor ID or wallet address")
                        .required(true)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("pay")
                .about("Pay the contractor assigned to a project")
                .arg(project_id_arg())
                .arg(Arg::new("amount").help("Amount in ETH").required(true).index(2)),
        )
        .subcommand(
            Command::new("expense")
                .about("Log or list project expenses")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Log an expense against a project")
                        .arg(project_id_arg())
                        .arg(
                            Arg::new("amount")
                                .short('a')
                                .long("amount")
                                .help("Amount in ETH")
                                .required(true),
                        )
                        .arg(
                            Arg::new("payee")
                                .short('p')
                                .long("payee")
                                .help("Payee wallet address")
                                .required(true),
                        )
                        .arg(
                            Arg::new("description")
                                .short('d')
                                .long("description")
                                .help("What the expense was for")
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("list")
                        .about("List a project's expenses")
                        .arg(project_id_arg())
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help("Print as JSON")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("contractors")
                .about("List registered contractors")
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("roles")
                .about("Manage users and roles")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add-user")
                        .about("Register a user")
                        .arg(address_arg("user", "User address")),
                )
                .subcommand(
                    Command::new("assign")
                        .about("Assign a role to a user")
                        .arg(address_arg("user", "User address"))
                        .arg(Arg::new("role").help("Role name, e.g. manager").required(true).index(2)),
                )
                .subcommand(
                    Command::new("revoke")
                        .about("Revoke a user's role")
                        .arg(address_arg("user", "User address")),
                ),
        )
        .subcommand(
            Command::new("mirror")
                .about("Inspect the document-store copy of projects")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List mirrored project documents")),
        )
        .subcommand(Command::new("menu").about("Interactive numbered menu"))
}
