//! Numbered text menu over any line-based input, for manual operation of the
//! contract from a terminal.

use std::io::{BufRead, Write};

use colored::*;

use crate::error::{FundsError, FundsResult};
use crate::formatting::{render_contractors, render_expenses, render_project_details, render_projects, OutputFormat};
use crate::logging::log_error;
use crate::service::{parse_address, parse_id, ContractorRef, FundsService, MirrorOutcome, NewProject};

const INVALID_CHOICE: &str = "Invalid choice. Please select a valid option.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Menu<'a, R, W> {
    service: &'a FundsService,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a FundsService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks Exit or input ends.
    ///
    /// A failing action is reported and the main menu shown again.
    pub async fn run(&mut self) -> FundsResult<()> {
        loop {
            writeln!(self.output, "\n{}", "Menu:".bold())?;
            writeln!(self.output, "1. Users and Roles")?;
            writeln!(self.output, "2. Projects")?;
            writeln!(self.output, "3. Contractors")?;
            writeln!(self.output, "4. Expenses")?;
            writeln!(self.output, "5. Exit")?;

            let Some(choice) = self.ask("Select an option (1-5): ")? else {
                break;
            };

            let result = match choice.as_str() {
                "1" => self.users_and_roles().await,
                "2" => self.projects().await,
                "3" => self.contractors().await,
                "4" => self.expenses().await,
                "5" => Ok(Flow::Exit),
                _ => {
                    writeln!(self.output, "{}", INVALID_CHOICE)?;
                    Ok(Flow::Continue)
                }
            };

            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    log_error(&format!("Menu action failed: {}", e));
                    writeln!(self.output, "{} {}", "Error:".red().bold(), e)?;
                }
            }
        }

        writeln!(self.output, "Exiting the application...")?;
        Ok(())
    }

    /// Prompt and read one trimmed line; `None` at end of input.
    fn ask(&mut self, question: &str) -> FundsResult<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn submenu(&mut self, title: &str, entries: &[&str]) -> FundsResult<Option<String>> {
        writeln!(self.output, "\n{}", format!("{}:", title).bold())?;
        for (index, entry) in entries.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, entry)?;
        }
        self.ask(&format!("Select an option (1-{}): ", entries.len()))
    }

    fn say(&mut self, message: &str) -> FundsResult<Flow> {
        writeln!(self.output, "{}", message)?;
        Ok(Flow::Continue)
    }

    async fn users_and_roles(&mut self) -> FundsResult<Flow> {
        let entries = ["Add User", "Assign Role", "Revoke Role", "Go Back"];
        let Some(choice) = self.submenu("Users and Roles", &entries)? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                let Some(address) = self.ask("Enter user address: ")? else {
                    return Ok(Flow::Exit);
                };
                self.service.add_user(&address).await?;
                self.say(&format!("User added: {}", address))
            }
            "2" => {
                let Some(address) = self.ask("Enter user address to assign role: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(role) = self.ask("Enter role to assign (e.g., 'manager', 'user'): ")? else {
                    return Ok(Flow::Exit);
                };
                self.service.assign_role(&address, &role).await?;
                self.say(&format!("Role {} assigned to user: {}", role, address))
            }
            "3" => {
                let Some(address) = self.ask("Enter user address to revoke role: ")? else {
                    return Ok(Flow::Exit);
                };
                self.service.revoke_role(&address).await?;
                self.say(&format!("Role revoked for user: {}", address))
            }
            "4" => Ok(Flow::Continue),
            _ => self.say(INVALID_CHOICE),
        }
    }

    async fn projects(&mut self) -> FundsResult<Flow> {
        let entries = [
            "Create Project",
            "Fetch All Projects",
            "Set Project Dates",
            "Fund Project",
            "View Project Details",
            "Go Back",
        ];
        let Some(choice) = self.submenu("Projects", &entries)? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                let Some(name) = self.ask("Enter project name: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(budget) = self.ask("Enter budget in ETH: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(government) = self.ask("Enter government address (blank for default): ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(description) = self.ask("Enter project description: ")? else {
                    return Ok(Flow::Exit);
                };

                let mut request = NewProject::new(&name, &budget, &description);
                if !government.is_empty() {
                    request.government = Some(parse_address(&government, "government")?);
                }
                let created = self.service.create_project(request).await?;

                writeln!(self.output, "Project created: {} (ID {})", name, created.id)?;
                writeln!(self.output, "Transaction hash: {}", created.receipt.tx_hash)?;
                if let MirrorOutcome::Failed(reason) = &created.mirror {
                    writeln!(
                        self.output,
                        "{} Failed to add project to the database: {}",
                        "Warning:".yellow(),
                        reason
                    )?;
                }
                Ok(Flow::Continue)
            }
            "2" => {
                let projects = self.service.list_projects().await?;
                let rendered = render_projects(&projects, OutputFormat::Simple)?;
                self.say(&rendered)
            }
            "3" => {
                let Some(id) = self.ask("Enter project ID: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(start) = self.ask("Enter start date (timestamp or YYYY-MM-DD): ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(end) = self.ask("Enter end date (timestamp or YYYY-MM-DD): ")? else {
                    return Ok(Flow::Exit);
                };
                let id = parse_id(&id, "project")?;
                self.service.set_project_dates(id, &start, &end).await?;
                self.say("Project dates set successfully.")
            }
            "4" => {
                let Some(id) = self.ask("Enter project ID to fund: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = self.ask("Enter donation amount in ETH: ")? else {
                    return Ok(Flow::Exit);
                };
                let id = parse_id(&id, "project")?;
                self.service.fund_project(id, &amount).await?;
                self.say(&format!(
                    "You have successfully donated {} ETH to Project ID: {}",
                    amount, id
                ))
            }
            "5" => {
                let Some(id) = self.ask("Enter project ID: ")? else {
                    return Ok(Flow::Exit);
                };
                let id = parse_id(&id, "project")?;
                let details = self.service.project_details(id).await?;
                let rendered = render_project_details(&details);
                self.say(&rendered)
            }
            "6" => Ok(Flow::Continue),
            _ => self.say(INVALID_CHOICE),
        }
    }

    async fn contractors(&mut self) -> FundsResult<Flow> {
        let entries = [
            "Create Contractor",
            "Fetch All Contractors",
            "Assign Contractor to Project",
            "Pay Contractor",
            "Go Back",
        ];
        let Some(choice) = self.submenu("Contractors", &entries)? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                let Some(name) = self.ask("Enter contractor name: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(description) = self.ask("Enter contractor description: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(services) = self.ask("Enter contractor services: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(wallet) = self.ask("Enter contractor wallet address: ")? else {
                    return Ok(Flow::Exit);
                };
                let created = self
                    .service
                    .create_contractor(&name, &services, &description, &wallet)
                    .await?;
                match created.id {
                    Some(id) => self.say(&format!("Contractor created: {} (ID {})", name, id)),
                    None => self.say(&format!("Contractor created: {}", name)),
                }
            }
            "2" => {
                let contractors = self.service.list_contractors().await?;
                let rendered = render_contractors(&contractors, OutputFormat::Simple)?;
                self.say(&rendered)
            }
            "3" => {
                let Some(project) = self.ask("Enter project ID to assign contractor: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(contractor) = self.ask("Enter contractor ID or wallet address to assign: ")? else {
                    return Ok(Flow::Exit);
                };
                let project = parse_id(&project, "project")?;
                let contractor: ContractorRef = contractor.parse()?;
                self.service.assign_contractor(project, contractor).await?;
                self.say("Contractor assigned to project successfully.")
            }
            "4" => {
                let Some(project) = self.ask("Enter project ID to pay contractor: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = self.ask("Enter payment amount in ETH: ")? else {
                    return Ok(Flow::Exit);
                };
                let project = parse_id(&project, "project")?;
                self.service.pay_contractor(project, &amount).await?;
                self.say("Payment made to contractor successfully.")
            }
            "5" => Ok(Flow::Continue),
            _ => self.say(INVALID_CHOICE),
        }
    }

    async fn expenses(&mut self) -> FundsResult<Flow> {
        let entries = ["Log Expense", "Fetch Project Expenses", "Go Back"];
        let Some(choice) = self.submenu("Expenses", &entries)? else {
            return Ok(Flow::Exit);
        };

        match choice.as_str() {
            "1" => {
                let Some(project) = self.ask("Enter project ID for expense: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(description) = self.ask("Enter expense description: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = self.ask("Enter expense amount in ETH: ")? else {
                    return Ok(Flow::Exit);
                };
                let Some(payee) = self.ask("Enter payee wallet address: ")? else {
                    return Ok(Flow::Exit);
                };
                let project = parse_id(&project, "project")?;
                match self
                    .service
                    .add_expense(project, &payee, &description, &amount)
                    .await
                {
                    Ok(_) => self.say("Expense logged successfully."),
                    Err(FundsError::InsufficientBalance) => {
                        self.say(&format!("Cannot add expense: {}", FundsError::InsufficientBalance))
                    }
                    Err(e) => Err(e),
                }
            }
            "2" => {
                let Some(project) = self.ask("Enter project ID to fetch expenses: ")? else {
                    return Ok(Flow::Exit);
                };
                let project = parse_id(&project, "project")?;
                let expenses = self.service.list_expenses(project).await?;
                let rendered = render_expenses(&expenses);
                self.say(&rendered)
            }
            "3" => Ok(Flow::Continue),
            _ => self.say(INVALID_CHOICE),
        }
    }
}
