pub mod contractors;
pub mod projects;
pub mod utils;

pub use contractors::{print_contractors, render_contractors};
pub use projects::{
    format_funding_status, print_project_details, print_projects, render_expenses,
    render_project_details, render_projects, OutputFormat,
};
pub use utils::{format_eth, short_address, truncate};
