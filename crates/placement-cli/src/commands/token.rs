//! Token commands

use anyhow::Result;
use clap::Subcommand;
use placement_core::{auth::STUDENT_ROLE, load_jwt_secret, TokenKeys};

use crate::output::{print_info, print_warning};

#[derive(Subcommand)]
pub enum TokenAction {
    /// Issue a bearer token signed with PLACEMENT_JWT_SECRET
    Issue {
        /// Student id placed in the token subject
        #[arg(long)]
        student_id: String,

        /// Role claim
        #[arg(long, default_value = STUDENT_ROLE)]
        role: String,
    },
}

pub fn execute(action: TokenAction, quiet: bool) -> Result<()> {
    match action {
        TokenAction::Issue { student_id, role } => {
            if std::env::var("PLACEMENT_JWT_SECRET").is_err() {
                print_warning("PLACEMENT_JWT_SECRET is not set; the server will not accept this token.");
            }

            let keys = TokenKeys::new(&load_jwt_secret());
            let token = keys.issue(&student_id, &role)?;

            print_info(&format!("Token for {} ({}):", student_id, role), quiet);
            println!("{}", token);
            Ok(())
        }
    }
}
