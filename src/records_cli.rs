// src/records_cli.rs
use crate::database::{ApplicationRepository, DatabaseConfig, GigRepository, NewApplication, NewGig};
use anyhow::Result;
use clap::Subcommand;
use tracing::{error, info};

#[derive(Subcommand, Debug)]
pub enum RecordsCommand {
    /// Initialize the database
    Init,
    /// Add a gig posting
    AddGig {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma-separated skills
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
    },
    /// Add an application, optionally linked to a gig
    AddApplication {
        candidate_name: String,
        #[arg(long)]
        gig_id: Option<String>,
        #[arg(long, default_value = "")]
        resume_text: String,
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,
        #[arg(long, default_value_t = 0.0)]
        experience_years: f64,
        #[arg(long, value_delimiter = ',')]
        portfolio_links: Vec<String>,
    },
    /// List gigs and applications with their stored scores
    List,
}

pub async fn handle_records_command(db_config: &DatabaseConfig, command: RecordsCommand) -> Result<()> {
    db_config.migrate().await?;

    let pool = db_config.pool()?;
    let gigs = GigRepository::new(pool);
    let applications = ApplicationRepository::new(pool);

    match command {
        RecordsCommand::Init => {
            info!(
                "Database initialized at: {}",
                db_config.database_path.display()
            );
            info!("Tables created: gigs, applications");
        }

        RecordsCommand::AddGig {
            title,
            description,
            skills,
        } => match gigs
            .create(&NewGig {
                title,
                description,
                skills: clean_list(skills),
            })
            .await
        {
            Ok(gig) => println!("{}", gig.id),
            Err(e) => {
                error!("Failed to create gig: {}", e);
                return Err(e);
            }
        },

        RecordsCommand::AddApplication {
            candidate_name,
            gig_id,
            resume_text,
            skills,
            experience_years,
            portfolio_links,
        } => {
            let new_application = NewApplication {
                gig_id,
                candidate_name,
                resume_text,
                skills: clean_list(skills),
                experience_years,
                portfolio_links: clean_list(portfolio_links),
            };
            match applications.create(&new_application).await {
                Ok(application) => println!("{}", application.id),
                Err(e) => {
                    error!("Failed to create application: {}", e);
                    if is_foreign_key_violation(&e) {
                        anyhow::bail!("Gig not found: {:?}", new_application.gig_id);
                    }
                    return Err(e);
                }
            }
        }

        RecordsCommand::List => {
            let gig_list = gigs.list().await?;
            println!("Gigs ({}):", gig_list.len());
            println!("{:<38} {:<30} {:<20}", "ID", "Title", "Created");
            println!("{}", "-".repeat(88));
            for gig in gig_list {
                println!(
                    "{:<38} {:<30} {:<20}",
                    gig.id,
                    gig.title,
                    gig.created_at.format("%Y-%m-%d %H:%M")
                );
            }

            let application_list = applications.list().await?;
            println!();
            println!("Applications ({}):", application_list.len());
            println!("{:<38} {:<20} {:<38} {:<6}", "ID", "Candidate", "Gig", "Score");
            println!("{}", "-".repeat(104));
            for application in application_list {
                println!(
                    "{:<38} {:<20} {:<38} {:<6}",
                    application.id,
                    application.candidate_name,
                    application.gig_id.as_deref().unwrap_or("-"),
                    application
                        .ai_score
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
    }

    Ok(())
}

fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map_or(false, |e| e.is_foreign_key_violation())
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
