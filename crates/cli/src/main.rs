//! MissionDesk CLI - mission management against the MissionDesk backend.

mod config;
mod notifier;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use missiondesk_auth::AuthService;
use missiondesk_client::{ApiClient, FileUpload, MissionApi};
use missiondesk_core::{Mission, MissionId, Notifier, PeriodFilter, StatusFilter};
use missiondesk_dashboard::Dashboard;
use missiondesk_storage::JsonSessionStore;
use missiondesk_wizard::MissionWizard;
use missiondesk_work::MissionActions;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::notifier::ConsoleNotifier;

#[derive(Parser)]
#[command(name = "missiondesk")]
#[command(about = "Create missions and run research, surveys and reports", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session directory
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in
    Signin {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Signout,
    /// Show the signed-in user
    Whoami,
    /// List missions
    List {
        /// Name contains (case-insensitive)
        #[arg(long, default_value = "")]
        search: String,
        /// all, completed, in_progress
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// all, today, this_week, this_month, this_year, last_15_days
        #[arg(long, default_value = "all")]
        period: PeriodFilter,
        #[arg(long, default_value = "1")]
        page: usize,
    },
    /// Show mission details
    Show {
        id: MissionId,
    },
    /// Show mission counters
    Stats,
    /// Create a mission
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        context: Option<String>,
        /// Repeatable
        #[arg(long = "constraint")]
        constraints: Vec<String>,
        /// Repeatable, 2 to 4
        #[arg(long = "objective")]
        objectives: Vec<String>,
        #[arg(long)]
        problem: Option<String>,
        #[arg(long)]
        kpis: Option<String>,
        #[arg(long)]
        tools: Option<String>,
        /// Sector hint for scope generation
        #[arg(long)]
        sector: Option<String>,
        /// Generate the scope from this document
        #[arg(long)]
        scope_doc: Option<PathBuf>,
    },
    /// Delete a mission
    Delete {
        id: MissionId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Run deep research
    Research {
        id: MissionId,
        /// Export the report as PDF
        #[arg(long)]
        save: bool,
    },
    /// Generate a survey form
    Survey {
        id: MissionId,
        #[arg(long)]
        title: String,
    },
    /// Generate and optionally send the survey invitation
    Email {
        id: MissionId,
        /// Comma-separated recipients; sends when given
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Message body; generated when absent
        #[arg(long)]
        message: Option<String>,
        /// Survey link, defaults to the mission's form
        #[arg(long)]
        form_url: Option<String>,
    },
    /// Analyze a CSV or Excel file
    Analyze {
        id: MissionId,
        file: PathBuf,
        #[arg(long)]
        save: bool,
    },
    /// Generate the final report
    Report {
        id: MissionId,
        /// Export as PDF and mark the mission completed
        #[arg(long)]
        save: bool,
    },
    /// Upload documents to the mission folder
    Upload {
        id: MissionId,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Set a backend environment variable
    SetKey {
        key: String,
        value: String,
        #[arg(long)]
        env_file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.api_url, cli.home);
    debug!("Using backend {}", config.api_url);

    let client = ApiClient::new(config.client())?;
    let store = JsonSessionStore::new(&config.home).await?;
    let mut auth = AuthService::new(client.clone(), store);
    auth.initialize().await?;

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let actions = MissionActions::new(Arc::new(client.clone()), notifier.clone())
        .with_bucket(config.upload_bucket.clone());
    let mut dashboard = Dashboard::new(notifier.clone()).with_page_size(config.page_size);

    match cli.command {
        Commands::Signup { email, password } => {
            let user = auth.sign_up(&email, &password).await?;
            println!("Signed up as {} ({})", user.email, user.id);
        }
        Commands::Signin { email, password } => {
            let user = auth.sign_in(&email, &password).await?;
            println!("Signed in as {} ({})", user.email, user.id);
        }
        Commands::Signout => {
            auth.sign_out().await?;
            println!("Signed out");
        }
        Commands::Whoami => match auth.current_user() {
            Some(user) => println!("{} ({})", user.email, user.id),
            None => println!("Not signed in"),
        },
        Commands::List { search, status, period, page } => {
            let user = auth.require_user()?.clone();
            dashboard.refresh(&client, &user).await?;
            dashboard.set_search(search);
            dashboard.set_status(status);
            dashboard.set_period(period);

            let now = Local::now();
            dashboard.set_page(page, &now);
            let view = dashboard.view(&now);

            println!("Missions ({} of {})", view.filtered_count, view.total_count);
            for mission in &view.missions {
                print_row(mission);
            }
            println!("Page {}/{}", view.page, view.total_pages);
        }
        Commands::Show { id } => {
            let mission = client.get_mission(&id).await?;
            print_mission(&mission);
        }
        Commands::Stats => {
            let user = auth.require_user()?.clone();
            dashboard.refresh(&client, &user).await?;
            let stats = dashboard.stats(&Local::now());

            println!("MissionDesk Status");
            println!("  Total: {}", stats.total);
            println!("  This month: {}", stats.this_month);
            println!("  Completed: {}", stats.completed);
            println!("  In progress: {}", stats.in_progress);
        }
        Commands::Create {
            name,
            context,
            constraints,
            objectives,
            problem,
            kpis,
            tools,
            sector,
            scope_doc,
        } => {
            let user = auth.require_user()?.clone();
            let mut wizard = MissionWizard::open(notifier.clone());
            wizard.form_mut().name = name;
            wizard.next()?;

            wizard.form_mut().sector = sector;
            if let Some(path) = scope_doc {
                let document = FileUpload::from_path(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                wizard.attach_document(document);
                wizard.auto_fill(&client).await?;
            }

            let form = wizard.form_mut();
            if let Some(context) = context {
                form.context = context;
            }
            if let Some(problem) = problem {
                form.problem = problem;
            }
            if let Some(kpis) = kpis {
                form.kpis = kpis;
            }
            if let Some(tools) = tools {
                form.tools = tools;
            }
            if !constraints.is_empty() {
                form.set_constraints(constraints);
            }
            if !objectives.is_empty() {
                if objectives.len() > missiondesk_wizard::MAX_OBJECTIVES {
                    warn!("Only the first {} objectives are kept", missiondesk_wizard::MAX_OBJECTIVES);
                }
                form.set_objectives(objectives);
            }

            let mission = wizard.submit(&client, &user).await?;
            dashboard.mission_created(&client, &user, &mission).await?;
            println!("Created mission {}", mission.id);
        }
        Commands::Delete { id, yes } => {
            let user = auth.require_user()?.clone();
            dashboard.refresh(&client, &user).await?;
            let Some(mission) = dashboard.find(&id) else {
                bail!("Mission {} not found", id);
            };

            let prompt = format!("Delete mission \"{}\"? This cannot be undone. [y/N] ", mission.name);
            if !yes && !confirm(&prompt)? {
                println!("Cancelled");
                return Ok(());
            }

            dashboard.request_delete(id);
            dashboard.confirm_delete(&client, &user, &Local::now()).await?;
        }
        Commands::Research { id, save } => {
            let mission = client.get_mission(&id).await?;
            let report = actions.research(&mission).await?;
            println!("{}", report);
            if save {
                actions.save_research_pdf(&mission, &report, Utc::now()).await?;
            }
        }
        Commands::Survey { id, title } => {
            let mission = client.get_mission(&id).await?;
            let form = actions.create_survey(&mission, &title).await?;
            println!("Form: {}", form.form_url);
        }
        Commands::Email { id, to, subject, message, form_url } => {
            let mission = client.get_mission(&id).await?;
            let message = match message {
                Some(message) => message,
                None => actions.generate_email(&mission).await?,
            };
            println!("{}", message);

            if let Some(to) = to {
                actions
                    .send_email(&mission, &to, &message, subject.as_deref(), form_url.as_deref())
                    .await?;
            }
        }
        Commands::Analyze { id, file, save } => {
            let mission = client.get_mission(&id).await?;
            let upload = FileUpload::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = actions.analyze(&mission, &upload).await?;
            println!("{}", report);
            if save {
                actions.save_analysis_pdf(&mission, &report, Utc::now()).await?;
            }
        }
        Commands::Report { id, save } => {
            let mission = client.get_mission(&id).await?;
            let report = actions.final_report(&mission).await?;
            println!("{}", report);
            if save {
                let receipt = actions.save_final_report(&mission, &report, Utc::now()).await?;
                if let Some(path) = receipt.report_path {
                    println!("Saved to {}", path);
                }
            }
        }
        Commands::Upload { id, files } => {
            let mission = client.get_mission(&id).await?;
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                let upload = FileUpload::from_path(path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                uploads.push(upload);
            }
            actions.upload_documents(&mission, &uploads).await?;
        }
        Commands::SetKey { key, value, env_file } => {
            if !missiondesk_work::KNOWN_KEYS.contains(&key.as_str()) {
                println!("Known keys: {}", missiondesk_work::KNOWN_KEYS.join(", "));
            }
            actions.set_key(&key, &value, env_file.as_deref()).await?;
        }
    }

    info!("Done");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn status_label(mission: &Mission) -> &'static str {
    if mission.is_completed() {
        "COMPLETED"
    } else {
        "IN PROGRESS"
    }
}

fn print_row(mission: &Mission) {
    println!(
        "  {} | {} | {} | {}",
        mission.id,
        status_label(mission),
        mission.created_at.with_timezone(&Local).format("%Y-%m-%d"),
        mission.name,
    );
}

fn print_mission(mission: &Mission) {
    println!("Mission: {}", mission.id);
    println!("  Name: {}", mission.name);
    println!("  Status: {}", status_label(mission));
    println!("  Created: {}", mission.created_at.with_timezone(&Local));
    if let Some(context) = &mission.context {
        println!("  Context: {}", context);
    }
    if let Some(problem) = &mission.problem {
        println!("  Problem: {}", problem);
    }
    if !mission.objectives.is_empty() {
        println!("  Objectives:");
        for objective in &mission.objectives {
            println!("    - {}", objective);
        }
    }
    if !mission.constraints.is_empty() {
        println!("  Constraints:");
        for constraint in &mission.constraints {
            println!("    - {}", constraint);
        }
    }
    if let Some(kpis) = &mission.kpis {
        println!("  KPIs: {}", kpis);
    }
    if let Some(tools) = &mission.tools {
        println!("  Tools: {}", tools);
    }
    if let Some(form_url) = &mission.form_url {
        println!("  Survey: {}", form_url);
    }
    if let Some(report_path) = &mission.report_path {
        println!("  Report: {}", report_path);
    }
}
