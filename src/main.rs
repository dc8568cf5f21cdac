use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use talent_portal::commands::{
    close_vacancy, list_companies, list_employer_vacancies, list_pending_users,
    list_pending_vacancies, resubmit_company, review, ActionResponse, ListInput, ListPage,
    PortalContext, ReviewInput, ReviewTarget,
};
use talent_portal::models::user_candidate::academic_level_label;
use talent_portal::models::{CompanyData, Decision, FilterValue, UserCandidate, Vacancy, VacancyItem};
use talent_portal::services::list_view::ViewState;
use talent_portal::services::notifications::{NoticeBuffer, NoticeLevel};
use talent_portal::services::text::format_display_date;
use talent_portal::{AppError, PortalConfig};

#[derive(Parser)]
#[command(name = "talent-portal")]
#[command(about = "Review and manage recruitment platform listings")]
#[command(version)]
struct Cli {
    /// Settings file (default: ./settings.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print responses as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ListArgs {
    /// Page number (1-based)
    #[arg(short, long)]
    page: Option<u32>,

    /// Rows per page: 10, 20, 30, 40 or 50
    #[arg(long)]
    page_size: Option<u32>,

    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// Only rows up to this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List companies pending review
    Companies {
        /// Show approved companies instead
        #[arg(long)]
        approved: bool,

        /// Work sector; several values separated by ',' or '|'
        #[arg(long)]
        sector: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List job seekers pending review
    Users {
        /// Academic level code (e.g. LICENCIATURA); repeatable
        #[arg(long = "academic-level")]
        academic_levels: Vec<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List vacancies pending review
    Vacancies {
        /// Business sector; several values separated by ',' or '|'
        #[arg(long)]
        sector: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List the open vacancies of your company
    EmployerVacancies {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Approve or reject a pending registration
    Review {
        /// companies, users or vacancies
        #[arg(value_parser = parse_target)]
        target: ReviewTarget,

        /// Row ID
        id: String,

        /// Approve the registration
        #[arg(long, conflicts_with = "reject", required_unless_present = "reject")]
        approve: bool,

        /// Reject the registration (requires --reason)
        #[arg(long)]
        reject: bool,

        /// Rejection reason shown to the applicant
        #[arg(long, requires = "reject")]
        reason: Option<String>,
    },

    /// Close one of your open vacancies
    CloseVacancy {
        /// Vacancy ID
        id: String,
    },

    /// Send your company back to review after editing it
    ResubmitCompany,
}

fn parse_target(s: &str) -> Result<ReviewTarget, String> {
    match s.to_lowercase().as_str() {
        "companies" | "company" => Ok(ReviewTarget::Companies),
        "users" | "user" => Ok(ReviewTarget::Users),
        "vacancies" | "vacancy" => Ok(ReviewTarget::Vacancies),
        _ => Err(format!(
            "invalid target '{}'. Must be one of: companies, users, vacancies",
            s
        )),
    }
}

fn list_input(list: ListArgs, date_key: &str) -> ListInput {
    let mut input = ListInput {
        page: list.page,
        page_size: list.page_size,
        search: list.search,
        ..Default::default()
    };
    if let Some(date) = list.date {
        input
            .filters
            .insert(date_key.to_string(), FilterValue::Date(date));
    }
    input
}

/// A row in the companies table
#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Empresa")]
    name: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Contacto")]
    contact: String,
    #[tabled(rename = "Registro")]
    registered: String,
    #[tabled(rename = "Estatus")]
    status: String,
}

impl CompanyRow {
    fn new(row: &CompanyData) -> Self {
        Self {
            id: row.company.id.clone(),
            name: row.company.trade_name.clone(),
            sector: row.company.work_sector.clone(),
            contact: row.account.full_name(),
            registered: format_display_date(&row.company.registered_at),
            status: row.company.status_enum().label().to_string(),
        }
    }
}

/// A row in the job seekers table
#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Correo")]
    email: String,
    #[tabled(rename = "Escolaridad")]
    academic_level: String,
    #[tabled(rename = "Registro")]
    registered: String,
    #[tabled(rename = "Estatus")]
    status: String,
}

impl UserRow {
    fn new(user: &UserCandidate) -> Self {
        Self {
            id: user.id.clone(),
            name: user.full_name(),
            email: user.email.clone(),
            academic_level: academic_level_label(&user.academic_level)
                .unwrap_or(user.academic_level.as_str())
                .to_string(),
            registered: format_display_date(&user.registered_at),
            status: user.status_enum().label().to_string(),
        }
    }
}

/// A row in the pending vacancies table
#[derive(Tabled)]
struct VacancyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Vacante")]
    name: String,
    #[tabled(rename = "Empresa")]
    company: String,
    #[tabled(rename = "Salario")]
    salary: String,
    #[tabled(rename = "Publicada")]
    created: String,
    #[tabled(rename = "Estatus")]
    status: String,
}

impl VacancyRow {
    fn new(item: &VacancyItem) -> Self {
        Self {
            id: item.vacancy.id.clone(),
            name: item.vacancy.name.clone(),
            company: item.company.trade_name.clone(),
            salary: item.vacancy.salary_range(),
            created: format_display_date(&item.vacancy.created_at),
            status: item.vacancy.status_enum().label().to_string(),
        }
    }
}

/// A row in the employer's own vacancies table
#[derive(Tabled)]
struct OpenVacancyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Vacante")]
    name: String,
    #[tabled(rename = "Plazas")]
    openings: i64,
    #[tabled(rename = "Salario")]
    salary: String,
    #[tabled(rename = "Días")]
    days: String,
    #[tabled(rename = "Publicada")]
    created: String,
}

impl OpenVacancyRow {
    fn new(vacancy: &Vacancy) -> Self {
        Self {
            id: vacancy.id.clone(),
            name: vacancy.name.clone(),
            openings: vacancy.number_openings,
            salary: vacancy.salary_range(),
            days: vacancy.working_days_label(),
            created: format_display_date(&vacancy.created_at),
        }
    }
}

/// `Página 2 de 4 · 37 registros · 1 [2] 3 4`
fn pager_line<T>(page: &ListPage<T>) -> String {
    let pages: Vec<String> = page
        .pages
        .iter()
        .map(|p| match p {
            Some(n) if *n == page.page => format!("[{}]", n),
            Some(n) => n.to_string(),
            None => "…".to_string(),
        })
        .collect();
    format!(
        "Página {} de {} · {} registros · {}",
        page.page,
        page.total_pages,
        page.total_items,
        pages.join(" ")
    )
}

fn print_table<T, R: Tabled>(page: &ListPage<T>, to_row: impl Fn(&T) -> R) {
    println!("{}", page.title);

    if page.state == ViewState::Empty {
        if let Some(message) = &page.empty_message {
            println!("{}", message);
        }
        return;
    }

    let mut table = Table::new(page.rows.iter().map(to_row));
    table.with(Style::rounded());
    println!("{table}");

    println!("\n{}", pager_line(page));
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_list<T: Serialize, R: Tabled>(
    page: &ListPage<T>,
    json: bool,
    to_row: impl Fn(&T) -> R,
) -> Result<bool, AppError> {
    if json {
        print_json(page)?;
    } else {
        print_table(page, to_row);
    }
    Ok(true)
}

fn print_action(response: &ActionResponse, json: bool) -> Result<bool, AppError> {
    if json {
        print_json(response)?;
    } else if response.success {
        println!("{} registros restantes.", response.total_items);
    }
    Ok(response.success)
}

async fn run(cli: Cli, ctx: &PortalContext) -> Result<bool, AppError> {
    let json = cli.json;
    match cli.command {
        Commands::Companies {
            approved,
            sector,
            list,
        } => {
            let mut input = list_input(list, "registeredAt");
            if let Some(sector) = sector {
                input
                    .filters
                    .insert("workSector".to_string(), FilterValue::Text(sector));
            }
            print_list(&list_companies(ctx, approved, input).await?, json, CompanyRow::new)
        }

        Commands::Users {
            academic_levels,
            list,
        } => {
            let mut input = list_input(list, "registeredAt");
            if !academic_levels.is_empty() {
                input.filters.insert(
                    "academicLevel".to_string(),
                    FilterValue::List(academic_levels),
                );
            }
            print_list(&list_pending_users(ctx, input).await?, json, UserRow::new)
        }

        Commands::Vacancies { sector, list } => {
            let mut input = list_input(list, "createdAt");
            if let Some(sector) = sector {
                input
                    .filters
                    .insert("businessSector".to_string(), FilterValue::Text(sector));
            }
            print_list(&list_pending_vacancies(ctx, input).await?, json, VacancyRow::new)
        }

        Commands::EmployerVacancies { list } => {
            let input = list_input(list, "createdAt");
            print_list(
                &list_employer_vacancies(ctx, input).await?,
                json,
                OpenVacancyRow::new,
            )
        }

        Commands::Review {
            target,
            id,
            approve,
            reason,
            ..
        } => {
            let input = ReviewInput {
                target,
                row_id: id,
                decision: if approve {
                    Decision::Approve
                } else {
                    Decision::Reject
                },
                reason,
            };
            print_action(&review(ctx, input).await?, json)
        }

        Commands::CloseVacancy { id } => print_action(&close_vacancy(ctx, &id).await?, json),

        Commands::ResubmitCompany => {
            let outcome = resubmit_company(ctx).await?;
            if json {
                print_json(&outcome)?;
            }
            Ok(outcome.is_success())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match PortalConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let notices = NoticeBuffer::new();
    let ctx = match PortalContext::from_config(&config, Arc::new(notices.clone())) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(cli, &ctx).await;

    for notice in notices.drain() {
        match notice.level {
            NoticeLevel::Success => eprintln!("✓ {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
