use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shared::config::load_or_default;
use shared::types::{AuditFilters, CodigoTipo, PersonFilters, PersonKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use client::{AdminApi, SessionStatus};
use client::http::Query;
use client::resources::Page;

#[derive(Parser, Debug)]
#[command(name = "client", about = "School administration API client")]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(long, short)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the token.
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Verify the stored token and print the profile.
    Whoami,
    Refresh,
    Users {
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    Roles,
    Permissions {
        #[arg(long)]
        module: Option<String>,
    },
    Audit {
        #[arg(long, default_value_t = 50)]
        limit: u32,
        #[arg(long)]
        action: Option<String>,
    },
    Persons {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Backend liveness and status.
    Health,
    /// Conduct notes, all or for one student.
    Esquelas {
        #[arg(long)]
        student: Option<i64>,
    },
    /// Conduct code catalogue.
    Codes {
        #[arg(long, value_enum)]
        kind: Option<CodeKindArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CodeKindArg {
    Reconocimiento,
    Orientacion,
}

impl From<CodeKindArg> for CodigoTipo {
    fn from(kind: CodeKindArg) -> Self {
        match kind {
            CodeKindArg::Reconocimiento => CodigoTipo::Reconocimiento,
            CodeKindArg::Orientacion => CodigoTipo::Orientacion,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Profesor,
    Administrativo,
}

impl From<KindArg> for PersonKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Profesor => PersonKind::Profesor,
            KindArg::Administrativo => PersonKind::Administrativo,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", out);
    Ok(())
}

/// Restore the stored session or stop with a hint to log in.
async fn require_session(api: &AdminApi) -> Result<()> {
    if api.controller.bootstrap().await != SessionStatus::Authenticated {
        bail!("not logged in, run `client login` first");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())
        .with_context(|| format!("Failed to load configuration {:?}", cli.config))?;

    let api = AdminApi::with_file_store(&config);

    match cli.command {
        Command::Login { username, password } => {
            let profile = api
                .controller
                .login(&username, &password)
                .await
                .context("Login failed")?;
            print_json(&profile)?;
        }
        Command::Logout => {
            api.controller.logout().await;
            info!("Logged out");
        }
        Command::Whoami => {
            require_session(&api).await?;
            print_json(&api.session().profile())?;
            print_json(&api.controller.menu_modules())?;
        }
        Command::Refresh => {
            require_session(&api).await?;
            if !api.controller.refresh().await {
                bail!("token refresh failed");
            }
            info!("Token refreshed");
        }
        Command::Users { skip, limit } => {
            require_session(&api).await?;
            let users = api.users.list_page(Page::new(skip, limit)).await?;
            print_json(&users)?;
        }
        Command::Roles => {
            require_session(&api).await?;
            print_json(&api.roles.list().await?)?;
        }
        Command::Permissions { module } => {
            require_session(&api).await?;
            let permissions = api
                .permissions
                .list_page(client::resources::permissions::DEFAULT_PAGE, module.as_deref())
                .await?;
            print_json(&permissions)?;
        }
        Command::Audit { limit, action } => {
            require_session(&api).await?;
            let filters = AuditFilters {
                accion: action,
                ..AuditFilters::default()
            };
            let page = api.audit.query(&filters, Page::new(0, limit)).await?;
            print_json(&page)?;
        }
        Command::Persons { kind } => {
            require_session(&api).await?;
            let persons = match kind {
                Some(k) => {
                    let filters = PersonFilters {
                        tipo_persona: Some(k.into()),
                        ..PersonFilters::default()
                    };
                    api.persons.list(Some(&filters)).await?
                }
                None => api.persons.list(None).await?,
            };
            print_json(&persons)?;
        }
        Command::Health => {
            let health = api.health.check().await?;
            info!("Backend answered {}", health);
            print_json(&api.health.status().await?)?;
        }
        Command::Esquelas { student } => {
            require_session(&api).await?;
            let notes = match student {
                Some(id) => api.esquelas.for_student(id, &Query::new()).await?,
                None => api.esquelas.list(&Query::new()).await?,
            };
            print_json(&notes)?;
        }
        Command::Codes { kind } => {
            require_session(&api).await?;
            print_json(&api.codes.list(kind.map(Into::into)).await?)?;
        }
    }

    Ok(())
}
