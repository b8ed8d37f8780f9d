mod config;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use api::{
    auth::{bearer_token, decode_token, issue_token, AuthConfig},
    schema::{build_schema, AppSchema, MutationRoot, QueryRoot},
};
use async_graphql::{http::GraphiQLSource, EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::Html,
    routing::get,
    Router,
};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use pipeline::{Actor, Role};
use sea_orm::{Database, DatabaseConnection};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn, Level};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "leadspot", version, about = "Lead pipeline service")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run HTTP server
    Serve,
    /// Run migrations
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
    /// Seed demo leads
    Seed,
    /// Print GraphQL SDL
    PrintSchema,
    /// Remove placeholder "Sales stage updated" history rows
    CleanupHistory,
    /// Issue a bearer token for local testing
    IssueToken {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        user_id: Option<Uuid>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Reset,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RoleArg {
    Marketing,
    Sales,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Marketing => Role::Marketing,
            RoleArg::Sales => Role::Sales,
        }
    }
}

#[derive(Clone)]
struct AppState {
    schema: Schema<QueryRoot, MutationRoot, EmptySubscription>,
    auth: Arc<AuthConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.cmd {
        Cmd::Migrate { action } => {
            let db = connect(&config).await?;
            match action {
                MigrateAction::Up => Migrator::up(&db, None).await?,
                MigrateAction::Down => Migrator::down(&db, None).await?,
                MigrateAction::Reset => Migrator::reset(&db).await?,
            }
            info!(?action, "migrations applied");
            Ok(())
        }
        Cmd::Seed => seed(&connect(&config).await?).await,
        Cmd::PrintSchema => {
            let AppSchema(schema) = build_schema(Arc::new(connect(&config).await?));
            println!("{}", schema.sdl());
            Ok(())
        }
        Cmd::CleanupHistory => {
            let db = connect(&config).await?;
            let report = pipeline::purge_placeholder_history(&db)
                .await
                .map_err(|err| anyhow!("history cleanup failed: {err}"))?;
            info!(
                stage_history = report.stage_history,
                call_history = report.call_history,
                "placeholder history removed"
            );
            Ok(())
        }
        Cmd::IssueToken { role, user_id } => {
            let actor = Actor::new(user_id.unwrap_or_else(Uuid::new_v4), role.into());
            let token = issue_token(&actor, &config.auth).context("failed to sign token")?;
            println!("{token}");
            Ok(())
        }
        Cmd::Serve => {
            let db = Arc::new(connect(&config).await?);
            serve(config, db).await
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    Database::connect(&config.database_url)
        .await
        .with_context(|| format!("cannot connect to {}", config.database_url))
}

async fn serve(config: AppConfig, db: Arc<DatabaseConnection>) -> anyhow::Result<()> {
    Migrator::up(db.as_ref(), None).await?;
    let AppSchema(schema) = build_schema(db);
    let state = AppState {
        schema,
        auth: Arc::new(config.auth.clone()),
    };
    let app = app_router(state, &config);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("cannot bind {}", config.bind))?;
    info!("listening on http://{}", config.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn app_router(state: AppState, config: &AppConfig) -> Router {
    let origins = if config.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(config.cors_origins.clone())
    };
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/graphiql", get(graphiql))
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(actor) = authenticate(&state, &headers) {
        request = request.data(actor);
    }
    state.schema.execute(request).await.into()
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Option<Actor> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = bearer_token(value)?;
    match decode_token(token, &state.auth) {
        Ok(actor) => Some(actor),
        Err(err) => {
            warn!(error = %err, "rejected bearer token");
            None
        }
    }
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = terminate => {}, }
    info!("shutting down");
}

async fn seed(db: &DatabaseConnection) -> anyhow::Result<()> {
    Migrator::up(db, None).await?;
    let seeded = api::seed::seed_demo(db, Utc::now().date_naive())
        .await
        .map_err(|err| anyhow!("seed data failed: {err}"))?;
    for lead in &seeded.leads {
        info!(code = %lead.lead_code, stage = lead.stage.as_str(), "seeded {}", lead.company_name);
    }
    Ok(())
}
