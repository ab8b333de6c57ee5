//! Wiring & DI. Entry point: bootstrap the completion adapter, build the consultation service,
//! run the chosen front end. No business logic here.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use legal_consult::adapters::ai::{MockCompletionAdapter, OpenAiAdapter};
use legal_consult::adapters::ui::tui::TuiInputPort;
use legal_consult::adapters::web::{AppState, HttpInputPort};
use legal_consult::ports::{CompletionPort, ConsultationPort, InputPort};
use legal_consult::shared::config::AppConfig;
use legal_consult::usecases::{ConsultationService, QuestionGenerator, ReportSynthesizer};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "legal-consult", version, about = "AI legal consultation: clarifying questions, then a structured report")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Bind address (overrides LEGAL_CONSULT_HOST).
        #[arg(long)]
        host: Option<IpAddr>,
        /// Listen port (overrides LEGAL_CONSULT_PORT / PORT).
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive consultation in the terminal (default).
    Consult,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;
    let completion_config = cfg
        .completion_config()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let validation = cfg
        .report_validation()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let call_timeout = cfg.request_timeout();

    // --- Completion Service ---
    let completion: Arc<dyn CompletionPort> = match cfg.ai_api_key() {
        Some(api_key) => {
            info!(
                model = %completion_config.model_id(),
                url = %cfg.ai_api_url_or_default(),
                "completion service configured"
            );
            Arc::new(
                OpenAiAdapter::new(cfg.ai_api_url_or_default(), api_key, call_timeout)
                    .map_err(|e| anyhow::anyhow!("{}", e))?,
            )
        }
        None => {
            warn!("LEGAL_CONSULT_AI_API_KEY / GOOGLE_API_KEY not set, using mock completion adapter");
            Arc::new(MockCompletionAdapter::new())
        }
    };

    // --- Orchestrator ---
    let questions = QuestionGenerator::new(Arc::clone(&completion), completion_config.clone())
        .with_question_count(cfg.question_count_or_default())
        .with_call_timeout(call_timeout);
    let reports = ReportSynthesizer::new(completion, completion_config)
        .with_validation(validation)
        .with_call_timeout(call_timeout);
    info!(
        questions = questions.question_count(),
        validation = ?validation,
        timeout_secs = call_timeout.as_secs(),
        "consultation service ready"
    );
    let consultation: Arc<dyn ConsultationPort> =
        Arc::new(ConsultationService::new(questions, reports));

    // --- Front end ---
    let input_port: Arc<dyn InputPort> = match cli.command.unwrap_or(Command::Consult) {
        Command::Serve { host, port } => {
            let host = match host {
                Some(ip) => ip,
                None => cfg
                    .host_or_default()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid host: {}", e))?,
            };
            let addr = SocketAddr::new(host, port.unwrap_or_else(|| cfg.port_or_default()));
            let state = AppState {
                consultation,
                environment: cfg.environment_or_default(),
            };
            // Outer bound on a whole request; the completion call has its own.
            let request_timeout = call_timeout + call_timeout / 4;
            Arc::new(HttpInputPort::new(addr, state, request_timeout))
        }
        Command::Consult => {
            legal_consult::adapters::ui::init_ui();
            Arc::new(TuiInputPort::new(consultation))
        }
    };

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
