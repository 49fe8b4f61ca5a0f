mod settings;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use yca_api::{AnalyzerApiAdapter, HttpApi, cors_layer};
use yca_core::{AnalyzerApi, AnalyzerConfig, CommentClassifier, Pipeline, Subscribe};
use yca_fetch::{GeminiClassifier, GroqClassifier, LlmConfig, YoutubeClient, YoutubeConfig};
use yca_observe::{Journal, LoggerConfig, logger_init};

use crate::settings::{ClassifierKind, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Settings
    let settings = Settings::from_env().context("failed to load settings")?;

    // 2) Logger
    logger_init(&LoggerConfig::new(settings.log_format, &settings.log_level))?;
    info!(
        bind = %settings.bind_addr,
        classifier = %settings.classifier,
        frontend = %settings.frontend_url,
        "settings loaded"
    );

    // 3) Collaborators
    let source = YoutubeClient::new(
        YoutubeConfig::new(&settings.youtube_api_key).with_max_comments(settings.max_comments),
    )?;
    let classifier = build_classifier(&settings)?;
    info!(source = "youtube", classifier = classifier.name(), "collaborators ready");

    // 4) Analyzer
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Journal::new())];
    let analyzer = Arc::new(AnalyzerApi::new(
        AnalyzerConfig {
            workers: settings.workers,
            queue_capacity: settings.queue_capacity,
            job_timeout: settings.job_timeout,
            ..AnalyzerConfig::default()
        },
        Pipeline::new(Arc::new(source), classifier),
        subscribers,
    ));

    // 5) HTTP API
    let app = HttpApi::new(Arc::new(AnalyzerApiAdapter::new(analyzer.clone())))
        .with_cors(cors_layer(&settings.frontend_url)?)
        .router();
    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "http api listening");

    yca_api::axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    // 6) Drain workers
    info!("shutting down...");
    analyzer.shutdown().await;
    Ok(())
}

fn build_classifier(settings: &Settings) -> anyhow::Result<Arc<dyn CommentClassifier>> {
    Ok(match settings.classifier {
        ClassifierKind::Groq => {
            let mut cfg = LlmConfig::groq(&settings.groq_api_key);
            if let Some(model) = &settings.groq_model {
                cfg = cfg.with_model(model);
            }
            Arc::new(GroqClassifier::new(cfg)?)
        }
        ClassifierKind::Gemini => {
            let mut cfg = LlmConfig::gemini(&settings.google_api_key);
            if let Some(model) = &settings.gemini_model {
                cfg = cfg.with_model(model);
            }
            Arc::new(GeminiClassifier::new(cfg)?)
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
