//! Terminal front-end: edit the form from flags, submit, render the panel.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use alzpanel::common::config::AppCfg;
use alzpanel::common::error::{exit_code, PanelCode};
use alzpanel::common::log;
use alzpanel::patient::PatientRecord;
use alzpanel::prediction::{HttpTransport, PredictionController, RequestState};
use alzpanel::ui::{render, FormArgs, PanelView};

#[derive(Parser, Debug)]
#[command(name = "alzpanel", version, about = "Alzheimer prediction panel")]
struct Cli {
    /// Prediction endpoint, overrides ALZPANEL_ENDPOINT.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Request timeout in milliseconds; 0 waits forever.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every field with its kind, default and control bounds.
    Fields,
    /// Show the form and the JSON body it would send.
    Body(FormArgs),
    /// Submit the form and render the result.
    Predict(FormArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err).into()
        }
    }
}

async fn run(cli: Cli) -> Result<PanelCode> {
    let mut cfg = AppCfg::load().context("loading configuration")?;
    if let Some(endpoint) = cli.endpoint {
        cfg.endpoint = endpoint;
    }
    if let Some(ms) = cli.timeout_ms {
        cfg = cfg.with_timeout_ms(ms);
    }
    log::init(cfg.log_level);

    match cli.command {
        Command::Fields => {
            print!("{}", render::render_fields());
            Ok(PanelCode::Ok)
        }
        Command::Body(args) => {
            let record = args.build()?.record();
            println!("{}", render::render_form(&record));
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(PanelCode::Ok)
        }
        Command::Predict(args) => {
            let record = args.build()?.record();
            println!("{}", render::render_form(&record));
            predict(&cfg, &record).await
        }
    }
}

async fn predict(cfg: &AppCfg, record: &PatientRecord) -> Result<PanelCode> {
    let transport = HttpTransport::new(cfg)?;
    info!(endpoint = transport.endpoint(), "submitting patient record");
    let controller = PredictionController::new(transport);
    let mut updates = controller.subscribe();

    // Redraw while the request is in flight; the final state is drawn below.
    let redraw = async {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            debug!(state = state.as_str(), "panel redraw");
            if !state.is_pending() {
                break;
            }
            print!("{}", render::render_panel(&PanelView::from_state(&state)));
        }
    };

    let (outcome, ()) = tokio::join!(controller.submit(record), redraw);
    let state = outcome?;
    print!("{}", render::render_panel(&PanelView::from_state(&state)));

    Ok(match &state {
        RequestState::Failed(failure) => failure.kind.code(),
        _ => PanelCode::Ok,
    })
}
