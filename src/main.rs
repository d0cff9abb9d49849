//! Message Rotator - cycles the landing page banner messages.
//!
//! One rotator drives one display surface: a line in the terminal, a stream of
//! JSON lines on stdout, or the banner element of the landing page served over
//! HTTP, where browsers follow along over a WebSocket.

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use message_rotator::cli::Args;
use message_rotator::display::{
    print_error, print_info, print_rotation_header, print_rotation_summary, print_warning,
    JsonSurface, TerminalSurface,
};
use message_rotator::rotator::{
    DisplaySurface, MessageList, MessageRotator, RotationReport, Schedule,
};
use message_rotator::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    // Initialize logging
    init_logging(args.verbose);

    let messages = args.message_list().context("No messages to rotate")?;
    let schedule = args.schedule();

    for warning in args.warnings() {
        // JSON mode keeps stdout for the surface
        if args.json && !args.web {
            warn!("{}", warning);
        } else {
            print_warning(&warning);
        }
    }

    if args.web {
        run_web_mode(args, messages, schedule).await
    } else if args.json {
        let surface = JsonSurface::stdout(&args.element_id);
        let report = run_rotation(MessageRotator::new(messages, surface), schedule).await?;
        info!("Stopped after {} cycles", report.cycles);
        Ok(())
    } else {
        run_terminal_mode(messages, schedule).await
    }
}

/// Initialize the tracing subscriber for logging
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout belongs to the surface
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Run a rotator until it finishes or Ctrl+C is pressed
async fn run_rotation<S: DisplaySurface + 'static>(
    rotator: MessageRotator<S>,
    schedule: Schedule,
) -> Result<RotationReport> {
    let mut handle = rotator.start(schedule);

    let finished = tokio::select! {
        result = handle.join() => Some(result),
        _ = signal::ctrl_c() => None,
    };

    let result = match finished {
        Some(result) => result,
        None => {
            info!("Shutting down...");
            handle.shutdown().await
        }
    };

    result.context("Rotation failed")
}

/// Run in terminal mode
async fn run_terminal_mode(messages: MessageList, schedule: Schedule) -> Result<()> {
    print_rotation_header(&messages, schedule.interval);

    let rotator = MessageRotator::new(messages, TerminalSurface::stdout());
    match run_rotation(rotator, schedule).await {
        Ok(report) => {
            print_rotation_summary(&report);
            Ok(())
        }
        Err(e) => {
            println!();
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Run in web server mode
async fn run_web_mode(args: Args, messages: MessageList, schedule: Schedule) -> Result<()> {
    let state = AppState::new(
        args.element_id.clone(),
        messages.clone(),
        schedule.interval,
        args.web_dir.clone(),
    );

    if let Some(dir) = &args.web_dir {
        info!("Serving web files from: {:?}", dir);
    }

    let surface = web::locate_surface(&state)
        .await
        .with_context(|| format!("Could not attach to element '{}'", args.element_id))?;

    // Spawn the web server
    let server_state = state.clone();
    let host = args.host.clone();
    let port = args.port;
    tokio::spawn(async move {
        if let Err(e) = web::start_server(server_state, &host, port).await {
            error!("Web server error: {}", e);
        }
    });

    print_info(&format!(
        "Landing page at http://{}:{} (Ctrl+C to stop)",
        args.host, args.port
    ));

    let report = run_rotation(MessageRotator::new(messages, surface), schedule).await?;
    info!("Stopped after {} cycles", report.cycles);
    Ok(())
}
