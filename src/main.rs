//! tcping - command-line entry point

use std::process;
use std::sync::Arc;
use tcping::{
    cli::Cli,
    client::ProberFactory,
    config::{display_config_summary, load_config},
    error::{AppError, Result},
    executor::{spawn_ctrl_c, Session},
    log_debug, log_error,
    logging::{LoggerFactory, ProbeLogForwarder},
    models::Target,
    output::OutputFormatterFactory,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let use_color = cli.use_colors();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));
        if e.is_address_error() || matches!(e, AppError::Config(_) | AppError::Validation(_) | AppError::Parse(_)) {
            eprintln!();
            eprintln!("{}", e.user_friendly_message());
        }
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: Cli) -> Result<()> {
    cli.validate().map_err(AppError::validation)?;

    let config = load_config(cli.clone())?;
    let factory = LoggerFactory::new(config.clone());
    let main_logger = factory.create_logger("MAIN").await;
    let probe_logger = Arc::new(factory.create_probe_logger().await);

    log_debug!(main_logger, "{}", tcping::build_info::long_version());
    log_debug!(main_logger, "{}", cli.get_config_summary());
    log_debug!(main_logger, "Configuration:\n{}", display_config_summary(&config));

    let settings = config.session_settings()?;
    let target = match Target::resolve(&cli.address, cli.port, &settings) {
        Ok(target) => target,
        Err(e) => {
            probe_logger.log_error(&e, Some("Resolving target")).await;
            return Err(e);
        }
    };
    probe_logger.log_resolution(&cli.address, &target).await;

    let prober = ProberFactory::create(&target)?;
    let session = Session::new(target, prober);
    let ctrl_c = spawn_ctrl_c(session.stop_handle());
    probe_logger.log_session_start(session.target(), session.prober_name()).await;

    let mut forwarder = ProbeLogForwarder::spawn(probe_logger.clone(), session.target().clone());
    let formatter = OutputFormatterFactory::create_formatter(config.enable_color);

    let result = session
        .run(|seq, outcome, _| {
            println!("{}", formatter.format_probe(seq, session.target(), outcome));
            forwarder.send(seq, outcome);
        })
        .await;

    ctrl_c.abort();
    if let Err(e) = forwarder.finish().await {
        log_error!(main_logger, "{}", e);
    }

    println!();
    println!("{}", formatter.format_report(&result));
    probe_logger.log_session_end(&result).await;

    if !result.is_reachable() {
        return Err(AppError::test_execution(format!(
            "No successful probe to {} out of {}",
            session.target().address(),
            result.counter()
        )));
    }

    Ok(())
}
