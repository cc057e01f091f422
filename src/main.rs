use log::{debug, info};
use mailtest_component_configurator::{config_path, load_configuration};
use mailtest_component_mailer::{Outcome, logging, run, run_id_from_env};
use mailtest_lib_shared::DEFAULT_LOG_FILTER;

/// Optional KEY=VALUE file for local runs, e.g. to fake a GITHUB_RUN_ID.
const LOCAL_ENV_FILE: &str = "mailtest.env";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::from_filename(LOCAL_ENV_FILE).ok();
    logging::builder()
        .parse_env(env_logger::Env::new().default_filter_or(DEFAULT_LOG_FILTER))
        .target(env_logger::Target::Stdout)
        .init();

    info!("Starting Mail Test");
    let config = load_configuration(config_path());
    let run_id = run_id_from_env();

    match run(config, &run_id).await {
        Outcome::ConfigAbsent => info!("Mail Test skipped, no configuration"),
        Outcome::Sent(_) | Outcome::SendFailed(_) => debug!("Mail Test finished"),
    }
}
