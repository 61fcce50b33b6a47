use chrono::Local;
use planner_app::app::{run, AppConfig};

fn main() {
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env().unwrap_or_default();
    let (today, now) = config.today_and_now(Local::now().naive_local());
    if let Err(err) = run(config, today, now) {
        eprintln!("Failed to render planner: {err:#}");
        std::process::exit(1);
    }
}
