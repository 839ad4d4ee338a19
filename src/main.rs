use chrono::{Local, NaiveDate};

use sheetcal::app::AppState;
use sheetcal::calendar::{SortOrder, group_by_date};
use sheetcal::source::{EventSource, SheetClient};
use sheetcal::storage::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let config = Config::load_or_default()?;
    let client = SheetClient::new(config.sheet.sheet_id.clone(), config.sheet.gid);

    let today = Local::now().date_naive();
    let mut state = AppState::new(today);

    let generation = state.begin_refresh();
    let outcome = client.load().await;
    state.apply_outcome(generation, outcome);

    print!("{}", render_agenda(&state, today));
    Ok(())
}

fn render_agenda(state: &AppState, today: NaiveDate) -> String {
    let mut lines = Vec::new();

    if state.using_fallback
        && let Some(reason) = &state.error
    {
        lines.push(format!("! {reason}"));
        lines.push(String::new());
    }

    lines.push(format!("Próximos eventos – {}", today.format("%Y-%m-%d")));
    lines.push(String::new());

    let events = state.upcoming_events(today, SortOrder::Ascending);
    if events.is_empty() {
        lines.push("No hay eventos próximos.".to_string());
    } else {
        for (date, group) in group_by_date(&events) {
            lines.push(date.format("%Y-%m-%d").to_string());
            for event in group {
                let mut line = format!("  {:<12} {}", event.event_type, event.title);
                if !event.subject.is_empty() {
                    line.push_str(&format!(" [{}]", event.subject));
                }
                lines.push(line);
            }
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("sheetcal"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "sheetcal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("sheetcal started");
}
