use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Local;
use serde::Serialize;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

use pullrefresh_core::{AppConfig, Rect, RefreshController, ScrollView, State};
use pullrefresh_tui::ListHost;

/// Give up on a pull that never gets past the indicator
const MAX_PULL_STEPS: usize = 200;
/// Slack on top of the action latency for the animations to settle
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// One observed state change
#[derive(Debug, Serialize)]
struct StateChange {
    at_ms: u64,
    #[serde(flatten)]
    state: State,
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6} ms  ", self.at_ms)?;
        match self.state {
            State::Initial => write!(f, "initial"),
            State::Releasing { progress } => write!(f, "releasing {:>3.0}%", progress * 100.0),
            State::Loading => write!(f, "loading"),
            State::Finished => write!(f, "finished"),
        }
    }
}

pub async fn run(config: Arc<AppConfig>, json: bool, latency_ms: Option<u64>) -> Result<()> {
    let height = f64::from(config.ui.indicator_height);
    let latency = Duration::from_millis(latency_ms.unwrap_or(config.ui.refresh_duration_ms));
    let started = Instant::now();

    if !json {
        println!(
            "Simulating pull-to-refresh at {} (indicator {} rows, latency {} ms)",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            config.ui.indicator_height,
            latency.as_millis()
        );
    }

    let items = (1..=config.ui.page_size)
        .map(|i| format!("Item #{:03}", i))
        .collect();
    let mut host = ListHost::new(items, &config.ui);
    host.set_viewport(Rect::new(0.0, 0.0, 40.0, 20.0));

    let changes = Rc::new(Cell::new(0u32));
    let counter = changes.clone();
    let animator = move |state: State| {
        counter.set(counter.get() + 1);
        let change = StateChange {
            at_ms: started.elapsed().as_millis() as u64,
            state,
        };
        if json {
            match serde_json::to_string(&change) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to encode state change: {}", e),
            }
        } else {
            println!("{}", change);
        }
    };

    let controller =
        RefreshController::new(animator, height)?.with_config(config.refresh.clone());

    let requested = Rc::new(Cell::new(false));
    let flag = requested.clone();
    let mut view = ScrollView::new(host);
    view.add_pull_to_refresh(controller, move || flag.set(true));

    let fps = u64::from(config.ui.animation_fps.max(1));
    let mut ticker = tokio::time::interval(Duration::from_micros(1_000_000 / fps));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Pull one row per frame until past the indicator, then let go
    view.host_mut().begin_drag();
    let mut steps = 0;
    while view.host().offset() > -(height + 1.0) {
        if steps == MAX_PULL_STEPS {
            bail!(
                "pull stalled at {:.1} rows; indicator of {} rows is out of reach",
                -view.host().offset(),
                height
            );
        }
        view.host_mut().drag_by(1.0);
        frame(&mut view, &mut ticker).await;
        steps += 1;
    }
    view.host_mut().end_drag();
    info!(steps, "Released pull");

    let deadline = Instant::now() + latency + SETTLE_TIMEOUT;
    let mut refresh_started: Option<Instant> = None;
    let mut refreshed = false;
    loop {
        frame(&mut view, &mut ticker).await;

        if requested.replace(false) {
            info!("Refresh action invoked");
            refresh_started = Some(Instant::now());
        }
        if refresh_started.is_some_and(|at| at.elapsed() >= latency) {
            refresh_started = None;
            refreshed = true;
            view.end_refreshing();
        }

        if refreshed && view.refresh_state() == Some(State::Initial) {
            break;
        }
        if Instant::now() > deadline {
            bail!(
                "refresh cycle did not settle (state {:?})",
                view.refresh_state()
            );
        }
    }

    info!(changes = changes.get(), "Simulation complete");
    if !json {
        println!("{} state changes", changes.get());
    }
    Ok(())
}

/// Advance the list physics and the controller by one frame
async fn frame(view: &mut ScrollView<ListHost>, ticker: &mut Interval) {
    ticker.tick().await;
    view.host_mut().tick();
    view.tick();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_change_json_is_flat() {
        let change = StateChange {
            at_ms: 120,
            state: State::Releasing { progress: 0.5 },
        };
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, r#"{"at_ms":120,"state":"releasing","progress":0.5}"#);
    }

    #[test]
    fn test_state_change_text() {
        let change = StateChange {
            at_ms: 42,
            state: State::Releasing { progress: 0.25 },
        };
        assert_eq!(change.to_string(), "    42 ms  releasing  25%");
    }
}
