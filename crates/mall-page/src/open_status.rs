//! Open-status indicator

use crate::config::OpenStatusConfig;
use crate::host::Host;

const STATUS_ID: &str = "open-status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Open,
    Closed,
}

/// Open on the half-open interval `[opens, closes)` of fractional hours
pub fn status_at(hours: f64, opens: f64, closes: f64) -> OpenStatus {
    if hours >= opens && hours < closes {
        OpenStatus::Open
    } else {
        OpenStatus::Closed
    }
}

pub fn init<H: Host>(host: &mut H, config: &OpenStatusConfig) {
    let Some(element) = host.element_by_id(STATUS_ID) else {
        tracing::debug!("No #{} element, open status disabled", STATUS_ID);
        return;
    };

    render(host, &element, config);
    let config = config.clone();
    host.set_interval(
        config.refresh_ms,
        Box::new(move |h: &mut H| render(h, &element, &config)),
    );
}

fn render<H: Host>(host: &mut H, element: &H::Node, config: &OpenStatusConfig) {
    let now = host.time_of_day().fractional_hours();
    let markup = match status_at(now, config.opens, config.closes) {
        OpenStatus::Open => &config.open_html,
        OpenStatus::Closed => &config.closed_html,
    };
    host.set_inner_html(element, markup);
}
