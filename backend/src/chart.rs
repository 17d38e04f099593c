use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::StatusTally;
use plotly::{Configuration, Layout, Pie, Plot};

pub const CHART_ID: &str = "status-chart";

const OK_COLOR: &str = "#4CAF50";
const NOT_OK_COLOR: &str = "#F44336";

/// Two-slice pie of all OK vs NOT OK labels.
///
/// Returns a standalone chart document with plotly.js built in, base64 encoded
/// for a `data:text/html` URI, so the page needs nothing from the network.
pub fn status_pie(tally: &StatusTally) -> String {
    let mut plot = Plot::new();
    let trace = Pie::new(vec![tally.ok, tally.not_ok])
        .labels(vec!["OK", "NOT OK"])
        .text_info("label+percent")
        .name("Status");
    plot.add_trace(trace);
    plot.set_configuration(
        Configuration::default()
            .display_logo(false)
            .editable(false)
            .display_mode_bar(plotly::configuration::DisplayModeBar::Hover),
    );
    plot.set_layout(Layout::new().colorway(vec![OK_COLOR, NOT_OK_COLOR]));

    STANDARD.encode(plot.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(encoded: &str) -> String {
        String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap()
    }

    #[test]
    fn chart_document_is_self_contained() {
        let html = decode(&status_pie(&StatusTally { ok: 5, not_ok: 4 }));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("pie"));
        assert!(html.contains("label+percent"));
        assert!(html.contains(OK_COLOR));
        assert!(html.contains(NOT_OK_COLOR));
        assert!(!html.contains("src=\"http"));
    }

    #[test]
    fn empty_tally_still_renders() {
        let html = decode(&status_pie(&StatusTally::default()));
        assert!(html.contains("Plotly.newPlot"));
    }
}
