//! Plain-text rendering of results, history and settings.

use crate::canvas::{CanvasSettings, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::history::HistoryLine;
use crate::session::{AppContext, Outcome};

pub const BLANK_WARNING: &str = "Please draw something on the canvas first!";
pub const EMPTY_HISTORY: &str = "No predictions yet.";

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Predicted(view) => {
            let mut out = format!(
                "Analysis complete!\nDetected letter: {}\nConfidence: {:.2}%",
                view.display_label, view.confidence
            );
            if let Some(description) = &view.description {
                out.push_str(&format!("\n\nAbout {}:\n{}", view.display_label, description));
            }
            out
        }
        Outcome::Blank => format!("warning: {}", BLANK_WARNING),
        Outcome::ModelUnavailable(msg) => format!("error: Model is not ready ({})", msg),
        Outcome::InvalidInput(msg) => format!("error: Invalid drawing ({})", msg),
        Outcome::Failed(msg) => format!("error: Prediction failed ({})", msg),
    }
}

pub fn render_history(lines: &[HistoryLine]) -> String {
    if lines.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_settings(settings: &CanvasSettings) -> String {
    format!(
        "pen: {}px {} | background: {} | canvas: {}x{}",
        settings.stroke_width(),
        settings.stroke_color,
        settings.background_color,
        CANVAS_WIDTH,
        CANVAS_HEIGHT
    )
}

/// Banner shown when a session starts, or `None` when everything loaded.
pub fn startup_banner(ctx: &AppContext) -> Option<String> {
    ctx.startup_error()
        .map(|msg| format!("error: Failed to load model: {}", msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PredictionView;

    fn predicted(description: Option<&str>) -> Outcome {
        Outcome::Predicted(PredictionView {
            label: "ba".into(),
            display_label: "Ba".into(),
            confidence: 70.0,
            description: description.map(String::from),
        })
    }

    #[test]
    fn test_prediction_without_description() {
        let text = render_outcome(&predicted(None));
        assert!(text.contains("Detected letter: Ba"));
        assert!(text.contains("Confidence: 70.00%"));
        assert!(!text.contains("About"));
    }

    #[test]
    fn test_prediction_with_description() {
        let text = render_outcome(&predicted(Some("Second letter")));
        assert!(text.ends_with("About Ba:\nSecond letter"));
    }

    #[test]
    fn test_blank_and_errors() {
        assert_eq!(
            render_outcome(&Outcome::Blank),
            "warning: Please draw something on the canvas first!"
        );
        assert!(render_outcome(&Outcome::ModelUnavailable("missing".into())).starts_with("error:"));
    }

    #[test]
    fn test_history_rendering() {
        assert_eq!(render_history(&[]), EMPTY_HISTORY);
        let lines = vec![
            HistoryLine { number: 2, label: "ba".into(), confidence: 70.0 },
            HistoryLine { number: 1, label: "alif".into(), confidence: 99.5 },
        ];
        assert_eq!(
            render_history(&lines),
            "2. Ba (confidence: 70.00%)\n1. Alif (confidence: 99.50%)"
        );
    }

    #[test]
    fn test_settings_rendering() {
        assert_eq!(
            render_settings(&CanvasSettings::default()),
            "pen: 15px #000000 | background: #FFFFFF | canvas: 400x300"
        );
    }
}
