use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use course::Action;
use serde::Deserialize;
use tracing::{info, warn};

use crate::Session;

/// Timed list of held actions, replayed frame by frame.
///
/// ```toml
/// [[step]]
/// seconds = 1.5
/// hold = ["forward"]
///
/// [[step]]
/// seconds = 0.5
/// hold = ["forward", "left"]
/// video_finished = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveScript {
    #[serde(rename = "step", default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    pub seconds: f32,
    #[serde(default)]
    pub hold: Vec<Action>,
    /// Signal the end of the intro video before this step.
    #[serde(default)]
    pub video_finished: bool,
    /// Submit text to a prompt before this step.
    #[serde(default)]
    pub submit_text: Option<SubmitText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitText {
    pub zone: String,
    pub text: String,
}

pub fn load_script(path: &Path) -> Result<DriveScript> {
    let text = fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
}

impl DriveScript {
    /// Hold forward for `seconds`, releasing the intro video as soon as it starts.
    pub fn cruise(seconds: f32) -> Self {
        Self {
            steps: vec![
                ScriptStep {
                    seconds: 2.0_f32.min(seconds),
                    hold: vec![Action::Forward],
                    video_finished: false,
                    submit_text: None,
                },
                ScriptStep {
                    seconds: (seconds - 2.0).max(0.0),
                    hold: vec![Action::Forward],
                    video_finished: true,
                    submit_text: None,
                },
            ],
        }
    }

    pub fn run(&self, session: &mut Session) -> Result<()> {
        let input = session.input();
        for (i, step) in self.steps.iter().enumerate() {
            if step.video_finished {
                session.video_finished();
            }
            if let Some(submit) = &step.submit_text {
                if !session.submit_text(&submit.zone, &submit.text)? {
                    warn!(zone = %submit.zone, "Text submission ignored; prompt not open");
                }
            }
            input.release_all();
            for &action in &step.hold {
                input.set(action, true);
            }
            info!(step = i, seconds = step.seconds, hold = ?step.hold, "Script step");
            session.run_for(step.seconds);
        }
        input.release_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_with_actions() {
        let script: DriveScript = toml::from_str(
            r#"
            [[step]]
            seconds = 1.5
            hold = ["forward", "left"]

            [[step]]
            seconds = 2.0
            video_finished = true

            [step.submit_text]
            zone = "feedback"
            text = "lovely"
            "#,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[0].hold, vec![Action::Forward, Action::Left]);
        assert!(script.steps[1].video_finished);
        assert_eq!(script.steps[1].submit_text.as_ref().map(|s| s.text.as_str()), Some("lovely"));
    }
}
