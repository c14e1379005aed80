//! Zone lifecycle and sequencing.
//!
//! A zone captures at most one answer. The answer is latched the moment it
//! is captured (first capture wins) and handed to the [`SurveyResponse`]
//! after the zone's completion delay. In gated mode only the current zone
//! and the zones before it take part; the next zone joins once the current
//! one completes. In concurrent mode every zone takes part from the start.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Answer, CourseError, CourseSpec, SurveyResponse, TriggerFired, TriggerSlot, ZoneKind, ZoneSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    #[default]
    Gated,
    Concurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Index of the zone the driver is working on.
    Zone(usize),
    Complete,
}

/// Immediate reaction of a zone to a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneEvent {
    VideoStarted { zone: usize },
    PromptOpened { zone: usize },
    SelectionToggled { zone: usize, option: String, selected: bool },
    AnswerCaptured { zone: usize, answer: Answer },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCompleted {
    pub zone: usize,
    pub zone_id: String,
    pub answer: Answer,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneState {
    pub selections: BTreeSet<String>,
    pub answer: Option<Answer>,
    pub complete: bool,
    pub prompt_open: bool,
    pub video_playing: bool,
    pending: Option<f32>,
}

impl ZoneState {
    pub fn is_captured(&self) -> bool {
        self.answer.is_some()
    }

    /// Seconds left before completion, if an answer is waiting.
    pub fn pending(&self) -> Option<f32> {
        self.pending
    }
}

#[derive(Debug, Clone)]
pub struct ZoneSequencer {
    mode: DeploymentMode,
    zones: Vec<ZoneSpec>,
    states: Vec<ZoneState>,
    response: SurveyResponse,
    current: usize,
    torn_down: bool,
}

impl ZoneSequencer {
    pub fn new(course: &CourseSpec, mode: DeploymentMode) -> Result<Self, CourseError> {
        validate(course, mode)?;
        Ok(Self {
            mode,
            zones: course.zones.clone(),
            states: vec![ZoneState::default(); course.zones.len()],
            response: SurveyResponse::default(),
            current: 0,
            torn_down: false,
        })
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn zones(&self) -> &[ZoneSpec] {
        &self.zones
    }

    pub fn zone_index(&self, id: &str) -> Option<usize> {
        self.zones.iter().position(|z| z.id == id)
    }

    pub fn zone_state(&self, zone: usize) -> Option<&ZoneState> {
        self.states.get(zone)
    }

    pub fn response(&self) -> &SurveyResponse {
        &self.response
    }

    /// Whether the zone's bodies take part in the simulation.
    pub fn is_active(&self, zone: usize) -> bool {
        match self.mode {
            DeploymentMode::Concurrent => zone < self.zones.len(),
            DeploymentMode::Gated => zone < self.zones.len() && zone <= self.current,
        }
    }

    pub fn state(&self) -> SequencerState {
        if self.states.iter().all(|s| s.complete) {
            return SequencerState::Complete;
        }
        match self.mode {
            DeploymentMode::Gated => SequencerState::Zone(self.current),
            DeploymentMode::Concurrent => self
                .states
                .iter()
                .position(|s| !s.complete)
                .map_or(SequencerState::Complete, SequencerState::Zone),
        }
    }

    pub fn selection_count(&self, zone: usize) -> usize {
        self.states.get(zone).map_or(0, |s| s.selections.len())
    }

    /// The continue gate may fire: zone active, unanswered, and something selected.
    pub fn continue_live(&self, zone: usize) -> bool {
        self.is_active(zone)
            && self
                .states
                .get(zone)
                .is_some_and(|s| !s.complete && s.answer.is_none() && !s.selections.is_empty())
    }

    /// The car must hold still while an intro video plays.
    pub fn wants_freeze(&self) -> bool {
        self.states.iter().any(|s| s.video_playing)
    }

    /// Returns true when a video was actually playing.
    pub fn video_finished(&mut self) -> bool {
        let mut any = false;
        for state in &mut self.states {
            any |= std::mem::take(&mut state.video_playing);
        }
        if any {
            info!("intro video finished; car released");
        }
        any
    }

    /// React to one trigger event. Events for inactive, answered or torn-down
    /// zones are ignored.
    pub fn handle(&mut self, fired: TriggerFired) -> Option<ZoneEvent> {
        let zone = fired.zone;
        if self.torn_down || !self.is_active(zone) {
            return None;
        }
        let state = self.states.get_mut(zone)?;
        if state.complete || state.answer.is_some() {
            return None;
        }
        let kind = &self.zones[zone].kind;

        let answer = match (kind, fired.slot) {
            (ZoneKind::Intro { .. }, TriggerSlot::PlayButton) => {
                if state.video_playing {
                    return None;
                }
                state.video_playing = true;
                info!(zone, "intro video started; car frozen");
                return Some(ZoneEvent::VideoStarted { zone });
            }
            (ZoneKind::Intro { .. }, TriggerSlot::StartGate) => {
                state.video_playing = false;
                Answer::Acknowledged
            }
            (ZoneKind::SingleChoice { .. }, TriggerSlot::Option(index)) => {
                Answer::Choice(kind.option_id(index)?.to_string())
            }
            (ZoneKind::MultiSelect { .. }, TriggerSlot::Option(index)) => {
                let option = kind.option_id(index)?.to_string();
                // Toggle: a second knockdown of the same option deselects it.
                let selected = if state.selections.remove(&option) {
                    false
                } else {
                    state.selections.insert(option.clone());
                    true
                };
                debug!(zone, %option, selected, count = state.selections.len(), "selection toggled");
                return Some(ZoneEvent::SelectionToggled { zone, option, selected });
            }
            (ZoneKind::MultiSelect { .. }, TriggerSlot::Continue) => {
                if state.selections.is_empty() {
                    return None;
                }
                Answer::Selections(state.selections.clone())
            }
            (ZoneKind::FreeText { .. }, TriggerSlot::Booth) => {
                if state.prompt_open {
                    return None;
                }
                state.prompt_open = true;
                info!(zone, "text prompt opened");
                return Some(ZoneEvent::PromptOpened { zone });
            }
            _ => return None,
        };
        Some(self.capture(zone, answer))
    }

    /// Submit the text typed into an open prompt. `Ok(false)` when the zone
    /// already has an answer or its prompt is not open.
    pub fn submit_text(&mut self, zone: usize, text: &str) -> Result<bool, CourseError> {
        let spec = self
            .zones
            .get(zone)
            .ok_or_else(|| CourseError::UnknownZone(zone.to_string()))?;
        if !matches!(spec.kind, ZoneKind::FreeText { .. }) {
            return Err(CourseError::NotFreeText(spec.id.clone()));
        }
        if self.torn_down || !self.is_active(zone) {
            return Ok(false);
        }
        let state = &mut self.states[zone];
        if !state.prompt_open || state.answer.is_some() || state.complete {
            return Ok(false);
        }
        state.prompt_open = false;
        self.capture(zone, Answer::Text(text.trim().to_string()));
        Ok(true)
    }

    fn capture(&mut self, zone: usize, answer: Answer) -> ZoneEvent {
        let delay = self.zones[zone].completion_delay.max(0.0);
        let state = &mut self.states[zone];
        state.answer = Some(answer.clone());
        state.pending = Some(delay);
        info!(zone, zone_id = %self.zones[zone].id, %answer, delay, "answer captured");
        ZoneEvent::AnswerCaptured { zone, answer }
    }

    /// Run completion timers. Zones whose delay has elapsed write their
    /// answer into the response and are returned in zone order.
    pub fn advance(&mut self, dt: f32) -> Vec<ZoneCompleted> {
        let mut completed = Vec::new();
        if self.torn_down {
            return completed;
        }
        for zone in 0..self.states.len() {
            let state = &mut self.states[zone];
            let Some(remaining) = state.pending.as_mut() else {
                continue;
            };
            *remaining -= dt.max(0.0);
            if *remaining > 0.0 {
                continue;
            }
            state.pending = None;
            let Some(answer) = state.answer.clone() else {
                continue;
            };
            state.complete = true;
            state.video_playing = false;
            state.prompt_open = false;

            let zone_id = self.zones[zone].id.clone();
            if let Err(err) = self.response.record(&zone_id, answer.clone()) {
                warn!(%err, "duplicate completion dropped");
                continue;
            }
            info!(zone, zone_id = %zone_id, "zone complete");
            completed.push(ZoneCompleted {
                zone,
                zone_id,
                answer,
            });
        }
        while self.current < self.states.len() && self.states[self.current].complete {
            self.current += 1;
        }
        completed
    }

    /// Cancel pending completions and ignore everything afterwards.
    pub fn teardown(&mut self) {
        let cancelled = self.states.iter_mut().filter_map(|s| s.pending.take()).count();
        self.torn_down = true;
        debug!(cancelled, "sequencer torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

fn validate(course: &CourseSpec, mode: DeploymentMode) -> Result<(), CourseError> {
    if course.zones.is_empty() {
        return Err(CourseError::Empty);
    }
    let mut seen = HashSet::new();
    for zone in &course.zones {
        if !seen.insert(zone.id.as_str()) {
            return Err(CourseError::DuplicateZone(zone.id.clone()));
        }
        if zone.span.min_z >= zone.span.max_z {
            return Err(CourseError::EmptySpan(zone.id.clone()));
        }
    }
    if mode == DeploymentMode::Concurrent {
        for (i, a) in course.zones.iter().enumerate() {
            if let Some(b) = course.zones[i + 1..].iter().find(|b| a.span.overlaps(&b.span)) {
                return Err(CourseError::OverlappingZones {
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GateOption, Shape, Vec3f, VolumeSpec, ZoneSpan};

    fn gate(id: &str, x: f32) -> GateOption {
        GateOption {
            id: id.into(),
            label: id.to_uppercase(),
            volume: VolumeSpec::new(Vec3f::new(x, 1.0, 0.0), Shape::cylinder(1.0, 2.0)),
        }
    }

    fn choice_zone(id: &str, min_z: f32, max_z: f32, delay: f32) -> ZoneSpec {
        ZoneSpec {
            id: id.into(),
            title: id.into(),
            span: ZoneSpan::new(min_z, max_z),
            completion_delay: delay,
            kind: ZoneKind::SingleChoice {
                options: vec![gate("a", -3.0), gate("b", 3.0)],
            },
            solids: Vec::new(),
        }
    }

    fn two_zone_course() -> CourseSpec {
        CourseSpec {
            spawn: Vec3f::ZERO,
            walls: Vec::new(),
            zones: vec![choice_zone("first", -20.0, -10.0, 1.5), choice_zone("second", -40.0, -30.0, 1.5)],
        }
    }

    fn option(zone: usize, index: usize) -> TriggerFired {
        TriggerFired {
            zone,
            slot: TriggerSlot::Option(index),
        }
    }

    #[test]
    fn gated_mode_ignores_later_zones_until_completion() {
        let mut seq = ZoneSequencer::new(&two_zone_course(), DeploymentMode::Gated).unwrap();
        assert!(!seq.is_active(1));
        assert!(seq.handle(option(1, 0)).is_none());

        assert!(seq.handle(option(0, 1)).is_some());
        // Captured but not yet complete: the next zone is still closed.
        assert!(seq.advance(1.0).is_empty());
        assert!(!seq.is_active(1));
        let done = seq.advance(0.6);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].answer, Answer::Choice("b".into()));
        assert!(seq.is_active(1));
        assert_eq!(seq.state(), SequencerState::Zone(1));
    }

    #[test]
    fn first_capture_wins() {
        let mut seq = ZoneSequencer::new(&two_zone_course(), DeploymentMode::Concurrent).unwrap();
        seq.handle(option(0, 0));
        assert!(seq.handle(option(0, 1)).is_none());
        seq.advance(2.0);
        assert_eq!(seq.response().get("first"), Some(&Answer::Choice("a".into())));
    }

    #[test]
    fn concurrent_zones_answer_in_any_order() {
        let mut seq = ZoneSequencer::new(&two_zone_course(), DeploymentMode::Concurrent).unwrap();
        seq.handle(option(1, 0));
        seq.advance(2.0);
        assert_eq!(seq.state(), SequencerState::Zone(0));
        seq.handle(option(0, 1));
        seq.advance(2.0);
        assert_eq!(seq.state(), SequencerState::Complete);
        assert_eq!(seq.response().len(), 2);
    }

    #[test]
    fn overlapping_spans_rejected_in_concurrent_mode() {
        let mut course = two_zone_course();
        course.zones[1].span = ZoneSpan::new(-25.0, -15.0);
        let err = ZoneSequencer::new(&course, DeploymentMode::Concurrent).unwrap_err();
        assert_eq!(
            err,
            CourseError::OverlappingZones {
                first: "first".into(),
                second: "second".into()
            }
        );
        assert!(ZoneSequencer::new(&course, DeploymentMode::Gated).is_ok());
    }

    #[test]
    fn teardown_cancels_pending_completion() {
        let mut seq = ZoneSequencer::new(&two_zone_course(), DeploymentMode::Gated).unwrap();
        seq.handle(option(0, 0));
        seq.teardown();
        assert!(seq.advance(5.0).is_empty());
        assert!(seq.response().is_empty());
        assert!(seq.handle(option(0, 1)).is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut course = two_zone_course();
        course.zones[1].id = "first".into();
        assert_eq!(
            ZoneSequencer::new(&course, DeploymentMode::Gated).unwrap_err(),
            CourseError::DuplicateZone("first".into())
        );
    }
}
