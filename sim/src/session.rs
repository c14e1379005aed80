use std::time::Duration;

use anyhow::{anyhow, Result};
use bevy_app::App;
use bevy_time::Time;
use course::{
    builtins, CourseSpec, InputHandle, InputSampler, SurveyResponse, TriggerIndicator, TriggerSlot,
    ZoneCompleted, ZoneEvent, ZoneSequencer, ZoneState,
};
use tracing::info;

use crate::systems::{Course, Sequencer, SurveyLog, VehicleTelemetry};
use crate::{build_sim_app, Config, VehiclePose};

/// A running drive: the app plus the handle that feeds it input.
pub struct Session {
    app: App,
    input: InputHandle,
    frame_dt: f32,
    frames: u64,
}

impl Session {
    /// Session on the built-in survey course.
    pub fn new(cfg: Config) -> Result<Self> {
        Self::with_course(cfg, &builtins::survey_course())
    }

    pub fn with_course(cfg: Config, course: &CourseSpec) -> Result<Self> {
        let sampler = InputSampler::new();
        let input = sampler.handle();
        let frame_dt = cfg.frame_dt();
        let app = build_sim_app(cfg, course, sampler)?;
        Ok(Self {
            app,
            input,
            frame_dt,
            frames: 0,
        })
    }

    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame at the configured rate.
    pub fn step(&mut self) {
        self.step_by(self.frame_dt);
    }

    /// One frame of `dt` seconds. A non-positive or non-finite `dt` runs the
    /// schedule without advancing anything.
    pub fn step_by(&mut self, dt: f32) {
        let delta = Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO);
        if let Some(mut time) = self.app.world_mut().get_resource_mut::<Time>() {
            time.advance_by(delta);
        }
        self.app.update();
        self.frames += 1;
    }

    pub fn run_for(&mut self, seconds: f32) {
        let frames = (seconds / self.frame_dt).round().max(0.0) as u64;
        for _ in 0..frames {
            self.step();
        }
    }

    pub fn telemetry(&self) -> VehicleTelemetry {
        *self.app.world().resource::<VehicleTelemetry>()
    }

    pub fn vehicle_pose(&self) -> Option<VehiclePose> {
        self.telemetry().pose
    }

    pub fn sequencer(&self) -> &ZoneSequencer {
        &self.app.world().resource::<Sequencer>().0
    }

    pub fn response(&self) -> &SurveyResponse {
        self.sequencer().response()
    }

    pub fn completions(&self) -> &[ZoneCompleted] {
        &self.app.world().resource::<SurveyLog>().completions
    }

    pub fn events(&self) -> &[ZoneEvent] {
        &self.app.world().resource::<SurveyLog>().events
    }

    pub fn zone_index(&self, zone_id: &str) -> Option<usize> {
        self.sequencer().zone_index(zone_id)
    }

    pub fn zone_state(&self, zone_id: &str) -> Option<&ZoneState> {
        let zone = self.zone_index(zone_id)?;
        self.sequencer().zone_state(zone)
    }

    pub fn is_captured(&self, zone_id: &str) -> bool {
        self.zone_state(zone_id).is_some_and(ZoneState::is_captured)
    }

    pub fn is_complete(&self, zone_id: &str) -> bool {
        self.zone_state(zone_id).is_some_and(|s| s.complete)
    }

    pub fn selection_count(&self, zone_id: &str) -> usize {
        self.zone_index(zone_id)
            .map_or(0, |zone| self.sequencer().selection_count(zone))
    }

    pub fn indicator(&self, zone_id: &str, slot: TriggerSlot) -> Option<TriggerIndicator> {
        let zone = self.zone_index(zone_id)?;
        self.app.world().resource::<Course>().0.triggers().indicator(zone, slot)
    }

    /// Submit free text for an open prompt. `Ok(false)` when ignored.
    pub fn submit_text(&mut self, zone_id: &str, text: &str) -> Result<bool> {
        let zone = self
            .zone_index(zone_id)
            .ok_or_else(|| anyhow!("unknown zone `{zone_id}`"))?;
        let mut sequencer = self.app.world_mut().resource_mut::<Sequencer>();
        Ok(sequencer.0.submit_text(zone, text)?)
    }

    /// The intro video ended; releases the car on the next frame.
    pub fn video_finished(&mut self) -> bool {
        self.app.world_mut().resource_mut::<Sequencer>().0.video_finished()
    }

    /// Cancel pending completions; later triggers are ignored.
    pub fn teardown(&mut self) {
        self.app.world_mut().resource_mut::<Sequencer>().0.teardown();
        info!(frames = self.frames, "Session torn down");
    }
}
