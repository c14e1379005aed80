#[cfg(test)]
mod integration {
    use std::collections::BTreeSet;
    use std::f32::consts::{PI, TAU};
    use std::time::Duration;

    use anyhow::Result;
    use bevy_app::{App, Update};
    use bevy_ecs::prelude::*;
    use bevy_time::Time;
    use course::{builtins::survey_course, Action, Answer, DeploymentMode, InputHandle, InputSampler, SequencerState};
    use sim::systems::{FrameSet, Sequencer};
    use sim::{build_sim_app, Config, Session};
    use tracing::info;

    const SIM_DT: f32 = 1.0 / 60.0;
    const LOOKAHEAD: f32 = 12.0;
    const HEADING_DEADBAND: f32 = 0.02;
    const CRUISE_SPEED: f32 = 18.0;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn advance_app(app: &mut App, dt: f32) {
        if let Some(mut time) = app.world_mut().get_resource_mut::<Time>() {
            time.advance_by(Duration::from_secs_f32(dt));
        }
        app.update();
    }

    fn wrap_angle(a: f32) -> f32 {
        (a + PI).rem_euclid(TAU) - PI
    }

    fn picks(ids: &[&str]) -> Answer {
        Answer::Selections(ids.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>())
    }

    /// Steers along a lane parallel to -Z with bang-bang steering and a
    /// lookahead point, holding roughly constant speed.
    struct Pilot {
        input: InputHandle,
    }

    impl Pilot {
        fn steer(&self, session: &Session, lane_x: f32) {
            let t = session.telemetry();
            let Some(pose) = t.pose else {
                return;
            };
            let dx = lane_x - pose.position.x;
            let desired = (-dx).atan2(LOOKAHEAD);
            let err = wrap_angle(desired - t.state.heading);
            self.input.set(Action::Brake, false);
            self.input.set(Action::Left, err > HEADING_DEADBAND);
            self.input.set(Action::Right, err < -HEADING_DEADBAND);
            self.input.set(Action::Forward, t.state.speed < CRUISE_SPEED);
        }

        fn hold(&self) {
            self.input.release_all();
            self.input.set(Action::Brake, true);
        }
    }

    fn drive_until(
        session: &mut Session,
        pilot: &Pilot,
        lane_x: f32,
        max_seconds: f32,
        done: impl Fn(&Session) -> bool,
    ) -> bool {
        let frames = (max_seconds / session.frame_dt()) as usize;
        for _ in 0..frames {
            if done(session) {
                return true;
            }
            pilot.steer(session, lane_x);
            session.step();
        }
        done(session)
    }

    /// Brake and wait for the zone's completion delay to run out.
    fn settle(session: &mut Session, pilot: &Pilot, zone_id: &str) -> bool {
        pilot.hold();
        for _ in 0..600 {
            if session.is_complete(zone_id) {
                return true;
            }
            session.step();
        }
        session.is_complete(zone_id)
    }

    fn answer_zone(session: &mut Session, pilot: &Pilot, zone_id: &str, lane_x: f32) -> Result<()> {
        let captured = drive_until(session, pilot, lane_x, 30.0, |s| s.is_captured(zone_id));
        let z = session.vehicle_pose().map(|p| p.position.z);
        anyhow::ensure!(captured, "never answered `{zone_id}` (car at z={z:?})");
        anyhow::ensure!(settle(session, pilot, zone_id), "`{zone_id}` never completed");
        info!(zone_id, answer = ?session.response().get(zone_id), "zone answered");
        Ok(())
    }

    #[test]
    fn gated_drive_answers_every_zone_in_order() -> Result<()> {
        init_tracing();
        let mut session = Session::new(Config::default())?;
        let pilot = Pilot {
            input: session.input(),
        };

        // Intro: the play button parks the car until the video ends.
        assert!(drive_until(&mut session, &pilot, 0.0, 5.0, |s| s.telemetry().frozen));
        session.run_for(0.5);
        assert_eq!(session.telemetry().state.speed, 0.0);
        assert!(session.video_finished());
        assert!(drive_until(&mut session, &pilot, 0.0, 10.0, |s| s.is_complete("intro")));

        answer_zone(&mut session, &pilot, "source", 0.0)?;
        answer_zone(&mut session, &pilot, "play_style", 4.0)?;
        answer_zone(&mut session, &pilot, "frequency", 0.0)?;

        // Both middle characters go down before the continue gate submits.
        assert!(drive_until(&mut session, &pilot, 0.0, 20.0, |s| s.selection_count("partners") == 2));
        answer_zone(&mut session, &pilot, "partners", 0.0)?;

        answer_zone(&mut session, &pilot, "games", 0.0)?;
        answer_zone(&mut session, &pilot, "location", 0.0)?;
        answer_zone(&mut session, &pilot, "age", 3.0)?;
        answer_zone(&mut session, &pilot, "vibe", -3.0)?;

        let prompt_open = |s: &Session| s.zone_state("feedback").is_some_and(|z| z.prompt_open);
        assert!(drive_until(&mut session, &pilot, 0.0, 20.0, prompt_open), "booth never opened");
        pilot.hold();
        assert!(session.submit_text("feedback", "  great ride ")?);
        assert!(settle(&mut session, &pilot, "feedback"));

        let response = session.response();
        assert_eq!(session.sequencer().state(), SequencerState::Complete);
        assert_eq!(response.len(), 10);
        assert_eq!(response.get("intro"), Some(&Answer::Acknowledged));
        assert_eq!(response.get("source"), Some(&Answer::Choice("convention".into())));
        assert_eq!(response.get("play_style"), Some(&Answer::Choice("story".into())));
        assert_eq!(response.get("frequency"), Some(&Answer::Choice("monthly-few".into())));
        assert_eq!(response.get("partners"), Some(&picks(&["gaming-group", "partner"])));
        assert_eq!(response.get("games"), Some(&picks(&["rivals-fairyland"])));
        assert_eq!(response.get("location"), Some(&Answer::Choice("uk".into())));
        assert_eq!(response.get("age"), Some(&Answer::Choice("35-44".into())));
        assert_eq!(response.get("vibe"), Some(&Answer::Choice("yes".into())));
        assert_eq!(response.get("feedback"), Some(&Answer::Text("great ride".into())));

        let order: Vec<usize> = session.completions().iter().map(|c| c.zone).collect();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
        Ok(())
    }

    fn release_video(mut sequencer: ResMut<Sequencer>) {
        if sequencer.0.wants_freeze() {
            sequencer.0.video_finished();
        }
    }

    #[test]
    fn concurrent_straight_cruise_answers_zones_on_the_centre_line() -> Result<()> {
        init_tracing();
        let cfg = Config {
            mode: DeploymentMode::Concurrent,
            ..Config::default()
        };
        let sampler = InputSampler::new();
        let input = sampler.handle();
        let mut app = build_sim_app(cfg, &survey_course(), sampler)?;
        app.add_systems(Update, release_video.after(FrameSet));

        input.set(Action::Forward, true);
        for _ in 0..(25.0 / SIM_DT) as usize {
            advance_app(&mut app, SIM_DT);
        }

        let sequencer = &app.world().resource::<Sequencer>().0;
        let response = sequencer.response();
        assert_eq!(response.get("intro"), Some(&Answer::Acknowledged));
        assert_eq!(response.get("source"), Some(&Answer::Choice("convention".into())));
        assert_eq!(response.get("play_style"), None, "no island on the centre line");
        assert_eq!(response.get("frequency"), Some(&Answer::Choice("monthly-few".into())));
        assert_eq!(response.get("games"), Some(&picks(&["rivals-fairyland"])));
        assert_eq!(response.get("location"), Some(&Answer::Choice("uk".into())));
        // Two gates touched in the same frame: registration order decides.
        assert_eq!(response.get("age"), Some(&Answer::Choice("25-34".into())));
        assert_eq!(response.get("vibe"), None);
        assert_eq!(sequencer.state(), SequencerState::Zone(2));
        Ok(())
    }
}
