use anyhow::Result;
use course::{Action, DeploymentMode, KeyTarget, SequencerState, TriggerSlot};
use sim::{Config, Session};

fn session() -> Result<Session> {
    Session::new(Config::default())
}

fn run_until(session: &mut Session, max_seconds: f32, done: impl Fn(&Session) -> bool) -> bool {
    let frames = (max_seconds / session.frame_dt()) as usize;
    for _ in 0..frames {
        if done(session) {
            return true;
        }
        session.step();
    }
    done(session)
}

#[test]
fn chassis_lands_and_drives_toward_negative_z() -> Result<()> {
    let mut s = session()?;
    s.run_for(0.5);
    let pose = s.vehicle_pose().expect("vehicle spawned on first frame");
    assert!((pose.position.y - 0.3).abs() < 1e-3, "chassis should rest on the ground: y={}", pose.position.y);
    assert!(pose.position.z.abs() < 1e-3);

    s.input().set(Action::Forward, true);
    s.run_for(0.4);
    let t = s.telemetry();
    let pose = t.pose.expect("pose");
    assert!(t.state.speed > 20.0, "speed={}", t.state.speed);
    assert!(pose.position.z < -2.0, "z={}", pose.position.z);
    assert!(pose.position.x.abs() < 1e-4);
    Ok(())
}

#[test]
fn play_button_freezes_until_video_ends() -> Result<()> {
    let mut s = session()?;
    s.input().set(Action::Forward, true);
    assert!(run_until(&mut s, 5.0, |s| s.telemetry().frozen), "never reached the play button");
    assert!(s.sequencer().wants_freeze());

    s.run_for(0.2);
    let parked = s.vehicle_pose().expect("pose").position;
    s.run_for(1.0);
    let still = s.vehicle_pose().expect("pose").position;
    assert!((parked.z - still.z).abs() < 1e-4, "car crept while frozen: {} -> {}", parked.z, still.z);
    assert_eq!(s.telemetry().state.speed, 0.0);

    assert!(s.video_finished());
    s.run_for(0.5);
    assert!(!s.telemetry().frozen);
    assert!(s.vehicle_pose().expect("pose").position.z < still.z - 1.0);
    assert_eq!(
        s.indicator("intro", TriggerSlot::PlayButton).map(|i| i.fired),
        Some(true)
    );
    Ok(())
}

#[test]
fn reset_returns_to_spawn() -> Result<()> {
    let mut s = session()?;
    let input = s.input();
    input.set(Action::Forward, true);
    input.set(Action::Left, true);
    s.run_for(0.5);
    input.release_all();
    input.set(Action::Reset, true);
    s.step();
    input.release_all();
    let t = s.telemetry();
    let pose = t.pose.expect("pose");
    assert_eq!(t.state.speed, 0.0);
    assert_eq!(t.state.heading, 0.0);
    assert!(pose.position.x.abs() < 1e-4 && pose.position.z.abs() < 1e-4, "pose={pose:?}");
    Ok(())
}

#[test]
fn typing_in_a_text_field_does_not_drive() -> Result<()> {
    let mut s = session()?;
    let input = s.input();
    input.key_event("w", "KeyW", true, KeyTarget::TextEntry);
    s.run_for(0.5);
    assert_eq!(s.telemetry().state.speed, 0.0);
    Ok(())
}

#[test]
fn gated_session_starts_on_the_intro() -> Result<()> {
    let mut s = session()?;
    s.step();
    assert_eq!(s.sequencer().state(), SequencerState::Zone(0));
    assert!(s.response().is_empty());
    Ok(())
}

#[test]
fn teardown_drops_pending_completions() -> Result<()> {
    let cfg = Config {
        mode: DeploymentMode::Concurrent,
        ..Config::default()
    };
    let mut s = Session::new(cfg)?;
    s.input().set(Action::Forward, true);
    assert!(run_until(&mut s, 5.0, |s| s.telemetry().frozen));
    s.video_finished();
    // Source portal sits 50 m out; its answer completes 2 s after capture
    assert!(run_until(&mut s, 10.0, |s| s.is_captured("source")), "missed the source portal");
    assert!(!s.is_complete("source"));
    assert!(!s.sequencer().is_torn_down());
    s.teardown();
    assert!(s.sequencer().is_torn_down());
    s.run_for(3.0);
    assert!(s.response().get("source").is_none());
    assert!(s.completions().iter().all(|c| c.zone_id != "source"));
    Ok(())
}

#[test]
fn unknown_zone_submission_is_an_error() -> Result<()> {
    let mut s = session()?;
    assert!(s.submit_text("nowhere", "hi").is_err());
    // Known zone, but no prompt open yet
    assert!(!s.submit_text("feedback", "hi")?);
    assert!(s.submit_text("age", "hi").is_err());
    Ok(())
}

#[test]
fn bad_frame_times_run_without_advancing() -> Result<()> {
    let mut s = session()?;
    s.input().set(Action::Forward, true);
    s.run_for(0.5);
    let before = s.vehicle_pose().expect("pose").position;
    let frames = s.frames();
    for dt in [f32::INFINITY, f32::NAN, -1.0, 0.0] {
        s.step_by(dt);
    }
    assert_eq!(s.frames(), frames + 4);
    assert_eq!(s.vehicle_pose().expect("pose").position, before);
    Ok(())
}

#[test]
fn inverted_steer_limit_drives_without_panicking() -> Result<()> {
    let mut cfg = Config::default();
    cfg.vehicle.max_steer_angle = -0.6;
    let mut s = Session::new(cfg)?;
    let input = s.input();
    input.set(Action::Forward, true);
    input.set(Action::Left, true);
    s.run_for(0.5);
    assert!(s.telemetry().state.steering_angle.abs() <= 0.6);
    Ok(())
}
