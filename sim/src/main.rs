use anyhow::Result;
use clap::Parser;
use tracing::info;

use sim::{load_config, load_script, Args, DriveScript, Session};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args.config)?;
    if let Some(mode) = args.mode {
        cfg.mode = mode.into();
    }
    info!(?cfg, "Simulation config loaded");

    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => DriveScript::cruise(args.seconds),
    };

    let mut session = Session::new(cfg)?;
    script.run(&mut session)?;
    session.teardown();

    for done in session.completions() {
        println!("{} = {}", done.zone_id, done.answer);
    }
    info!(
        state = ?session.sequencer().state(),
        answered = session.response().len(),
        frames = session.frames(),
        "Drive finished"
    );
    Ok(())
}
