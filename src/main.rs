//! Boiler Caper Demo
//!
//! Runs the full game headless: a scripted walkthrough (bump the west wall,
//! cross the room, open the valve, wander into the security camera's sweep),
//! then replays the same recording to verify the session is deterministic.

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use boiler_caper::{
    game::{
        events::GameEventData,
        input::{InputFrame, InputRecording, KeyState},
        minigame::MinigameKind,
        session::{GameSession, SessionConfig},
    },
    HeadlessConsole, FRAME_RATE, VERSION,
};

/// Frame the demo opens the valve minigame on.
const VALVE_START_FRAME: u32 = 150;

/// Last scripted frame. The tail leaves the player standing in the open so
/// the security camera's sweep has time to come around.
const DEMO_FRAMES: u32 = 900;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Boiler Caper v{}", VERSION);
    info!("Frame rate: {} Hz", FRAME_RATE);

    let recording = script_walkthrough();
    info!(
        frames = DEMO_FRAMES,
        deltas = recording.delta_count(),
        "scripted walkthrough ready"
    );

    let first = run_session(&recording)?;
    let snapshot =
        serde_json::to_string_pretty(first.player()).context("failed to serialize player")?;
    info!("final player state:\n{}", snapshot);

    // Replay the identical recording and compare end states
    info!("=== Verifying Determinism ===");
    let replay = run_session(&recording)?;

    let same = first.player().position == replay.player().position
        && first.player().tile_x == replay.player().tile_x
        && first.player().tile_z == replay.player().tile_z
        && first.player().lying_down == replay.player().lying_down;
    if same {
        info!("DETERMINISM VERIFIED: replay matches");
    } else {
        info!("DETERMINISM FAILURE: replay diverged");
    }

    Ok(())
}

/// Build the demo input script as a delta-compressed recording.
fn script_walkthrough() -> InputRecording {
    let mut recording = InputRecording::new(0xC0FFEE);

    for frame in 0..=DEMO_FRAMES {
        let input = if frame < 10 {
            // Bump the west wall
            InputFrame::with_keys(KeyState::LEFT)
        } else if frame < 32 {
            // One cell east to the open column
            InputFrame::with_keys(KeyState::RIGHT)
        } else if frame < 120 {
            // North along column 2
            InputFrame::with_keys(KeyState::UP)
        } else if frame < VALVE_START_FRAME {
            InputFrame::idle()
        } else if frame < 470 {
            // Swipe the valve: pen down, drag right, pen up
            match frame % 3 {
                0 => InputFrame::with_stylus(40, 96),
                1 => InputFrame::with_stylus(140, 96),
                _ => InputFrame::idle(),
            }
        } else if frame < 540 {
            // Stroll east along the open row, into camera territory
            InputFrame::with_keys(KeyState::RIGHT)
        } else {
            // Stand in the open and wait for the sweep
            InputFrame::idle()
        };
        recording.record(frame, input);
    }

    recording
}

/// Run one full session over the recording, logging every event.
fn run_session(recording: &InputRecording) -> anyhow::Result<GameSession> {
    let mut console = HeadlessConsole::with_assets(GameSession::packaged_assets());
    let mut session = GameSession::new(SessionConfig {
        seed: recording.seed,
        debug_overlay: true,
    });

    // An asset missing from the packaged filesystem aborts startup here
    session
        .load(&mut console)
        .context("asset load failed, aborting")?;

    for (frame, input) in recording.replay_iter() {
        if frame == VALVE_START_FRAME {
            session
                .start_minigame(MinigameKind::Valve, &mut console)
                .context("minigame load failed")?;
        }

        for event in session.advance_frame(input, &mut console) {
            match event.data {
                GameEventData::MoveBlocked { tile_x, tile_z } => {
                    info!(frame = event.frame, tile_x, tile_z, "bumped into a wall");
                }
                GameEventData::TileReached { tile_x, tile_z } => {
                    info!(frame = event.frame, tile_x, tile_z, "stepped onto tile");
                }
                GameEventData::PlayerCaught => {
                    info!(frame = event.frame, "caught by the security camera");
                }
                GameEventData::MinigameStarted { kind } => {
                    info!(frame = event.frame, ?kind, "minigame started");
                }
                GameEventData::MinigameCompleted { kind } => {
                    info!(frame = event.frame, ?kind, "minigame completed");
                }
            }
        }
    }

    session.unload(&mut console);
    info!(
        live_handles = console.live_handles(),
        "session torn down"
    );

    Ok(session)
}
