//! Whole-session behavior through the public API

use arcade_driving::persistence::{KeyValueStore, MemoryStore};
use arcade_driving::platform::Viewport;
use arcade_driving::sim::{DriveInput, EndReason, GamePhase, Obstacle};
use arcade_driving::{BestScore, Session, Settings};

fn viewport() -> Viewport {
    Viewport::new(900.0, 700.0, 1.0)
}

/// Start a run, give it `score`, and crash on the next frame
fn play_run(session: &mut Session<MemoryStore>, seed: u64, score: u64) -> arcade_driving::Frame {
    session.start(seed);
    session.frame(0.0, &DriveInput::default());
    let rect = session.state().vehicle.rect;
    let state = session.state_mut();
    state.score = score;
    state.obstacles.push(Obstacle { rect, vy: 0.0, color: 1 });
    session.frame(16.0, &DriveInput::default())
}

#[test]
fn best_score_only_grows() {
    let mut store = MemoryStore::new();
    store.set(BestScore::STORAGE_KEY, "300").unwrap();
    let mut session = Session::new(store, viewport(), Settings::default(), 1);
    assert_eq!(session.best(), 300);

    let first = play_run(&mut session, 10, 450);
    assert!(!first.keep_running);
    assert_eq!(first.snapshot.score, 450);
    assert_eq!(first.snapshot.best, 450);
    assert_eq!(session.state().end_reason, Some(EndReason::Collision));
    assert_eq!(
        session.store().get(BestScore::STORAGE_KEY).unwrap().as_deref(),
        Some("450")
    );

    let second = play_run(&mut session, 11, 200);
    assert_eq!(second.snapshot.score, 200);
    assert_eq!(second.snapshot.best, 450);
    assert_eq!(
        session.store().get(BestScore::STORAGE_KEY).unwrap().as_deref(),
        Some("450")
    );
}

#[test]
fn best_score_survives_new_session() {
    let mut session = Session::new(MemoryStore::new(), viewport(), Settings::default(), 1);
    play_run(&mut session, 3, 777);

    let store = session.store().clone();
    let reopened = Session::new(store, viewport(), Settings::default(), 2);
    assert_eq!(reopened.best(), 777);
    assert_eq!(reopened.phase(), GamePhase::Idle);
}

#[test]
fn full_throttle_run_ends_and_stops_the_loop() {
    let mut session = Session::new(MemoryStore::new(), viewport(), Settings::default(), 1);
    session.start(42);

    let input = DriveInput {
        up: true,
        ..DriveInput::default()
    };
    let mut t = 0.0;
    let mut frames = 0;
    loop {
        let frame = session.frame(t, &input);
        frames += 1;
        assert!(frame.snapshot.fuel <= 100);
        assert!(frame.snapshot.speed <= 100);
        if !frame.keep_running {
            break;
        }
        t += 16.0;
        assert!(frames < 200_000, "run never ended");
    }

    assert_eq!(session.phase(), GamePhase::GameOver);
    assert!(session.state().end_reason.is_some());
    assert_eq!(session.best(), session.state().score);
}

#[test]
fn same_seed_same_run() {
    let input = DriveInput {
        up: true,
        right: true,
        ..DriveInput::default()
    };
    let run = |seed| {
        let mut session = Session::new(MemoryStore::new(), viewport(), Settings::default(), 0);
        session.start(seed);
        for i in 0..600 {
            if !session.frame(i as f64 * 16.0, &input).keep_running {
                break;
            }
        }
        session.snapshot()
    };
    assert_eq!(run(9), run(9));
}
