// Unit tests for the swipe deck core

use gamematch_deck::core::gesture::{crosses_threshold, drag_transform, preview_scale_for};
use gamematch_deck::core::{DeckConfig, GestureState, Phase, SwipeController, TickEvent, NO_MORE_CANDIDATES};
use gamematch_deck::models::{Candidate, SwipeDirection};
use std::time::{Duration, Instant};

fn deck(ids: &[&str]) -> Vec<Candidate> {
    ids.iter().map(|id| Candidate::new(*id, id.to_uppercase())).collect()
}

fn release_only() -> DeckConfig {
    DeckConfig {
        auto_commit: false,
        ..DeckConfig::default()
    }
}

fn assert_neutral(state: &GestureState) {
    assert!(state.offset_x.abs() < 1e-9, "offset_x = {}", state.offset_x);
    assert!(state.offset_y.abs() < 1e-9, "offset_y = {}", state.offset_y);
    assert!(state.rotation_deg.abs() < 1e-9, "rotation = {}", state.rotation_deg);
    assert!((state.scale - 1.0).abs() < 1e-9, "scale = {}", state.scale);
}

/// Deterministic drag paths: (x, y) samples ending at `end_x`
fn drag_path(seed: u64, end_x: f64) -> Vec<(f64, f64)> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0
    };

    let steps = 3 + (seed % 7) as usize;
    let mut path = Vec::with_capacity(steps + 1);
    for _ in 0..steps {
        // Wander inside the threshold so only the final sample decides
        path.push((next() * 100.0, next() * 400.0));
    }
    path.push((end_x, next() * 400.0));
    path
}

#[test]
fn test_drag_transform_rotation_follows_offset() {
    let config = DeckConfig::default();
    let threshold = config.threshold();

    let right = drag_transform(threshold, 0.0, &config);
    let left = drag_transform(-threshold, 0.0, &config);

    assert!(right.rotation_deg > 0.0);
    assert!((right.rotation_deg + left.rotation_deg).abs() < 1e-9);
    assert!(right.rotation_deg.abs() <= config.max_rotation_deg + 1e-9);
}

#[test]
fn test_vertical_offset_is_damped_and_clamped() {
    let config = DeckConfig::default();

    let small = drag_transform(0.0, 90.0, &config);
    assert!((small.offset_y - 30.0).abs() < 1e-9);

    let large = drag_transform(0.0, -9000.0, &config);
    assert!((large.offset_y + config.max_vertical_offset).abs() < 1e-9);
}

#[test]
fn test_preview_grows_towards_full_size() {
    let config = DeckConfig::default();

    assert!((preview_scale_for(0.0, &config) - config.preview_base_scale).abs() < 1e-9);
    let halfway = preview_scale_for(config.threshold() / 2.0, &config);
    assert!(halfway > config.preview_base_scale && halfway < 1.0);
    assert!((preview_scale_for(config.threshold() * 3.0, &config) - 1.0).abs() < 1e-9);
}

#[test]
fn test_threshold_is_inclusive() {
    let config = DeckConfig::default();
    assert!(crosses_threshold(config.threshold(), &config));
    assert!(crosses_threshold(-config.threshold(), &config));
    assert!(!crosses_threshold(config.threshold() - 0.01, &config));
}

#[test]
fn test_drags_below_threshold_return_to_neutral() {
    let config = release_only();
    let threshold = config.threshold();

    for seed in 0..200u64 {
        let end_x = (seed as f64 / 200.0) * threshold * 0.99 * if seed % 2 == 0 { 1.0 } else { -1.0 };
        let mut controller = SwipeController::new(config, deck(&["a", "b"]));
        let start = Instant::now();

        assert!(controller.pointer_down(start));
        for (x, y) in drag_path(seed, end_x) {
            assert!(controller.pointer_move(x, y, start).is_none());
        }
        assert!(controller.pointer_up(start).is_none());

        let settled = start + config.spring_settle;
        assert_eq!(controller.tick(settled), Some(TickEvent::Settled));
        assert_neutral(&controller.transform_at(settled));
        assert_eq!(controller.deck().cursor(), 0, "seed {}", seed);
    }
}

#[test]
fn test_drags_past_threshold_commit_exactly_once() {
    for auto_commit in [true, false] {
        let config = DeckConfig {
            auto_commit,
            ..DeckConfig::default()
        };
        let threshold = config.threshold();

        for seed in 0..200u64 {
            let sign = if seed % 2 == 0 { 1.0 } else { -1.0 };
            let end_x = sign * (threshold + seed as f64);
            let mut controller = SwipeController::new(config, deck(&["a", "b", "c"]));
            let start = Instant::now();

            let mut commits = Vec::new();
            controller.pointer_down(start);
            for (x, y) in drag_path(seed, end_x) {
                commits.extend(controller.pointer_move(x, y, start));
            }
            commits.extend(controller.pointer_up(start));

            // Rapid button presses while the card is leaving
            commits.extend(controller.decide(SwipeDirection::Like, start + Duration::from_millis(10)));
            commits.extend(controller.decide(SwipeDirection::Pass, start + Duration::from_millis(20)));

            assert_eq!(commits.len(), 1, "seed {} auto_commit {}", seed, auto_commit);
            assert_eq!(commits[0].candidate_id, "a");
            assert_eq!(commits[0].direction, SwipeDirection::from_offset(sign));

            assert!(controller.phase().is_committing());
            controller.tick(start + config.exit_duration);
            assert_eq!(controller.deck().cursor(), 1);
            assert_eq!(controller.tick(start + config.exit_duration * 2), None);
            assert_eq!(controller.deck().cursor(), 1);
        }
    }
}

#[test]
fn test_decide_is_idempotent_while_committing() {
    let mut controller = SwipeController::new(DeckConfig::default(), deck(&["a", "b"]));
    let now = Instant::now();

    assert!(controller.decide(SwipeDirection::Like, now).is_some());
    for offset in 1..10 {
        let at = now + Duration::from_millis(offset * 10);
        assert!(controller.decide(SwipeDirection::Like, at).is_none());
        assert!(!controller.pointer_down(at));
    }

    controller.tick(now + Duration::from_millis(200));
    assert_eq!(controller.view().top.map(|c| c.id.as_str()), Some("b"));
}

#[test]
fn test_scenario_like_first_of_three() {
    let config = DeckConfig::default();
    let mut controller = SwipeController::new(config, deck(&["a", "b", "c"]));
    let now = Instant::now();

    controller.pointer_down(now);
    controller.pointer_move(40.0, 5.0, now);
    let decision = controller
        .pointer_move(config.threshold() + 10.0, 12.0, now)
        .expect("drag past threshold commits");
    assert_eq!(decision.candidate_id, "a");
    assert_eq!(decision.direction, SwipeDirection::Like);

    let event = controller.tick(now + config.exit_duration);
    assert_eq!(event, Some(TickEvent::Advanced(decision)));

    let view = controller.view();
    assert_eq!(view.top.map(|c| c.id.as_str()), Some("b"));
    assert_eq!(view.preview.map(|c| c.id.as_str()), Some("c"));
    assert_eq!(view.remaining, 2);
}

#[test]
fn test_scenario_pass_last_card() {
    let config = DeckConfig::default();
    let mut controller = SwipeController::new(config, deck(&["a"]));
    let now = Instant::now();

    controller.pointer_down(now);
    let decision = controller.pointer_move(-config.threshold() - 1.0, 0.0, now).unwrap();
    assert_eq!(decision.direction, SwipeDirection::Pass);

    controller.tick(now + config.exit_duration);
    let view = controller.view();
    assert!(view.top.is_none());
    assert_eq!(view.remaining, 0);
    assert_eq!(view.empty_message, Some(NO_MORE_CANDIDATES));
    assert!(controller.deck().is_exhausted());
}

#[test]
fn test_scenario_release_below_threshold() {
    let config = DeckConfig::default();
    let mut controller = SwipeController::new(config, deck(&["a", "b"]));
    let now = Instant::now();

    controller.pointer_down(now);
    controller.pointer_move(config.threshold() * 0.5, 20.0, now);
    assert!(controller.pointer_up(now).is_none());
    assert!(matches!(controller.phase(), Phase::Resetting { .. }));

    controller.tick(now + config.spring_settle);
    assert_eq!(controller.phase(), &Phase::Idle);
    assert_neutral(&controller.transform_at(now + config.spring_settle));
    assert_eq!(controller.view().top.map(|c| c.id.as_str()), Some("a"));
}

#[test]
fn test_exhausted_deck_ignores_input() {
    let mut controller = SwipeController::new(DeckConfig::default(), Vec::new());
    let now = Instant::now();

    assert!(!controller.pointer_down(now));
    assert!(controller.pointer_move(500.0, 0.0, now).is_none());
    assert!(controller.decide(SwipeDirection::Like, now).is_none());
    assert_eq!(controller.view().empty_message, Some(NO_MORE_CANDIDATES));
}
