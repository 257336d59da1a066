use forest_engine::{InputAction, Rgba};

use super::intent::IntentSet;
use super::replay::IntentLog;
use super::world::Facing;
use super::*;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn snapshot_from_actions(actions: &[InputAction]) -> InputSnapshot {
    let mut snapshot = InputSnapshot::empty();
    for action in actions {
        snapshot = snapshot.with_action_down(*action, true);
    }
    snapshot
}

fn default_game() -> ForestGame {
    ForestGame::from_config(&GameConfig::default()).expect("default config builds a world")
}

fn player(game: &ForestGame) -> &Entity {
    game.world().player().expect("player entity")
}

fn tick_ok(game: &mut ForestGame, input: &InputSnapshot) {
    let command = game.tick(input).expect("tick succeeds");
    assert_eq!(command, LoopCommand::Continue);
}

fn draw_to_buffer(game: &ForestGame) -> Vec<u8> {
    let mut buffer = vec![0; (WIDTH * HEIGHT * 4) as usize];
    let mut frame = Frame::new(&mut buffer, WIDTH, HEIGHT);
    game.draw(&mut frame);
    buffer
}

#[test]
fn initial_scene_places_player_and_npc() {
    let game = default_game();
    let entities = game.world().entities();

    assert_eq!(entities.len(), 2);
    assert_eq!(entities[0].id, PLAYER_ID);
    assert_eq!(entities[0].position, Vec2::new(100.0, 500.0));
    assert_eq!(entities[0].form, Form::PlayerBase);
    assert!(entities[0].player_controlled);
    assert_eq!(entities[1].id, NPC_ID);
    assert_eq!(entities[1].position, Vec2::new(300.0, 500.0));
    assert_eq!(entities[1].form, Form::Npc);
    assert!(!entities[1].player_controlled);
}

#[test]
fn empty_tick_keeps_player_at_spawn() {
    let mut game = default_game();
    tick_ok(&mut game, &InputSnapshot::empty());

    assert_eq!(player(&game).position, Vec2::new(100.0, 500.0));
    assert_eq!(game.world().tick(), 1);
}

#[test]
fn held_key_moves_once_per_tick() {
    let mut game = default_game();
    let held = snapshot_from_actions(&[InputAction::MoveRight]);
    for _ in 0..3 {
        tick_ok(&mut game, &held);
    }

    let speed = GameConfig::default().world.player_speed;
    assert_eq!(player(&game).position, Vec2::new(100.0 + 3.0 * speed, 500.0));
    assert_eq!(player(&game).facing, Facing::Right);
}

#[test]
fn transform_press_changes_form_and_title() {
    let mut game = default_game();
    assert_eq!(
        game.title().as_deref(),
        Some("Shapeshifter in the Forest [base form]")
    );

    tick_ok(
        &mut game,
        &InputSnapshot::empty().with_transform_pressed(true),
    );
    assert_eq!(player(&game).form, Form::PlayerAlt);
    assert_eq!(
        game.title().as_deref(),
        Some("Shapeshifter in the Forest [alt form]")
    );

    // Holding the key without a new press does nothing.
    tick_ok(
        &mut game,
        &snapshot_from_actions(&[InputAction::Transform]),
    );
    assert_eq!(player(&game).form, Form::PlayerAlt);
}

#[test]
fn quit_request_stops_without_advancing() {
    let mut game = default_game();
    let command = game
        .tick(&InputSnapshot::empty().with_quit_requested(true))
        .expect("quit tick");

    assert_eq!(command, LoopCommand::Quit);
    assert_eq!(game.world().tick(), 0);
}

#[test]
fn invalid_next_state_fails_tick_and_keeps_previous_state() {
    let world = WorldState::new(
        vec![Entity::player(PLAYER_ID, Vec2::new(100.0, 500.0))],
        Bounds {
            width: WIDTH as f32,
            height: HEIGHT as f32,
        },
        f32::NAN,
    )
    .expect("initial state is valid");
    let mut game = ForestGame::new(world.clone(), Palette::default(), "test".to_string());

    let error = game
        .tick(&InputSnapshot::empty())
        .expect_err("non-finite speed poisons the next state");

    assert_eq!(error.tick, 1);
    assert_eq!(
        error.to_string(),
        "tick 1 failed: entity 0 has a non-finite position or velocity"
    );
    assert_eq!(game.world(), &world);
}

#[test]
fn recorded_intents_replay_to_live_state() {
    let mut game = default_game();
    let initial = game.world().clone();
    let mut log = IntentLog::new();
    let script = [
        snapshot_from_actions(&[InputAction::MoveUp]),
        snapshot_from_actions(&[InputAction::MoveUp, InputAction::MoveLeft]),
        InputSnapshot::empty().with_transform_pressed(true),
        InputSnapshot::empty(),
        snapshot_from_actions(&[InputAction::MoveDown]),
    ];
    for input in &script {
        tick_ok(&mut game, input);
        log.record(IntentSet::from_input(input));
    }

    assert_eq!(log.len(), script.len());
    assert_eq!(&log.replay(&initial), game.world());
}

#[test]
fn draw_is_repeatable_and_uses_palette() {
    let mut config = GameConfig::default();
    config.palette.background = Rgba::rgb(1, 2, 3);
    let game = ForestGame::from_config(&config).expect("world");

    let first = draw_to_buffer(&game);
    let second = draw_to_buffer(&game);

    assert_eq!(first, second);
    assert_eq!(&first[..4], &[1, 2, 3, 255]);
}

#[test]
fn follow_config_makes_npc_approach() {
    let mut config = GameConfig::default();
    config.world.npc_behavior = NpcBehavior::Follow { speed: 2.0 };
    let mut game = ForestGame::from_config(&config).expect("world");

    tick_ok(&mut game, &InputSnapshot::empty());

    let npc = &game.world().entities()[1];
    assert_eq!(npc.position, Vec2::new(298.0, 498.0));
}
