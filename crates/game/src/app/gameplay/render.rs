use forest_engine::Frame;

use super::world::{Entity, Form, WorldState, NPC_SIZE, PLAYER_RADIUS};
use crate::app::config::Palette;

/// Repaints the whole frame from `world`. Reads state only.
pub(crate) fn draw_world(world: &WorldState, palette: &Palette, frame: &mut Frame<'_>) {
    frame.clear(palette.background);
    for entity in world.entities() {
        draw_entity(entity, palette, frame);
    }
}

fn draw_entity(entity: &Entity, palette: &Palette, frame: &mut Frame<'_>) {
    let x = entity.position.x.round() as i32;
    let y = entity.position.y.round() as i32;
    match entity.form {
        Form::PlayerBase => frame.fill_circle(x, y, PLAYER_RADIUS as u32, palette.player),
        Form::PlayerAlt => {
            // Upward triangle inscribed in the player circle.
            let radius = PLAYER_RADIUS;
            let half_base = (radius * 0.866).round() as i32;
            let base_y = y + (radius * 0.5).round() as i32;
            frame.fill_triangle(
                (x, y - radius as i32),
                (x - half_base, base_y),
                (x + half_base, base_y),
                palette.player_alt,
            );
        }
        Form::Npc => {
            let size = NPC_SIZE as u32;
            frame.fill_rect(x, y, size, size, palette.npc);
        }
    }
}

#[cfg(test)]
mod tests {
    use forest_engine::Rgba;

    use super::*;
    use crate::app::gameplay::intent::{Intent, IntentSet};
    use crate::app::gameplay::world::{Bounds, EntityId, NpcBehavior, Vec2};

    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 600;

    fn placeholder_world() -> WorldState {
        WorldState::new(
            vec![
                Entity::player(EntityId(0), Vec2::new(100.0, 500.0)),
                Entity::npc(EntityId(1), Vec2::new(300.0, 500.0), NpcBehavior::Idle),
            ],
            Bounds {
                width: WIDTH as f32,
                height: HEIGHT as f32,
            },
            4.0,
        )
        .expect("valid world")
    }

    fn render(world: &WorldState, palette: &Palette, buffer: &mut [u8]) {
        let mut frame = Frame::new(buffer, WIDTH, HEIGHT);
        draw_world(world, palette, &mut frame);
    }

    fn pixel_at(buffer: &mut [u8], x: i32, y: i32) -> Option<Rgba> {
        Frame::new(buffer, WIDTH, HEIGHT).pixel(x, y)
    }

    #[test]
    fn draws_placeholder_shapes_in_palette_colors() {
        let palette = Palette::default();
        let mut buffer = vec![0; (WIDTH * HEIGHT * 4) as usize];
        render(&placeholder_world(), &palette, &mut buffer);

        assert_eq!(pixel_at(&mut buffer, 100, 500), Some(palette.player));
        assert_eq!(pixel_at(&mut buffer, 129, 500), Some(palette.player));
        assert_eq!(pixel_at(&mut buffer, 131, 500), Some(palette.background));
        assert_eq!(pixel_at(&mut buffer, 300, 500), Some(palette.npc));
        assert_eq!(pixel_at(&mut buffer, 339, 539), Some(palette.npc));
        assert_eq!(pixel_at(&mut buffer, 340, 540), Some(palette.background));
        assert_eq!(pixel_at(&mut buffer, 0, 0), Some(palette.background));
    }

    #[test]
    fn alt_form_draws_triangle_instead_of_circle() {
        let palette = Palette::default();
        let world = placeholder_world().advance(&IntentSet::from_intents(&[Intent::Transform]));
        let mut buffer = vec![0; (WIDTH * HEIGHT * 4) as usize];
        render(&world, &palette, &mut buffer);

        assert_eq!(pixel_at(&mut buffer, 100, 500), Some(palette.player_alt));
        // Inside the circle but outside the triangle.
        assert_eq!(pixel_at(&mut buffer, 100, 528), Some(palette.background));
        assert_eq!(pixel_at(&mut buffer, 80, 490), Some(palette.background));
    }

    #[test]
    fn drawing_twice_produces_identical_frames() {
        let palette = Palette::default();
        let world = placeholder_world();
        let mut first = vec![0; (WIDTH * HEIGHT * 4) as usize];
        let mut second = vec![0xAB; (WIDTH * HEIGHT * 4) as usize];

        render(&world, &palette, &mut first);
        render(&world, &palette, &mut second);
        let snapshot = first.clone();
        render(&world, &palette, &mut first);

        assert_eq!(first, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn movement_leaves_no_trail() {
        let palette = Palette::default();
        let world = placeholder_world();
        let mut buffer = vec![0; (WIDTH * HEIGHT * 4) as usize];
        render(&world, &palette, &mut buffer);

        let mut moved = world;
        for _ in 0..20 {
            moved = moved.advance(&IntentSet::from_intents(&[Intent::MoveUp]));
        }
        render(&moved, &palette, &mut buffer);

        assert_eq!(pixel_at(&mut buffer, 100, 525), Some(palette.background));
        assert_eq!(pixel_at(&mut buffer, 100, 420), Some(palette.player));
    }
}
