//! Fuzzed movement never leaves the player inside a solid cell.

use std::time::Duration;

use quantum_maze_core::{Command, Config, Event};
use quantum_maze_world::{apply, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn scripted_random_intents_keep_the_player_out_of_walls() {
    for seed in [3_u64, 88, 4_242] {
        let mut config = Config::default();
        // Oscillators can close a corridor around a standing player, which is
        // legitimate behavior; strict containment holds on stable topology.
        config.unstable_wall_chance = 0.0;
        config.agent_count = 0;

        let mut world = World::new();
        let mut events: Vec<Event> = Vec::new();
        apply(
            &mut world,
            Command::ConfigureSession {
                columns: 40,
                rows: 30,
                config,
                seed,
            },
            &mut events,
        );

        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_mul(31));
        for _ in 0..2_000 {
            let x = rng.gen_range(-1.0_f32..=1.0);
            let y = rng.gen_range(-1.0_f32..=1.0);
            apply(&mut world, Command::SetPlayerIntent { x, y }, &mut events);
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(16),
                },
                &mut events,
            );

            let player = query::player(&world);
            assert!(
                !query::is_wall_at(&world, player.position, false),
                "seed {seed}: player ended up inside a wall at ({}, {})",
                player.position.x(),
                player.position.y()
            );
        }
    }
}
