//! Headless симуляция DUSKRIFT
//!
//! Запускает Bevy App без рендера: игрок и отряд грантов, 1000 тиков.

use bevy::prelude::*;
use duskrift_simulation::*;

const GRUNT_TREE: &str = include_str!("../assets/archetypes/grunt.ron");

fn main() {
    let seed = 42;
    println!("Starting DUSKRIFT headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    if let Err(err) = app
        .world_mut()
        .resource_mut::<ArchetypeRegistry>()
        .register_ron("grunt", GRUNT_TREE)
    {
        log_error(&format!("Архетип 'grunt' не загрузился: {}", err));
        return;
    }

    // Игрок в центре сцены
    app.world_mut().spawn((
        Player,
        Actor { faction_id: 1 },
        Transform::from_translation(Vec3::ZERO),
    ));

    // Отряд грантов вокруг
    for position in [
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(-8.0, 0.0, 6.0),
        Vec3::new(4.0, 0.0, -12.0),
    ] {
        if let Err(err) = spawn_enemy(
            app.world_mut(),
            position,
            "grunt",
            TargetSelector::FollowPlayer,
        ) {
            log_error(&format!("Спавн гранта не удался: {}", err));
            return;
        }
    }

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
}
