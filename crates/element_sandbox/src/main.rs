//! Element Sandbox
//!
//! Runs a scene headlessly through the reaction engine and prints what
//! is left. Usage: `element_sandbox [scene.ron | scene.toml]`; without an
//! argument the built-in demo scene runs.

#![warn(missing_docs)]

mod config;
mod world;

use config::SceneDefinition;
use element_engine::config::Config;
use element_engine::foundation::logging;
use world::SandboxWorld;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");

    let scene = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {path}");
            SceneDefinition::load_from_file(&path)?
        }
        None => {
            log::info!("No scene given; running the demo scene");
            let scene = SceneDefinition::demo();
            scene.validate()?;
            scene
        }
    };

    let mut world = SandboxWorld::from_scene(&scene);
    let (mut reactions, mut duplicates, mut events) = (0, 0, 0);
    for _ in 0..scene.steps {
        let report = world.step(scene.timestep);
        reactions += report.reactions.iter().filter(|r| r.outcome.is_reaction()).count();
        duplicates += report.duplicates;
        events += report.events.len();
        if report.stale > 0 {
            log::debug!("{} stale reports this step", report.stale);
        }
    }

    log::info!(
        "Simulated {} steps ({:.2}s): {reactions} reactions, {events} events, {duplicates} duplicate reports dropped, {} pairs still tracked",
        scene.steps,
        world.coordinator().time(),
        world.coordinator().tracked_pairs()
    );

    println!("Surviving element boxes:");
    for element_box in world.entities.boxes() {
        let p = element_box.position;
        println!(
            "  {} {} ({:?}) at ({:.2}, {:.2}, {:.2})",
            element_box.entity,
            element_box.element(),
            element_box.category(),
            p.x,
            p.y,
            p.z
        );
    }

    println!("Manifestations:");
    for (entity, manifestation) in world.entities.manifestations() {
        let p = manifestation.transform.position;
        let f = manifestation.transform.forward();
        println!(
            "  {entity} '{}' at ({:.2}, {:.2}, {:.2}) facing ({:.2}, {:.2}, {:.2})",
            manifestation.prefab_id, p.x, p.y, p.z, f.x, f.y, f.z
        );
    }

    Ok(())
}
