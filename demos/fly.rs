//! The Fly
//!
//! A fly is trapped in a room with a sleeping human. It rests on the wall
//! until hungry, goes looking for skin, eats there until full, and flies
//! off to rest again. Every meal risks a slap, and a fly whose energy runs
//! out starves.
//!
//! Key concepts:
//! - Handlers are plain functions from cargo to `(next state, cargo)`
//! - Randomness lives in the cargo, so a seed reproduces a run
//! - The end state's handler is never executed
//!
//! Run with: cargo run --example fly -- [seed]
//! Set RUST_LOG=cargofsm=debug to watch every transition.

use cargofsm::{state_enum, State, StateMachineBuilder, StateName};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum FlyState {
        Resting,
        Looking,
        Eating,
        Dead,
    }
    end: [Dead]
}

struct Cargo {
    energy: i32,
    food: i32,
    meals: u32,
    rng: StdRng,
}

fn resting(mut cargo: Cargo) -> (FlyState, Cargo) {
    cargo.energy -= 1;
    if cargo.energy < 70 {
        tracing::info!(energy = cargo.energy, "hungry, off to find skin");
        (FlyState::Looking, cargo)
    } else {
        (FlyState::Resting, cargo)
    }
}

fn looking(mut cargo: Cargo) -> (FlyState, Cargo) {
    cargo.energy -= 3;
    if cargo.energy <= 0 {
        tracing::info!("starved while looking for food");
        return (FlyState::Dead, cargo);
    }
    if cargo.rng.gen_bool(0.4) {
        (FlyState::Eating, cargo)
    } else {
        (FlyState::Looking, cargo)
    }
}

fn eating(mut cargo: Cargo) -> (FlyState, Cargo) {
    if cargo.food <= 0 {
        tracing::info!("no food left on the skin");
        return (FlyState::Looking, cargo);
    }
    cargo.energy += 5;
    cargo.food -= 5;
    cargo.meals += 1;
    if cargo.rng.gen_range(0..100) >= 95 {
        tracing::info!(meals = cargo.meals, "got whacked");
        (FlyState::Dead, cargo)
    } else if cargo.energy > 90 {
        (FlyState::Resting, cargo)
    } else {
        (FlyState::Eating, cargo)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>()?,
        None => rand::random(),
    };

    println!("=== The Fly (seed {seed}) ===\n");

    let mut builder = StateMachineBuilder::<Cargo>::new()
        .start(FlyState::Resting)
        .state(FlyState::Resting, resting)
        .state(FlyState::Looking, looking)
        .state(FlyState::Eating, eating);
    for state in FlyState::ALL.iter().filter(|s| s.is_end()) {
        builder = builder.end_state(state);
    }
    let mut machine = builder.build()?;

    let cargo = Cargo {
        energy: 99,
        food: 400,
        meals: 0,
        rng: StdRng::seed_from_u64(seed),
    };

    let traced = machine.run_traced(cargo).map_err(|e| e.into_configuration())?;
    let trace = &traced.trace;

    println!("Steps taken: {}", trace.steps().len());
    for state in FlyState::ALL {
        println!(
            "  {:<8} visited {} times",
            state.name(),
            trace.visits(&StateName::from(state))
        );
    }
    println!("Meals eaten: {}", traced.cargo.meals);
    println!("Energy left: {}", traced.cargo.energy);
    println!("Food left:   {}", traced.cargo.food);

    println!("\n=== Example Complete ===");
    Ok(())
}
