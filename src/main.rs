use std::{fs, process};

use anyhow::{Context, Result, bail};

use ascii_turtle::{
    config::TurtleConfig,
    engine::{Engine, program::TurtleProgram, shapes::Demo},
    player::Player,
    types::PlayablePresentation,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const COMPILE_USAGE: &str = "ascii-turtle compile <program.json> <output.json>";
const PLAY_USAGE: &str = "ascii-turtle play <presentation.json>";
const RUN_USAGE: &str = "ascii-turtle run <program.json>";
const DEMO_USAGE: &str = "ascii-turtle demo <circle|square|rays|branch|polyspi|dragon|triangles>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = TurtleConfig::load();

    match args.next().as_deref() {
        Some("compile") => {
            let program_path = args.next().context(COMPILE_USAGE)?;
            let output_path = args.next().context(COMPILE_USAGE)?;
            compile(&config, &program_path, &output_path)
        }
        Some("play") => {
            let path = args.next().context(PLAY_USAGE)?;
            play(&path)
        }
        Some("run") => {
            let path = args.next().context(RUN_USAGE)?;
            let program = read_program(&path)?;
            let presentation = Engine::compile(&program, &config)
                .with_context(|| format!("Failed to run {path}"))?;
            Player::new(presentation).play()
        }
        Some("demo") => {
            let name = args.next().context(DEMO_USAGE)?;
            let Some(demo) = Demo::by_name(&name) else {
                bail!("Unknown demo {name:?}\n\nUsage:\n  {DEMO_USAGE}");
            };
            let presentation = Engine::compile_with(&config, |turtle| {
                turtle.set_animation(true, demo.animation_speed());
                demo.draw(turtle)
            })
            .with_context(|| format!("Failed to draw demo {name}"))?;
            Player::new(presentation).play()
        }
        _ => bail!(
            "ASCII Turtle: turtle graphics in the terminal\n\nUsage:\n  {COMPILE_USAGE}\n  {PLAY_USAGE}\n  {RUN_USAGE}\n  {DEMO_USAGE}"
        ),
    }
}

fn read_program(path: &str) -> Result<TurtleProgram> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))
}

fn compile(config: &TurtleConfig, program_path: &str, output_path: &str) -> Result<()> {
    let program = read_program(program_path)?;
    let presentation = Engine::compile(&program, config)
        .with_context(|| format!("Failed to run {program_path}"))?;

    let output_json = serde_json::to_string_pretty(&presentation)?;
    fs::write(output_path, &output_json)
        .with_context(|| format!("Failed to write {output_path}"))?;

    eprintln!(
        "Compiled {} frames from {} -> {}",
        presentation.frames.len(),
        program_path,
        output_path,
    );

    Ok(())
}

fn play(path: &str) -> Result<()> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let presentation: PlayablePresentation =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))?;

    let mut player = Player::new(presentation);
    player.play()
}
