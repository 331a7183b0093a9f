use clap::Parser;
use dune_drive::{
    assets::AssetLoader,
    config::GameConfig,
    game::Game,
    hud::TerminalHost,
    input::{InputSnapshot, KeyState},
    logging::init_logging,
    scene::Scene,
};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to drive.toml configuration file
    #[arg(short, long, default_value = "./drive.toml")]
    config: String,

    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Run without a terminal UI
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Keys held for the whole headless run, comma separated (e.g. "w,a")
    #[arg(long, value_delimiter = ',')]
    hold: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = GameConfig::load_or_default(&args.config);
    let _log_guard = init_logging(&config.logging, args.log_level.as_deref(), args.headless)?;

    info!("Starting dune-drive v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", args.config);
    info!(
        "Terrain: preset {}, {}m, {} segments, seed {}",
        config.terrain.preset, config.terrain.size, config.terrain.segments, config.terrain.seed
    );

    let loader = AssetLoader::new(&config.assets.root_dir);
    let mut game = Game::new(&config, &loader, Scene::new());

    let frame_time = Duration::from_secs_f64(1.0 / f64::from(config.display.frame_rate_hz.max(1)));
    let mut frames = interval(frame_time);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    if args.headless {
        let input = InputSnapshot::from_keys(args.hold.iter().map(String::as_str));
        for _ in 0..args.frames {
            frames.tick().await;
            game.tick(&input);
        }
        report(&game);
        return Ok(());
    }

    let mut host = TerminalHost::enter(config.display.key_hold_frames)?;
    info!(
        "Terminal key release events: {}",
        if host.reports_release() { "supported" } else { "emulated" }
    );
    let mut keys = KeyState::new();

    loop {
        frames.tick().await;
        if host.pump_input(&mut keys)? {
            break;
        }
        game.tick(&keys.snapshot());
        keys.end_frame();
        host.draw(&game, config.display.minimap_width, config.display.minimap_height)?;
    }

    drop(host);
    report(&game);
    Ok(())
}

fn report(game: &Game) {
    let position = game.car_position();
    info!(
        "Stopped after {} frames at ({:.1}, {:.1}, {:.1}), velocity {:.3}, {} decorations, checkpoints {}/{}",
        game.frame(),
        position.x,
        position.y,
        position.z,
        game.car().velocity,
        game.decorations_placed(),
        game.checkpoints().current_index(),
        game.checkpoints().len()
    );
}
