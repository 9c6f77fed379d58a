use crossterm::{cursor, event, execute, terminal};
use flappy_canvas::audio::Sounds;
use flappy_canvas::input::{self, Action};
use flappy_canvas::pixels::PixelBuf;
use flappy_canvas::render;
use flappy_canvas::{AssetLoader, Config, FlapOutcome, LoopDriver, Session, Sprite, SpriteSource};
use log::{error, info};
use std::error::Error;
use std::fs::File;
use std::io::{self, Stdout, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16); // ~60 fps

struct Options {
    config: Option<PathBuf>,
    seed: Option<u64>,
    log: Option<PathBuf>,
}

fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = Options {
        config: None,
        seed: None,
        log: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                opts.config = Some(PathBuf::from(required(&args, i, "--config")));
            }
            "--seed" => {
                i += 1;
                match required(&args, i, "--seed").parse() {
                    Ok(seed) => opts.seed = Some(seed),
                    Err(_) => usage_error("--seed requires a number"),
                }
            }
            "--log" => {
                i += 1;
                opts.log = Some(PathBuf::from(required(&args, i, "--log")));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => usage_error(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    opts
}

fn required<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(value) => value.as_str(),
        None => usage_error(&format!("{flag} requires a value")),
    }
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{msg}");
    print_usage();
    std::process::exit(2);
}

fn print_usage() {
    eprintln!(
        "flappy-canvas - flap through the pipes\n\
         \n\
         Usage: flappy-canvas [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --config FILE   JSON config (default: <config dir>/flappy-canvas/config.json)\n\
         \x20 --seed N        Seed for pipe placement\n\
         \x20 --log FILE      Write logs to FILE (filter with RUST_LOG)\n\
         \x20 --help, -h      Show this help\n\
         \n\
         Keys: space / up / enter / left click to flap, q / esc to quit"
    );
}

/// Logs go to a file: the game owns the whole terminal.
fn init_logging(path: Option<&PathBuf>) -> io::Result<()> {
    let Some(path) = path else { return Ok(()) };
    let file = File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = parse_args();
    init_logging(opts.log.as_ref())?;

    let mut config = Config::load(opts.config.as_deref())?;
    if opts.seed.is_some() {
        config.seed = opts.seed;
    }
    info!("starting with {:?}", config);

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        event::EnableMouseCapture,
    )?;

    let cleanup = |out: &mut Stdout| -> io::Result<()> {
        execute!(
            out,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let result = run(&mut out, config);
    let restored = cleanup(&mut out);

    if report_failures(&mut io::stderr(), &result, &restored) {
        std::process::exit(1);
    }
    Ok(())
}

/// Print whatever went wrong in the game loop and in restoring the
/// terminal. Returns whether anything did.
fn report_failures(
    err: &mut impl Write,
    result: &io::Result<()>,
    restored: &io::Result<()>,
) -> bool {
    let mut failed = false;
    if let Err(e) = result {
        error!("game loop failed: {}", e);
        let _ = writeln!(err, "flappy-canvas: {}", e);
        failed = true;
    }
    if let Err(e) = restored {
        error!("terminal restore failed: {}", e);
        let _ = writeln!(err, "flappy-canvas: could not restore terminal: {}", e);
        failed = true;
    }
    failed
}

fn run(out: &mut Stdout, config: Config) -> io::Result<()> {
    let source = match &config.sprite_path {
        Some(path) => SpriteSource::File(path.clone()),
        None => SpriteSource::Builtin,
    };
    let mut loader = AssetLoader::spawn(source, Duration::from_millis(config.asset_timeout_ms));
    let sounds = Sounds::open(config.sound);
    info!("sound {}", if sounds.is_enabled() { "on" } else { "off" });
    let mut driver = LoopDriver::new(config.fallback_delta_ms);
    let mut session = Session::new(config);
    let mut sprite: Option<Sprite> = None;

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let start = Instant::now();

    loop {
        let frame_start = Instant::now();

        if !loader.is_finished() {
            if let Some(outcome) = loader.poll() {
                sprite = session.apply_asset(outcome);
            }
        }

        while event::poll(Duration::ZERO)? {
            match input::action_for(&event::read()?) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Flap) => {
                    if session.flap() == FlapOutcome::Flapped {
                        sounds.flap();
                    }
                }
                Some(Action::Resize(c, r)) => {
                    buf.resize(c as usize, r as usize * 2);
                }
                None => {}
            }
        }

        let timestamp = start.elapsed().as_secs_f64() * 1000.0;
        let events = driver.frame(timestamp, &mut session, |s| {
            render::draw(&mut buf, s, sprite.as_ref());
            buf.flush(&mut *out)
        })?;
        sounds.step(&events);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}
