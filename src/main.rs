use std::io::{self, BufRead, Write};

use vikey::{Engine, EngineConfig, InputMethod};

/// Types each stdin line through the engine and prints what a text field
/// would show. `vikey vni` switches method; `VIKEY_CONFIG` names a JSON
/// settings file.
fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut config = match std::env::var_os("VIKEY_CONFIG") {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            EngineConfig::from_json(&json).map_err(io::Error::other)?
        }
        None => EngineConfig::default(),
    };
    if let Some(arg) = std::env::args().nth(1) {
        config.method = match arg.as_str() {
            "vni" => InputMethod::Vni,
            _ => InputMethod::Telex,
        };
    }
    let mut engine = Engine::with_config(config);

    println!("Typing {:?} (Ctrl+D to quit):", engine.input_method());

    let mut out = io::stdout().lock();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut screen = String::new();
        for ch in line.chars().chain(Some('\n')) {
            engine.feed(ch).apply_to(&mut screen, Some(ch));
        }
        write!(out, "{screen}")?;
        out.flush()?;
    }
    Ok(())
}
