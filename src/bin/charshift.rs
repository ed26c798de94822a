// Charshift CLI
// Validate a pair-table config and simulate how virtual keys resolve

#![cfg_attr(not(feature = "cli"), allow(dead_code))]

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use anyhow::{anyhow, Context};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
use charshift_core::{CharShift, Config, Key, KeyAddr, KeyPairSource, KeyPairStore, Pipeline};

/// Shift-dependent key pairs for virtual keys
#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "charshift")]
#[command(version)]
#[command(about = "Inspect and simulate shift-dependent key pairs", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to ~/.config/charshift/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List the configured pairs with their virtual keys
    #[arg(long)]
    list_pairs: bool,

    /// Print the engine identifier and exit
    #[arg(long)]
    name: bool,

    /// Press KEY (e.g. "0xC001") and print the resulting report
    #[arg(long, value_name = "KEY")]
    resolve: Option<String>,

    /// Keys held before --resolve is pressed (can be used multiple times)
    #[arg(long, value_name = "KEY")]
    hold: Vec<String>,
}

#[cfg(feature = "cli")]
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => Config::default_path()
            .ok_or_else(|| anyhow!("no config directory; pass --config"))?,
    };
    log::debug!("Loading config from {}", path.display());
    Config::from_toml_path(&path).with_context(|| format!("failed to load {}", path.display()))
}

#[cfg(feature = "cli")]
fn list_pairs(config: &Config, engine: &CharShift<KeyPairStore>) {
    println!(
        "{} pair(s) on range {}:",
        engine.pairs().count(),
        engine.range()
    );
    for (index, pair) in config.pairs.iter().enumerate() {
        let virtual_key = engine
            .range()
            .key_at(index)
            .map(|key| key.to_string())
            .unwrap_or_else(|| "-".to_string());
        let name = config.names.get(index).and_then(|n| n.as_deref()).unwrap_or("");
        println!("  {:>3} {} {:<12} {}", index, virtual_key, name, pair);
    }
}

#[cfg(feature = "cli")]
fn simulate(engine: CharShift<KeyPairStore>, key: &str, held: &[String]) -> anyhow::Result<()> {
    let key: Key = key
        .parse()
        .with_context(|| format!("invalid key to resolve: '{}'", key))?;

    let mut pipeline = Pipeline::new(engine);
    for (addr, name) in held.iter().enumerate() {
        let held_key: Key = name
            .parse()
            .with_context(|| format!("invalid held key: '{}'", name))?;
        let addr = u8::try_from(addr).context("too many held keys")?;
        pipeline.press(KeyAddr(addr), held_key);
    }

    let (output, flag) = pipeline.engine().resolve(key, pipeline.live_keys());
    println!("{} -> {} ({})", key, output, flag);

    let addr = u8::try_from(held.len()).context("too many held keys")?;
    let report = pipeline.press(KeyAddr(addr), key);
    println!("modifiers: {}", report.modifiers());
    let bytes: Vec<String> = report.to_bytes().iter().map(|b| format!("{:02X}", b)).collect();
    println!("report:    {}", bytes.join(" "));
    Ok(())
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if args.name {
        println!("{}", CharShift::<KeyPairStore>::NAME);
        return Ok(());
    }

    let config = load_config(args.config.clone())?;
    let engine = config.build_engine()?;

    if args.check_config {
        println!(
            "Configuration is valid: {} pair(s) on range {}",
            config.pairs.len(),
            config.range
        );
        return Ok(());
    }

    if args.list_pairs {
        list_pairs(&config, &engine);
        return Ok(());
    }

    match args.resolve {
        Some(ref key) => {
            engine.setup();
            simulate(engine, key, &args.hold)
        }
        None => Err(anyhow!(
            "nothing to do; pass --check-config, --list-pairs or --resolve"
        )),
    }
}

// Stub for when cli feature is not enabled
#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("Error: charshift binary requires the 'cli' feature to be enabled.");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "cli")]
    fn test_args_parsing() {
        let args = Args::parse_from(["charshift", "--config", "/tmp/test.toml"]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_pairs);
        assert!(args.resolve.is_none());
        assert!(args.hold.is_empty());
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_args_resolve_with_holds() {
        let args = Args::parse_from([
            "charshift",
            "-c",
            "/tmp/test.toml",
            "--resolve",
            "0xC001",
            "--hold",
            "LEFT_SHIFT",
            "--hold",
            "LEFT_CTRL",
        ]);

        assert_eq!(args.resolve.as_deref(), Some("0xC001"));
        assert_eq!(args.hold, vec!["LEFT_SHIFT", "LEFT_CTRL"]);
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_name_matches_diagnostics_identifier() {
        assert_eq!(CharShift::<KeyPairStore>::NAME, "NamedCharShift");
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_simulate_rejects_bad_key() {
        let config = Config::from_toml_str("[[pairs]]\nlower = \"a\"\nupper = \"A\"\n").unwrap();
        let engine = config.build_engine().unwrap();
        assert!(simulate(engine, "NotAKey", &[]).is_err());
    }

    #[test]
    #[cfg(feature = "cli")]
    fn test_simulate_with_shift() {
        let config = Config::from_toml_str("[[pairs]]\nlower = \"a\"\nupper = \"A\"\n").unwrap();
        let engine = config.build_engine().unwrap();
        assert!(simulate(engine, "0xC000", &["LEFT_SHIFT".to_string()]).is_ok());
    }
}
