use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use simplelog::*;

use std::path::{Path, PathBuf};

use homerow::{boards, default_sim, sim, Board};

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// homerow: home row mods, combos and layers for split keyboards
///
/// Runs simulation scripts through a board's resolver and prints what the
/// host would see. A script is a list of items separated by whitespace:
///
///     d:<key>   press a key, by name (j, spc, ;) or position (3,0)
///     u:<key>   release a key
///     t:<ms>    let time pass
struct Args {
    /// The board to simulate.
    #[arg(short, long, default_value = "mitosis")]
    board: String,

    /// Simulation script(s) to run. If not specified, defaults to sim.txt in
    /// the current working directory and
    /// '$XDG_CONFIG_HOME/homerow/sim.txt'.
    #[arg(short, long, verbatim_doc_comment)]
    sim: Option<Vec<PathBuf>>,

    /// Save the output of each script next to it, in a file named like the
    /// script with this suffix appended, instead of printing it.
    #[arg(short, long)]
    out: Option<String>,

    /// Validate the configuration of every board and exit.
    #[arg(long)]
    check: bool,

    /// List the available boards and exit.
    #[arg(short, long)]
    list: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,
}

fn log_init(args: &Args) {
    let log_lvl = match (args.debug, args.trace) {
        (_, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Mixed,
        ColorChoice::AlwaysAnsi,
    )])
    .expect("logger can init");
}

/// Builds every board and reports the ones that fail. Returns `true` if all
/// of them are valid.
fn check_boards() -> bool {
    let mut ok = true;
    for board in boards::all() {
        let name = board.name();
        match boards::load(board) {
            Ok(ctx) => info!("{name}: ok, {} layers", ctx.layers().len()),
            Err(e) => {
                log::error!("{e:?}");
                ok = false;
            }
        }
    }
    ok
}

fn run_sim(board: &str, path: &Path, out_suffix: Option<&str>) -> Result<()> {
    let script = std::fs::read_to_string(path)?;
    let mut ctx = boards::load_by_name(board)?;
    let output = match sim::simulate(&mut ctx, &script) {
        Ok(output) => output,
        Err(e) => {
            let report = sim::error_with_source(e, &path.display().to_string(), &script);
            log::error!("{report:?}");
            bail!("could not parse the simulation script {}", path.display());
        }
    };
    match out_suffix {
        Some(suffix) => {
            let mut out_path = path.as_os_str().to_owned();
            out_path.push(suffix);
            std::fs::write(&out_path, format!("{output}\n"))?;
            info!("wrote {}", PathBuf::from(out_path).display());
        }
        None => println!("{output}"),
    }
    Ok(())
}

fn main_impl() -> Result<()> {
    let args = Args::parse();
    log_init(&args);
    info!("homerow v{} starting", env!("CARGO_PKG_VERSION"));

    if args.list {
        for board in boards::all() {
            println!("{:<8} {}", board.name(), board.layer_names().join(", "));
        }
        return Ok(());
    }

    if args.check {
        info!("validating board configurations only and exiting");
        let status = if check_boards() { 0 } else { 1 };
        std::process::exit(status);
    }

    let sim_paths = args.sim.unwrap_or_else(default_sim);
    if sim_paths.is_empty() {
        bail!("No simulation scripts provided\nFor more info, pass the `-h` or `--help` flags.");
    }
    for path in &sim_paths {
        if !path.exists() {
            bail!(
                "Could not find the simulation script ({})\nFor more info, pass the `-h` or `--help` flags.",
                path.display()
            )
        }
        info!("running {} on {}", path.display(), args.board);
        run_sim(&args.board, path, args.out.as_deref())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e:#}\n");
    }
    ret
}
