// famicore - command line entry point
//
// Usage:
//   famicore <rom.nes>             run the game in a window
//   famicore --log-mode <rom.nes>  print 8980 nestest-format trace lines

use famicore::debug::{run_log_mode, LOG_MODE_LINES};
use famicore::display::run_game;
use famicore::emulator::{EmulatorConfig, Nes};
use std::io::Write;
use std::process::ExitCode;

fn usage() {
    eprintln!("usage: famicore [--log-mode] <rom.nes>");
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let (log_mode, filename) = match args.len() {
        2 => (false, args[1].as_str()),
        3 if args[1] == "--log-mode" => (true, args[2].as_str()),
        _ => {
            eprintln!("missing file name");
            usage();
            return ExitCode::FAILURE;
        }
    };

    let mut nes = Nes::new();
    if let Err(err) = nes.load_rom(filename) {
        eprintln!("{}: {}", filename, err);
        return ExitCode::FAILURE;
    }
    nes.power_up();

    if log_mode {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        if let Err(err) = run_log_mode(&mut nes, LOG_MODE_LINES, &mut out) {
            eprintln!("log mode failed: {}", err);
            return ExitCode::FAILURE;
        }
        let _ = out.flush();
        return ExitCode::SUCCESS;
    }

    let config = EmulatorConfig::load_or_default();
    if let Err(err) = run_game(nes, config) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
