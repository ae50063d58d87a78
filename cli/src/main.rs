use anyhow::{Context, Result};
use chordsweep_core::{ChordPolicy, GameConfig, GameSession, Rules, WinRule};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

mod report;
mod script;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Beginner,
    Intermediate,
    Expert,
}

impl From<Preset> for GameConfig {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Beginner => GameConfig::beginner(),
            Preset::Intermediate => GameConfig::intermediate(),
            Preset::Expert => GameConfig::expert(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Chord {
    OpenUnflagged,
    Strict,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Win {
    SafeOpened,
    AllAccounted,
}

/// Replays a script of pointer events against a minesweeper board and prints what happens.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Script to replay, one command per line; reads stdin when omitted
    script: Option<PathBuf>,

    /// Board size and mine count to start from
    #[arg(long, value_enum, default_value_t = Preset::Beginner)]
    preset: Preset,

    /// Override the preset's height
    #[arg(long)]
    height: Option<u8>,

    /// Override the preset's width
    #[arg(long)]
    width: Option<u8>,

    /// Override the preset's mine count
    #[arg(long)]
    mines: Option<u16>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// What a chord does when a flag sits on a safe cell
    #[arg(long, value_enum, default_value_t = Chord::OpenUnflagged)]
    chord: Chord,

    /// When the game counts as won
    #[arg(long, value_enum, default_value_t = Win::SafeOpened)]
    win: Win,

    /// Never place more flags than there are mines
    #[arg(long)]
    cap_flags: bool,

    /// Print notifications as JSON lines
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let preset = GameConfig::from(self.preset);
        GameConfig::new(
            self.height.unwrap_or(preset.height()),
            self.width.unwrap_or(preset.width()),
            self.mines.unwrap_or(preset.mines()),
        )
        .context("invalid board configuration")
    }

    fn rules(&self) -> Rules {
        Rules {
            chord: match self.chord {
                Chord::OpenUnflagged => ChordPolicy::OpenUnflagged,
                Chord::Strict => ChordPolicy::StrictFlags,
            },
            win: match self.win {
                Win::SafeOpened => WinRule::SafeCellsOpened,
                Win::AllAccounted => WinRule::AllCellsAccounted,
            },
            cap_flags: self.cap_flags,
        }
    }

    fn open_script(&self) -> Result<Box<dyn BufRead>> {
        Ok(match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("could not open script {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            None => Box::new(BufReader::new(io::stdin())),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config()?;
    let rules = args.rules();
    log::debug!("config: {:?}, rules: {:?}, seed: {:?}", config, rules, args.seed);

    let mut session = match args.seed {
        Some(seed) => GameSession::with_seed(config, rules, seed),
        None => GameSession::new(config, rules),
    };

    let format = if args.json {
        report::Format::Json
    } else {
        report::Format::Text
    };
    session.subscribe(move |event: &chordsweep_core::BoardEvent| {
        match report::render(format, event) {
            Ok(line) => println!("{line}"),
            Err(err) => log::warn!("could not render {:?}: {}", event, err),
        }
    });

    for (index, line) in args.open_script()?.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("could not read script line {line_no}"))?;
        let command = script::parse_line(&line).with_context(|| format!("script line {line_no}"))?;

        match command {
            None => {}
            Some(script::Command::Restart) => session.restart(),
            Some(script::Command::Pointer(event)) => {
                if let Err(err) = session.handle_pointer(event) {
                    log::warn!("script line {}: {}", line_no, err);
                }
            }
        }
    }

    let board = session.board();
    if args.json {
        let rows: Vec<String> = board.to_string().lines().map(str::to_owned).collect();
        let summary = serde_json::json!({
            "board": rows,
            "phase": board.phase(),
            "flags_left": board.flag_budget(),
        });
        println!("{summary}");
    } else {
        print!("{board}");
        println!("phase: {:?}, flags left: {}", board.phase(), board.flag_budget());
    }

    Ok(())
}
