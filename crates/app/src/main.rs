use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use morse_kit_core::{
    decode, encode, AppConfig, Clock, ManualClock, Player, SessionReport, SessionStatus, SinkError,
    Stopwatch, SymbolTable, SystemClock, ToneSink,
};
use tracing_subscriber::EnvFilter;

fn main() -> morse_kit_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Encode { text } => run_encode(&text.join(" ")),
        Commands::Decode { code } => run_decode(&code.join(" ")),
        Commands::Play { input, code, output } => run_play(&config, &input.join(" "), code, &output),
        Commands::Symbol { symbol, output } => run_symbol(&config, symbol, &output),
        Commands::Table => run_table(),
    }
}

fn run_encode(text: &str) -> morse_kit_core::Result<()> {
    let code = encode(text);
    let unknown = code.unknown_count();
    if unknown > 0 {
        tracing::warn!(unknown, "some characters have no code and were replaced with `?`");
    }
    println!("{code}");
    Ok(())
}

fn run_decode(code: &str) -> morse_kit_core::Result<()> {
    println!("{}", decode(code));
    Ok(())
}

fn run_play(
    config: &AppConfig,
    input: &str,
    raw_code: bool,
    output: &OutputArgs,
) -> morse_kit_core::Result<()> {
    let code = if raw_code {
        input.to_string()
    } else {
        encode(input).to_string()
    };
    tracing::info!(%code, "playing");

    let player = Player::new(config.playback.timing());
    let report = session(output, |sink, clock| player.play(&code, sink, clock))?;
    finish(report)
}

fn run_symbol(config: &AppConfig, symbol: char, output: &OutputArgs) -> morse_kit_core::Result<()> {
    let Some(code) = SymbolTable::standard().lookup(symbol) else {
        return Err(format!("`{symbol}` has no code in the table").into());
    };
    println!("{} {code}", symbol.to_ascii_uppercase());

    let player = Player::new(config.playback.timing());
    let report = session(output, |sink, clock| player.play_symbol(symbol, sink, clock))?;
    finish(report)
}

fn run_table() -> morse_kit_core::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for (idx, (symbol, code)) in SymbolTable::standard().reference_entries().enumerate() {
        write!(stdout, "{symbol} {code:<8}")?;
        if idx % 6 == 5 {
            writeln!(stdout)?;
        }
    }
    writeln!(stdout)?;
    Ok(())
}

/// Picks the sink and clock requested on the command line and runs `play`.
fn session<F>(output: &OutputArgs, play: F) -> morse_kit_core::Result<SessionReport>
where
    F: FnOnce(Option<&mut dyn ToneSink>, &mut dyn Clock) -> SessionReport,
{
    let watch = Stopwatch::start();
    let mut terminal = TerminalSink::new(output.dry_run);
    let sink: Option<&mut dyn ToneSink> = if output.silent {
        None
    } else {
        Some(&mut terminal)
    };

    let report = if output.dry_run {
        let mut clock = ManualClock::new();
        play(sink, &mut clock)
    } else {
        play(sink, &mut SystemClock)
    };
    println!();

    tracing::debug!(wall_ms = watch.elapsed().as_millis() as u64, "session returned");
    Ok(report)
}

fn finish(report: SessionReport) -> morse_kit_core::Result<()> {
    match &report.status {
        SessionStatus::Completed => {}
        SessionStatus::Degraded(err) => tracing::warn!(error = %err, "played without audible output"),
        SessionStatus::Canceled => tracing::info!("playback canceled"),
        SessionStatus::AlreadyInProgress => tracing::info!("playback already in progress"),
    }
    println!(
        "{} events, {:.1}s",
        report.events_emitted,
        report.scheduled.as_secs_f32()
    );
    Ok(())
}

/// Renders tones as glyphs on stdout, a stand-in for an audio backend.
struct TerminalSink {
    unit: Option<Duration>,
    verbose: bool,
}

impl TerminalSink {
    fn new(verbose: bool) -> Self {
        Self {
            unit: None,
            verbose,
        }
    }
}

impl ToneSink for TerminalSink {
    fn render_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<(), SinkError> {
        // The first tone seen is taken as the dot length.
        let unit = *self.unit.get_or_insert(duration);
        let glyph = if duration > unit { "▬ " } else { "• " };

        let mut stdout = std::io::stdout().lock();
        let written = if self.verbose {
            write!(stdout, "{glyph}[{frequency_hz}Hz {}ms] ", duration.as_millis())
        } else {
            write!(stdout, "{glyph}")
        };
        written
            .and_then(|_| stdout.flush())
            .map_err(|err| SinkError::failed(err.to_string()))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Text to Morse code transcoder and player", long_about = None)]
struct Cli {
    /// JSON configuration file overriding playback timing.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Keep timing but render no tones.
    #[arg(long)]
    silent: bool,
    /// Do not wait in real time; print each tone with its frequency and length.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert text to code.
    Encode {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Convert code back to text.
    Decode {
        #[arg(required = true, allow_hyphen_values = true)]
        code: Vec<String>,
    },
    /// Play text (or raw code with `--code`) as timed tones.
    Play {
        #[arg(required = true, allow_hyphen_values = true)]
        input: Vec<String>,
        /// Treat the input as code rather than text.
        #[arg(long)]
        code: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Play the code for a single character from the table.
    Symbol {
        symbol: char,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the reference chart of every character and its code.
    Table,
}
