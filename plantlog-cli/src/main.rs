//! Plantlog CLI
//!
//! Command-line front end for the sink-roll register, the bath equipment
//! ledger and the tension-leveller ledger. Every command reads and writes the
//! CSV tables under the configured data directory.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use plantlog::help;
use plantlog::ledger::{
    BathEquipment, LevellerDraft, LevellerEdit, LevellerMove, Relocation, RollDraft,
    RollRegister, TensionLeveller,
};
use plantlog::{Ledger, Plant, StorageConfig};
use plantlog_cli::input::{self, BathArgs, FilterArgs};
use plantlog_cli::render::{self, Output};

#[derive(Parser)]
#[command(name = "plantlog")]
#[command(about = "Equipment ledgers for sink rolls, bath equipment and tension-leveller bendings")]
#[command(version = "0.1.0")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Directory holding the CSV tables (overrides configuration)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the usage notes
    Help,

    /// Sink rolls of the degreasing section
    #[command(subcommand)]
    Roll(RollCommand),

    /// Bath equipment per campaign
    #[command(subcommand)]
    Bath(BathCommand),

    /// Tension-leveller bending units
    #[command(subcommand)]
    Leveller(LevellerCommand),
}

#[derive(Args)]
struct WindowArgs {
    /// Only records active on or after this date
    #[arg(long)]
    from: Option<String>,

    /// Only records that started on or before this date
    #[arg(long)]
    to: Option<String>,
}

#[derive(Subcommand)]
enum RollCommand {
    /// Register a roll at a location
    Register {
        code: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        exit: Option<String>,
        #[arg(long, default_value = "")]
        reason: String,
        #[arg(long, default_value = "")]
        service: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Movement history, most recent first
    History {
        #[arg(long)]
        code: Option<String>,
        /// Repeat to accept several locations
        #[arg(long)]
        location: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Current record of every roll
    Status,

    /// Rolls currently in place
    Active,

    /// Current record of one roll
    Last { code: String },

    /// Move a roll to a new location
    Relocate {
        code: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        entry: String,
        /// Close the current record on this date first
        #[arg(long)]
        close: Option<String>,
        #[arg(long)]
        campaign: Option<String>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// Close the record at a table position
    Close {
        position: usize,
        #[arg(long)]
        exit: String,
    },

    /// Replace the note of the record at a table position
    Note { position: usize, note: String },

    /// Floor-plan markers for active rolls
    Overview,

    /// Delete the record at a table position
    Delete { position: usize },
}

#[derive(Subcommand)]
enum BathCommand {
    /// Record the equipment of a campaign
    Record(BathArgs),

    /// Correct the row at a table position, keeping its registration stamp
    Edit {
        position: usize,
        #[command(flatten)]
        form: BathArgs,
    },

    /// Campaign history, latest first
    History {
        /// Repeat to accept several campaigns
        #[arg(long)]
        campaign: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Rows containing a word in any column
    Search { term: String },

    /// Campaign count, mean diameters and mean days in bath
    Indicators {
        #[arg(long)]
        campaign: Vec<String>,
    },

    /// Write the history as CSV
    Export {
        #[arg(long)]
        campaign: Vec<String>,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Delete the row at a table position
    Delete { position: usize },
}

#[derive(Subcommand)]
enum LevellerCommand {
    /// Register a bending unit
    Register {
        code: String,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        exit: Option<String>,
        /// Km at exit
        #[arg(long)]
        km: Option<String>,
        #[arg(long, default_value = "Nenhum")]
        position: String,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Bending history, most recent first
    History {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        position: Vec<String>,
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Move a bending unit to a new position
    Relocate {
        code: String,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        position: String,
        /// Close the current record on this date first
        #[arg(long)]
        close: Option<String>,
        /// Km at exit of the closed record
        #[arg(long, requires = "close")]
        km: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },

    /// Correct the record at a table position
    Edit {
        position: usize,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        exit: Option<String>,
        #[arg(long)]
        km: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Totals and ranking of km run per bending
    Dashboard,

    /// Life-cycle figures of one bending
    Summary { code: String },

    /// Delete the record at a table position
    Delete { position: usize },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    } else if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut config = match StorageConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    log::debug!("Using data directory {}", config.data_dir.display());

    let plant = Plant::open(&config);
    let out = Output { json: cli.json };

    let result = match cli.command {
        Commands::Help => out.emit(&help::landing_page(), render::landing),
        Commands::Roll(cmd) => handle_roll(&plant.rolls, cmd, out),
        Commands::Bath(cmd) => handle_bath(&plant.baths, cmd, out),
        Commands::Leveller(cmd) => handle_leveller(&plant.levellers, cmd, out),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn done(out: Output, message: String) {
    if !out.json {
        println!("✅ {}", message);
    }
}

fn handle_roll(rolls: &RollRegister, cmd: RollCommand, out: Output) -> anyhow::Result<()> {
    match cmd {
        RollCommand::Register {
            code,
            location,
            entry,
            exit,
            reason,
            service,
            note,
        } => {
            let id = rolls.register(RollDraft {
                code,
                location,
                reason,
                planned_service: service,
                entry,
                exit,
                note,
            })?;
            done(out, format!("Roll movement registered ({id})"));
        }
        RollCommand::History {
            code,
            location,
            window,
        } => {
            let filter = FilterArgs {
                code,
                categories: location,
                from: window.from,
                to: window.to,
                ..FilterArgs::default()
            }
            .into_filter()?;
            out.emit(&rolls.history(&filter)?, |rows| render::rolls("History", rows))?;
        }
        RollCommand::Status => {
            out.emit(&rolls.current_status()?, |rows| render::rolls("Current status", rows))?;
        }
        RollCommand::Active => {
            out.emit(&rolls.active()?, |rows| render::rolls("Active rolls", rows))?;
        }
        RollCommand::Last { code } => {
            let row = rolls
                .last_movement(&code)?
                .with_context(|| format!("No movement recorded for roll {code}"))?;
            out.emit(&row, |row| render::rolls("Last movement", std::slice::from_ref(row)))?;
        }
        RollCommand::Relocate {
            code,
            location,
            entry,
            close,
            campaign,
            supplier,
            reason,
            service,
            note,
        } => {
            let id = rolls.relocate(
                &code,
                Relocation {
                    location,
                    entry,
                    reason,
                    planned_service: service,
                    note,
                    campaign,
                    supplier,
                    close_previous: close,
                },
            )?;
            done(out, format!("Roll {code} relocated ({id})"));
        }
        RollCommand::Close { position, exit } => {
            rolls.close(position, &exit)?;
            done(out, format!("Row {position} closed on {exit}"));
        }
        RollCommand::Note { position, note } => {
            rolls.edit_note(position, &note)?;
            done(out, format!("Note of row {position} updated"));
        }
        RollCommand::Overview => {
            out.emit(&rolls.overview()?, |markers| render::markers(markers))?;
        }
        RollCommand::Delete { position } => {
            let removed = rolls.delete(position)?;
            done(out, format!("Deleted row {position} ({})", removed.code));
        }
    }
    Ok(())
}

fn campaign_filter(
    campaigns: Vec<String>,
    window: Option<WindowArgs>,
) -> Result<plantlog::RecordFilter, input::InputError> {
    let (from, to) = window.map_or((None, None), |w| (w.from, w.to));
    FilterArgs {
        categories: campaigns,
        from,
        to,
        ..FilterArgs::default()
    }
    .into_filter()
}

fn handle_bath(baths: &BathEquipment, cmd: BathCommand, out: Output) -> anyhow::Result<()> {
    match cmd {
        BathCommand::Record(form) => {
            let id = baths.record(form.into_draft()?)?;
            done(out, format!("Bath campaign recorded ({id})"));
        }
        BathCommand::Edit { position, form } => {
            baths.update(position, form.into_draft()?)?;
            done(out, format!("Row {position} updated"));
        }
        BathCommand::History { campaign, window } => {
            let filter = campaign_filter(campaign, Some(window))?;
            out.emit(&baths.history(&filter)?, |rows| render::baths("History", rows))?;
        }
        BathCommand::Search { term } => {
            out.emit(&baths.search(&term)?, |rows| {
                render::baths(&format!("Matches for '{term}'"), rows)
            })?;
        }
        BathCommand::Indicators { campaign } => {
            let filter = campaign_filter(campaign, None)?;
            out.emit(&baths.indicators(&filter)?, render::indicators)?;
        }
        BathCommand::Export { campaign, output } => {
            let filter = campaign_filter(campaign, None)?;
            let written = match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    baths.export(&filter, file)?
                }
                None => {
                    let stdout = io::stdout();
                    let mut lock = stdout.lock();
                    let written = baths.export(&filter, &mut lock)?;
                    lock.flush()?;
                    written
                }
            };
            if let Some(path) = output {
                done(out, format!("Exported {written} row(s) to {}", path.display()));
            }
        }
        BathCommand::Delete { position } => {
            baths.delete(position)?;
            done(out, format!("Deleted row {position}"));
        }
    }
    Ok(())
}

fn handle_leveller(tl: &TensionLeveller, cmd: LevellerCommand, out: Output) -> anyhow::Result<()> {
    match cmd {
        LevellerCommand::Register {
            code,
            entry,
            exit,
            km,
            position,
            note,
        } => {
            let id = tl.register(LevellerDraft {
                code,
                entry,
                exit,
                exit_distance: km,
                position,
                note,
            })?;
            done(out, format!("Bending registered ({id})"));
        }
        LevellerCommand::History {
            code,
            position,
            window,
        } => {
            let filter = FilterArgs {
                code,
                categories: position,
                from: window.from,
                to: window.to,
                ..FilterArgs::default()
            }
            .into_filter()?;
            out.emit(&tl.history(&filter)?, |rows| render::levellers("History", rows))?;
        }
        LevellerCommand::Relocate {
            code,
            entry,
            position,
            close,
            km,
            note,
        } => {
            let id = tl.relocate(
                &code,
                LevellerMove {
                    close: close.map(|exit| (exit, km)),
                    entry,
                    position,
                    note,
                },
            )?;
            done(out, format!("Bending {code} moved ({id})"));
        }
        LevellerCommand::Edit {
            position,
            entry,
            exit,
            km,
            note,
        } => {
            tl.edit(
                position,
                LevellerEdit {
                    entry,
                    exit,
                    exit_distance: km,
                    note,
                },
            )?;
            done(out, format!("Row {position} updated"));
        }
        LevellerCommand::Dashboard => {
            out.emit(&tl.dashboard()?, render::dashboard)?;
        }
        LevellerCommand::Summary { code } => {
            out.emit(&tl.bending_summary(&code)?, render::bending)?;
        }
        LevellerCommand::Delete { position } => {
            let removed = tl.delete(position)?;
            done(out, format!("Deleted row {position} ({})", removed.code));
        }
    }
    Ok(())
}
