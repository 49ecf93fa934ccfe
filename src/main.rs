//! Pageflow CLI: paginate a text file and print a per-page summary.
//! The main interface is through WASM bindings.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use pageflow::{BookEditor, LineBreakMeasurer, PageSettings, Preset};

#[derive(Parser)]
#[command(name = "pageflow")]
#[command(version)]
#[command(about = "Paginate a text file into fixed-size book pages", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Settings preset
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Settings JSON file, applied instead of a preset
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    settings: Option<PathBuf>,

    /// Print page summaries as JSON
    #[arg(long)]
    json: bool,

    /// Print each page's content under its summary
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Children,
    Adult,
    Picture,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Children => Preset::Children,
            PresetArg::Adult => Preset::Adult,
            PresetArg::Picture => Preset::Picture,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match (&cli.settings, cli.preset) {
        (Some(path), _) => PageSettings::from_json(&fs::read_to_string(path)?)?,
        (None, Some(preset)) => PageSettings::from_preset(preset.into()),
        (None, None) => PageSettings::default(),
    };

    let text = fs::read_to_string(&cli.input)?;
    let mut editor = BookEditor::with_settings(LineBreakMeasurer::new(), settings);
    editor.import_text(&text)?;

    let views = editor.views()?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for view in &views {
        let images = if view.images.is_empty() {
            String::new()
        } else {
            format!("  [{} image(s)]", view.images.len())
        };
        let orphan = if view.orphan { "  orphan" } else { "" };
        println!(
            "Page {:>4}  {:>6} chars  {:>8}  {}{}{}",
            view.number, view.character_count, view.indicator, view.status, images, orphan
        );
        if cli.verbose {
            println!("{}\n", view.content);
        }
    }

    let total: usize = views.iter().map(|v| v.character_count).sum();
    println!();
    println!("{} pages, {} characters", views.len(), total);
    Ok(())
}
