//! CLI tool for turning free-form text into a PowerPoint deck.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use deck_core::{estimate_slide_count, parse_plan, Provider, RetryPolicy, SlidePlan, TextNormalizer};
use deck_llm::{GuidancePreset, LlmSettings, Structurer, DEFAULT_GUIDANCE};
use deck_pptx::{DeckWriter, Package, Template};
use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the deck goes when no output is given.
const DEFAULT_OUTPUT: &str = "generated_presentation.pptx";

/// Turn free-form text into a PowerPoint deck using an LLM and a template.
#[derive(Parser, Debug)]
#[command(name = "text2deck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a presentation from text
    Generate(GenerateArgs),
    /// Ask the model for a slide plan without building a deck
    Plan(PlanArgs),
    /// Build a presentation from a saved slide plan
    Render(RenderArgs),
    /// Show a template's layouts and placeholders
    Inspect(InspectArgs),
}

/// Options shared by every command that talks to a model.
#[derive(Args, Debug)]
struct ModelArgs {
    /// Input text file, or '-' for stdin
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Model vendor: gemini, openai or anthropic
    #[arg(short, long, env = "TEXT2DECK_PROVIDER", default_value = "gemini")]
    provider: Provider,

    /// API key (default: the vendor's usual environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Model name (default: the vendor's recommended model)
    #[arg(short, long, env = "TEXT2DECK_MODEL")]
    model: Option<String>,

    /// Free-form tone and style guidance
    #[arg(short, long, conflicts_with = "preset")]
    guidance: Option<String>,

    /// Canned guidance: corporate, educational, startup or story
    #[arg(long)]
    preset: Option<GuidancePreset>,

    /// Target number of slides (default: estimated from the text length)
    #[arg(short, long)]
    slides: Option<usize>,

    /// Attempts per request
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Wait between attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    retry_delay_ms: u64,

    /// Request timeout, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Alternative API host, e.g. a proxy
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Template presentation (.pptx or .potx)
    #[arg(short, long)]
    template: PathBuf,

    /// Output presentation
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Also write the slide plan as JSON
    #[arg(long)]
    save_plan: Option<PathBuf>,

    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Write the plan JSON here instead of printing it
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print JSON instead of a readable preview
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    model: ModelArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Template presentation (.pptx or .potx)
    #[arg(short, long)]
    template: PathBuf,

    /// Slide plan JSON, as written by `plan` or `generate --save-plan`
    #[arg(long)]
    plan: PathBuf,

    /// Output presentation
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Template presentation (.pptx or .potx)
    #[arg(short, long)]
    template: PathBuf,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &cli.command {
        Command::Generate(args) => generate(args, cli.verbose),
        Command::Plan(args) => plan(args, cli.verbose),
        Command::Render(args) => render(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn generate(args: &GenerateArgs, verbose: bool) -> Result<()> {
    let template = read_template(&args.template)?;
    let text = read_input(&args.model.input)?;
    let settings = llm_settings(&args.model)?;

    let plan = structure(&settings, &args.model, &text, verbose)?;
    if let Some(path) = &args.save_plan {
        write_plan(path, &plan)?;
    }

    if verbose {
        eprintln!("Building presentation on {}", args.template.display());
    }
    let deck = DeckWriter::new()
        .render(&template, &plan.slides)
        .context("Failed to build presentation")?;
    std::fs::write(&args.output, deck)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Created {} ({} slides)",
        args.output.display(),
        plan.len()
    );
    Ok(())
}

fn plan(args: &PlanArgs, verbose: bool) -> Result<()> {
    let text = read_input(&args.model.input)?;
    let settings = llm_settings(&args.model)?;
    let plan = structure(&settings, &args.model, &text, verbose)?;

    match &args.output {
        Some(path) => {
            write_plan(path, &plan)?;
            println!("Wrote {} slides to {}", plan.len(), path.display());
        }
        None if args.json => println!("{}", serde_json::to_string_pretty(&plan)?),
        None => print!("{}", format_preview(&plan)),
    }
    Ok(())
}

fn render(args: &RenderArgs) -> Result<()> {
    let template = read_template(&args.template)?;
    let raw = std::fs::read_to_string(&args.plan)
        .with_context(|| format!("Failed to read {}", args.plan.display()))?;
    let plan = parse_plan(&raw).with_context(|| format!("Invalid slide plan in {}", args.plan.display()))?;
    let plan = TextNormalizer::new().normalize_plan(&plan);
    if plan.is_empty() {
        bail!("{} contains no slides", args.plan.display());
    }

    let mut writer = DeckWriter::new();
    if let Some(dir) = args.plan.parent() {
        writer = writer.with_image_dir(dir);
    }
    let deck = writer
        .render(&template, &plan.slides)
        .context("Failed to build presentation")?;
    std::fs::write(&args.output, deck)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Created {} ({} slides)",
        args.output.display(),
        plan.len()
    );
    Ok(())
}

fn inspect(args: &InspectArgs) -> Result<()> {
    let bytes = read_template(&args.template)?;
    let package = Package::from_bytes(&bytes).context("Not a valid presentation")?;
    let template = Template::read(&package).context("Failed to read template structure")?;
    let existing = template.existing_slides(&package)?;

    if args.json {
        let report = serde_json::json!({
            "template": template,
            "content_layout": template.content_layout_index(),
            "existing_slides": existing,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Slide size: {} x {}",
        template.slide_width, template.slide_height
    );
    println!("Layouts:");
    for (i, layout) in template.layouts.iter().enumerate() {
        let marker = if i == template.content_layout_index() {
            " (used for new slides)"
        } else {
            ""
        };
        println!("  [{}] {}{}", i, layout.name, marker);
        for ph in &layout.placeholders {
            let position = match ph.geometry {
                Some(r) => format!("at {}, {} size {} x {}", r.x, r.y, r.cx, r.cy),
                None => "inherited position".to_string(),
            };
            println!(
                "      {} idx={} {}",
                ph.placeholder.kind, ph.placeholder.idx, position
            );
        }
    }

    println!("Existing slides (replaced on generate): {}", existing.len());
    for (i, slide) in existing.iter().enumerate() {
        println!(
            "  {}. {}",
            i + 1,
            slide.text.title.as_deref().unwrap_or("(no title)")
        );
    }
    Ok(())
}

/// Ask the model for a plan; an empty plan is an error.
fn structure(
    settings: &LlmSettings,
    args: &ModelArgs,
    text: &str,
    verbose: bool,
) -> Result<SlidePlan> {
    let guidance = guidance(args);
    let target = args.slides.unwrap_or_else(|| estimate_slide_count(text));

    if verbose {
        eprintln!(
            "Generating structure with {} ({}), about {} slides, guidance '{}'",
            settings.provider,
            settings.effective_model(),
            target,
            guidance
        );
    }

    let structurer = Structurer::new(settings)?;
    let plan = structurer
        .structure(text, &guidance, target)
        .with_context(|| format!("{} request failed", settings.provider))?;

    if plan.is_empty() {
        bail!("Failed to generate structure: {} returned no slides", settings.provider);
    }
    if verbose {
        eprintln!("  Got {} slides", plan.len());
    }
    Ok(plan)
}

fn llm_settings(args: &ModelArgs) -> Result<LlmSettings> {
    let api_key = match &args.api_key {
        Some(key) => key.clone(),
        None => std::env::var(args.provider.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!(
                    "No API key for {}: pass --api-key or set {}",
                    args.provider,
                    args.provider.api_key_env()
                )
            })?,
    };

    let retry = RetryPolicy::new()
        .with_attempts(args.retries)
        .with_delay(Duration::from_millis(args.retry_delay_ms));

    let mut settings = LlmSettings::new(args.provider, api_key)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_retry(retry);
    if let Some(model) = &args.model {
        settings = settings.with_model(model);
    }
    if let Some(base_url) = &args.base_url {
        settings = settings.with_base_url(base_url);
    }
    Ok(settings)
}

fn guidance(args: &ModelArgs) -> String {
    match (&args.preset, &args.guidance) {
        (Some(preset), _) => preset.guidance().to_string(),
        (None, Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
        _ => DEFAULT_GUIDANCE.to_string(),
    }
}

/// Read the input text from a file or stdin.
fn read_input(path: &Path) -> Result<String> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    if text.trim().is_empty() {
        bail!("Please provide some text");
    }
    Ok(text)
}

fn read_template(path: &Path) -> Result<Vec<u8>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("pptx") | Some("potx")) {
        log::warn!("{} does not look like a .pptx or .potx file", path.display());
    }

    std::fs::read(path).with_context(|| format!("Failed to read template {}", path.display()))
}

fn write_plan(path: &Path, plan: &SlidePlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Human-readable rendering of a plan.
fn format_preview(plan: &SlidePlan) -> String {
    let mut out = String::new();
    for (i, slide) in plan.slides.iter().enumerate() {
        let _ = writeln!(out, "Slide {}: {}", i + 1, slide.title);
        for bullet in &slide.content {
            let _ = writeln!(out, "  - {}", bullet);
        }
        if let Some(image) = &slide.image {
            let _ = writeln!(out, "  [image: {}]", image);
        }
        if let Some(notes) = &slide.notes {
            let _ = writeln!(out, "  Notes: {}", notes);
        }
        out.push('\n');
    }
    out
}
