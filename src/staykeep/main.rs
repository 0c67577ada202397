use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use staykeep::api::{
    BookingRequest, CmdMessage, ConfigAction, ExportFormat, MessageLevel, StayApi, StayPaths,
};
use staykeep::catalog::{Catalog, LoadSource};
use staykeep::config::StoreConfig;
use staykeep::error::{Result, StoreError};
use staykeep::format::format_date;
use staykeep::images::ImageSnapshot;
use staykeep::model::{Listing, Reservation, ReservationStatus};
use staykeep::seed::SeedData;
use staykeep::store::fs::FileKvStore;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, ExportKind};

const HOME_ENV: &str = "STAYKEEP_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: StayApi<FileKvStore>,
    verbose: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { search }) => handle_list(&mut ctx, search),
        Some(Commands::Show { id }) => handle_show(&mut ctx, &id),
        Some(Commands::Import { file }) => handle_import(&mut ctx, file),
        Some(Commands::Reservations { status }) => handle_reservations(&ctx, status),
        Some(Commands::Book {
            listing_id,
            guest,
            email,
            check_in,
            check_out,
            guests,
        }) => handle_book(
            &mut ctx,
            BookingRequest {
                listing_id,
                guest_name: guest,
                guest_email: email,
                check_in,
                check_out,
                guests,
            },
        ),
        Some(Commands::Status { id, status }) => handle_status(&ctx, &id, &status),
        Some(Commands::Export { format, id, output }) => handle_export(&ctx, format, id, output),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Path) => {
            println!("{}", ctx.api.paths().data.display());
            Ok(())
        }
        Some(Commands::Reset { yes }) => handle_reset(&ctx, yes),
        None => handle_list(&mut ctx, None),
    }
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "staykeep", "staykeep")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StoreError::Store("Could not determine data directory".to_string()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let paths = StayPaths::new(data_dir()?);

    let config = match StoreConfig::load(paths.config_dir()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring unreadable config: {}", e);
            StoreConfig::default()
        }
    };

    let seed = match &config.seed_file {
        Some(path) => SeedData::from_file(path).unwrap_or_else(|e| {
            eprintln!(
                "Warning: could not load seed file {}: {}",
                path.display(),
                e
            );
            SeedData::builtin()
        }),
        None => SeedData::builtin(),
    };

    let catalog = Catalog::new(FileKvStore::new(paths.kv_dir()))
        .with_config(config)
        .with_seed(seed);

    Ok(AppContext {
        api: StayApi::new(catalog, paths),
        verbose: cli.verbose,
    })
}

fn handle_list(ctx: &mut AppContext, search: Option<String>) -> Result<()> {
    let result = ctx.api.list_listings(search.as_deref())?;
    print_source(result.source, ctx.verbose);
    print_listings(&result.listings);
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_show(ctx: &mut AppContext, id: &str) -> Result<()> {
    let result = ctx.api.show_listing(id)?;
    for listing in &result.listings {
        print_listing_detail(listing, &result.snapshots);
    }
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: PathBuf) -> Result<()> {
    let result = ctx.api.import_listings(&file)?;
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_reservations(ctx: &AppContext, status: Option<String>) -> Result<()> {
    let result = ctx.api.list_reservations(status.as_deref())?;
    print_reservations(&result.reservations);
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_book(ctx: &mut AppContext, request: BookingRequest) -> Result<()> {
    let result = ctx.api.book(request)?;
    for reservation in &result.reservations {
        println!("{} {}", "Reservation".dimmed(), reservation.id.yellow());
    }
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_status(ctx: &AppContext, id: &str, status: &str) -> Result<()> {
    let result = ctx.api.set_reservation_status(id, status)?;
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_export(
    ctx: &AppContext,
    kind: ExportKind,
    id: Option<String>,
    output: PathBuf,
) -> Result<()> {
    let format = match (kind, id) {
        (ExportKind::Csv, _) => ExportFormat::Csv,
        (ExportKind::Ical, Some(id)) => ExportFormat::Ical(id),
        (ExportKind::Gcal, Some(id)) => ExportFormat::GoogleCalendar(id),
        (_, None) => {
            return Err(StoreError::Api(
                "A reservation id is required for calendar exports".into(),
            ))
        }
    };

    let result = ctx.api.export(format, &output)?;
    for link in &result.links {
        println!("{}", link);
    }
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    // Doctor output is the point of the command, show everything.
    print_messages(&result.messages, true);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            for key in StoreConfig::KEYS {
                if let Some(value) = config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
    }
    print_messages(&result.messages, true);
    Ok(())
}

fn handle_reset(ctx: &AppContext, yes: bool) -> Result<()> {
    let result = ctx.api.reset(yes)?;
    print_messages(&result.messages, ctx.verbose);
    Ok(())
}

fn print_messages(messages: &[CmdMessage], verbose: bool) {
    for message in messages {
        match message.level {
            MessageLevel::Info if verbose => println!("{}", message.content.dimmed()),
            MessageLevel::Info => {}
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_source(source: Option<LoadSource>, verbose: bool) {
    match source {
        Some(LoadSource::Backup) => println!("{}", "Loaded from the backup copy.".yellow()),
        Some(source) if verbose => println!("{}", format!("Loaded from {}.", source).dimmed()),
        _ => {}
    }
}

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 12;
const PRICE_WIDTH: usize = 12;
const LOCATION_WIDTH: usize = 30;

fn print_listings(listings: &[Listing]) {
    if listings.is_empty() {
        println!("No listings found.");
        return;
    }

    for listing in listings {
        let id = truncate_to_width(&listing.id, ID_WIDTH);
        let price = format!("{:.2}", listing.price);
        let location = truncate_to_width(&listing.location, LOCATION_WIDTH);

        let fixed_width = ID_WIDTH + PRICE_WIDTH + LOCATION_WIDTH + 3;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title = truncate_to_width(&listing.title, available);

        println!(
            "{} {} {} {}",
            pad_to_width(&id, ID_WIDTH).yellow(),
            pad_to_width(&title, available),
            format!("{:>width$}", price, width = PRICE_WIDTH).green(),
            location.dimmed()
        );
    }
}

fn print_listing_detail(listing: &Listing, snapshots: &[ImageSnapshot]) {
    println!("{} {}", listing.id.yellow(), listing.title.bold());
    println!("--------------------------------");
    println!("Price:    {:.2}", listing.price);
    println!("Location: {}", listing.location);
    if !listing.description.is_empty() {
        println!("\n{}\n", listing.description);
    }
    println!("Cover:    {}", listing.primary_image());
    for image in &listing.images {
        println!("  - {}", image);
    }
    for (key, value) in &listing.extra {
        println!("{}: {}", key.dimmed(), value);
    }

    if !snapshots.is_empty() {
        println!("\n{}", "Image history".bold());
        for snapshot in snapshots.iter().rev() {
            let when = snapshot
                .written_at()
                .map(format_time_ago)
                .unwrap_or_else(|| snapshot.timestamp.to_string());
            println!("  {} {} image(s)", when.dimmed(), snapshot.images.len());
        }
    }
}

fn print_reservations(reservations: &[Reservation]) {
    if reservations.is_empty() {
        println!("No reservations found.");
        return;
    }

    for r in reservations {
        let status = match r.status {
            ReservationStatus::Confirmed => r.status.to_string().green(),
            ReservationStatus::Pending => r.status.to_string().yellow(),
            ReservationStatus::Cancelled => r.status.to_string().red(),
            ReservationStatus::Other => r.status.to_string().normal(),
        };
        let created = DateTime::parse_from_rfc3339(&r.created_at)
            .map(|dt| format_time_ago(dt.with_timezone(&Utc)))
            .unwrap_or_else(|_| r.created_at.clone());

        println!(
            "{} {} {} → {}  {} ({} guest(s), {:.2}) {} {}",
            truncate_to_width(&r.id, 8).yellow(),
            r.guest_name,
            format_date(&r.check_in),
            format_date(&r.check_out),
            truncate_to_width(&r.listing_title, 40),
            r.guests,
            r.total_price,
            status,
            created.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
