// Daylight Calendar
// Command line entry point: prints the week or month view for a date

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

use daylight_calendar::models::daylight::{Daylight, DaylightWindow};
use daylight_calendar::models::event::CalendarEvent;
use daylight_calendar::models::settings::Settings;
use daylight_calendar::models::view::{CalendarView, DateRange};
use daylight_calendar::services::calendar::{month_matrix, today, toolbar_label, view_range, week_days};
use daylight_calendar::services::calendar_data::CalendarDataService;
use daylight_calendar::services::daylight::{shading_for_day, DaylightShading, JulianSolarModel};
use daylight_calendar::services::google::GoogleCalendarClient;
use daylight_calendar::services::layout::month::month_cells;
use daylight_calendar::services::layout::{event_segments_for_day, EventSegment};
use daylight_calendar::services::location::{ConfiguredLocation, LocationService};
use daylight_calendar::services::settings::SettingsService;
use daylight_calendar::utils::color::{text_color_for_background, DEFAULT_EVENT_COLOR};
use daylight_calendar::utils::date::{day_start, iso_date, Instant};

const TOKEN_ENV: &str = "GOOGLE_OAUTH_TOKEN";

#[derive(Debug, Parser)]
#[command(name = "daylight-calendar", version, about = "Week and month calendar with daylight shading")]
struct Cli {
    /// View to print (week or month)
    #[arg(long)]
    view: Option<CalendarView>,

    /// Anchor date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Settings file, defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// IANA time zone overriding the configured one
    #[arg(long)]
    time_zone: Option<String>,

    /// Observer latitude for daylight shading
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Observer longitude for daylight shading
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Name shown for a manual location
    #[arg(long)]
    label: Option<String>,

    /// Show event colours
    #[arg(long)]
    colors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings_path = match &cli.config {
        Some(path) => path.clone(),
        None => SettingsService::default_path()?,
    };
    let mut settings = SettingsService::new(settings_path).load()?;
    if let Some(zone) = &cli.time_zone {
        settings.time_zone = zone.clone();
    }
    let zone = settings.zone().map_err(|e| anyhow!(e))?;

    log::info!("Starting Daylight Calendar in {}", zone.name());

    let view = cli.view.unwrap_or(settings.default_view);
    let now = today(&zone);
    let anchor = cli
        .date
        .map(|date| day_start(date, &zone))
        .unwrap_or(now);
    let first_day = settings.first_day_of_week as i32;
    let range = view_range(view, &anchor, first_day);

    let mut location = LocationService::new(ConfiguredLocation::new(settings.coordinates()));
    match (cli.lat, cli.lon) {
        (Some(lat), Some(lon)) => location
            .set_manual_location(lat, lon, cli.label.as_deref())
            .map_err(|e| anyhow!(e))?,
        _ => match &settings.location {
            Some(configured) => location
                .set_manual_location(configured.lat, configured.lon, configured.label.as_deref())
                .map_err(|e| anyhow!(e))?,
            None => location.ensure_requested().await,
        },
    }

    let events = load_events(&settings, &zone, &range).await;

    println!("{}", toolbar_label(view, &anchor, first_day));
    match location.coordinates() {
        Some(coords) => println!("Daylight for {} ({})", location.status_label(), coords),
        None => println!("{}: daylight shading off", location.status_label()),
    }
    println!();

    match view {
        CalendarView::Week => {
            let daylight = location.daylight_map(&range, &JulianSolarModel);
            for day in week_days(&anchor, first_day) {
                print_day(&day, &events, daylight.get(&iso_date(&day)), cli.colors);
            }
        }
        CalendarView::Month => print_month(&anchor, first_day, &events, &now, &settings),
    }

    Ok(())
}

/// Fetch events for `range` when an access token is available. Provider
/// errors are printed and an empty list is returned.
async fn load_events(settings: &Settings, zone: &Tz, range: &DateRange) -> Vec<CalendarEvent> {
    let Ok(token) = std::env::var(TOKEN_ENV) else {
        log::info!("{} is not set, showing an empty calendar", TOKEN_ENV);
        return Vec::new();
    };

    let client = match GoogleCalendarClient::with_base_url(settings.api_base_url.clone())
        .context("Failed to create Google Calendar client")
    {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return Vec::new();
        }
    };

    let mut data = CalendarDataService::new(client, *zone);
    data.set_token(Some(token));
    if let Err(err) = data.refresh_calendars().await {
        eprintln!("Error: {}", err);
        return Vec::new();
    }
    if let Err(err) = data.ensure_range(range.clone()).await {
        eprintln!("Error: {}", err);
    }
    data.events().to_vec()
}

fn format_daylight(window: &DaylightWindow) -> String {
    match &window.daylight {
        Daylight::Cycle { sunrise, sunset } => {
            format!("sunrise {} · sunset {}", sunrise.format("%H:%M"), sunset.format("%H:%M"))
        }
        Daylight::PolarDay => "polar day".to_string(),
        Daylight::PolarNight => "polar night".to_string(),
    }
}

fn format_shading(shading: DaylightShading) -> String {
    match shading {
        DaylightShading::AllDay => "day 0–100%".to_string(),
        DaylightShading::AllNight => "night 0–100%".to_string(),
        DaylightShading::Gradient {
            sunrise_percent,
            sunset_percent,
        } => format!("day {:.1}–{:.1}%", sunrise_percent, sunset_percent),
    }
}

fn color_suffix(event: &CalendarEvent, colors: bool) -> String {
    if !colors {
        return String::new();
    }
    let background = event.color.as_deref().unwrap_or(DEFAULT_EVENT_COLOR);
    format!(" [{} on {}]", text_color_for_background(Some(background)), background)
}

fn format_segment(segment: &EventSegment<'_>, colors: bool) -> String {
    let end = if segment.end.hour() == 23 && segment.end.minute() == 59 && segment.end.second() == 59 {
        "24:00".to_string()
    } else {
        segment.end.format("%H:%M").to_string()
    };

    format!(
        "{}–{}  {}  (column {}/{}, top {:.1}%, height {:.1}%){}",
        segment.start.format("%H:%M"),
        end,
        segment.event.title,
        segment.column + 1,
        segment.column_span,
        segment.top,
        segment.height,
        color_suffix(segment.event, colors)
    )
}

fn print_day(day: &Instant, events: &[CalendarEvent], window: Option<&DaylightWindow>, colors: bool) {
    let mut header = day.format("%a %b %-d").to_string();
    if let Some(window) = window {
        header.push_str(&format!("  {}", format_daylight(window)));
    }
    if let Some(shading) = shading_for_day(day, window) {
        header.push_str(&format!("  [{}]", format_shading(shading)));
    }
    println!("{}", header);

    let layout = event_segments_for_day(events, day);
    for event in &layout.all_day {
        println!("  all day  {}{}", event.title, color_suffix(event, colors));
    }
    for segment in &layout.timed {
        println!("  {}", format_segment(segment, colors));
    }
    if layout.all_day.is_empty() && layout.timed.is_empty() {
        println!("  —");
    }
}

fn print_month(anchor: &Instant, first_day: i32, events: &[CalendarEvent], now: &Instant, settings: &Settings) {
    let matrix = month_matrix(anchor, first_day);
    let cells = month_cells(
        &matrix,
        events,
        anchor,
        now.date_naive(),
        settings.visible_events_per_month_cell,
    );

    let headers: Vec<String> = matrix[0].iter().map(|day| format!("{:<14}", day.format("%a"))).collect();
    println!("{}", headers.join(""));

    let mut details: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in cells.chunks(7) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                let marker = match (cell.is_today, cell.is_current_month) {
                    (true, _) => "*",
                    (false, true) => " ",
                    (false, false) => "·",
                };
                let count = cell.events.len() + cell.overflow;
                let summary = match (count, cell.overflow) {
                    (0, _) => String::new(),
                    (n, 0) => format!("{} ev", n),
                    (_, more) => format!("{} +{}", cell.events.len(), more),
                };
                format!("{:<14}", format!("{}{:>2} {}", marker, cell.day.format("%-d"), summary))
            })
            .collect();
        println!("{}", line.join(""));

        for cell in row.iter().filter(|cell| !cell.events.is_empty()) {
            let mut lines: Vec<String> = cell
                .events
                .iter()
                .map(|event| {
                    let when = if event.is_all_day() {
                        "All day".to_string()
                    } else {
                        event.start_in(&cell.day.timezone()).format("%H:%M").to_string()
                    };
                    format!("{} {}", when, event.title)
                })
                .collect();
            if cell.overflow > 0 {
                lines.push(format!("+{} more", cell.overflow));
            }
            details.insert(iso_date(&cell.day), lines);
        }
    }

    for (date, lines) in details {
        println!();
        println!("{}", date);
        for line in lines {
            println!("  {}", line);
        }
    }
}
