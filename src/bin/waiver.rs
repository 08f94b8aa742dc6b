// Binary entry point for the waiver command line.
use anyhow::{Result, anyhow};
use chrono::{Datelike, Local};
use std::collections::HashSet;
use std::env;
use workday_waiver::calendar::PreferencesCalendar;
use workday_waiver::cli::{self, Command, HolidayArgs};
use workday_waiver::config::Preferences;
use workday_waiver::context::{AppContext, StandardContext};
use workday_waiver::controller::WaiverController;
use workday_waiver::form::WaiverForm;
use workday_waiver::importer::HolidayImporter;
use workday_waiver::model::SelectionContext;
use workday_waiver::model::range::format_time;
use workday_waiver::presenter::ListPresenter;
use workday_waiver::provider::TableHolidayProvider;
use workday_waiver::reconciler::WaiverReconciler;
use workday_waiver::store::{FileWaiverBackend, WaiverStore};

type Controller = WaiverController<FileWaiverBackend, PreferencesCalendar, TableHolidayProvider>;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = cli::parse_args(&args)?;

    if parsed.command == Command::Help {
        cli::print_help("waiver");
        return Ok(());
    }

    let ctx = StandardContext::new(parsed.root.clone());
    if let Err(e) = cli::init_logging(&ctx, parsed.verbose) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let prefs = Preferences::load_or_default(&ctx)?;
    let mut controller = build_controller(&ctx, &prefs)?;

    run(&mut controller, &prefs, parsed.command).await
}

fn build_controller(ctx: &dyn AppContext, prefs: &Preferences) -> Result<Controller> {
    let store = WaiverStore::new(FileWaiverBackend::new(ctx)?);
    let reconciler = WaiverReconciler::new(store, PreferencesCalendar::from_preferences(prefs));
    let importer = HolidayImporter::new(TableHolidayProvider::load(ctx)?);

    let mut selection = SelectionContext::new(Local::now().year());
    selection.set_country(prefs.country.clone());
    selection.set_state(prefs.state.clone());
    selection.set_city(prefs.city.clone());

    Ok(WaiverController::new(
        reconciler,
        importer,
        ListPresenter::new(prefs.date_format),
        selection,
    ))
}

fn apply_selection(controller: &mut Controller, h: &HolidayArgs) {
    controller.selection.set_country(Some(h.country.clone()));
    controller.selection.set_state(h.state.clone());
    controller.selection.set_city(h.city.clone());
    if let Some(year) = h.year {
        controller.selection.year = year;
    }
}

fn print_regions(controller: &Controller, regions: &workday_waiver::model::RegionMap) {
    if regions.is_empty() {
        println!("(none)");
        return;
    }
    for opt in controller.presenter().options(regions).iter().skip(1) {
        println!("{:<8} {}", opt.value, opt.label);
    }
}

async fn run(controller: &mut Controller, prefs: &Preferences, command: Command) -> Result<()> {
    match command {
        Command::Help => cli::print_help("waiver"),
        Command::List => {
            let rows = controller.refresh().await?;
            if rows.is_empty() {
                println!("No waivers.");
            }
            for row in rows {
                println!(
                    "{:<23} {} .. {}  {:<11} {}",
                    row.key, row.start, row.end, row.hours, row.reason
                );
            }
        }
        Command::Add {
            start,
            end,
            from,
            to,
            reason,
        } => {
            let mut form = WaiverForm::new(&prefs.hours_per_day);
            form.set_dates(&start);
            if let Some(end) = end {
                form.end_date = end;
            }
            if let Some(from) = from {
                form.start_time = from;
            }
            if let Some(to) = to {
                form.end_time = to;
            }
            form.set_reason(&reason);

            let record = controller.add(&form).await?;
            println!("Added waiver {}", record.key);
        }
        Command::Delete(key) => {
            controller.delete(&key).await?;
            println!("Deleted {}", key);
        }
        Command::Clear => {
            let n = controller.clear_waivers().await?;
            println!("Removed {} waiver(s)", n);
        }
        Command::Countries => {
            let countries = controller.importer().countries().await?;
            print_regions(controller, &countries);
        }
        Command::States(country) => {
            let states = controller.importer().states(&country).await?;
            print_regions(controller, &states);
        }
        Command::Regions(country, state) => {
            let regions = controller.importer().regions(&country, &state).await?;
            print_regions(controller, &regions);
        }
        Command::Holidays(h) => {
            apply_selection(controller, &h);
            let rows = controller.load_holidays().await?;
            if rows.is_empty() {
                println!("No holidays found.");
            }
            for row in rows {
                println!(
                    "[{}] {} {:<30} working day: {:<3} {}",
                    if row.import_checked { "x" } else { " " },
                    row.date,
                    row.name,
                    row.working_day.unwrap_or("?"),
                    if row.has_conflicts() {
                        format!("conflicts: {}", row.conflicts.join(", "))
                    } else {
                        String::new()
                    }
                );
            }
        }
        Command::Import(h) => {
            apply_selection(controller, &h);
            controller.load_holidays().await?;

            let skip: HashSet<&str> = h.skip.iter().map(String::as_str).collect();
            for id in &skip {
                if !controller.set_import(id, false) {
                    return Err(anyhow!("{} is not one of the listed holidays", id));
                }
            }

            let hours = prefs.default_hours();
            let report = controller.import_checked(hours).await?;
            for record in &report.imported {
                println!("Imported {} {} ({})", record.key, record.reason, format_time(hours));
            }
            for (date, err) in &report.rejected {
                println!("Skipped  {}: {}", date, err);
            }
        }
    }
    Ok(())
}
